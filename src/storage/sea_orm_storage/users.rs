use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::{
    assignment_students, assignments, calendar_events, class_attendance, courses, enrollments,
    lecture_attendance, lectures, payments, salary_payments, submissions,
};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    common::pagination::normalize_page,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            full_name: Set(req.full_name),
            phone: Set(req.phone),
            avatar_url: Set(req.avatar_url),
            class_rate: Set(req.class_rate),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let (page, size) = normalize_page(query.page, query.size);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped))
                    .add(Column::FullName.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户总数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户列表失败: {e}")))?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新最后活跃时间
    pub async fn update_last_seen_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastSeen, Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新最后活跃时间失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 更新用户信息
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        // 先检查用户是否存在
        let existing = self.get_user_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }

        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }

        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        if let Some(full_name) = update.full_name {
            model.full_name = Set(Some(full_name));
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(avatar_url) = update.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }

        if let Some(class_rate) = update.class_rate {
            model.class_rate = Set(Some(class_rate));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("更新用户失败: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    /// 删除用户及其名下数据
    ///
    /// 学生的选课、缴费、提交，教师的作业、考勤、工资一并删除；
    /// 课程、日历事件、课次上的教师引用置空。
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| LmsError::database_operation(format!("开启事务失败: {e}")))?;

        let owned_assignment_ids: Vec<i64> = assignments::Entity::find()
            .select_only()
            .column(assignments::Column::Id)
            .filter(assignments::Column::TeacherId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !owned_assignment_ids.is_empty() {
            submissions::Entity::delete_many()
                .filter(submissions::Column::AssignmentId.is_in(owned_assignment_ids.clone()))
                .exec(&txn)
                .await?;
            assignment_students::Entity::delete_many()
                .filter(
                    assignment_students::Column::AssignmentId.is_in(owned_assignment_ids.clone()),
                )
                .exec(&txn)
                .await?;
            assignments::Entity::delete_many()
                .filter(assignments::Column::Id.is_in(owned_assignment_ids))
                .exec(&txn)
                .await?;
        }

        submissions::Entity::delete_many()
            .filter(submissions::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        assignment_students::Entity::delete_many()
            .filter(assignment_students::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        payments::Entity::delete_many()
            .filter(payments::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::StudentId.eq(id))
            .exec(&txn)
            .await?;
        class_attendance::Entity::delete_many()
            .filter(class_attendance::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        lecture_attendance::Entity::delete_many()
            .filter(lecture_attendance::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        salary_payments::Entity::delete_many()
            .filter(salary_payments::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;

        // 教师引用置空
        courses::Entity::update_many()
            .col_expr(courses::Column::TeacherId, Expr::value(Option::<i64>::None))
            .filter(courses::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        calendar_events::Entity::update_many()
            .col_expr(
                calendar_events::Column::TeacherId,
                Expr::value(Option::<i64>::None),
            )
            .filter(calendar_events::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        lectures::Entity::update_many()
            .col_expr(lectures::Column::TeacherId, Expr::value(Option::<i64>::None))
            .filter(lectures::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;

        let result = Users::delete_by_id(id).exec(&txn).await?;

        txn.commit()
            .await
            .map_err(|e| LmsError::database_operation(format!("删除用户失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户数量失败: {e}")))?;

        Ok(count)
    }
}
