//! 关联记录的批量查询
//!
//! 列表页需要的教师、学生、课程名称均通过一次 `IN (...)` 查询取得。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::calendar_events::{Column as EventColumn, Entity as CalendarEvents, Model as EventModel};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{LmsError, Result};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

/// 去重后的 ID 列表
pub(crate) fn unique_ids<I>(ids: I) -> Vec<i64>
where
    I: IntoIterator<Item = i64>,
{
    let mut ids: Vec<i64> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

impl SeaOrmStorage {
    /// 用户 ID -> 展示名
    pub(crate) async fn user_names<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<HashMap<i64, String>> {
        let ids = unique_ids(ids.iter().copied());
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = Users::find()
            .filter(UserColumn::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询用户失败: {e}")))?;

        Ok(users
            .into_iter()
            .map(|u| (u.id, u.display_name()))
            .collect())
    }

    /// 课程 ID -> 课程名
    pub(crate) async fn course_titles<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<HashMap<i64, String>> {
        let ids = unique_ids(ids.iter().copied());
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let courses = Courses::find()
            .filter(CourseColumn::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询课程失败: {e}")))?;

        Ok(courses.into_iter().map(|c| (c.id, c.title)).collect())
    }

    /// 事件 ID -> 事件
    pub(crate) async fn events_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        ids: &[i64],
    ) -> Result<HashMap<i64, EventModel>> {
        let ids = unique_ids(ids.iter().copied());
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let events = CalendarEvents::find()
            .filter(EventColumn::Id.is_in(ids))
            .all(conn)
            .await
            .map_err(|e| LmsError::database_operation(format!("批量查询日历事件失败: {e}")))?;

        Ok(events.into_iter().map(|e| (e.id, e)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::unique_ids;

    #[test]
    fn test_unique_ids() {
        assert_eq!(unique_ids([3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(unique_ids(Vec::new()).is_empty());
    }
}
