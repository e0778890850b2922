use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 用户资料表（身份认证由外部平台负责，这里只保存资料与角色）
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::Phone).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).string().null())
                    .col(ColumnDef::new(Users::ClassRate).double().null())
                    .col(ColumnDef::new(Users::LastSeen).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::Title).string().not_null())
                    .col(ColumnDef::new(Courses::Description).text().null())
                    .col(ColumnDef::new(Courses::Level).string().null())
                    .col(
                        ColumnDef::new(Courses::Price)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(Courses::DurationWeeks).integer().null())
                    .col(ColumnDef::new(Courses::TeacherId).big_integer().null())
                    .col(
                        ColumnDef::new(Courses::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Courses::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 选课表
        manager
            .create_table(
                Table::create()
                    .table(Enrollments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Enrollments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Enrollments::Status).string().not_null())
                    .col(
                        ColumnDef::new(Enrollments::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Enrollments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Enrollments::Table, Enrollments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 学员缴费记录表
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Payments::StudentId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::EnrollmentId).big_integer().null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(ColumnDef::new(Payments::Method).string().not_null())
                    .col(
                        ColumnDef::new(Payments::Reference)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Note).text().null())
                    .col(ColumnDef::new(Payments::ReviewedBy).big_integer().null())
                    .col(ColumnDef::new(Payments::ReviewedAt).big_integer().null())
                    .col(ColumnDef::new(Payments::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Payments::Table, Payments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 日历事件表
        manager
            .create_table(
                Table::create()
                    .table(CalendarEvents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CalendarEvents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CalendarEvents::Title).string().not_null())
                    .col(ColumnDef::new(CalendarEvents::Description).text().null())
                    .col(ColumnDef::new(CalendarEvents::EventType).string().not_null())
                    .col(
                        ColumnDef::new(CalendarEvents::StartTime)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CalendarEvents::EndTime).big_integer().null())
                    .col(
                        ColumnDef::new(CalendarEvents::AllDay)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CalendarEvents::CourseId).big_integer().null())
                    .col(ColumnDef::new(CalendarEvents::TeacherId).big_integer().null())
                    .col(ColumnDef::new(CalendarEvents::PaymentAmount).double().null())
                    .col(ColumnDef::new(CalendarEvents::Color).string().not_null())
                    .col(
                        ColumnDef::new(CalendarEvents::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CalendarEvents::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CalendarEvents::Table, CalendarEvents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CalendarEvents::Table, CalendarEvents::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业表
        manager
            .create_table(
                Table::create()
                    .table(Assignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Assignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Assignments::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::TeacherId).big_integer().not_null())
                    .col(ColumnDef::new(Assignments::Title).string().not_null())
                    .col(ColumnDef::new(Assignments::Description).text().null())
                    .col(ColumnDef::new(Assignments::DueDate).big_integer().null())
                    .col(
                        ColumnDef::new(Assignments::MaxGrade)
                            .double()
                            .not_null()
                            .default(100.0),
                    )
                    .col(ColumnDef::new(Assignments::AttachmentUrl).string().null())
                    .col(
                        ColumnDef::new(Assignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Assignments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Assignments::Table, Assignments::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业指派学生表
        manager
            .create_table(
                Table::create()
                    .table(AssignmentStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AssignmentStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AssignmentStudents::AssignedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentStudents::Table, AssignmentStudents::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AssignmentStudents::Table, AssignmentStudents::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 作业提交表（每个学生每份作业至多一条）
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Submissions::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Submissions::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::Content).text().null())
                    .col(ColumnDef::new(Submissions::FileUrl).string().null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::IsLate)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Submissions::Grade).double().null())
                    .col(ColumnDef::new(Submissions::Feedback).text().null())
                    .col(ColumnDef::new(Submissions::FeedbackFileUrl).string().null())
                    .col(ColumnDef::new(Submissions::GradedBy).big_integer().null())
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 官网咨询表
        manager
            .create_table(
                Table::create()
                    .table(ContactInquiries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContactInquiries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContactInquiries::Name).string().not_null())
                    .col(ColumnDef::new(ContactInquiries::Email).string().not_null())
                    .col(ColumnDef::new(ContactInquiries::Phone).string().null())
                    .col(ColumnDef::new(ContactInquiries::Message).text().not_null())
                    .col(ColumnDef::new(ContactInquiries::CourseId).big_integer().null())
                    .col(ColumnDef::new(ContactInquiries::Status).string().not_null())
                    .col(
                        ColumnDef::new(ContactInquiries::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_teacher_id")
                    .table(Courses::Table)
                    .col(Courses::TeacherId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_enrollments_student_course")
                    .table(Enrollments::Table)
                    .col(Enrollments::StudentId)
                    .col(Enrollments::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_payments_student_id")
                    .table(Payments::Table)
                    .col(Payments::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_calendar_events_start_time")
                    .table(CalendarEvents::Table)
                    .col(CalendarEvents::StartTime)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_assignment_students_pair")
                    .table(AssignmentStudents::Table)
                    .col(AssignmentStudents::AssignmentId)
                    .col(AssignmentStudents::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(ContactInquiries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AssignmentStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Assignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CalendarEvents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Enrollments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    Role,
    Status,
    FullName,
    Phone,
    AvatarUrl,
    ClassRate,
    LastSeen,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    Title,
    Description,
    Level,
    Price,
    DurationWeeks,
    TeacherId,
    IsPublished,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Enrollments {
    #[sea_orm(iden = "enrollments")]
    Table,
    Id,
    StudentId,
    CourseId,
    Status,
    EnrolledAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Payments {
    #[sea_orm(iden = "payments")]
    Table,
    Id,
    StudentId,
    CourseId,
    EnrollmentId,
    Amount,
    Method,
    Reference,
    Status,
    Note,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
}

#[derive(DeriveIden)]
pub(crate) enum CalendarEvents {
    #[sea_orm(iden = "calendar_events")]
    Table,
    Id,
    Title,
    Description,
    EventType,
    StartTime,
    EndTime,
    AllDay,
    CourseId,
    TeacherId,
    PaymentAmount,
    Color,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
    CourseId,
    TeacherId,
    Title,
    Description,
    DueDate,
    MaxGrade,
    AttachmentUrl,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AssignmentStudents {
    #[sea_orm(iden = "assignment_students")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    AssignedAt,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Content,
    FileUrl,
    Status,
    IsLate,
    Grade,
    Feedback,
    FeedbackFileUrl,
    GradedBy,
    GradedAt,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum ContactInquiries {
    #[sea_orm(iden = "contact_inquiries")]
    Table,
    Id,
    Name,
    Email,
    Phone,
    Message,
    CourseId,
    Status,
    CreatedAt,
}
