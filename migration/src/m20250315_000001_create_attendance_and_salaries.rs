use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::{CalendarEvents, Courses, Users};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 课次表
        manager
            .create_table(
                Table::create()
                    .table(Lectures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Lectures::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Lectures::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::TeacherId).big_integer().null())
                    .col(
                        ColumnDef::new(Lectures::CalendarEventId)
                            .big_integer()
                            .null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Lectures::Title).string().not_null())
                    .col(ColumnDef::new(Lectures::StartsAt).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::EndsAt).big_integer().not_null())
                    .col(ColumnDef::new(Lectures::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lectures::Table, Lectures::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lectures::Table, Lectures::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Lectures::Table, Lectures::CalendarEventId)
                            .to(CalendarEvents::Table, CalendarEvents::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 日历课时考勤表（按日历事件）
        manager
            .create_table(
                Table::create()
                    .table(ClassAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ClassAttendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::CalendarEventId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ClassAttendance::Status).string().not_null())
                    .col(
                        ColumnDef::new(ClassAttendance::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::Bonus)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ClassAttendance::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassAttendance::Table, ClassAttendance::CalendarEventId)
                            .to(CalendarEvents::Table, CalendarEvents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(ClassAttendance::Table, ClassAttendance::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 课次考勤表（按课次）
        manager
            .create_table(
                Table::create()
                    .table(LectureAttendance::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LectureAttendance::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::LectureId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(LectureAttendance::Status).string().not_null())
                    .col(
                        ColumnDef::new(LectureAttendance::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::Amount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::Bonus)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::ReviewedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::ReviewedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(LectureAttendance::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LectureAttendance::Table, LectureAttendance::LectureId)
                            .to(Lectures::Table, Lectures::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LectureAttendance::Table, LectureAttendance::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 教师月度工资表
        manager
            .create_table(
                Table::create()
                    .table(SalaryPayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SalaryPayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SalaryPayments::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SalaryPayments::Year).integer().not_null())
                    .col(ColumnDef::new(SalaryPayments::Month).integer().not_null())
                    .col(
                        ColumnDef::new(SalaryPayments::TotalClasses)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SalaryPayments::BaseAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SalaryPayments::BonusAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(SalaryPayments::TotalAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(SalaryPayments::Status).string().not_null())
                    .col(ColumnDef::new(SalaryPayments::PaidAt).big_integer().null())
                    .col(ColumnDef::new(SalaryPayments::PaidBy).big_integer().null())
                    .col(ColumnDef::new(SalaryPayments::Note).text().null())
                    .col(
                        ColumnDef::new(SalaryPayments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SalaryPayments::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SalaryPayments::Table, SalaryPayments::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_class_attendance_status")
                    .table(ClassAttendance::Table)
                    .col(ClassAttendance::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_lectures_course_id")
                    .table(Lectures::Table)
                    .col(Lectures::CourseId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_salary_payments_teacher_month")
                    .table(SalaryPayments::Table)
                    .col(SalaryPayments::TeacherId)
                    .col(SalaryPayments::Year)
                    .col(SalaryPayments::Month)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SalaryPayments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LectureAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ClassAttendance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Lectures::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Lectures {
    #[sea_orm(iden = "lectures")]
    Table,
    Id,
    CourseId,
    TeacherId,
    CalendarEventId,
    Title,
    StartsAt,
    EndsAt,
    CreatedAt,
}

#[derive(DeriveIden)]
enum ClassAttendance {
    #[sea_orm(iden = "class_attendance")]
    Table,
    Id,
    CalendarEventId,
    TeacherId,
    Status,
    CompletedAt,
    Amount,
    Bonus,
    RejectionReason,
    ReviewedBy,
    ReviewedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LectureAttendance {
    #[sea_orm(iden = "lecture_attendance")]
    Table,
    Id,
    LectureId,
    TeacherId,
    Status,
    CompletedAt,
    Amount,
    Bonus,
    RejectionReason,
    ReviewedBy,
    ReviewedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SalaryPayments {
    #[sea_orm(iden = "salary_payments")]
    Table,
    Id,
    TeacherId,
    Year,
    Month,
    TotalClasses,
    BaseAmount,
    BonusAmount,
    TotalAmount,
    Status,
    PaidAt,
    PaidBy,
    Note,
    CreatedAt,
    UpdatedAt,
}
