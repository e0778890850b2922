// 业务错误码，以 `as i32` 写入响应的 code 字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1005,
    RateLimitExceeded = 1006,
    InvalidStateTransition = 1007,

    // 用户
    UserNotFound = 2000,
    UserAlreadyExists = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserCreationFailed = 2004,
    UserUpdateFailed = 2005,
    UserDeleteFailed = 2006,
    CanNotDeleteCurrentUser = 2007,

    // 课程
    CourseNotFound = 3000,
    CourseCreationFailed = 3001,
    CourseUpdateFailed = 3002,
    CourseDeleteFailed = 3003,
    CoursePermissionDenied = 3004,

    // 选课
    EnrollmentNotFound = 3100,
    EnrollmentAlreadyExists = 3101,
    EnrollmentRequired = 3102,

    // 缴费
    PaymentNotFound = 3200,
    PaymentAlreadyReviewed = 3201,
    PaymentAmountInvalid = 3202,

    // 日历
    EventNotFound = 4000,
    EventValidationFailed = 4001,
    EventPermissionDenied = 4002,

    // 考勤
    AttendanceNotFound = 4100,
    ClassNotFinished = 4101,
    AttendanceAlreadyReviewed = 4102,
    AttendanceNotCompleted = 4103,

    // 工资
    SalaryNotFound = 4200,
    SalaryAlreadyPaid = 4201,

    // 作业
    AssignmentNotFound = 5000,
    AssignmentPermissionDenied = 5001,
    SubmissionNotFound = 5002,
    SubmissionAlreadyGraded = 5003,
    GradeOutOfRange = 5004,
    StudentNotTargeted = 5005,

    // 咨询
    InquiryNotFound = 6000,

    InternalServerError = 9000,
}

impl ErrorCode {
    pub fn is_success(self) -> bool {
        self == ErrorCode::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::RateLimitExceeded as i32, 1006);
        assert_eq!(ErrorCode::SalaryAlreadyPaid as i32, 4201);
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }
}
