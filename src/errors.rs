//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 业务层最终把这些错误映射为 `ApiResponse` 中的 `ErrorCode`。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_lms_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum LmsError {
            $($variant(String),)*
        }

        impl LmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(LmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(LmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl LmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        LmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_lms_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    Conflict("E013", "Conflict"),
    InvalidState("E014", "Invalid State Transition"),
}

impl LmsError {
    /// 对应的 HTTP 状态码
    ///
    /// 业务层在工作流失败时据此选择响应状态，存储层错误统一为 500。
    pub fn http_status(&self) -> u16 {
        match self {
            LmsError::Validation(_) | LmsError::DateParse(_) => 400,
            LmsError::Authentication(_) => 401,
            LmsError::Authorization(_) => 403,
            LmsError::NotFound(_) => 404,
            LmsError::Conflict(_) | LmsError::InvalidState(_) => 409,
            _ => 500,
        }
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LmsError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LmsError {
    fn from(err: sea_orm::DbErr) -> Self {
        LmsError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LmsError {
    fn from(err: std::io::Error) -> Self {
        LmsError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LmsError {
    fn from(err: serde_json::Error) -> Self {
        LmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LmsError {
    fn from(err: chrono::ParseError) -> Self {
        LmsError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LmsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(LmsError::cache_connection("test").code(), "E001");
        assert_eq!(LmsError::database_config("test").code(), "E003");
        assert_eq!(LmsError::validation("test").code(), "E007");
        assert_eq!(LmsError::authentication("test").code(), "E011");
        assert_eq!(LmsError::invalid_state("test").code(), "E014");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            LmsError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            LmsError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = LmsError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = LmsError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }

    #[test]
    fn test_db_error_conversion() {
        let err: LmsError = sea_orm::DbErr::Custom("boom".to_string()).into();
        assert_eq!(err.code(), "E005");
        assert!(err.message().contains("boom"));
    }

    #[test]
    fn test_http_status() {
        assert_eq!(LmsError::validation("x").http_status(), 400);
        assert_eq!(LmsError::not_found("x").http_status(), 404);
        assert_eq!(LmsError::invalid_state("x").http_status(), 409);
        assert_eq!(LmsError::database_operation("x").http_status(), 500);
    }

    #[test]
    fn test_conflict_type_name() {
        assert_eq!(
            LmsError::conflict("already paid").error_type(),
            "Conflict"
        );
    }
}
