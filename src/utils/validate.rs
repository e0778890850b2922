use once_cell::sync::Lazy;
use regex::Regex;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex"));

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    // 用户名长度校验：3 <= x <= 32
    if username.len() < 3 || username.len() > 32 {
        return Err("Username length must be between 3 and 32 characters");
    }
    // 用户名格式校验：字母、数字、下划线、点或连字符
    if !USERNAME_RE.is_match(username) {
        return Err("Username must contain only letters, numbers, dots, underscores or hyphens");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 颜色必须为 `#RRGGBB`
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    if !HEX_COLOR_RE.is_match(color) {
        return Err("Color must be in #RRGGBB format");
    }
    Ok(())
}

/// 去除首尾空白，空串视为未填写
pub fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username() {
        assert!(validate_username("ann").is_ok());
        assert!(validate_username("jane.doe-01_x").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
        assert!(validate_username("bad name").is_err());
        assert!(validate_username("semi;colon").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("student@school.edu").is_ok());
        assert!(validate_email("first.last+tag@mail.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a|b@example.com").is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_hex_color("#3B82F6").is_ok());
        assert!(validate_hex_color("#abcdef").is_ok());
        assert!(validate_hex_color("3B82F6").is_err());
        assert!(validate_hex_color("#FFF").is_err());
        assert!(validate_hex_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  hi ")), Some("hi".to_string()));
        assert_eq!(non_empty(Some("   ")), None);
        assert_eq!(non_empty(None), None);
    }
}
