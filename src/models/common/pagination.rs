use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 分页查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationQuery {
    #[serde(
        default = "default_page",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub page: i64,
    #[serde(
        default = "default_size",
        deserialize_with = "deserialize_string_to_i64"
    )]
    pub size: i64,
}

// 分页响应信息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginationInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

// 分页列表响应
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/pagination.ts")]
pub struct PaginatedResponse<T: TS> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

// 自定义反序列化函数，支持字符串到i64的转换
fn deserialize_string_to_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct I64Visitor;

    impl<'de> Visitor<'de> for I64Visitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a string containing an integer")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value <= i64::MAX as u64 {
                Ok(value as i64)
            } else {
                Err(Error::invalid_value(Unexpected::Unsigned(value), &self))
            }
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            value
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
        }
    }

    deserializer.deserialize_any(I64Visitor)
}

fn default_page() -> i64 {
    1
}

fn default_size() -> i64 {
    10
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self { page: 1, size: 10 }
    }
}

pub const MAX_PAGE_SIZE: i64 = 100;

/// 将页码与每页条数收敛到合法范围
pub fn normalize_page(page: Option<i64>, size: Option<i64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1) as u64;
    let size = size.unwrap_or(10).clamp(1, MAX_PAGE_SIZE) as u64;
    (page, size)
}

impl PaginationInfo {
    pub fn new(page: u64, size: u64, total: u64) -> Self {
        let total_pages = if size == 0 { 0 } else { total.div_ceil(size) };
        Self {
            page: page as i64,
            page_size: size as i64,
            total: total as i64,
            total_pages: total_pages as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_accepts_string_numbers() {
        let q: PaginationQuery = serde_json::from_str(r#"{"page":"3","size":20}"#).unwrap();
        assert_eq!(q.page, 3);
        assert_eq!(q.size, 20);

        let q: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!((q.page, q.size), (1, 10));
    }

    #[test]
    fn test_normalize_page() {
        assert_eq!(normalize_page(None, None), (1, 10));
        assert_eq!(normalize_page(Some(0), Some(0)), (1, 1));
        assert_eq!(normalize_page(Some(-5), Some(1000)), (1, MAX_PAGE_SIZE as u64));
    }

    #[test]
    fn test_pagination_info_total_pages() {
        assert_eq!(PaginationInfo::new(1, 10, 0).total_pages, 0);
        assert_eq!(PaginationInfo::new(1, 10, 10).total_pages, 1);
        assert_eq!(PaginationInfo::new(2, 10, 11).total_pages, 2);
    }
}
