//! 日期时间转换
//!
//! 存储层使用 unix 秒，接口输出 ISO 8601（UTC），
//! 表单输入使用 `datetime-local` 格式（`YYYY-MM-DDTHH:MM`，不带时区，按配置的偏移解释）。

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::errors::{LmsError, Result};

/// `datetime-local` 输入框使用的格式
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

const DATETIME_LOCAL_WITH_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// 解析时区偏移，支持 `Z`、`UTC`、`+08:00`、`-0530`
pub fn parse_utc_offset(value: &str) -> Option<FixedOffset> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    value.parse::<FixedOffset>().ok()
}

/// unix 秒转 UTC 时间，非法值回退到 epoch
pub fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

/// 格式化为 `datetime-local` 字符串（按给定偏移的墙上时间）
pub fn to_datetime_local(value: &DateTime<Utc>, offset: &FixedOffset) -> String {
    value
        .with_timezone(offset)
        .format(DATETIME_LOCAL_FORMAT)
        .to_string()
}

/// 解析 `datetime-local` 字符串，按给定偏移换算为 UTC
pub fn from_datetime_local(value: &str, offset: &FixedOffset) -> Result<DateTime<Utc>> {
    let value = value.trim();
    let naive = NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_LOCAL_WITH_SECONDS))?;

    offset
        .from_local_datetime(&naive)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| LmsError::date_parse(format!("Ambiguous local time: {value}")))
}

/// 同时接受 ISO 8601（带时区）与 `datetime-local` 两种输入
pub fn parse_flexible(value: &str, offset: &FixedOffset) -> Result<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(value.trim()) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(_) => from_datetime_local(value, offset),
    }
}

/// 给定偏移下某年某月的时间范围 `[start, end)`，以 unix 秒表示
pub fn month_bounds(year: i32, month: u32, offset: &FixedOffset) -> Option<(i64, i64)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let start = offset
        .from_local_datetime(&first.and_hms_opt(0, 0, 0)?)
        .single()?;
    let end = offset
        .from_local_datetime(&next.and_hms_opt(0, 0, 0)?)
        .single()?;

    Some((start.timestamp(), end.timestamp()))
}

/// 某个时间点在给定偏移下所属的 (年, 月)
pub fn year_month_of(ts: i64, offset: &FixedOffset) -> (i32, u32) {
    let local = timestamp_to_datetime(ts).with_timezone(offset);
    (local.year(), local.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(value: &str) -> FixedOffset {
        parse_utc_offset(value).unwrap()
    }

    #[test]
    fn test_parse_utc_offset() {
        assert_eq!(offset("Z").local_minus_utc(), 0);
        assert_eq!(offset("+08:00").local_minus_utc(), 8 * 3600);
        assert_eq!(offset("-0530").local_minus_utc(), -(5 * 3600 + 30 * 60));
        assert!(parse_utc_offset("08:00").is_none());
        assert!(parse_utc_offset("+25:00").is_none());
        assert!(parse_utc_offset("+8").is_none());
        assert_eq!(offset(" utc ").local_minus_utc(), 0);
    }

    #[test]
    fn test_datetime_local_round_trip_keeps_wall_clock() {
        for tz in ["+00:00", "+08:00", "-05:30", "+13:45"] {
            let tz = offset(tz);
            let input = "2025-03-09T14:30";
            let stored = from_datetime_local(input, &tz).unwrap();
            assert_eq!(to_datetime_local(&stored, &tz), input);

            // 经过存储（unix 秒）后再展示，墙上时间不变
            let reloaded = timestamp_to_datetime(stored.timestamp());
            assert_eq!(to_datetime_local(&reloaded, &tz), input);
        }
    }

    #[test]
    fn test_iso_to_local_and_back() {
        let tz = offset("+08:00");
        let iso = "2025-01-31T16:00:00Z";
        let stored = parse_flexible(iso, &tz).unwrap();
        let shown = to_datetime_local(&stored, &tz);
        assert_eq!(shown, "2025-02-01T00:00");
        assert_eq!(from_datetime_local(&shown, &tz).unwrap(), stored);
    }

    #[test]
    fn test_from_datetime_local_accepts_seconds() {
        let tz = offset("Z");
        let dt = from_datetime_local("2025-06-01T08:15:30", &tz).unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-01T08:15:30+00:00");
    }

    #[test]
    fn test_invalid_datetime_local() {
        let tz = offset("Z");
        let err = from_datetime_local("not a date", &tz).unwrap_err();
        assert_eq!(err.code(), "E010");
    }

    #[test]
    fn test_month_bounds() {
        let tz = offset("Z");
        let (start, end) = month_bounds(2024, 12, &tz).unwrap();
        assert_eq!(timestamp_to_datetime(start).to_rfc3339(), "2024-12-01T00:00:00+00:00");
        assert_eq!(timestamp_to_datetime(end).to_rfc3339(), "2025-01-01T00:00:00+00:00");
        assert!(month_bounds(2024, 13, &tz).is_none());
    }

    #[test]
    fn test_year_month_respects_offset() {
        let tz = offset("+08:00");
        let ts = parse_flexible("2025-01-31T20:00:00Z", &tz).unwrap().timestamp();
        assert_eq!(year_month_of(ts, &tz), (2025, 2));
    }
}
