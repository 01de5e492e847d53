// tests/common/test_data.rs
use chrono::{DateTime, TimeZone, Utc};

/// 2032-09-13 16:00 UTC
pub fn lesson_start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2032, 9, 13, 16, 0, 0).unwrap()
}
