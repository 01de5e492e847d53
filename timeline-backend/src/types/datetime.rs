use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// カレンダーの期間指定をパースする
///
/// `YYYY-MM-DD`（UTC 0時として扱う）、`YYYY-MM-DDTHH:MM:SS`（UTC）、
/// RFC 3339 のいずれかを受け付ける。
pub fn parse_calendar_bound(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(
            parse_calendar_bound("2032-09-13"),
            Some(Utc.with_ymd_and_hms(2032, 9, 13, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        assert_eq!(
            parse_calendar_bound("2032-09-13T18:00:00+03:00"),
            Some(Utc.with_ymd_and_hms(2032, 9, 13, 15, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_naive_datetime() {
        assert_eq!(
            parse_calendar_bound("2032-09-13T15:46:00"),
            Some(Utc.with_ymd_and_hms(2032, 9, 13, 15, 46, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_calendar_bound("last month"), None);
    }
}
