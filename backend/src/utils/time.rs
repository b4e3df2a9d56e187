use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

/// Returns today's date in the configured timezone. Report days and the
/// completion sweep both count calendar days in this zone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

/// Whole calendar days from `start` to `end`; negative when `end` is earlier.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
