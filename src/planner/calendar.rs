use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};

/// Format used for day keys, both in the `dishes.date` JSON field and as the
/// grouping key on the client.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Monday on or before `reference`.
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    // Sunday=0..Saturday=6, Sunday belongs to the week that started six days earlier.
    let dow = reference.weekday().num_days_from_sunday();
    let offset = if dow == 0 { 6 } else { dow - 1 };
    reference - Duration::days(offset as i64)
}

/// Week start for a timestamp, using the calendar day in the timestamp's own zone.
/// The hour never changes the result.
pub fn week_start_at<Tz: TimeZone>(reference: &DateTime<Tz>) -> NaiveDate {
    week_start(reference.date_naive())
}

/// The seven days Monday..Sunday of the week beginning at `start`.
pub fn week_days(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| start + Duration::days(i as i64))
}

/// Move a week start forward (positive) or back (negative) by whole weeks.
pub fn shift_weeks(start: NaiveDate, weeks: i64) -> NaiveDate {
    start + Duration::days(7 * weeks)
}

pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

pub fn day_key_at<Tz: TimeZone>(moment: &DateTime<Tz>) -> String {
    day_key(moment.date_naive())
}

pub fn parse_day_key(key: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT)
}

/// Rebuild a wall-clock moment from a stored day key.
///
/// Anchored at noon so that converting to and from any zone within ±11h
/// still lands on the same calendar day.
pub fn anchor_day_key(key: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    Ok(parse_day_key(key)?.and_time(NaiveTime::default()) + Duration::hours(12))
}
