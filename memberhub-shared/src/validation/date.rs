//! Membership date parsing
//!
//! Clients send membership dates as bare `YYYY-MM-DD` strings. They are read
//! as local midnight on that calendar day and stored as the equivalent UTC
//! instant, so a value read back without re-localization can render one day
//! earlier than the string that was sent.
//!
//! Out-of-range months and days are not rejected. They roll over into the
//! neighbouring month or year (`2025-02-30` is `2025-03-02`, `2025-13-01` is
//! `2026-01-01`, `2025-03-00` is `2025-02-28`).
//!
//! # Example
//!
//! ```ignore
//! use memberhub_shared::validation::date::parse_membership_date;
//!
//! let start = parse_membership_date("2031-06-01").expect("future date");
//! assert!(parse_membership_date("2001-06-01").is_none()); // in the past
//! assert!(parse_membership_date("2031-6-1").is_none()); // wrong shape
//! ```

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDate, TimeZone, Utc};

/// Expected shape of a date string, used in client-facing error messages
pub const DATE_FORMAT_HINT: &str = "YYYY-MM-DD";

/// Parses and validates a membership date against the current local date
///
/// Returns `None` when the string is not shaped `YYYY-MM-DD` or when the date
/// lies strictly before today. Today itself is accepted.
pub fn parse_membership_date(input: &str) -> Option<DateTime<Utc>> {
    parse_membership_date_at(input, Local::now().date_naive())
}

/// Same as [`parse_membership_date`] with an explicit "today"
pub fn parse_membership_date_at(input: &str, today: NaiveDate) -> Option<DateTime<Utc>> {
    let date = parse_calendar_date(input)?;

    if date < today {
        return None;
    }

    local_midnight(date)
}

/// Parses a `YYYY-MM-DD` string into a calendar date, rolling over
/// out-of-range month and day components
pub fn parse_calendar_date(input: &str) -> Option<NaiveDate> {
    if !has_date_shape(input) {
        return None;
    }

    // Shape check guarantees ASCII digits at these offsets
    let year: i32 = input[0..4].parse().ok()?;
    let month: i32 = input[5..7].parse().ok()?;
    let day: i64 = input[8..10].parse().ok()?;

    let month_index = month - 1;
    let first_of_month = NaiveDate::from_ymd_opt(
        year + month_index.div_euclid(12),
        (month_index.rem_euclid(12) + 1) as u32,
        1,
    )?;

    first_of_month.checked_add_signed(Duration::days(day - 1))
}

/// Checks for exactly four digits, a dash, two digits, a dash, two digits
fn has_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Converts a calendar date to the UTC instant of its local midnight
///
/// When midnight does not exist locally (a DST gap), the first valid instant
/// of the day is used.
fn local_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0)?;

    let local = match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => Local
            .from_local_datetime(&(midnight + Duration::hours(1)))
            .earliest()?,
    };

    Some(local.with_timezone(&Utc))
}
