//! Date-time utilities

use error_stack::ResultExt;
use time::{macros::format_description, Duration, OffsetDateTime, UtcOffset};

use crate::errors::{CustomResult, ParsingError};

/// Current UTC date-time
pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Current UTC date-time shifted forward by the given number of days
pub fn days_from_now(days: i64) -> OffsetDateTime {
    now().saturating_add(Duration::days(days))
}

/// Converts seconds since the unix epoch into a UTC date-time
pub fn from_unix_timestamp(seconds: i64) -> CustomResult<OffsetDateTime, ParsingError> {
    OffsetDateTime::from_unix_timestamp(seconds)
        .change_context(ParsingError::DateTimeParsingError)
        .attach_printable_lazy(|| format!("Timestamp {seconds} is out of range"))
}

/// Formats a date-time as an RFC 3339 UTC string with fixed milliseconds,
/// e.g. `2017-05-05T16:00:00.000Z`
pub fn format_rfc3339(date_time: OffsetDateTime) -> CustomResult<String, ParsingError> {
    date_time
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        ))
        .change_context(ParsingError::EncodeError("rfc3339"))
}
