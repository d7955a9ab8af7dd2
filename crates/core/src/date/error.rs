use thiserror::Error;

/// Errors that can occur when parsing local dates and times.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Malformed date '{0}': expected YYYY-MM-DD")]
    MalformedDate(String),
    #[error("Date out of range: {0}")]
    OutOfRange(String),
    #[error("Malformed time '{0}': expected HH:MM or HH:MM:SS")]
    MalformedTime(String),
}

/// Errors that can occur when constructing a date range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("Invalid date range: start date must be before or equal to end date")]
    InvalidRange,
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}
