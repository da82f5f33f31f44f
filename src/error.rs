//! Error types

use core::fmt;

/// Errors raised by the watch face itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The background image has no pixels. Raised once at creation.
    MissingBackground,
    /// Milliseconds since the epoch that cannot be represented as a date.
    TimestampOutOfRange(i64),
    /// UTC offset in seconds outside of ±24h.
    InvalidOffset(i32),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingBackground => f.write_str("background image is missing or empty"),
            Error::TimestampOutOfRange(ms) => write!(f, "timestamp {ms}ms is out of range"),
            Error::InvalidOffset(secs) => write!(f, "UTC offset of {secs}s is out of range"),
        }
    }
}

/// Errors raised while drawing a frame onto a canvas with error type `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError<E> {
    Face(Error),
    Canvas(E),
}

impl<E> From<Error> for RenderError<E> {
    fn from(err: Error) -> Self {
        RenderError::Face(err)
    }
}

impl<E: fmt::Debug> fmt::Display for RenderError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Face(err) => write!(f, "{err}"),
            RenderError::Canvas(err) => write!(f, "canvas error: {err:?}"),
        }
    }
}
