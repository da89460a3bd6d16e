//! Error types for `narrative-core`.
//!
//! Only parameter violations are hard failures. A narrative with no items,
//! a horizon date outside the series, or a degenerate (short) window are all
//! normal, representable outcomes of the data model and never surface here.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("window must be between 1 and 365, got {got}")]
  WindowOutOfRange { got: u32 },

  #[error("percentile_window must be between 1 and 730, got {got}")]
  PercentileWindowOutOfRange { got: u32 },

  #[error("epsilon must be greater than 0 and at most 10, got {got}")]
  EpsilonOutOfRange { got: f64 },

  #[error("start_date {start} is after end_date {end}")]
  InvertedDateRange { start: NaiveDate, end: NaiveDate },

  #[error("alert threshold must be positive, got {got}")]
  ThresholdOutOfRange { got: f64 },

  #[error("horizon offsets must be at least 1 day")]
  ZeroHorizon,

  #[error("sentiment score {got} is outside [-1, 1]")]
  SentimentOutOfRange { got: f64 },

  #[error("date arithmetic overflowed the calendar")]
  DateOutOfRange,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
