//! Computation parameters and their bounds.
//!
//! Validation happens exactly once, at the boundary: callers reject
//! out-of-range parameters before any statistical stage runs. The math
//! itself never re-derives or clamps these bounds.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const MIN_WINDOW: u32 = 1;
pub const MAX_WINDOW: u32 = 365;
pub const MIN_PERCENTILE_WINDOW: u32 = 1;
pub const MAX_PERCENTILE_WINDOW: u32 = 730;
pub const MAX_EPSILON: f64 = 10.0;

pub const DEFAULT_WINDOW: u32 = 60;
pub const DEFAULT_PERCENTILE_WINDOW: u32 = 365;
pub const DEFAULT_EPSILON: f64 = 0.25;

/// Default horizon offsets (calendar days) for move calculations.
pub const DEFAULT_HORIZONS: [u32; 5] = [1, 2, 5, 10, 20];
/// Default alert threshold on the absolute intensity move.
pub const DEFAULT_THRESHOLD: f64 = 1.0;

/// Tunable parameters for one metrics computation.
///
/// - `window` (W): number of prior days used for the rolling baseline; the
///   baseline always excludes the day being scored.
/// - `percentile_window` (P): number of trailing positions (not elapsed
///   calendar days) used for percentile ranks.
/// - `epsilon`: floor on the baseline standard deviation, preventing the
///   z-score from blowing up on near-constant series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsParams {
  pub window:            u32,
  pub percentile_window: u32,
  pub epsilon:           f64,
}

impl Default for MetricsParams {
  fn default() -> Self {
    Self {
      window:            DEFAULT_WINDOW,
      percentile_window: DEFAULT_PERCENTILE_WINDOW,
      epsilon:           DEFAULT_EPSILON,
    }
  }
}

impl MetricsParams {
  pub fn validate(&self) -> Result<()> {
    if !(MIN_WINDOW..=MAX_WINDOW).contains(&self.window) {
      return Err(Error::WindowOutOfRange { got: self.window });
    }
    if !(MIN_PERCENTILE_WINDOW..=MAX_PERCENTILE_WINDOW)
      .contains(&self.percentile_window)
    {
      return Err(Error::PercentileWindowOutOfRange {
        got: self.percentile_window,
      });
    }
    if !(self.epsilon > 0.0 && self.epsilon <= MAX_EPSILON) {
      return Err(Error::EpsilonOutOfRange { got: self.epsilon });
    }
    Ok(())
  }

  /// Days of lookback history needed before `start_date` so the first
  /// returned day has a fully-seeded baseline and percentile window.
  pub fn history_days(&self) -> u32 { self.window.max(self.percentile_window) }

  /// First date the engine must see items for: `start - history_days`.
  pub fn calc_start(&self, start: NaiveDate) -> Result<NaiveDate> {
    start
      .checked_sub_days(Days::new(u64::from(self.history_days())))
      .ok_or(Error::DateOutOfRange)
  }
}

/// Check `start ≤ end`; the engine and API both call this before computing.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
  if start > end {
    return Err(Error::InvertedDateRange { start, end });
  }
  Ok(())
}
