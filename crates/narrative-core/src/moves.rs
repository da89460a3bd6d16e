//! Horizon moves and alert detection.
//!
//! A horizon move is the signed change in intensity between a target date
//! and the date `h` calendar days earlier. Lookups are exact-date: if either
//! endpoint has no record in the series the move is absent, which is
//! distinct from a zero move. An alert is a present move whose magnitude
//! strictly exceeds the threshold.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, engine::DailyRecord};

/// A horizon whose absolute intensity move exceeded the alert threshold.
///
/// Wire field names (`move`, `abs_move`) match the metrics API consumers
/// already speak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Alert {
  /// Horizon offset in calendar days.
  pub horizon:   u32,
  /// Signed intensity change over the horizon.
  #[serde(rename = "move")]
  pub delta:     f64,
  #[serde(rename = "abs_move")]
  pub magnitude: f64,
}

/// Moves and alerts for one target date, as returned by
/// [`horizon_report`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovesReport {
  pub target_date: NaiveDate,
  /// Horizon → signed move, `None` when either endpoint date is missing
  /// from the series.
  pub moves:       BTreeMap<u32, Option<f64>>,
  pub alerts:      Vec<Alert>,
}

/// Compute `intensity(target) − intensity(target − h)` for each horizon.
///
/// Every requested horizon appears in the result; absence is an explicit
/// `None`, never silently dropped or coerced to 0.
pub fn horizon_moves(
  series: &[DailyRecord],
  target: NaiveDate,
  horizons: &[u32],
) -> BTreeMap<u32, Option<f64>> {
  let by_date: BTreeMap<NaiveDate, f64> =
    series.iter().map(|r| (r.date, r.intensity)).collect();
  let target_intensity = by_date.get(&target).copied();

  horizons
    .iter()
    .map(|&h| {
      let m = target_intensity.and_then(|ti| {
        target
          .checked_sub_days(Days::new(u64::from(h)))
          .and_then(|d| by_date.get(&d).copied())
          .map(|hi| ti - hi)
      });
      (h, m)
    })
    .collect()
}

/// Filter a move mapping down to the horizons that trip the threshold.
///
/// Strict inequality: a move exactly equal to the threshold is not an
/// alert. Output order follows horizon order; consumers may re-sort.
pub fn detect_alerts(
  moves: &BTreeMap<u32, Option<f64>>,
  threshold: f64,
) -> Vec<Alert> {
  moves
    .iter()
    .filter_map(|(&horizon, m)| {
      m.filter(|delta| delta.abs() > threshold).map(|delta| Alert {
        horizon,
        delta,
        magnitude: delta.abs(),
      })
    })
    .collect()
}

/// Validate inputs, compute the move mapping, and flag alerts in one pass.
pub fn horizon_report(
  series: &[DailyRecord],
  target: NaiveDate,
  horizons: &[u32],
  threshold: f64,
) -> Result<MovesReport> {
  if horizons.contains(&0) {
    return Err(Error::ZeroHorizon);
  }
  if !(threshold > 0.0) {
    return Err(Error::ThresholdOutOfRange { got: threshold });
  }

  let moves = horizon_moves(series, target, horizons);
  let alerts = detect_alerts(&moves, threshold);
  Ok(MovesReport { target_date: target, moves, alerts })
}
