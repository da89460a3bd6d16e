//! Handler for `GET /narratives/{narrative}/metrics`.
//!
//! Validates parameters at the boundary, widens the fetch to cover lookback
//! history, runs the pure engine, and returns the dense series for exactly
//! `[start_date, end_date]`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{Days, NaiveDate, Utc};
use narrative_core::{
  DailyRecord, compute_daily_metrics,
  params::{self, MetricsParams},
  store::ItemStore,
};
use serde::Deserialize;

use crate::error::ApiError;

/// Query parameters accepted by the metrics endpoint.
///
/// Defaults: `end_date` = today, `start_date` = end − 365 days,
/// `window` = 60, `percentile_window` = 365, `epsilon` = 0.25.
#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
  pub start_date:        Option<NaiveDate>,
  pub end_date:          Option<NaiveDate>,
  pub window:            Option<u32>,
  pub percentile_window: Option<u32>,
  pub epsilon:           Option<f64>,
}

impl MetricsQuery {
  pub fn params(&self) -> MetricsParams {
    let defaults = MetricsParams::default();
    MetricsParams {
      window:            self.window.unwrap_or(defaults.window),
      percentile_window: self
        .percentile_window
        .unwrap_or(defaults.percentile_window),
      epsilon:           self.epsilon.unwrap_or(defaults.epsilon),
    }
  }

  pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let end = self.end_date.unwrap_or_else(|| Utc::now().date_naive());
    let start = match self.start_date {
      Some(s) => s,
      None => end
        .checked_sub_days(Days::new(365))
        .ok_or_else(|| ApiError::BadRequest("end_date too early".into()))?,
    };
    params::validate_date_range(start, end)?;
    Ok((start, end))
  }
}

/// `GET /narratives/{narrative}/metrics`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(narrative): Path<String>,
  Query(query): Query<MetricsQuery>,
) -> Result<Json<Vec<DailyRecord>>, ApiError>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let params = query.params();
  params.validate()?;
  let (start, end) = query.date_range()?;
  let calc_start = params.calc_start(start)?;

  let items = store
    .fetch_items(&narrative, calc_start, end)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::debug!(
    narrative,
    %start,
    %end,
    items = items.len(),
    "computing daily metrics"
  );

  let records = compute_daily_metrics(&items, start, end, &params)?;
  Ok(Json(records))
}
