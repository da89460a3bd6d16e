//! Handler for `GET /narratives/{narrative}/moves`.
//!
//! Computes the intensity series around a target date, then derives the
//! horizon move mapping and the alerts that trip the threshold.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{Days, NaiveDate};
use narrative_core::{
  compute_daily_metrics,
  moves::{MovesReport, horizon_report},
  params::{self, MetricsParams},
  store::ItemStore,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Query parameters accepted by the moves endpoint.
///
/// `horizons` is a comma-separated list of positive day counts, default
/// `1,2,5,10,20`. The series is computed over
/// `[start_date, end_date]` (default: the 365 days up to `target_date`);
/// horizons that land outside it come back as `null`.
#[derive(Debug, Deserialize)]
pub struct MovesQuery {
  pub target_date:       NaiveDate,
  pub horizons:          Option<String>,
  pub threshold:         Option<f64>,
  pub start_date:        Option<NaiveDate>,
  pub end_date:          Option<NaiveDate>,
  pub window:            Option<u32>,
  pub percentile_window: Option<u32>,
  pub epsilon:           Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct MovesResponse {
  pub narrative: String,
  #[serde(flatten)]
  pub report:    MovesReport,
}

fn parse_horizons(raw: &str) -> Result<Vec<u32>, ApiError> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| {
      t.parse::<u32>()
        .map_err(|_| ApiError::BadRequest(format!("invalid horizon {t:?}")))
    })
    .collect()
}

/// `GET /narratives/{narrative}/moves?target_date=...`
pub async fn handler<S>(
  State(store): State<Arc<S>>,
  Path(narrative): Path<String>,
  Query(query): Query<MovesQuery>,
) -> Result<Json<MovesResponse>, ApiError>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let defaults = MetricsParams::default();
  let metrics_params = MetricsParams {
    window:            query.window.unwrap_or(defaults.window),
    percentile_window: query
      .percentile_window
      .unwrap_or(defaults.percentile_window),
    epsilon:           query.epsilon.unwrap_or(defaults.epsilon),
  };
  metrics_params.validate()?;

  let horizons = match &query.horizons {
    Some(raw) => parse_horizons(raw)?,
    None => params::DEFAULT_HORIZONS.to_vec(),
  };
  let threshold = query.threshold.unwrap_or(params::DEFAULT_THRESHOLD);

  let end = query.end_date.unwrap_or(query.target_date);
  let start = match query.start_date {
    Some(s) => s,
    None => end
      .checked_sub_days(Days::new(365))
      .ok_or_else(|| ApiError::BadRequest("end_date too early".into()))?,
  };
  params::validate_date_range(start, end)?;
  let calc_start = metrics_params.calc_start(start)?;

  let items = store
    .fetch_items(&narrative, calc_start, end)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let records = compute_daily_metrics(&items, start, end, &metrics_params)?;
  let report =
    horizon_report(&records, query.target_date, &horizons, threshold)?;

  Ok(Json(MovesResponse { narrative, report }))
}
