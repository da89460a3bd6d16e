//! The metrics pipeline: aggregate → baseline → percentiles → truncate.
//!
//! Each invocation recomputes everything from the raw items; there is no
//! durable state in this crate. Records for dates before the requested
//! start exist only transiently as lookback history and are discarded from
//! the output.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
  Result, baseline, daily, item::RawItem, params, params::MetricsParams,
  percentile,
};

/// One fully-derived calendar day for one narrative.
///
/// Exactly one record exists per date over the requested span; the series
/// is dense and ordered. Optional fields are genuinely absent (`None`),
/// never sentinel numbers: `sentiment_mean` is present iff the day had
/// items, and `sentiment_percentile` is present iff `sentiment_mean` is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRecord {
  pub date:                 NaiveDate,
  pub item_count:           u64,
  pub rolling_mean:         f64,
  pub rolling_std:          f64,
  pub intensity:            f64,
  pub sentiment_mean:       Option<f64>,
  pub intensity_percentile: f64,
  pub sentiment_percentile: Option<f64>,
}

/// Compute the dense [`DailyRecord`] series for `[start, end]` inclusive.
///
/// `items` must cover the lookback span `[params.calc_start(start), end]`
/// for the first returned days to have seeded windows; items outside that
/// span are ignored. A narrative with no items is not an error — the result
/// is an all-zero series with absent sentiment.
pub fn compute_daily_metrics(
  items: &[RawItem],
  start: NaiveDate,
  end: NaiveDate,
  params: &MetricsParams,
) -> Result<Vec<DailyRecord>> {
  params.validate()?;
  params::validate_date_range(start, end)?;
  let calc_start = params.calc_start(start)?;

  let buckets = daily::aggregate_daily(items, calc_start, end);

  let counts: Vec<u64> = buckets.iter().map(|b| b.item_count).collect();
  let baselines =
    baseline::rolling_baseline(&counts, params.window, params.epsilon);

  let intensities: Vec<f64> = baselines.iter().map(|b| b.intensity).collect();
  let intensity_pcts =
    percentile::trailing_percentiles(&intensities, params.percentile_window);

  let sentiments: Vec<Option<f64>> =
    buckets.iter().map(|b| b.sentiment_mean).collect();
  let sentiment_pcts = percentile::trailing_sentiment_percentiles(
    &sentiments,
    params.percentile_window,
  );

  Ok(
    buckets
      .iter()
      .zip(baselines)
      .zip(intensity_pcts.iter().zip(sentiment_pcts))
      .filter(|((bucket, _), _)| bucket.date >= start)
      .map(|((bucket, base), (&ipct, spct))| DailyRecord {
        date:                 bucket.date,
        item_count:           bucket.item_count,
        rolling_mean:         base.mean,
        rolling_std:          base.std,
        intensity:            base.intensity,
        sentiment_mean:       bucket.sentiment_mean,
        intensity_percentile: ipct,
        sentiment_percentile: spct,
      })
      .collect(),
  )
}
