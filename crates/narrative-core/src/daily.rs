//! Daily aggregation — collapse raw items into one row per calendar day.
//!
//! The output series is dense: every day in the requested span appears
//! exactly once, in order, with zero-item days filled in. Gap-filling is an
//! explicit calendar-generation step left-joined against the sparse
//! aggregation, never ad hoc patching inside the statistics stages.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::item::RawItem;

/// One calendar day's aggregated items, before any derived statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
  pub date:           NaiveDate,
  /// Distinct-key item count; 0 means "no items that day".
  pub item_count:     u64,
  /// Unweighted mean of per-item sentiment scores, `None` on zero-count
  /// days (and on days where no item carried a score).
  pub sentiment_mean: Option<f64>,
}

/// Aggregate `items` into a dense per-day series over `[start, end]`
/// inclusive.
///
/// Items outside the span are ignored. Items sharing a key on the same day
/// are counted once; the first occurrence's sentiment wins. Returns an empty
/// vector when `start > end` (callers validate the range before computing).
pub fn aggregate_daily(
  items: &[RawItem],
  start: NaiveDate,
  end: NaiveDate,
) -> Vec<DayBucket> {
  // Sparse aggregation: date -> (seen keys, sentiment scores).
  let mut days: BTreeMap<NaiveDate, (HashSet<&str>, Vec<f64>)> =
    BTreeMap::new();

  for item in items {
    if item.date < start || item.date > end {
      continue;
    }
    let (keys, scores) = days.entry(item.date).or_default();
    if !keys.insert(item.key.as_str()) {
      continue; // duplicate key for this day
    }
    if let Some(s) = item.sentiment {
      scores.push(s);
    }
  }

  // Dense calendar, left-joined against the sparse aggregation.
  start
    .iter_days()
    .take_while(|d| *d <= end)
    .map(|date| match days.get(&date) {
      Some((keys, scores)) => DayBucket {
        date,
        item_count: keys.len() as u64,
        sentiment_mean: (!scores.is_empty())
          .then(|| scores.iter().sum::<f64>() / scores.len() as f64),
      },
      None => DayBucket { date, item_count: 0, sentiment_mean: None },
    })
    .collect()
}
