//! Trailing percentile ranking with RANK-style tie handling.
//!
//! Matches SQL `PERCENT_RANK()`: ties share the rank determined by the
//! count of strictly-smaller values, and a window of one (or zero) values
//! yields exactly 0 — a degenerate default, not "the minimum seen".
//!
//! Two windowing semantics coexist and must not be conflated:
//! - intensity windows slide over the dense calendar series, positionally;
//! - sentiment windows slide over the restricted series of days that have a
//!   defined sentiment, so zero-item days are skipped entirely rather than
//!   counted as zero sentiment.

/// Percent-rank of `value` within `window` (which includes `value` itself).
///
/// `rank = 1 + #(strictly less)`, `percentile = (rank − 1) / (n − 1)`;
/// 0 when `n ≤ 1`.
pub fn percent_rank(window: &[f64], value: f64) -> f64 {
  let n = window.len();
  if n <= 1 {
    return 0.0;
  }
  let less = window.iter().filter(|v| **v < value).count();
  less as f64 / (n - 1) as f64
}

/// Percentile of each value against the trailing window of up to `pwin`
/// positions ending at and including it.
pub fn trailing_percentiles(values: &[f64], pwin: u32) -> Vec<f64> {
  let p = pwin as usize;
  values
    .iter()
    .enumerate()
    .map(|(i, &v)| percent_rank(&values[(i + 1).saturating_sub(p)..=i], v))
    .collect()
}

/// Sentiment percentiles over a dense series with gaps.
///
/// Days without sentiment get `None` and contribute nothing to any window;
/// days with sentiment are ranked against the last up-to-`pwin` *defined*
/// values, by position in the restricted series.
pub fn trailing_sentiment_percentiles(
  sentiments: &[Option<f64>],
  pwin: u32,
) -> Vec<Option<f64>> {
  let p = pwin as usize;
  let mut defined: Vec<f64> = Vec::new();

  sentiments
    .iter()
    .map(|s| {
      s.map(|v| {
        defined.push(v);
        let i = defined.len() - 1;
        percent_rank(&defined[(i + 1).saturating_sub(p)..=i], v)
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn degenerate_windows_yield_exactly_zero() {
    assert_eq!(percent_rank(&[], 1.0), 0.0);
    assert_eq!(percent_rank(&[1.0], 1.0), 0.0);
  }

  #[test]
  fn all_equal_values_rank_zero() {
    let window = [2.0; 6];
    for &v in &window {
      assert_eq!(percent_rank(&window, v), 0.0);
    }
  }

  #[test]
  fn ties_share_the_rank_of_strictly_smaller_counts() {
    // 4 values below 2.0, the tied pair itself, 4 above: n = 10,
    // rank = 1 + 4 = 5, percentile = 4/9 ≈ 0.444 for both tied entries.
    let window =
      [-1.0, 0.0, 0.5, 1.0, 2.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let p = percent_rank(&window, 2.0);
    assert!((p - 4.0 / 9.0).abs() < 1e-12);
  }

  #[test]
  fn maximum_of_window_ranks_one() {
    let window = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(percent_rank(&window, 4.0), 1.0);
    assert_eq!(percent_rank(&window, 1.0), 0.0);
  }

  #[test]
  fn trailing_windows_shrink_at_history_start() {
    let pcts = trailing_percentiles(&[1.0, 3.0, 2.0], 10);
    assert_eq!(pcts[0], 0.0); // window of one
    assert_eq!(pcts[1], 1.0); // max of [1,3]
    assert_eq!(pcts[2], 0.5); // middle of [1,3,2]
  }

  #[test]
  fn trailing_windows_cap_at_p() {
    // With P = 2, the last value is ranked only against [9, 1].
    let pcts = trailing_percentiles(&[5.0, 9.0, 1.0], 2);
    assert_eq!(pcts[2], 0.0);
  }

  #[test]
  fn recomputation_is_idempotent() {
    let values = [0.3, -0.2, 0.3, 1.7, 0.0];
    assert_eq!(
      trailing_percentiles(&values, 3),
      trailing_percentiles(&values, 3)
    );
  }

  #[test]
  fn sentiment_windows_skip_undefined_days() {
    let sentiments = [Some(0.1), None, Some(0.5), None, Some(0.3)];
    let pcts = trailing_sentiment_percentiles(&sentiments, 10);
    assert_eq!(pcts[0], Some(0.0));
    assert_eq!(pcts[1], None);
    assert_eq!(pcts[2], Some(1.0)); // vs [0.1, 0.5]
    assert_eq!(pcts[3], None);
    assert_eq!(pcts[4], Some(0.5)); // vs [0.1, 0.5, 0.3]
  }

  #[test]
  fn sentiment_window_counts_defined_positions_not_calendar_days() {
    // P = 2 over defined values: the last day ranks against [0.5, 0.9]
    // even though those observations are calendar-days apart.
    let sentiments = [Some(0.1), None, None, Some(0.5), None, Some(0.9)];
    let pcts = trailing_sentiment_percentiles(&sentiments, 2);
    assert_eq!(pcts[5], Some(1.0));
  }
}
