//! Rolling baseline and intensity — the trailing z-score of daily counts.
//!
//! For day `t` the baseline is the prior `W` counts, `t-W .. t-1`,
//! excluding `t` itself so a spike never dilutes its own score. The z-score
//! denominator is floored at epsilon so a near-constant history (std ≈ 0)
//! cannot blow the score up to infinity.

/// Per-day baseline statistics and the resulting intensity z-score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Baseline {
  /// Trailing mean of counts over the prior window; 0 with no history.
  pub mean:      f64,
  /// Trailing sample standard deviation (n−1); 0 with fewer than 2 prior
  /// values, never negative.
  pub std:       f64,
  /// `(count − mean) / max(std, epsilon)`, or exactly 0 when no prior days
  /// exist. A leading 0 means "no history yet", not "no signal".
  pub intensity: f64,
}

/// Compute the baseline for every position of a dense count series.
///
/// `window` and `epsilon` are assumed validated by the caller
/// ([`crate::params::MetricsParams::validate`]).
pub fn rolling_baseline(
  counts: &[u64],
  window: u32,
  epsilon: f64,
) -> Vec<Baseline> {
  let w = window as usize;

  counts
    .iter()
    .enumerate()
    .map(|(t, &count)| {
      let prior = &counts[t.saturating_sub(w)..t];
      let n = prior.len();
      if n == 0 {
        return Baseline { mean: 0.0, std: 0.0, intensity: 0.0 };
      }

      let mean = prior.iter().map(|&c| c as f64).sum::<f64>() / n as f64;
      let std = if n < 2 {
        0.0
      } else {
        let ss: f64 = prior
          .iter()
          .map(|&c| {
            let d = c as f64 - mean;
            d * d
          })
          .sum();
        (ss / (n as f64 - 1.0)).sqrt()
      };

      let intensity = (count as f64 - mean) / std.max(epsilon);
      Baseline { mean, std, intensity }
    })
    .collect()
}
