//! The `ItemStore` trait — the raw-item-store collaborator's interface.
//!
//! The trait is implemented by storage backends (e.g.
//! `narrative-store-sqlite`). The engine itself never fetches: callers pull
//! a complete item slice through this abstraction and hand it to
//! [`crate::compute_daily_metrics`]. Higher layers (`narrative-api`) depend
//! on this trait, not on any concrete backend.
//!
//! All methods return `Send` futures so the trait can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::NaiveDate;

use crate::item::{NewItem, RawItem};

pub trait ItemStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Sorted, distinct narrative labels present in the store.
  fn list_narratives(
    &self,
  ) -> impl Future<Output = Result<Vec<String>, Self::Error>> + Send + '_;

  /// All items for `narrative` with dates in `[from, to]` inclusive.
  ///
  /// Callers computing metrics must widen `from` to include lookback
  /// history (see [`crate::params::MetricsParams::calc_start`]).
  fn fetch_items<'a>(
    &'a self,
    narrative: &'a str,
    from: NaiveDate,
    to: NaiveDate,
  ) -> impl Future<Output = Result<Vec<RawItem>, Self::Error>> + Send + 'a;

  /// Ingest items under `narrative`, deduplicating by `(key, date)`.
  /// Returns the number of newly-stored items.
  fn record_items<'a>(
    &'a self,
    narrative: &'a str,
    items: Vec<NewItem>,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;
}
