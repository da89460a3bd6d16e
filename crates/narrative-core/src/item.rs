//! Item types — the raw input rows the engine consumes.
//!
//! An item is a dated, labeled observation with an identifying key and an
//! optional sentiment score. Items are produced by a store backend (see
//! [`crate::store::ItemStore`]) already filtered to one narrative; the
//! engine never talks to storage itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One raw item as returned by a store backend.
///
/// The key is opaque to the engine; its only contract is that two items
/// sharing a key on the same day describe the same underlying thing and
/// must be counted once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawItem {
  pub key:       String,
  /// The narrative label this item was classified under.
  pub narrative: String,
  /// Publication timestamp truncated to a calendar date.
  pub date:      NaiveDate,
  /// Sentiment score in `[-1, 1]`, if the item was scored.
  pub sentiment: Option<f64>,
}

/// Input to [`crate::store::ItemStore::record_items`].
/// The narrative label is supplied separately by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewItem {
  pub key:       String,
  pub date:      NaiveDate,
  pub sentiment: Option<f64>,
}

impl NewItem {
  /// Reject sentiment scores outside `[-1, 1]` before they reach a store.
  pub fn validate(&self) -> Result<()> {
    if let Some(s) = self.sentiment
      && !(-1.0..=1.0).contains(&s)
    {
      return Err(Error::SentimentOutOfRange { got: s });
    }
    Ok(())
  }
}
