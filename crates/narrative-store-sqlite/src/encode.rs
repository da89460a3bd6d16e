//! Encoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings, which compare
//! lexicographically in date order, so BETWEEN range scans need no parsing
//! on the database side.

use chrono::NaiveDate;
use narrative_core::item::RawItem;

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String {
  d.format(DATE_FORMAT).to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

/// Raw strings read directly from an `items` row.
pub struct RawItemRow {
  pub narrative: String,
  pub item_key:  String,
  pub item_date: String,
  pub sentiment: Option<f64>,
}

impl RawItemRow {
  pub fn into_item(self) -> Result<RawItem> {
    Ok(RawItem {
      key:       self.item_key,
      narrative: self.narrative,
      date:      decode_date(&self.item_date)?,
      sentiment: self.sentiment,
    })
  }
}
