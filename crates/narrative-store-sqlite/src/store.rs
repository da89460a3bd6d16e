//! [`SqliteItemStore`] — the SQLite implementation of [`ItemStore`].

use std::path::Path;

use chrono::NaiveDate;
use narrative_core::{
  item::{NewItem, RawItem},
  store::ItemStore,
};

use crate::{
  Error, Result,
  encode::{RawItemRow, encode_date},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A narrative item store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteItemStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteItemStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── ItemStore impl ──────────────────────────────────────────────────────────

impl ItemStore for SqliteItemStore {
  type Error = Error;

  async fn list_narratives(&self) -> Result<Vec<String>> {
    let narratives: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt = conn
          .prepare("SELECT DISTINCT narrative FROM items ORDER BY narrative")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(narratives)
  }

  async fn fetch_items(
    &self,
    narrative: &str,
    from: NaiveDate,
    to: NaiveDate,
  ) -> Result<Vec<RawItem>> {
    let narrative = narrative.to_owned();
    let from_str = encode_date(from);
    let to_str = encode_date(to);

    let raws: Vec<RawItemRow> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT narrative, item_key, item_date, sentiment
           FROM items
           WHERE narrative = ?1 AND item_date BETWEEN ?2 AND ?3
           ORDER BY item_date, item_key",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![narrative, from_str, to_str], |row| {
            Ok(RawItemRow {
              narrative: row.get(0)?,
              item_key:  row.get(1)?,
              item_date: row.get(2)?,
              sentiment: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawItemRow::into_item).collect()
  }

  async fn record_items(
    &self,
    narrative: &str,
    items: Vec<NewItem>,
  ) -> Result<u64> {
    for item in &items {
      item.validate()?;
    }

    let narrative = narrative.to_owned();
    let rows: Vec<(String, String, Option<f64>)> = items
      .into_iter()
      .map(|i| (i.key, encode_date(i.date), i.sentiment))
      .collect();

    let inserted: u64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut count = 0u64;
        {
          let mut stmt = tx.prepare(
            "INSERT OR IGNORE INTO items (narrative, item_key, item_date, sentiment)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (key, date, sentiment) in &rows {
            count +=
              stmt.execute(rusqlite::params![narrative, key, date, sentiment])?
                as u64;
          }
        }
        tx.commit()?;
        Ok(count)
      })
      .await?;

    Ok(inserted)
  }
}
