//! Handler for `POST /narratives/{narrative}/items`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use narrative_core::{item::NewItem, store::ItemStore};
use serde_json::json;

use crate::error::ApiError;

/// `POST /narratives/{narrative}/items` — bulk ingest.
///
/// Body: JSON array of `{"key", "date", "sentiment"}`. Items already stored
/// under the same `(key, date)` are ignored; the response counts only the
/// newly-stored ones. Returns 201 + `{"inserted": n}`.
pub async fn ingest<S>(
  State(store): State<Arc<S>>,
  Path(narrative): Path<String>,
  Json(body): Json<Vec<NewItem>>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  // Reject bad sentiment scores with a 400 before touching the store.
  for item in &body {
    item.validate()?;
  }

  let inserted = store
    .record_items(&narrative, body)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  tracing::info!(narrative, inserted, "ingested items");
  Ok((StatusCode::CREATED, Json(json!({ "inserted": inserted }))))
}
