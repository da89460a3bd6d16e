//! Handler for `GET /narratives`.

use std::sync::Arc;

use axum::{Json, extract::State};
use narrative_core::store::ItemStore;

use crate::error::ApiError;

/// `GET /narratives` — sorted distinct narrative labels in the store.
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<String>>, ApiError>
where
  S: ItemStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let narratives = store
    .list_narratives()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(narratives))
}
