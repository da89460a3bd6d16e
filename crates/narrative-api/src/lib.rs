//! JSON REST API for the narrative metrics engine.
//!
//! Exposes an axum [`Router`] backed by any
//! [`narrative_core::store::ItemStore`]. The engine itself is pure; this
//! layer owns parameter defaults, boundary validation, and the
//! fetch-then-compute orchestration. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Endpoints
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/narratives` | Sorted distinct narrative labels |
//! | `GET`  | `/narratives/{narrative}/metrics` | Dense daily series for a date range |
//! | `GET`  | `/narratives/{narrative}/moves` | Horizon moves + alerts for a target date |
//! | `POST` | `/narratives/{narrative}/items` | Bulk item ingest (dedup by key+date) |
//!
//! Narrative labels containing `/` cannot be addressed through the path
//! segment; keep labels slash-free.

pub mod auth;
pub mod error;
pub mod items;
pub mod metrics;
pub mod moves;
pub mod narratives;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router, middleware,
  routing::{get, post},
};
use narrative_core::store::ItemStore;
use serde::Deserialize;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  /// When set, every route requires `Authorization: Bearer <token>`.
  pub auth_token: Option<String>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S>(store: Arc<S>, auth_token: Option<String>) -> Router<()>
where
  S: ItemStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let router = Router::new()
    .route("/narratives", get(narratives::list::<S>))
    .route("/narratives/{narrative}/metrics", get(metrics::handler::<S>))
    .route("/narratives/{narrative}/moves", get(moves::handler::<S>))
    .route("/narratives/{narrative}/items", post(items::ingest::<S>))
    .with_state(store);

  match auth_token {
    Some(token) => router.layer(middleware::from_fn_with_state(
      Arc::<str>::from(token),
      auth::require_bearer,
    )),
    None => router,
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use chrono::NaiveDate;
  use narrative_core::{item::NewItem, store::ItemStore as _};
  use narrative_store_sqlite::SqliteItemStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  fn items_for_day(date: &str, count: u64, sentiment: f64) -> Vec<NewItem> {
    (0..count)
      .map(|i| NewItem {
        key:       format!("{date}-{i}"),
        date:      d(date),
        sentiment: Some(sentiment),
      })
      .collect()
  }

  async fn seeded_store() -> Arc<SqliteItemStore> {
    let store = SqliteItemStore::open_in_memory().await.unwrap();
    // counts [10,12,11,9,13,50] over 2025-06-01..06, ending in a spike
    for (i, count) in [10u64, 12, 11, 9, 13, 50].into_iter().enumerate() {
      let date = format!("2025-06-{:02}", i + 1);
      store
        .record_items("Inflation", items_for_day(&date, count, 0.1))
        .await
        .unwrap();
    }
    Arc::new(store)
  }

  async fn request(
    router: Router,
    method: &str,
    uri: &str,
    headers: Vec<(header::HeaderName, &str)>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    request(router, "GET", uri, vec![], None).await
  }

  // ── Narratives ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn narratives_lists_labels() {
    let router = api_router(seeded_store().await, None);
    let (status, body) = get(router, "/narratives").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Inflation"]));
  }

  // ── Metrics ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn metrics_returns_dense_series_for_span() {
    let router = api_router(seeded_store().await, None);
    let (status, body) = get(
      router,
      "/narratives/Inflation/metrics?start_date=2025-06-01&end_date=2025-06-06&window=5&percentile_window=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0]["date"], "2025-06-01");
    assert_eq!(rows[0]["item_count"], 10);
    assert_eq!(rows[5]["item_count"], 50);

    // spike day matches the reference: mean 11, std ≈ 1.58, z ≈ 24.7
    let spike = &rows[5];
    assert!((spike["rolling_mean"].as_f64().unwrap() - 11.0).abs() < 1e-9);
    let z = spike["intensity"].as_f64().unwrap();
    assert!(z > 24.6 && z < 24.7);
    assert_eq!(spike["intensity_percentile"], 1.0);
  }

  #[tokio::test]
  async fn metrics_gap_days_have_null_sentiment() {
    let store = SqliteItemStore::open_in_memory().await.unwrap();
    store
      .record_items("Inflation", items_for_day("2025-06-01", 2, 0.5))
      .await
      .unwrap();
    let router = api_router(Arc::new(store), None);

    let (status, body) = get(
      router,
      "/narratives/Inflation/metrics?start_date=2025-06-01&end_date=2025-06-02&window=5&percentile_window=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows[0]["sentiment_mean"], 0.5);
    assert_eq!(rows[1]["item_count"], 0);
    assert_eq!(rows[1]["sentiment_mean"], Value::Null);
    assert_eq!(rows[1]["sentiment_percentile"], Value::Null);
  }

  #[tokio::test]
  async fn metrics_unknown_narrative_is_empty_series_not_404() {
    let router = api_router(seeded_store().await, None);
    let (status, body) = get(
      router,
      "/narratives/Stagflation/metrics?start_date=2025-06-01&end_date=2025-06-03",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["item_count"] == 0));
  }

  #[tokio::test]
  async fn metrics_rejects_bad_parameters() {
    let store = seeded_store().await;

    let (status, body) = get(
      api_router(store.clone(), None),
      "/narratives/Inflation/metrics?window=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("window"));

    let (status, _) = get(
      api_router(store.clone(), None),
      "/narratives/Inflation/metrics?epsilon=20",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(
      api_router(store, None),
      "/narratives/Inflation/metrics?start_date=2025-06-10&end_date=2025-06-01",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Moves ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn moves_reports_mapping_and_alerts() {
    let router = api_router(seeded_store().await, None);
    let (status, body) = get(
      router,
      "/narratives/Inflation/moves?target_date=2025-06-06&horizons=1,400&threshold=1.0&window=5&percentile_window=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(body["narrative"], "Inflation");
    assert_eq!(body["target_date"], "2025-06-06");
    // 1-day move: spike z minus the previous day's, comfortably > 1
    assert!(body["moves"]["1"].as_f64().unwrap() > 20.0);
    // 400 days back is outside the series: absent, not zero
    assert_eq!(body["moves"]["400"], Value::Null);

    let alerts = body["alerts"].as_array().unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0]["horizon"], 1);
    assert!(alerts[0]["move"].as_f64().unwrap() > 20.0);
    assert!(alerts[0]["abs_move"].as_f64().unwrap() > 20.0);
  }

  #[tokio::test]
  async fn moves_below_threshold_produce_no_alerts() {
    let router = api_router(seeded_store().await, None);
    let (status, body) = get(
      router,
      "/narratives/Inflation/moves?target_date=2025-06-06&horizons=1&threshold=100&window=5&percentile_window=5",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["alerts"].as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn moves_rejects_bad_horizons_and_threshold() {
    let store = seeded_store().await;

    let (status, _) = get(
      api_router(store.clone(), None),
      "/narratives/Inflation/moves?target_date=2025-06-06&horizons=1,x",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(
      api_router(store.clone(), None),
      "/narratives/Inflation/moves?target_date=2025-06-06&horizons=0",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(
      api_router(store, None),
      "/narratives/Inflation/moves?target_date=2025-06-06&threshold=-1",
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  // ── Ingest ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn ingest_stores_and_deduplicates() {
    let store = Arc::new(SqliteItemStore::open_in_memory().await.unwrap());
    let payload = json!([
      { "key": "a", "date": "2025-06-01", "sentiment": 0.4 },
      { "key": "b", "date": "2025-06-01", "sentiment": null },
    ]);

    let (status, body) = request(
      api_router(store.clone(), None),
      "POST",
      "/narratives/Inflation/items",
      vec![],
      Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["inserted"], 2);

    // replay: everything deduplicated away
    let (status, body) = request(
      api_router(store, None),
      "POST",
      "/narratives/Inflation/items",
      vec![],
      Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["inserted"], 0);
  }

  #[tokio::test]
  async fn ingest_rejects_out_of_range_sentiment() {
    let store = Arc::new(SqliteItemStore::open_in_memory().await.unwrap());
    let (status, body) = request(
      api_router(store, None),
      "POST",
      "/narratives/Inflation/items",
      vec![],
      Some(json!([{ "key": "a", "date": "2025-06-01", "sentiment": 2.0 }])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sentiment"));
  }

  // ── Auth ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn bearer_token_guards_every_route() {
    let store = seeded_store().await;
    let token = Some("s3cret".to_string());

    let (status, _) =
      get(api_router(store.clone(), token.clone()), "/narratives").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request(
      api_router(store.clone(), token.clone()),
      "GET",
      "/narratives",
      vec![(header::AUTHORIZATION, "Bearer wrong")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(
      api_router(store, token),
      "GET",
      "/narratives",
      vec![(header::AUTHORIZATION, "Bearer s3cret")],
      None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Inflation"]));
  }
}
