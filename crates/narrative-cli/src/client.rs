//! Async HTTP client wrapping the narrative metrics JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use narrative_core::{DailyRecord, item::NewItem};
use reqwest::Client;
use serde_json::Value;

/// Connection settings for the metrics API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Sent as `Authorization: Bearer <token>` when non-empty.
  pub token:    String,
}

/// Query knobs shared by the metrics and moves endpoints. `None` fields are
/// omitted from the query string and fall back to the server defaults.
#[derive(Debug, Clone, Default)]
pub struct SeriesOptions {
  pub start_date:        Option<NaiveDate>,
  pub end_date:          Option<NaiveDate>,
  pub window:            Option<u32>,
  pub percentile_window: Option<u32>,
  pub epsilon:           Option<f64>,
}

impl SeriesOptions {
  fn query(&self) -> Vec<(&'static str, String)> {
    let mut q = Vec::new();
    if let Some(d) = self.start_date {
      q.push(("start_date", d.to_string()));
    }
    if let Some(d) = self.end_date {
      q.push(("end_date", d.to_string()));
    }
    if let Some(w) = self.window {
      q.push(("window", w.to_string()));
    }
    if let Some(p) = self.percentile_window {
      q.push(("percentile_window", p.to_string()));
    }
    if let Some(e) = self.epsilon {
      q.push(("epsilon", e.to_string()));
    }
    q
  }
}

/// Async HTTP client for the narrative metrics JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.token.is_empty() {
      req
    } else {
      req.bearer_auth(&self.config.token)
    }
  }

  // ── Narratives ────────────────────────────────────────────────────────────

  /// `GET /narratives`
  pub async fn list_narratives(&self) -> Result<Vec<String>> {
    let resp = self
      .auth(self.client.get(self.url("/narratives")))
      .send()
      .await
      .context("GET /narratives failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /narratives → {}", resp.status()));
    }
    resp.json().await.context("deserialising narratives")
  }

  // ── Metrics ───────────────────────────────────────────────────────────────

  /// `GET /narratives/{narrative}/metrics`
  pub async fn metrics(
    &self,
    narrative: &str,
    options: &SeriesOptions,
  ) -> Result<Vec<DailyRecord>> {
    let resp = self
      .auth(
        self
          .client
          .get(self.url(&format!("/narratives/{narrative}/metrics"))),
      )
      .query(&options.query())
      .send()
      .await
      .context("GET metrics failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET metrics → {}", resp.status()));
    }
    resp.json().await.context("deserialising metrics")
  }

  // ── Moves ─────────────────────────────────────────────────────────────────

  /// `GET /narratives/{narrative}/moves?target_date=<d>`
  pub async fn moves(
    &self,
    narrative: &str,
    target_date: NaiveDate,
    horizons: Option<&str>,
    threshold: Option<f64>,
    options: &SeriesOptions,
  ) -> Result<Value> {
    let mut query = options.query();
    query.push(("target_date", target_date.to_string()));
    if let Some(h) = horizons {
      query.push(("horizons", h.to_string()));
    }
    if let Some(t) = threshold {
      query.push(("threshold", t.to_string()));
    }

    let resp = self
      .auth(
        self
          .client
          .get(self.url(&format!("/narratives/{narrative}/moves"))),
      )
      .query(&query)
      .send()
      .await
      .context("GET moves failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET moves → {}", resp.status()));
    }
    resp.json().await.context("deserialising moves")
  }

  // ── Ingest ────────────────────────────────────────────────────────────────

  /// `POST /narratives/{narrative}/items` — returns the inserted count.
  pub async fn ingest(
    &self,
    narrative: &str,
    items: &[NewItem],
  ) -> Result<u64> {
    let resp = self
      .auth(
        self
          .client
          .post(self.url(&format!("/narratives/{narrative}/items"))),
      )
      .json(items)
      .send()
      .await
      .context("POST items failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("POST items → {}", resp.status()));
    }
    let body: Value = resp.json().await.context("deserialising response")?;
    body["inserted"]
      .as_u64()
      .ok_or_else(|| anyhow!("malformed response: {body}"))
  }
}
