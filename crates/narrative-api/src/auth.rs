//! Optional bearer-token guard for the API router.
//!
//! When a token is configured every route requires
//! `Authorization: Bearer <token>`; without one the API is open (e.g.
//! behind a reverse proxy that does its own auth).

use std::sync::Arc;

use axum::{
  Json,
  extract::{Request, State},
  http::{StatusCode, header},
  middleware::Next,
  response::{IntoResponse, Response},
};
use serde_json::json;

pub async fn require_bearer(
  State(token): State<Arc<str>>,
  req: Request,
  next: Next,
) -> Response {
  let authorized = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .and_then(|v| v.strip_prefix("Bearer "))
    .is_some_and(|presented| presented == &*token);

  if authorized {
    next.run(req).await
  } else {
    (
      StatusCode::UNAUTHORIZED,
      Json(json!({ "error": "missing or invalid bearer token" })),
    )
      .into_response()
  }
}
