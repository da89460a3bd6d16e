//! Core types and metric computations for the narrative tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.
//!
//! The engine is a pure function of an input item series: it aggregates
//! dated items into a dense per-day series, derives a trailing-baseline
//! z-score ("intensity"), ranks each day against its own trailing history,
//! and computes multi-horizon intensity moves with threshold alerts.
//! Nothing is cached between invocations.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod baseline;
pub mod daily;
pub mod engine;
pub mod error;
pub mod item;
pub mod moves;
pub mod params;
pub mod percentile;
pub mod store;

pub use engine::{DailyRecord, compute_daily_metrics};
pub use error::{Error, Result};
