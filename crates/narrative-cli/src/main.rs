//! `narr` — command-line client for the narrative metrics API.
//!
//! # Usage
//!
//! ```
//! narr --url http://localhost:8000 narratives
//! narr metrics Inflation --start-date 2025-01-01 --window 30
//! narr moves Inflation --target-date 2025-06-06 --horizons 1,5,20
//! narr ingest Inflation items.json
//! ```

mod client;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig, SeriesOptions};
use narrative_core::item::NewItem;
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "narr", about = "Client for the narrative metrics API")]
struct Args {
  /// Path to a TOML config file (url, token).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the metrics server (default: http://localhost:8000).
  #[arg(long, env = "NARR_URL")]
  url: Option<String>,

  /// Bearer token for authenticated servers.
  #[arg(long, env = "NARR_TOKEN")]
  token: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(clap::Args, Debug, Clone)]
struct SeriesArgs {
  /// First day of the series (default: 365 days before the end).
  #[arg(long)]
  start_date: Option<NaiveDate>,

  /// Last day of the series (default: today).
  #[arg(long)]
  end_date: Option<NaiveDate>,

  /// Trailing baseline window in days.
  #[arg(long)]
  window: Option<u32>,

  /// Trailing percentile window in days.
  #[arg(long)]
  percentile_window: Option<u32>,

  /// Standard-deviation floor for the intensity z-score.
  #[arg(long)]
  epsilon: Option<f64>,
}

impl SeriesArgs {
  fn options(&self) -> SeriesOptions {
    SeriesOptions {
      start_date:        self.start_date,
      end_date:          self.end_date,
      window:            self.window,
      percentile_window: self.percentile_window,
      epsilon:           self.epsilon,
    }
  }
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List the narratives known to the server.
  Narratives,

  /// Print the dense daily metrics series for a narrative as JSON.
  Metrics {
    narrative: String,
    #[command(flatten)]
    series:    SeriesArgs,
  },

  /// Print horizon moves and alerts for a target date as JSON.
  Moves {
    narrative: String,

    /// Day to measure moves from.
    #[arg(long)]
    target_date: NaiveDate,

    /// Comma-separated horizon offsets in days (default: 1,2,5,10,20).
    #[arg(long)]
    horizons: Option<String>,

    /// Absolute-move alert threshold (default: 1.0).
    #[arg(long)]
    threshold: Option<f64>,

    #[command(flatten)]
    series: SeriesArgs,
  },

  /// Upload items from a JSON file (array of {key, date, sentiment}).
  Ingest {
    narrative: String,
    file:      std::path::PathBuf,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:   String,
  #[serde(default)]
  token: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8000".to_string()),
    token:    args
      .token
      .or_else(|| (!file_cfg.token.is_empty()).then(|| file_cfg.token.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;

  match args.command {
    Command::Narratives => {
      for narrative in client.list_narratives().await? {
        println!("{narrative}");
      }
    }
    Command::Metrics { narrative, series } => {
      let records = client.metrics(&narrative, &series.options()).await?;
      println!("{}", serde_json::to_string_pretty(&records)?);
    }
    Command::Moves {
      narrative,
      target_date,
      horizons,
      threshold,
      series,
    } => {
      let report = client
        .moves(
          &narrative,
          target_date,
          horizons.as_deref(),
          threshold,
          &series.options(),
        )
        .await?;
      println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Command::Ingest { narrative, file } => {
      let raw = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      let items: Vec<NewItem> =
        serde_json::from_str(&raw).context("parsing items file")?;
      for item in &items {
        item.validate().context("invalid item")?;
      }
      let total = items.len();
      let inserted = client.ingest(&narrative, &items).await?;
      println!("inserted {inserted} of {total} items");
    }
  }

  Ok(())
}
