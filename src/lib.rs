//! mindicador_rs
//!
//! A lightweight Rust library for retrieving, summarizing, and charting Chilean economic
//! indicators (UF, IPC, UTM) from the public mindicador.cl API. Pairs with the `mindicador`
//! CLI and the `mindicador-gui` desktop dashboard.
//!
//! ### Features
//! - Fetch one indicator for one year (single request, tagged failures)
//! - Date-ordered series with a 10-row preview table
//! - Summary statistics (mean, max, min) and the five most frequent values
//! - Bar, line + markers, and donut charts as SVG/PNG or in-memory RGB
//!
//! ### Example
//! ```no_run
//! use mindicador_rs::{Client, Indicator, stats};
//!
//! let client = Client::default();
//! let serie = client.fetch(Indicator::Uf, 2024)?;
//! let report = stats::process(&serie)?;
//! println!("{:#?}", report.summary);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod dashboard;
pub mod format;
pub mod models;
pub mod stats;
pub mod viz;

pub use api::{Client, FetchError};
pub use dashboard::{DisplaySink, QueryOutcome, QueryState};
pub use models::{Indicator, Observation, Query, RawObservation};
