//! Presentation adapter: maps a processed series onto display datasets and drives one
//! query cycle against a [`DisplaySink`].
//!
//! ```no_run
//! use mindicador_rs::dashboard::{self, DashboardPanel, QueryState};
//! use mindicador_rs::{Client, Indicator, Query};
//!
//! let mut panel = DashboardPanel::default();
//! let state = dashboard::run_query(&Client::default(), Query::new(Indicator::Uf, 2024), &mut panel)?;
//! assert_eq!(state.next(), QueryState::Idle);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::api::{Client, FetchError};
use crate::format::format_metric;
use crate::models::{IndicatorMeta, IndicatorResponse, Observation, Query};
use crate::stats::{self, ProcessError, SeriesReport, SummaryStats, ValueCount};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::mpsc::{Receiver, TryRecvError};

pub const ERROR_MESSAGE: &str =
    "Error al consultar la API. Verifique la conexión o los parámetros.";
pub const EMPTY_MESSAGE: &str = "No se encontraron datos para los parámetros seleccionados.";
pub const LOADING_MESSAGE: &str = "Consultando datos...";

pub const X_AXIS_TITLE: &str = "Fecha";
pub const Y_AXIS_TITLE: &str = "Valor";
pub const PIE_TITLE: &str = "Distribución de valores más frecuentes";
pub const PIE_HOLE: f64 = 0.3;

/// Where a query cycle stands. Every cycle ends back in `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueryState {
    #[default]
    Idle,
    Querying,
    Displaying,
    ErrorShown,
    EmptyWarningShown,
}

impl QueryState {
    /// State after the current one completes.
    ///
    /// The terminal states fall back to `Idle`. `Querying` is left as is: it only resolves
    /// when its outcome is handed to [`present`], which returns the terminal state.
    pub fn next(self) -> QueryState {
        match self {
            QueryState::Displaying | QueryState::ErrorShown | QueryState::EmptyWarningShown => {
                QueryState::Idle
            }
            QueryState::Idle | QueryState::Querying => self,
        }
    }

    /// A new query can only start from `Idle`.
    pub fn begin(self) -> Option<QueryState> {
        (self == QueryState::Idle).then_some(QueryState::Querying)
    }
}

/// Result of fetching and processing one query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Success {
        report: SeriesReport,
        meta: IndicatorMeta,
    },
    EmptyInput,
    TransportFailure(String),
    BadResponse(u16),
    /// The response held an observation that could not be interpreted.
    InvalidData(String),
}

impl QueryOutcome {
    pub fn from_fetch(fetched: Result<IndicatorResponse, FetchError>) -> Self {
        let response = match fetched {
            Ok(r) => r,
            Err(FetchError::TransportFailure(msg)) => return QueryOutcome::TransportFailure(msg),
            Err(FetchError::BadResponse { status }) => {
                return QueryOutcome::BadResponse(status.as_u16());
            }
        };
        match stats::process(&response.serie) {
            Ok(report) => QueryOutcome::Success {
                report,
                meta: response.meta(),
            },
            Err(ProcessError::EmptyInput) => QueryOutcome::EmptyInput,
            Err(e @ ProcessError::InvalidDate { .. }) => QueryOutcome::InvalidData(e.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            QueryOutcome::TransportFailure(_)
                | QueryOutcome::BadResponse(_)
                | QueryOutcome::InvalidData(_)
        )
    }
}

/// Labelled numeric value ("Promedio", "Máximo", "Mínimo").
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    pub label: &'static str,
    pub value: f64,
}

impl Metric {
    pub fn display_value(&self) -> String {
        format_metric(self.value)
    }
}

/// Rendering style of a date/value chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XyStyle {
    Bars,
    LinePoints,
}

/// Dataset for a chart with dates on X and values on Y.
#[derive(Debug, Clone, PartialEq)]
pub struct XyChart {
    pub title: String,
    pub x_title: &'static str,
    pub y_title: &'static str,
    pub style: XyStyle,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
}

impl XyChart {
    fn from_series(title: String, style: XyStyle, series: &[Observation]) -> Self {
        Self {
            title,
            x_title: X_AXIS_TITLE,
            y_title: Y_AXIS_TITLE,
            style,
            x: series.iter().map(|o| o.date).collect(),
            y: series.iter().map(|o| o.value).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Dataset for the donut chart of the most frequent values.
#[derive(Debug, Clone, PartialEq)]
pub struct PieChart {
    pub title: String,
    /// The distinct values, in slice order.
    pub labels: Vec<f64>,
    /// Occurrence count of each label.
    pub sizes: Vec<usize>,
    /// Inner radius as a fraction of the outer radius.
    pub hole: f64,
}

impl PieChart {
    fn from_frequency(frequency: &[ValueCount]) -> Self {
        Self {
            title: PIE_TITLE.to_string(),
            labels: frequency.iter().map(|f| f.value).collect(),
            sizes: frequency.iter().map(|f| f.count).collect(),
            hole: PIE_HOLE,
        }
    }

    pub fn label_texts(&self) -> Vec<String> {
        self.labels.iter().map(|v| format_metric(*v)).collect()
    }

    pub fn total(&self) -> usize {
        self.sizes.iter().sum()
    }
}

/// Everything the display layer needs for one successful query.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub heading: String,
    pub table: Vec<Observation>,
    pub metrics: [Metric; 3],
    pub bar: XyChart,
    pub line: XyChart,
    pub pie: PieChart,
}

impl DashboardView {
    pub fn build(report: &SeriesReport, query: &Query, meta: &IndicatorMeta) -> Self {
        let suffix = query.title_suffix();
        let mut heading = format!("Datos del indicador: {suffix}");
        match (&meta.name, &meta.unit) {
            (Some(name), Some(unit)) => heading.push_str(&format!(" · {name} ({unit})")),
            (Some(name), None) => heading.push_str(&format!(" · {name}")),
            _ => {}
        }
        Self {
            heading,
            table: report.table.clone(),
            metrics: metrics_for(&report.summary),
            bar: XyChart::from_series(
                format!("Valores del indicador {suffix}"),
                XyStyle::Bars,
                &report.series,
            ),
            line: XyChart::from_series(
                format!("Serie de tiempo del indicador {suffix}"),
                XyStyle::LinePoints,
                &report.series,
            ),
            pie: PieChart::from_frequency(&report.frequency),
        }
    }
}

pub fn metrics_for(summary: &SummaryStats) -> [Metric; 3] {
    [
        Metric {
            label: "Promedio",
            value: summary.mean,
        },
        Metric {
            label: "Máximo",
            value: summary.max,
        },
        Metric {
            label: "Mínimo",
            value: summary.min,
        },
    ]
}

/// Display surface consumed by the pipeline.
pub trait DisplaySink {
    fn error(&mut self, message: &str);
    fn warning(&mut self, message: &str);
    fn heading(&mut self, text: &str) -> Result<()>;
    fn table(&mut self, rows: &[Observation]) -> Result<()>;
    fn metrics(&mut self, metrics: &[Metric]) -> Result<()>;
    fn bar_chart(&mut self, chart: &XyChart) -> Result<()>;
    fn line_chart(&mut self, chart: &XyChart) -> Result<()>;
    fn pie_chart(&mut self, chart: &PieChart) -> Result<()>;
}

/// Push a view through a sink in display order.
pub fn show_view(view: &DashboardView, sink: &mut dyn DisplaySink) -> Result<()> {
    sink.heading(&view.heading)?;
    sink.table(&view.table)?;
    sink.metrics(&view.metrics)?;
    sink.bar_chart(&view.bar)?;
    sink.line_chart(&view.line)?;
    sink.pie_chart(&view.pie)?;
    Ok(())
}

/// Surface an outcome. Failures and empty results never reach the table or chart sinks.
pub fn present(
    outcome: &QueryOutcome,
    query: &Query,
    sink: &mut dyn DisplaySink,
) -> Result<QueryState> {
    match outcome {
        QueryOutcome::Success { report, meta } => {
            log::info!(
                "{}: {} observations, mean={}",
                query.title_suffix(),
                report.series.len(),
                report.summary.mean
            );
            show_view(&DashboardView::build(report, query, meta), sink)?;
            Ok(QueryState::Displaying)
        }
        QueryOutcome::EmptyInput => {
            log::info!("{}: empty series", query.title_suffix());
            sink.warning(EMPTY_MESSAGE);
            Ok(QueryState::EmptyWarningShown)
        }
        QueryOutcome::TransportFailure(detail) | QueryOutcome::InvalidData(detail) => {
            log::warn!("{}: {detail}", query.title_suffix());
            sink.error(ERROR_MESSAGE);
            Ok(QueryState::ErrorShown)
        }
        QueryOutcome::BadResponse(status) => {
            log::warn!("{}: HTTP {status}", query.title_suffix());
            sink.error(ERROR_MESSAGE);
            Ok(QueryState::ErrorShown)
        }
    }
}

/// Fetch, process and present one query. One attempt, no retry.
pub fn fetch_outcome(client: &Client, query: &Query) -> QueryOutcome {
    QueryOutcome::from_fetch(client.fetch_response(query.indicator, query.year))
}

/// Check a background query for its outcome.
///
/// `None` while the worker is still running. A worker that went away without sending
/// anything (it panicked, or dropped its sender) yields a transport failure.
pub fn poll_outcome(receiver: &Receiver<QueryOutcome>) -> Option<QueryOutcome> {
    match receiver.try_recv() {
        Ok(outcome) => Some(outcome),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            log::warn!("query worker stopped without a result");
            Some(QueryOutcome::TransportFailure(
                "query worker stopped without a result".to_string(),
            ))
        }
    }
}

pub fn run_query(client: &Client, query: Query, sink: &mut dyn DisplaySink) -> Result<QueryState> {
    let outcome = fetch_outcome(client, &query);
    present(&outcome, &query, sink)
}

/// In-memory sink that keeps whatever it was last shown.
#[derive(Debug, Default, Clone)]
pub struct DashboardPanel {
    pub error: Option<String>,
    pub warning: Option<String>,
    pub heading: Option<String>,
    pub table: Option<Vec<Observation>>,
    pub metrics: Option<Vec<Metric>>,
    pub bar: Option<XyChart>,
    pub line: Option<XyChart>,
    pub pie: Option<PieChart>,
}

impl DashboardPanel {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when any table, metric or chart was pushed.
    pub fn has_content(&self) -> bool {
        self.table.is_some()
            || self.metrics.is_some()
            || self.bar.is_some()
            || self.line.is_some()
            || self.pie.is_some()
    }
}

impl DisplaySink for DashboardPanel {
    fn error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn warning(&mut self, message: &str) {
        self.warning = Some(message.to_string());
    }

    fn heading(&mut self, text: &str) -> Result<()> {
        self.heading = Some(text.to_string());
        Ok(())
    }

    fn table(&mut self, rows: &[Observation]) -> Result<()> {
        self.table = Some(rows.to_vec());
        Ok(())
    }

    fn metrics(&mut self, metrics: &[Metric]) -> Result<()> {
        self.metrics = Some(metrics.to_vec());
        Ok(())
    }

    fn bar_chart(&mut self, chart: &XyChart) -> Result<()> {
        self.bar = Some(chart.clone());
        Ok(())
    }

    fn line_chart(&mut self, chart: &XyChart) -> Result<()> {
        self.line = Some(chart.clone());
        Ok(())
    }

    fn pie_chart(&mut self, chart: &PieChart) -> Result<()> {
        self.pie = Some(chart.clone());
        Ok(())
    }
}
