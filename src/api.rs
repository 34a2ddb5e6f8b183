/// Synchronous client for the **mindicador.cl** indicator API.
///
/// Only the `{indicator}/{year}` endpoint is used. A query is a single GET with no retry;
/// failures come back as a tagged [`FetchError`] so callers can decide how to surface them.
///
/// Typical usage:
/// ```no_run
/// # use mindicador_rs::{Client, Indicator};
/// let client = Client::default();
/// let serie = client.fetch(Indicator::Uf, 2024)?;
/// println!("{} observations", serie.len());
/// # Ok::<(), mindicador_rs::api::FetchError>(())
/// ```
use crate::models::{Indicator, IndicatorResponse, RawObservation};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://mindicador.cl/api";

/// Why a fetch produced no series.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Unreachable host, timeout, or a body that is not the expected JSON.
    #[error("transport failure: {0}")]
    TransportFailure(String),
    /// The API answered with a non-success status.
    #[error("request failed with HTTP {status}")]
    BadResponse { status: StatusCode },
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl Client {
    /// Client pointed at another API root (mirrors, local mock servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(30)) // total request timeout
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("mindicador_rs/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("reqwest client build");
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        }
    }

    /// Request target for an indicator and year.
    pub fn url_for(&self, indicator: Indicator, year: i32) -> String {
        format!("{}/{}/{}", self.base_url, indicator.code(), year)
    }

    /// Fetch the whole response body, metadata included.
    pub fn fetch_response(
        &self,
        indicator: Indicator,
        year: i32,
    ) -> Result<IndicatorResponse, FetchError> {
        let url = self.url_for(indicator, year);
        log::debug!("GET {url}");

        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|e| FetchError::TransportFailure(format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::BadResponse { status });
        }

        resp.json::<IndicatorResponse>()
            .map_err(|e| FetchError::TransportFailure(format!("decode json from {url}: {e}")))
    }

    /// Fetch the raw `serie` observations for one indicator and year.
    ///
    /// A response without a `serie` field yields an empty list, not an error.
    pub fn fetch(
        &self,
        indicator: Indicator,
        year: i32,
    ) -> Result<Vec<RawObservation>, FetchError> {
        self.fetch_response(indicator, year).map(|r| r.serie)
    }
}
