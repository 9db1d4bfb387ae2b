//! Synchronous client for the **DemandIQ forecast service**.
//!
//! The service exposes four JSON endpoints, each answering with an
//! `{ok, error?, ...}` envelope:
//!
//! - `GET /api/history?store&dept&weeks`: weekly sales (`ds`, `y`)
//! - `GET /api/forecast?store&dept&weeks&stock&safety&model`: forecast plus
//!   reorder columns
//! - `GET /api/options`: known stores and departments
//! - `GET /api/summary?store&dept`: whole-history summary
//!
//! ### Notes
//! - Failures come back as HTTP 400 with an `ok: false` body; the body is
//!   decoded regardless of status so the service's message reaches the user.
//! - There are no retries: a failed request ends the run.
//!
//! Typical usage:
//! ```no_run
//! # use demandiq::{Client, DataSource};
//! # use demandiq::models::HistoryQuery;
//! let client = Client::default();
//! let hist = client.history(&HistoryQuery { store: 1, dept: 1, weeks: 52 })?;
//! # Ok::<(), anyhow::Error>(())
//! ```
use crate::models::{
    ForecastQuery, ForecastResponse, HistoryQuery, HistoryResponse, OptionsResponse,
    SummaryResponse,
};
use anyhow::{Context, Result, anyhow, bail};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Default service address (the dashboard backend listens on port 5001).
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5001";

/// Where history and forecast payloads come from.
///
/// `Err` means the payload could not be obtained at all (network, decoding);
/// an `ok: false` payload is still `Ok` and is judged by the caller.
pub trait DataSource {
    fn history(&self, query: &HistoryQuery) -> Result<HistoryResponse>;
    fn forecast(&self, query: &ForecastQuery) -> Result<ForecastResponse>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL).expect("reqwest client build")
    }
}

impl Client {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(Duration::from_secs(120)) // forecasts can train a model on first call
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::limited(5))
            .user_agent(concat!("demandiq/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build http client")?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        log::debug!("GET {url} {query:?}");
        let resp = self
            .http
            .get(&url)
            .query(query)
            .send()
            .with_context(|| format!("GET {url}"))?;
        let status = resp.status();
        let body = resp.text().with_context(|| format!("read body of {url}"))?;
        match serde_json::from_str::<T>(&body) {
            Ok(v) => Ok(v),
            Err(e) if status.is_success() => Err(anyhow!(e).context(format!("decode json from {url}"))),
            Err(_) => bail!("request to {url} failed with HTTP {status}"),
        }
    }

    /// Store and department ids known to the service.
    pub fn options(&self) -> Result<OptionsResponse> {
        self.get_json("/api/options", &[])
    }

    /// Whole-history summary for one store/department.
    pub fn summary(&self, store: i64, dept: i64) -> Result<SummaryResponse> {
        self.get_json(
            "/api/summary",
            &[("store", store.to_string()), ("dept", dept.to_string())],
        )
    }
}

impl DataSource for Client {
    fn history(&self, q: &HistoryQuery) -> Result<HistoryResponse> {
        self.get_json(
            "/api/history",
            &[
                ("store", q.store.to_string()),
                ("dept", q.dept.to_string()),
                ("weeks", q.weeks.to_string()),
            ],
        )
    }

    fn forecast(&self, q: &ForecastQuery) -> Result<ForecastResponse> {
        self.get_json(
            "/api/forecast",
            &[
                ("store", q.store.to_string()),
                ("dept", q.dept.to_string()),
                ("weeks", q.weeks.to_string()),
                ("stock", q.stock.to_string()),
                ("safety", q.safety.to_string()),
                ("model", q.model.as_query_param().to_string()),
            ],
        )
    }
}
