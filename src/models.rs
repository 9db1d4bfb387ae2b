use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecasting model run by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    #[default]
    Prophet,
    Xgb,
}

impl ForecastModel {
    pub fn as_query_param(&self) -> &'static str {
        match self {
            ForecastModel::Prophet => "prophet",
            ForecastModel::Xgb => "xgb",
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_param())
    }
}

impl FromStr for ForecastModel {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prophet" => Ok(ForecastModel::Prophet),
            "xgb" | "xgboost" => Ok(ForecastModel::Xgb),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown model: {other}"
            ))),
        }
    }
}

/// Parameters of `GET /api/history`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuery {
    pub store: i64,
    pub dept: i64,
    pub weeks: i64,
}

/// Parameters of `GET /api/forecast`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastQuery {
    pub store: i64,
    pub dept: i64,
    pub weeks: i64,
    /// Units currently on hand.
    pub stock: f64,
    /// Safety margin as a fraction (0.1 = 10%).
    pub safety: f64,
    pub model: ForecastModel,
}

/// Weekly sales history: `ds` and `y` are index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub ds: Vec<String>,
    #[serde(default)]
    pub y: Vec<f64>,
}

/// Demand forecast with the service-side reorder columns, all index-aligned by week.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub ds: Vec<String>,
    #[serde(default)]
    pub yhat: Vec<f64>,
    #[serde(default)]
    pub safety_stock: Vec<f64>,
    #[serde(default)]
    pub required_stock: Vec<f64>,
    #[serde(default)]
    pub order_qty: Vec<f64>,
}

/// Stores and departments present in the service's dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub stores: Vec<i64>,
    #[serde(default)]
    pub depts: Vec<i64>,
}

/// Whole-history summary for one store/department.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub min_date: String,
    pub max_date: String,
    pub total_weeks: usize,
    pub total_sales: f64,
    pub avg_weekly_sales: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: Option<HistorySummary>,
}

/// Shared view of the `{ok, error?}` envelope every endpoint answers with.
pub trait Envelope {
    fn ok(&self) -> bool;
    fn error(&self) -> Option<&str>;

    /// Turn an `ok: false` payload into [`DashboardError::Upstream`].
    ///
    /// `fallback` is used when the service did not say what went wrong.
    fn ensure_ok(&self, fallback: &str) -> Result<()> {
        if self.ok() {
            return Ok(());
        }
        let msg = self
            .error()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .unwrap_or(fallback);
        Err(DashboardError::Upstream(msg.to_string()))
    }
}

macro_rules! impl_envelope {
    ($($t:ty),*) => {
        $(impl Envelope for $t {
            fn ok(&self) -> bool {
                self.ok
            }
            fn error(&self) -> Option<&str> {
                self.error.as_deref()
            }
        })*
    };
}

impl_envelope!(HistoryResponse, ForecastResponse, OptionsResponse, SummaryResponse);

/// Check that `values` has one entry per category.
pub(crate) fn ensure_aligned(what: &str, expected: usize, values: &[f64]) -> Result<()> {
    if values.len() != expected {
        return Err(DashboardError::LengthMismatch {
            what: what.to_string(),
            expected,
            found: values.len(),
        });
    }
    Ok(())
}

impl ForecastResponse {
    /// Check that every per-week array lines up with `ds`.
    pub fn validate_alignment(&self) -> Result<()> {
        let n = self.ds.len();
        ensure_aligned("yhat", n, &self.yhat)?;
        ensure_aligned("safety_stock", n, &self.safety_stock)?;
        ensure_aligned("required_stock", n, &self.required_stock)?;
        ensure_aligned("order_qty", n, &self.order_qty)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_parses_case_insensitively() {
        assert_eq!("XGB".parse::<ForecastModel>().unwrap(), ForecastModel::Xgb);
        assert_eq!(
            " prophet ".parse::<ForecastModel>().unwrap(),
            ForecastModel::Prophet
        );
        assert!("arima".parse::<ForecastModel>().is_err());
    }

    #[test]
    fn ensure_ok_prefers_service_message() {
        let r = HistoryResponse {
            ok: false,
            error: Some("No data for Store=9, Dept=9".into()),
            ..Default::default()
        };
        let e = r.ensure_ok("Error loading history").unwrap_err();
        assert_eq!(e.to_string(), "No data for Store=9, Dept=9");

        let blank = HistoryResponse {
            ok: false,
            error: Some("  ".into()),
            ..Default::default()
        };
        let e = blank.ensure_ok("Error loading history").unwrap_err();
        assert_eq!(e.to_string(), "Error loading history");
    }
}
