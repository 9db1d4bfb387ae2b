use crate::error::{DashboardError, Result};
use crate::models::{HistoryResponse, HistorySummary};
use chrono::NaiveDate;

/// Summarize a history payload the way `/api/summary` does:
/// first/last week, number of weeks, total and mean weekly sales.
///
/// Dates must be `YYYY-MM-DD`. Returns `Ok(None)` for an empty history.
pub fn history_summary(history: &HistoryResponse) -> Result<Option<HistorySummary>> {
    if history.ds.len() != history.y.len() {
        return Err(DashboardError::LengthMismatch {
            what: "history y".into(),
            expected: history.ds.len(),
            found: history.y.len(),
        });
    }

    let mut dates = Vec::with_capacity(history.ds.len());
    for (index, ds) in history.ds.iter().enumerate() {
        let d = NaiveDate::parse_from_str(ds.trim(), "%Y-%m-%d").map_err(|_| {
            DashboardError::InvalidValue {
                what: format!("history date {ds:?}"),
                index,
            }
        })?;
        dates.push(d);
    }
    let (Some(min), Some(max)) = (dates.iter().min(), dates.iter().max()) else {
        return Ok(None);
    };

    let count = history.y.len();
    let total: f64 = history.y.iter().copied().sum();
    Ok(Some(HistorySummary {
        min_date: min.format("%Y-%m-%d").to_string(),
        max_date: max.format("%Y-%m-%d").to_string(),
        total_weeks: count,
        total_sales: total,
        avg_weekly_sales: total / count as f64,
    }))
}
