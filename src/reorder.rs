//! Reorder table and summary derived from a demand forecast.
//!
//! The forecast service ships the reorder columns alongside `yhat`:
//!
//! ```text
//! safety_stock   = yhat * safety
//! required_stock = yhat + safety_stock
//! order_qty      = required_stock - current_stock
//! ```
//!
//! [`ReorderTable::from_forecast`] projects those arrays into rows;
//! [`plan`] recomputes them locally from `yhat` alone.

use crate::error::{DashboardError, Result};
use crate::models::{ForecastResponse, ensure_aligned};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One week of the reorder table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    /// 1-based week number within the forecast horizon.
    pub index: usize,
    pub date: String,
    pub predicted: f64,
    pub safety_stock: f64,
    pub required_stock: f64,
    pub order_qty: f64,
}

impl ForecastRow {
    /// Something needs ordering this week.
    pub fn is_actionable(&self) -> bool {
        self.order_qty > 0.0
    }

    /// Table cells as displayed: index, date, then every number to two decimals.
    pub fn cells(&self) -> [String; 6] {
        [
            self.index.to_string(),
            self.date.clone(),
            fmt_2dp(self.predicted),
            fmt_2dp(self.safety_stock),
            fmt_2dp(self.required_stock),
            fmt_2dp(self.order_qty),
        ]
    }
}

pub const TABLE_HEADER: [&str; 6] = [
    "Week",
    "Date",
    "Forecast",
    "Safety Stock",
    "Required Stock",
    "Order Qty",
];

/// `v` with `dp` decimals, exact ties rounded away from zero (2.5 -> 3, 0.125 -> 0.13).
pub fn fmt_fixed(v: f64, dp: u32) -> String {
    // -0.0 prints as 0
    let v = if v == 0.0 { 0.0 } else { v };
    match Decimal::from_f64_retain(v) {
        Some(d) => {
            let rounded = d.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
            format!("{:.*}", dp as usize, rounded)
        }
        None => format!("{:.*}", dp as usize, v),
    }
}

pub fn fmt_2dp(v: f64) -> String {
    fmt_fixed(v, 2)
}

/// The one-line recommendation under the table.
#[derive(Debug, Clone, PartialEq)]
pub enum ReorderSummary {
    /// First week (in forecast order) with a positive order quantity.
    Order {
        week: usize,
        quantity: f64,
        model: String,
        safety_percent: f64,
    },
    Sufficient,
}

impl ReorderSummary {
    pub fn quantity(&self) -> Option<f64> {
        match self {
            ReorderSummary::Order { quantity, .. } => Some(*quantity),
            ReorderSummary::Sufficient => None,
        }
    }
}

impl fmt::Display for ReorderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReorderSummary::Order {
                quantity,
                model,
                safety_percent,
                ..
            } => write!(
                f,
                "Week 1 suggested order: {} units (Model: {}, Safety: {safety_percent}%)",
                fmt_fixed(*quantity, 0),
                model.to_uppercase()
            ),
            ReorderSummary::Sufficient => {
                f.write_str("Current stock is sufficient for all forecast weeks.")
            }
        }
    }
}

/// All forecast weeks in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReorderTable {
    pub model: String,
    pub rows: Vec<ForecastRow>,
}

impl ReorderTable {
    /// Project the forecast payload's parallel arrays into rows.
    pub fn from_forecast(fc: &ForecastResponse) -> Result<Self> {
        fc.validate_alignment()?;
        let rows = build_rows(
            &fc.ds,
            &fc.yhat,
            &fc.safety_stock,
            &fc.required_stock,
            &fc.order_qty,
        )?;
        Ok(Self {
            model: fc.model.clone(),
            rows,
        })
    }

    pub fn first_actionable(&self) -> Option<&ForecastRow> {
        self.rows.iter().find(|r| r.is_actionable())
    }

    /// `safety_percent` is only echoed in the sentence (e.g. `10` for 10%).
    pub fn summary(&self, safety_percent: f64) -> ReorderSummary {
        match self.first_actionable() {
            Some(row) => ReorderSummary::Order {
                week: row.index,
                quantity: row.order_qty,
                model: self.model.clone(),
                safety_percent,
            },
            None => ReorderSummary::Sufficient,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn build_rows(
    dates: &[String],
    predicted: &[f64],
    safety: &[f64],
    required: &[f64],
    order: &[f64],
) -> Result<Vec<ForecastRow>> {
    let n = dates.len();
    for (what, col) in [
        ("yhat", predicted),
        ("safety_stock", safety),
        ("required_stock", required),
        ("order_qty", order),
    ] {
        ensure_aligned(what, n, col)?;
        if let Some(index) = col.iter().position(|v| !v.is_finite()) {
            return Err(DashboardError::InvalidValue {
                what: what.to_string(),
                index,
            });
        }
    }
    Ok((0..n)
        .map(|i| ForecastRow {
            index: i + 1,
            date: dates[i].clone(),
            predicted: predicted[i],
            safety_stock: safety[i],
            required_stock: required[i],
            order_qty: order[i],
        })
        .collect())
}

/// Derive the reorder columns from predicted demand.
///
/// `safety` is a fraction (0.1 = 10%); `current_stock` is subtracted from
/// every week's requirement independently, as the service does.
pub fn plan(
    model: &str,
    dates: &[String],
    yhat: &[f64],
    current_stock: f64,
    safety: f64,
) -> Result<ReorderTable> {
    let safety_stock: Vec<f64> = yhat.iter().map(|y| y * safety).collect();
    let required: Vec<f64> = yhat
        .iter()
        .zip(&safety_stock)
        .map(|(y, s)| y + s)
        .collect();
    let order: Vec<f64> = required.iter().map(|r| r - current_stock).collect();
    let rows = build_rows(dates, yhat, &safety_stock, &required, &order)?;
    Ok(ReorderTable {
        model: model.to_string(),
        rows,
    })
}
