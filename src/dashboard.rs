//! Dashboard orchestration: inputs -> fetch -> two charts + reorder table.
//!
//! A run fetches history, then the forecast (never in parallel, never
//! interleaved with another run), and is applied to the controller in one
//! step. Failures end the run:
//!
//! - unparseable inputs stop it before any fetch;
//! - `ok: false` history leaves every slot untouched;
//! - `ok: false` forecast leaves the new history chart drawn and the forecast
//!   slot, table and summary as they were.

use crate::api::DataSource;
use crate::error::{DashboardError, Result};
use crate::models::{
    Envelope, ForecastModel, ForecastQuery, ForecastResponse, HistoryQuery, HistoryResponse,
};
use crate::reorder::{ReorderSummary, ReorderTable};
use crate::viz::{ChartData, ChartOptions, LineChart, Series, SeriesStyle, Surface};
use serde::{Deserialize, Serialize};

/// Form fields exactly as the user typed them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawInputs {
    pub store: String,
    pub dept: String,
    pub past_weeks: String,
    pub future_weeks: String,
    pub current_stock: String,
    /// Percent, e.g. `"10"` for 10%.
    pub safety_percent: String,
    pub model: String,
}

impl Default for RawInputs {
    fn default() -> Self {
        Self {
            store: "1".into(),
            dept: "1".into(),
            past_weeks: "52".into(),
            future_weeks: "12".into(),
            current_stock: "0".into(),
            safety_percent: "10".into(),
            model: "prophet".into(),
        }
    }
}

/// Parsed inputs of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunInputs {
    pub store: i64,
    pub dept: i64,
    pub past_weeks: i64,
    pub future_weeks: i64,
    pub current_stock: f64,
    pub safety_percent: f64,
    pub model: ForecastModel,
}

fn parse_int(field: &str, raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| DashboardError::InvalidInput(format!("{field} must be a whole number, got {raw:?}")))
}

fn parse_num(field: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DashboardError::InvalidInput(format!("{field} must be a number, got {raw:?}")))
}

impl RunInputs {
    pub fn parse(raw: &RawInputs) -> Result<Self> {
        let store = raw.store.trim().parse::<i64>();
        let dept = raw.dept.trim().parse::<i64>();
        let (Ok(store), Ok(dept)) = (store, dept) else {
            return Err(DashboardError::InvalidInput(
                "Please enter valid Store and Dept IDs.".into(),
            ));
        };
        Ok(Self {
            store,
            dept,
            past_weeks: parse_int("past weeks", &raw.past_weeks)?,
            future_weeks: parse_int("future weeks", &raw.future_weeks)?,
            current_stock: parse_num("current stock", &raw.current_stock)?,
            safety_percent: parse_num("safety percent", &raw.safety_percent)?,
            model: raw.model.parse()?,
        })
    }

    pub fn history_query(&self) -> HistoryQuery {
        HistoryQuery {
            store: self.store,
            dept: self.dept,
            weeks: self.past_weeks,
        }
    }

    /// The service takes the safety margin as a fraction.
    pub fn forecast_query(&self) -> ForecastQuery {
        ForecastQuery {
            store: self.store,
            dept: self.dept,
            weeks: self.future_weeks,
            stock: self.current_stock,
            safety: self.safety_percent / 100.0,
            model: self.model,
        }
    }
}

/// Everything one run fetched, ready to be applied.
#[derive(Debug)]
pub struct FetchedRun {
    pub inputs: RunInputs,
    pub history: HistoryResponse,
    /// Kept even when it failed: the history half of the run is still shown.
    pub forecast: Result<ForecastResponse>,
}

/// Fetch history, then forecast. A failed history fetch ends the run here.
pub fn fetch_run<D: DataSource + ?Sized>(source: &D, inputs: RunInputs) -> Result<FetchedRun> {
    log::info!(
        "run: store={} dept={} history={}w forecast={}w model={}",
        inputs.store,
        inputs.dept,
        inputs.past_weeks,
        inputs.future_weeks,
        inputs.model
    );
    let history = source.history(&inputs.history_query())?;
    history.ensure_ok("Error loading history")?;
    let forecast = source
        .forecast(&inputs.forecast_query())
        .map_err(DashboardError::from);
    Ok(FetchedRun {
        inputs,
        history,
        forecast,
    })
}

/// Stroke colors of the dashboard series, as `#rrggbb`, `#rgb` or color names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub history: String,
    pub forecast: String,
    pub required: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            history: "#1d4ed8".into(),
            forecast: "#2563eb".into(),
            required: "#dc2626".into(),
        }
    }
}

/// Series of the history chart.
pub fn history_chart_data(history: &HistoryResponse, palette: &Palette) -> Result<ChartData> {
    let sales = Series::new("Weekly Sales", history.y.clone())
        .styled(SeriesStyle::default().with_color_str(&palette.history));
    ChartData::new(history.ds.clone(), vec![sales])
}

/// Series of the forecast chart: predicted demand and (dashed) required stock.
pub fn forecast_chart_data(forecast: &ForecastResponse, palette: &Palette) -> Result<ChartData> {
    let predicted = Series::new(
        format!("Forecast ({})", forecast.model.to_uppercase()),
        forecast.yhat.clone(),
    )
    .styled(SeriesStyle::default().with_color_str(&palette.forecast));
    let required = Series::new("Required Stock", forecast.required_stock.clone()).styled(
        SeriesStyle::default()
            .with_color_str(&palette.required)
            .with_dash(vec![6.0, 6.0]),
    );
    ChartData::new(forecast.ds.clone(), vec![predicted, required])
}

enum SlotState<S: Surface> {
    Empty(S),
    Drawn(LineChart<S>),
}

/// A place on screen that shows at most one chart at a time.
pub struct ChartSlot<S: Surface> {
    state: Option<SlotState<S>>,
}

impl<S: Surface> ChartSlot<S> {
    pub fn new(surface: S) -> Self {
        Self {
            state: Some(SlotState::Empty(surface)),
        }
    }

    pub fn chart(&self) -> Option<&LineChart<S>> {
        match &self.state {
            Some(SlotState::Drawn(chart)) => Some(chart),
            _ => None,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        match &self.state {
            Some(SlotState::Empty(surface)) => Some(surface),
            Some(SlotState::Drawn(chart)) => Some(chart.surface()),
            None => None,
        }
    }

    /// Clear the current chart, if any, keeping the surface.
    pub fn destroy(&mut self) -> Result<()> {
        match self.state.take() {
            Some(SlotState::Drawn(mut chart)) => {
                if let Err(e) = chart.clear() {
                    self.state = Some(SlotState::Drawn(chart));
                    return Err(e);
                }
                self.state = Some(SlotState::Empty(chart.into_surface()));
            }
            other => self.state = other,
        }
        Ok(())
    }

    /// Destroy the current chart, then draw `data` on the freed surface.
    pub fn replace(&mut self, data: ChartData, options: ChartOptions) -> Result<()> {
        self.destroy()?;
        let Some(SlotState::Empty(surface)) = self.state.take() else {
            return Err(anyhow::anyhow!("chart slot lost its surface").into());
        };
        let mut chart = LineChart::new(surface, data, options);
        let drawn = chart.draw();
        self.state = Some(SlotState::Drawn(chart));
        drawn
    }
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub history_weeks: usize,
    pub forecast_weeks: usize,
    pub summary: ReorderSummary,
}

/// Owns the two chart slots and the reorder table of the dashboard.
pub struct DashboardController<S: Surface> {
    history: ChartSlot<S>,
    forecast: ChartSlot<S>,
    table: Option<ReorderTable>,
    summary: Option<ReorderSummary>,
    options: ChartOptions,
    palette: Palette,
}

impl<S: Surface> DashboardController<S> {
    pub fn new(history_surface: S, forecast_surface: S) -> Self {
        Self {
            history: ChartSlot::new(history_surface),
            forecast: ChartSlot::new(forecast_surface),
            table: None,
            summary: None,
            options: ChartOptions::default(),
            palette: Palette::default(),
        }
    }

    /// Base options for both charts; axis titles are set per chart.
    pub fn with_chart_options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn history_slot(&self) -> &ChartSlot<S> {
        &self.history
    }

    pub fn forecast_slot(&self) -> &ChartSlot<S> {
        &self.forecast
    }

    pub fn table(&self) -> Option<&ReorderTable> {
        self.table.as_ref()
    }

    pub fn summary(&self) -> Option<&ReorderSummary> {
        self.summary.as_ref()
    }

    /// Parse, fetch and apply one run.
    pub fn run<D: DataSource + ?Sized>(&mut self, source: &D, raw: &RawInputs) -> Result<RunReport> {
        let inputs = RunInputs::parse(raw)?;
        let fetched = fetch_run(source, inputs)?;
        self.apply(fetched)
    }

    /// Render a fetched run: history chart, then forecast chart and table.
    pub fn apply(&mut self, run: FetchedRun) -> Result<RunReport> {
        let FetchedRun {
            inputs,
            history,
            forecast,
        } = run;

        history.ensure_ok("Error loading history")?;
        let history_data = history_chart_data(&history, &self.palette)?;
        let history_weeks = history_data.categories().len();
        self.history.replace(
            history_data,
            self.options.clone().with_titles("Week", "Sales"),
        )?;

        let forecast = forecast?;
        forecast.ensure_ok("Error loading forecast")?;
        let table = ReorderTable::from_forecast(&forecast)?;
        let forecast_data = forecast_chart_data(&forecast, &self.palette)?;
        self.forecast.replace(
            forecast_data,
            self.options.clone().with_titles("Week", "Units"),
        )?;

        let summary = table.summary(inputs.safety_percent);
        log::info!("run complete: {summary}");
        let report = RunReport {
            history_weeks,
            forecast_weeks: table.rows.len(),
            summary: summary.clone(),
        };
        self.table = Some(table);
        self.summary = Some(summary);
        Ok(report)
    }

    /// Clear both charts and forget the table.
    pub fn reset(&mut self) -> Result<()> {
        self.history.destroy()?;
        self.forecast.destroy()?;
        self.table = None;
        self.summary = None;
        Ok(())
    }
}
