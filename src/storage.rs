use crate::api::DataSource;
use crate::models::{ForecastQuery, ForecastResponse, HistoryQuery, HistoryResponse};
use crate::reorder::{ReorderTable, TABLE_HEADER};
use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

/// Save the reorder table as CSV with header, numbers to two decimals as displayed.
pub fn save_table_csv<P: AsRef<Path>>(table: &ReorderTable, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.write_record(TABLE_HEADER)?;
    for row in &table.rows {
        wtr.write_record(row.cells())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the reorder table as pretty JSON (full precision).
pub fn save_table_json<P: AsRef<Path>>(table: &ReorderTable, path: P) -> Result<()> {
    save_json(table, path)
}

/// Write any payload as pretty JSON.
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let s = serde_json::to_string_pretty(value)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

pub fn load_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {}", path.display()))
}

/// Reads saved `history.json` / `forecast.json` responses from a directory.
///
/// The query is ignored; whatever was saved is returned, so a directory
/// holds exactly one run.
#[derive(Debug, Clone)]
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub const HISTORY_FILE: &'static str = "history.json";
    pub const FORECAST_FILE: &'static str = "forecast.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Save a run's payloads so a later [`FileSource`] on `dir` replays it.
    pub fn save(dir: &Path, history: &HistoryResponse, forecast: &ForecastResponse) -> Result<()> {
        Self::save_history(dir, history)?;
        save_json(forecast, dir.join(Self::FORECAST_FILE))?;
        Ok(())
    }

    /// Save only the history payload (the forecast never arrived).
    pub fn save_history(dir: &Path, history: &HistoryResponse) -> Result<()> {
        save_json(history, dir.join(Self::HISTORY_FILE))
    }
}

impl DataSource for FileSource {
    fn history(&self, _query: &HistoryQuery) -> Result<HistoryResponse> {
        load_json(self.dir.join(Self::HISTORY_FILE))
    }

    fn forecast(&self, _query: &ForecastQuery) -> Result<ForecastResponse> {
        load_json(self.dir.join(Self::FORECAST_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reorder::ForecastRow;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("x.csv");
        let jsonp = dir.path().join("x.json");
        let table = ReorderTable {
            model: "prophet".into(),
            rows: vec![ForecastRow {
                index: 1,
                date: "2012-11-04".into(),
                predicted: 1.234,
                safety_stock: 0.1234,
                required_stock: 1.3574,
                order_qty: -8.6426,
            }],
        };
        save_table_csv(&table, &csvp).unwrap();
        save_table_json(&table, &jsonp).unwrap();
        let csv = std::fs::read_to_string(&csvp).unwrap();
        assert!(csv.starts_with("Week,Date,Forecast"));
        assert!(csv.contains("1,2012-11-04,1.23,0.12,1.36,-8.64"));
        let back: ReorderTable = load_json(&jsonp).unwrap();
        assert_eq!(back, table);
    }
}
