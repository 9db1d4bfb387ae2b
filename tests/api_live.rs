//! Live service tests. Run with: `cargo test --features online -- --nocapture`
//! against a forecast service at `DEMANDIQ_API_URL` (default `http://127.0.0.1:5001`).
#![cfg(feature = "online")]

use demandiq::api::DEFAULT_BASE_URL;
use demandiq::dashboard::{DashboardController, RawInputs};
use demandiq::models::{Envelope, HistoryQuery};
use demandiq::viz::DisplayList;
use demandiq::{Client, DataSource};

fn client() -> Client {
    let url = std::env::var("DEMANDIQ_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    Client::new(url).unwrap()
}

#[test]
fn fetch_history_for_store_one() {
    let h = client()
        .history(&HistoryQuery {
            store: 1,
            dept: 1,
            weeks: 8,
        })
        .unwrap();
    h.ensure_ok("Error loading history").unwrap();
    assert!(!h.ds.is_empty() && h.ds.len() <= 8);
    assert_eq!(h.ds.len(), h.y.len());
}

#[test]
fn unknown_store_is_reported_not_thrown() {
    let h = client()
        .history(&HistoryQuery {
            store: 9999,
            dept: 9999,
            weeks: 8,
        })
        .unwrap();
    assert!(!h.ok);
    assert!(h.error.is_some());
}

#[test]
fn full_run_draws_both_charts() {
    let mut dash =
        DashboardController::new(DisplayList::new(800, 400), DisplayList::new(800, 400));
    let raw = RawInputs {
        future_weeks: "4".into(),
        ..Default::default()
    };
    let report = dash.run(&client(), &raw).unwrap();
    assert_eq!(report.forecast_weeks, 4);
    assert!(dash.history_slot().chart().is_some());
    assert!(dash.forecast_slot().chart().is_some());
}
