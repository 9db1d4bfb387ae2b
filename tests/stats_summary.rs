use demandiq::DashboardError;
use demandiq::models::HistoryResponse;
use demandiq::stats::history_summary;

fn history(ds: &[&str], y: &[f64]) -> HistoryResponse {
    HistoryResponse {
        ok: true,
        error: None,
        ds: ds.iter().map(|s| s.to_string()).collect(),
        y: y.to_vec(),
    }
}

#[test]
fn summary_spans_min_to_max_date() {
    // Out of order on purpose: the range comes from the dates, not the positions.
    let h = history(
        &["2012-10-19", "2012-10-05", "2012-10-12"],
        &[300.0, 100.0, 200.0],
    );
    let s = history_summary(&h).unwrap().unwrap();
    assert_eq!(s.min_date, "2012-10-05");
    assert_eq!(s.max_date, "2012-10-19");
    assert_eq!(s.total_weeks, 3);
    assert!((s.total_sales - 600.0).abs() < 1e-9);
    assert!((s.avg_weekly_sales - 200.0).abs() < 1e-9);
}

#[test]
fn empty_history_has_no_summary() {
    assert!(history_summary(&history(&[], &[])).unwrap().is_none());
}

#[test]
fn bad_dates_and_misalignment_are_errors() {
    let err = history_summary(&history(&["2012-10-05", "last week"], &[1.0, 2.0])).unwrap_err();
    assert!(matches!(err, DashboardError::InvalidValue { index: 1, .. }));

    let err = history_summary(&history(&["2012-10-05"], &[1.0, 2.0])).unwrap_err();
    assert!(matches!(err, DashboardError::LengthMismatch { .. }));
}
