use demandiq::models::{
    Envelope, ForecastModel, ForecastResponse, HistoryResponse, OptionsResponse, SummaryResponse,
};

#[test]
fn parse_history_payload() {
    let sample = r#"
    {
      "ok": true,
      "ds": ["2012-10-05", "2012-10-12", "2012-10-19"],
      "y": [24924.5, 46039.49, 41595.55]
    }
    "#;
    let h: HistoryResponse = serde_json::from_str(sample).unwrap();
    h.ensure_ok("Error loading history").unwrap();
    assert_eq!(h.ds.len(), 3);
    assert_eq!(h.y[1], 46039.49);
    assert!(h.error.is_none());
}

#[test]
fn parse_forecast_payload() {
    let sample = r#"
    {
      "ok": true,
      "model": "xgb",
      "ds": ["2012-11-02", "2012-11-09"],
      "yhat": [120.5, 98.0],
      "safety_stock": [12.05, 9.8],
      "required_stock": [132.55, 107.8],
      "order_qty": [32.55, 7.8]
    }
    "#;
    let f: ForecastResponse = serde_json::from_str(sample).unwrap();
    f.validate_alignment().unwrap();
    assert_eq!(f.model, "xgb");
    assert_eq!(f.order_qty, vec![32.55, 7.8]);
}

#[test]
fn failed_payload_carries_message() {
    // Error bodies omit every data field.
    let sample = r#"{"ok": false, "error": "No data for Store=99, Dept=1"}"#;
    let f: ForecastResponse = serde_json::from_str(sample).unwrap();
    assert!(f.ds.is_empty());
    let err = f.ensure_ok("Error loading forecast").unwrap_err();
    assert_eq!(err.to_string(), "No data for Store=99, Dept=1");

    let bare: HistoryResponse = serde_json::from_str(r#"{"ok": false}"#).unwrap();
    assert_eq!(
        bare.ensure_ok("Error loading history").unwrap_err().to_string(),
        "Error loading history"
    );
}

#[test]
fn misaligned_forecast_fails_validation() {
    let sample = r#"
    {"ok": true, "model": "prophet", "ds": ["2012-11-02", "2012-11-09"],
     "yhat": [1.0], "safety_stock": [0.1, 0.1], "required_stock": [1.1, 1.1], "order_qty": [1.1, 1.1]}
    "#;
    let f: ForecastResponse = serde_json::from_str(sample).unwrap();
    let msg = f.validate_alignment().unwrap_err().to_string();
    assert!(msg.contains("yhat"), "{msg}");
}

#[test]
fn parse_options_and_summary() {
    let opts: OptionsResponse =
        serde_json::from_str(r#"{"ok": true, "stores": [1, 2, 45], "depts": [1, 3, 99]}"#)
            .unwrap();
    assert_eq!(opts.stores, vec![1, 2, 45]);
    assert_eq!(opts.depts.last(), Some(&99));

    let sample = r#"
    {"ok": true, "summary": {"min_date": "2010-02-05", "max_date": "2012-10-26",
      "total_weeks": 143, "total_sales": 3219405.18, "avg_weekly_sales": 22513.32}}
    "#;
    let s: SummaryResponse = serde_json::from_str(sample).unwrap();
    let summary = s.summary.unwrap();
    assert_eq!(summary.total_weeks, 143);
    assert_eq!(summary.min_date, "2010-02-05");
}

#[test]
fn model_names_round_trip_through_serde() {
    let m: ForecastModel = serde_json::from_str(r#""xgb""#).unwrap();
    assert_eq!(m, ForecastModel::Xgb);
    assert_eq!(serde_json::to_string(&ForecastModel::Prophet).unwrap(), r#""prophet""#);
    assert_eq!(m.as_query_param(), "xgb");
}
