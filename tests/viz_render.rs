use demandiq::viz::backend::{chart_to_svg, save_chart};
use demandiq::viz::{ChartData, ChartOptions, DisplayList, LineChart, Series, SeriesStyle};
use std::fs;

fn forecast_chart() -> DisplayList {
    let categories: Vec<String> = ["2012-11-02", "2012-11-09", "2012-11-16", "2012-11-23"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let series = vec![
        Series::new("Forecast (PROPHET)", vec![100.0, 120.0, 90.0, 140.0])
            .styled(SeriesStyle::default().with_color_str("#2563eb")),
        Series::new("Required Stock", vec![110.0, 132.0, 99.0, 154.0]).styled(
            SeriesStyle::default()
                .with_color_str("#dc2626")
                .with_dash(vec![6.0, 6.0]),
        ),
    ];
    let data = ChartData::new(categories, series).unwrap();
    let options = ChartOptions::default().with_titles("Week", "Units");
    LineChart::render(DisplayList::new(800, 400), data, options)
        .unwrap()
        .into_surface()
}

#[test]
fn svg_contains_lines_and_labels() {
    let svg = chart_to_svg(&forecast_chart()).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<polyline"));
    assert!(svg.contains("2012-11-16"));
    assert!(svg.contains("Units"));

    let upper = svg.to_uppercase();
    assert!(upper.contains("#F8F8F8"));
    assert!(upper.contains("#2563EB"));
    assert!(upper.contains("#DC2626"));
}

#[test]
fn dashed_series_is_split_into_pieces() {
    let svg = chart_to_svg(&forecast_chart()).unwrap();
    let red = svg
        .to_uppercase()
        .matches("STROKE=\"#DC2626\"")
        .count();
    assert!(red > 10, "expected many dash pieces, found {red}");
}

#[test]
fn save_svg_file() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("forecast.svg");
    save_chart(&forecast_chart(), &out).unwrap();
    let body = fs::read_to_string(&out).unwrap();
    assert!(body.contains("<polyline"));
    assert!(body.contains("2012-11-02"));
}

#[test]
fn save_png_file() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("forecast.png");
    save_chart(&forecast_chart(), &out).unwrap();
    let bytes = fs::read(&out).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[1..4], b"PNG");
}
