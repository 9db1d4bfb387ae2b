use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use demandiq::api::DEFAULT_BASE_URL;
use demandiq::dashboard::{DashboardController, Palette, RawInputs, RunInputs, fetch_run};
use demandiq::models::{Envelope, ForecastResponse, HistoryQuery, HistorySummary};
use demandiq::reorder::{self, ReorderTable, TABLE_HEADER};
use demandiq::storage::{self, FileSource};
use demandiq::viz::{ChartKind, ChartOptions, DisplayList, backend};
use demandiq::{Client, DataSource, stats};
use num_format::{Locale, ToFormattedString};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "demandiq",
    version,
    about = "Chart sales history and demand forecasts, and plan reorders per store/department"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch history + forecast, write both charts, print the reorder table.
    Run(RunArgs),
    /// List the store and department ids the service knows.
    Options(ServiceArgs),
    /// Summarize a store/department's sales history.
    Summary(SummaryArgs),
    /// Recompute the reorder table of a saved forecast for another stock level or safety margin.
    Plan(PlanArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ChartFormat {
    Svg,
    Png,
}

#[derive(Args, Debug)]
struct ServiceArgs {
    /// Base URL of the forecast service.
    #[arg(long, env = "DEMANDIQ_API_URL", default_value = DEFAULT_BASE_URL)]
    api_url: String,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Store id.
    #[arg(short, long)]
    store: String,
    /// Department id.
    #[arg(short, long)]
    dept: String,
    /// Weeks of history to chart.
    #[arg(long, default_value = "52")]
    past_weeks: String,
    /// Weeks to forecast.
    #[arg(long, default_value = "12")]
    future_weeks: String,
    /// Units currently in stock.
    #[arg(long, default_value = "0")]
    stock: String,
    /// Safety stock as a percentage of forecast demand.
    #[arg(long, default_value = "10")]
    safety: String,
    /// Forecast model (prophet or xgb).
    #[arg(long, default_value = "prophet")]
    model: String,
    #[command(flatten)]
    service: ServiceArgs,
    /// Read history.json / forecast.json from this directory instead of the service.
    #[arg(long)]
    from_dir: Option<PathBuf>,
    /// Save the fetched responses to this directory (replayable with --from-dir).
    #[arg(long)]
    save_responses: Option<PathBuf>,
    /// Directory for history and forecast charts.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Chart file format.
    #[arg(long, value_enum, default_value_t = ChartFormat::Svg)]
    chart_format: ChartFormat,
    /// Chart width in pixels.
    #[arg(long, default_value_t = 800)]
    width: u32,
    /// Chart height in pixels.
    #[arg(long, default_value_t = 400)]
    height: u32,
    /// Export the reorder table (.csv or .json).
    #[arg(long)]
    export: Option<PathBuf>,
    /// Chart kind; only `line` has a renderer, other kinds are drawn as lines.
    #[arg(long, default_value = "line")]
    chart_kind: String,
    /// Color of the sales history line (#rrggbb, #rgb or a color name).
    #[arg(long, default_value = "#1d4ed8")]
    history_color: String,
    /// Color of the forecast line.
    #[arg(long, default_value = "#2563eb")]
    forecast_color: String,
    /// Color of the dashed required-stock line.
    #[arg(long, default_value = "#dc2626")]
    required_color: String,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// A saved forecast response (forecast.json from --save-responses).
    #[arg(long)]
    forecast: PathBuf,
    /// Units currently in stock.
    #[arg(long, default_value_t = 0.0)]
    stock: f64,
    /// Safety stock as a percentage of forecast demand.
    #[arg(long, default_value_t = 10.0)]
    safety: f64,
    /// Export the reorder table (.csv or .json).
    #[arg(long)]
    export: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[arg(short, long)]
    store: i64,
    #[arg(short, long)]
    dept: i64,
    #[command(flatten)]
    service: ServiceArgs,
    /// Summarize a saved history.json instead of asking the service.
    #[arg(long)]
    from_dir: Option<PathBuf>,
    /// Number formatting locale (en, de, fr, ...).
    #[arg(long, default_value = "en")]
    locale: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Options(args) => cmd_options(args),
        Command::Summary(args) => cmd_summary(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn source_for(from_dir: Option<&Path>, service: &ServiceArgs) -> Result<Box<dyn DataSource>> {
    let source: Box<dyn DataSource> = match from_dir {
        Some(dir) => Box::new(FileSource::new(dir)),
        None => Box::new(Client::new(service.api_url.as_str())?),
    };
    Ok(source)
}

fn cmd_run(args: RunArgs) -> Result<()> {
    let raw = RawInputs {
        store: args.store.clone(),
        dept: args.dept.clone(),
        past_weeks: args.past_weeks.clone(),
        future_weeks: args.future_weeks.clone(),
        current_stock: args.stock.clone(),
        safety_percent: args.safety.clone(),
        model: args.model.clone(),
    };
    let inputs = RunInputs::parse(&raw)?;
    let source = source_for(args.from_dir.as_deref(), &args.service)?;
    let fetched = fetch_run(source.as_ref(), inputs)?;

    if let Some(dir) = args.save_responses.as_ref() {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        match &fetched.forecast {
            Ok(forecast) => {
                FileSource::save(dir, &fetched.history, forecast)?;
                eprintln!("Saved responses to {}", dir.display());
            }
            Err(err) => {
                FileSource::save_history(dir, &fetched.history)?;
                eprintln!(
                    "Saved history only to {} (forecast not received: {err})",
                    dir.display()
                );
            }
        }
    }

    let options = ChartOptions {
        kind: ChartKind::from_name(&args.chart_kind),
        ..ChartOptions::default()
    };
    let palette = Palette {
        history: args.history_color.clone(),
        forecast: args.forecast_color.clone(),
        required: args.required_color.clone(),
    };
    let mut dash = DashboardController::new(
        DisplayList::new(args.width, args.height),
        DisplayList::new(args.width, args.height),
    )
    .with_chart_options(options)
    .with_palette(palette);
    let outcome = dash.apply(fetched);

    // The history chart is drawn even when the forecast half failed.
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create {}", args.out_dir.display()))?;
    let ext = match args.chart_format {
        ChartFormat::Svg => "svg",
        ChartFormat::Png => "png",
    };
    for (name, slot) in [("history", dash.history_slot()), ("forecast", dash.forecast_slot())] {
        if slot.chart().is_none() {
            continue;
        }
        if let Some(surface) = slot.surface() {
            let path = args.out_dir.join(format!("{name}.{ext}"));
            backend::save_chart(surface, &path)?;
            eprintln!("Wrote {} chart to {}", name, path.display());
        }
    }

    let report = outcome?;
    if let Some(table) = dash.table() {
        print_table(table);
        if let Some(path) = args.export.as_ref() {
            export_table(table, path)?;
            eprintln!("Saved {} rows to {}", table.rows.len(), path.display());
        }
    }
    println!();
    println!("{}", report.summary);
    Ok(())
}

fn export_table(table: &ReorderTable, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => storage::save_table_csv(table, path),
        "json" => storage::save_table_json(table, path),
        other => bail!("unsupported export format: {}", other),
    }
}

fn print_table(table: &ReorderTable) {
    let rows: Vec<[String; 6]> = table.rows.iter().map(|r| r.cells()).collect();
    let mut widths = TABLE_HEADER.map(str::len);
    for cells in &rows {
        for (w, c) in widths.iter_mut().zip(cells) {
            *w = (*w).max(c.len());
        }
    }
    let line = |cells: &[&str], mark: &str| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{c:>w$}"))
            .collect();
        println!("{}  {}", padded.join("  "), mark);
    };
    line(&TABLE_HEADER, "");
    for (row, cells) in table.rows.iter().zip(&rows) {
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        // Actionable weeks get a marker next to the order quantity.
        line(&cells, if row.is_actionable() { "<- order" } else { "" });
    }
}

fn cmd_plan(args: PlanArgs) -> Result<()> {
    let forecast: ForecastResponse = storage::load_json(&args.forecast)?;
    forecast.ensure_ok("Error loading forecast")?;
    let table = reorder::plan(
        &forecast.model,
        &forecast.ds,
        &forecast.yhat,
        args.stock,
        args.safety / 100.0,
    )?;
    print_table(&table);
    if let Some(path) = args.export.as_ref() {
        export_table(&table, path)?;
        eprintln!("Saved {} rows to {}", table.rows.len(), path.display());
    }
    println!();
    println!("{}", table.summary(args.safety));
    Ok(())
}

fn cmd_options(args: ServiceArgs) -> Result<()> {
    let client = Client::new(args.api_url.as_str())?;
    let opts = client.options()?;
    opts.ensure_ok("Error loading options")?;
    let join = |v: &[i64]| v.iter().map(i64::to_string).collect::<Vec<_>>().join(", ");
    println!("stores: {}", join(&opts.stores));
    println!("depts:  {}", join(&opts.depts));
    Ok(())
}

fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

fn cmd_summary(args: SummaryArgs) -> Result<()> {
    let summary: HistorySummary = match args.from_dir.as_deref() {
        Some(dir) => {
            // A saved run holds only the charted weeks, so summarize those.
            let history = FileSource::new(dir).history(&HistoryQuery {
                store: args.store,
                dept: args.dept,
                weeks: 0,
            })?;
            history.ensure_ok("Error loading history")?;
            stats::history_summary(&history)?
                .ok_or_else(|| anyhow::anyhow!("history is empty"))?
        }
        None => {
            let client = Client::new(args.service.api_url.as_str())?;
            let resp = client.summary(args.store, args.dept)?;
            resp.ensure_ok("Error loading summary")?;
            resp.summary
                .ok_or_else(|| anyhow::anyhow!("service returned no summary"))?
        }
    };

    let locale = map_locale(&args.locale);
    let whole = |v: f64| (v.round() as i64).to_formatted_string(locale);
    println!("Store {} / Dept {}", args.store, args.dept);
    println!("  weeks:        {} ({} .. {})", summary.total_weeks, summary.min_date, summary.max_date);
    println!("  total sales:  {}", whole(summary.total_sales));
    println!("  avg / week:   {}", whole(summary.avg_weekly_sales));
    Ok(())
}
