/*!
 * Desktop dashboard for demandiq
 *
 * Enter a store/department, forecast horizon, current stock and safety margin,
 * then run to see:
 * - weekly sales history as a line chart
 * - the demand forecast and required stock as a second chart
 * - the reorder table and a one-line order recommendation
 *
 * Platform support: Windows, macOS, Linux
 */

use anyhow::Result;
use demandiq::dashboard::{DashboardController, FetchedRun, RawInputs, RunInputs, fetch_run};
use demandiq::reorder::TABLE_HEADER;
use demandiq::storage::{self, FileSource};
use demandiq::viz::dash::dash_segments;
use demandiq::viz::{
    DisplayList, LabelStyle, Point, Rect, Rgb8, Stroke, Surface, TextAnchor, backend,
};
use demandiq::{Client, DataSource};
use eframe::egui;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

const CHART_W: u32 = 800;
const CHART_H: u32 = 400;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 900.0])
            .with_min_inner_size([600.0, 400.0])
            .with_title("DemandIQ - Sales & Reorder Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "DemandIQ",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new()))),
    )
}

/// Main application state
struct DashboardApp {
    inputs: RawInputs,
    api_url: String,
    offline_dir: String,

    dashboard: DashboardController<DisplayList>,

    // UI state
    is_loading: bool,
    status_message: String,
    error_message: String,

    // Background fetch of the current run
    operation_receiver: Option<mpsc::Receiver<OperationResult>>,
}

enum OperationResult {
    Fetched(Box<FetchedRun>),
    Error(String),
}

impl DashboardApp {
    fn new() -> Self {
        Self {
            inputs: RawInputs::default(),
            api_url: std::env::var("DEMANDIQ_API_URL")
                .unwrap_or_else(|_| demandiq::api::DEFAULT_BASE_URL.to_string()),
            offline_dir: String::new(),
            dashboard: DashboardController::new(
                DisplayList::new(CHART_W, CHART_H),
                DisplayList::new(CHART_W, CHART_H),
            ),
            is_loading: false,
            status_message: String::new(),
            error_message: String::new(),
            operation_receiver: None,
        }
    }

    fn start_operation(&mut self) {
        let inputs = match RunInputs::parse(&self.inputs) {
            Ok(inputs) => inputs,
            Err(err) => {
                self.error_message = err.to_string();
                return;
            }
        };

        self.is_loading = true;
        self.error_message.clear();
        self.status_message = "Loading history and forecast...".to_string();

        let (sender, receiver) = mpsc::channel();
        self.operation_receiver = Some(receiver);

        let api_url = self.api_url.trim().to_string();
        let offline_dir = self.offline_dir.trim().to_string();

        // Both fetches happen here; the UI thread applies them together.
        thread::spawn(move || {
            let source: Box<dyn DataSource> = if offline_dir.is_empty() {
                match Client::new(api_url) {
                    Ok(client) => Box::new(client),
                    Err(err) => {
                        let _ = sender.send(OperationResult::Error(err.to_string()));
                        return;
                    }
                }
            } else {
                Box::new(FileSource::new(offline_dir))
            };
            let result = match fetch_run(source.as_ref(), inputs) {
                Ok(run) => OperationResult::Fetched(Box::new(run)),
                Err(err) => OperationResult::Error(err.to_string()),
            };
            let _ = sender.send(result);
        });
    }

    fn check_operation_result(&mut self) {
        if let Some(receiver) = &self.operation_receiver
            && let Ok(result) = receiver.try_recv()
        {
            self.is_loading = false;
            self.operation_receiver = None;

            match result {
                OperationResult::Fetched(run) => match self.dashboard.apply(*run) {
                    Ok(report) => {
                        self.status_message = report.summary.to_string();
                        self.error_message.clear();
                    }
                    Err(err) => {
                        self.error_message = err.to_string();
                        self.status_message.clear();
                    }
                },
                OperationResult::Error(error) => {
                    self.error_message = error;
                    self.status_message.clear();
                }
            }
        }
    }

    fn export_table(&mut self) {
        let Some(table) = self.dashboard.table() else {
            return;
        };
        let start = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        let Some(path) = rfd::FileDialog::new()
            .set_directory(start)
            .set_file_name("reorder.csv")
            .add_filter("CSV", &["csv"])
            .add_filter("JSON", &["json"])
            .save_file()
        else {
            return;
        };
        let saved = if path.extension().and_then(|e| e.to_str()) == Some("json") {
            storage::save_table_json(table, &path)
        } else {
            storage::save_table_csv(table, &path)
        };
        match saved {
            Ok(()) => self.status_message = format!("Saved table to {}", path.display()),
            Err(err) => self.error_message = format!("Failed to save table: {err}"),
        }
    }

    fn export_charts(&mut self) {
        let Some(dir) = rfd::FileDialog::new().pick_folder() else {
            return;
        };
        let mut written = Vec::new();
        for (name, slot) in [
            ("history", self.dashboard.history_slot()),
            ("forecast", self.dashboard.forecast_slot()),
        ] {
            if slot.chart().is_none() {
                continue;
            }
            let Some(surface) = slot.surface() else {
                continue;
            };
            let path = dir.join(format!("{name}.svg"));
            if let Err(err) = backend::save_chart(surface, &path) {
                self.error_message = format!("Failed to save chart: {err}");
                return;
            }
            written.push(path.display().to_string());
        }
        self.status_message = format!("Charts saved:\n{}", written.join("\n"));
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_operation_result();

        // Request repaint if loading (for spinner animation)
        if self.is_loading {
            ctx.request_repaint();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.heading("DemandIQ - Sales & Reorder Dashboard");
                ui.add_space(10.0);

                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Store:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.store).desired_width(60.0));
                        ui.label("Dept:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.dept).desired_width(60.0));
                        ui.label("Past weeks:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.past_weeks).desired_width(50.0));
                        ui.label("Future weeks:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.future_weeks).desired_width(50.0));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Current stock:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.current_stock).desired_width(80.0));
                        ui.label("Safety %:");
                        ui.add(egui::TextEdit::singleline(&mut self.inputs.safety_percent).desired_width(50.0));
                        egui::ComboBox::from_label("Model")
                            .selected_text(self.inputs.model.to_uppercase())
                            .show_ui(ui, |ui| {
                                ui.selectable_value(&mut self.inputs.model, "prophet".to_string(), "PROPHET");
                                ui.selectable_value(&mut self.inputs.model, "xgb".to_string(), "XGB");
                            });
                    });
                });

                ui.collapsing("Data source", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Service URL:");
                        ui.text_edit_singleline(&mut self.api_url);
                    });
                    ui.horizontal(|ui| {
                        ui.label("Offline data dir:");
                        ui.text_edit_singleline(&mut self.offline_dir)
                            .on_hover_text("Directory with history.json and forecast.json; leave empty to use the service");
                        if ui.button("Browse").clicked()
                            && let Some(path) = rfd::FileDialog::new().pick_folder()
                        {
                            self.offline_dir = path.to_string_lossy().to_string();
                        }
                    });
                });

                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    // Disabled while a run is in flight so runs never overlap.
                    if ui.add_enabled(!self.is_loading, egui::Button::new("Run")).clicked() {
                        self.start_operation();
                    }
                    let has_table = self.dashboard.table().is_some();
                    if ui.add_enabled(has_table, egui::Button::new("Export table")).clicked() {
                        self.export_table();
                    }
                    if ui.add_enabled(has_table, egui::Button::new("Export charts")).clicked() {
                        self.export_charts();
                    }
                    if ui.add_enabled(!self.is_loading, egui::Button::new("Clear")).clicked() {
                        match self.dashboard.reset() {
                            Ok(()) => {
                                self.status_message.clear();
                                self.error_message.clear();
                            }
                            Err(err) => self.error_message = err.to_string(),
                        }
                    }
                    if self.is_loading {
                        ui.spinner();
                        ui.label("Processing...");
                    }
                });

                ui.add_space(10.0);

                if !self.status_message.is_empty() {
                    ui.colored_label(egui::Color32::DARK_GREEN, &self.status_message);
                }
                if !self.error_message.is_empty() {
                    ui.colored_label(egui::Color32::RED, &self.error_message);
                }

                ui.add_space(10.0);
                ui.label("Sales history");
                chart_panel(ui, self.dashboard.history_slot().surface());
                ui.add_space(10.0);
                ui.label("Forecast & required stock");
                chart_panel(ui, self.dashboard.forecast_slot().surface());

                ui.add_space(10.0);
                reorder_table(ui, &self.dashboard);
            });
        });
    }
}

/// Paint a recorded chart scaled to the panel width.
fn chart_panel(ui: &mut egui::Ui, chart: Option<&DisplayList>) {
    let (w, h) = chart.map(|c| c.size()).unwrap_or((CHART_W, CHART_H));
    let scale = (ui.available_width() / w as f32).min(1.0);
    let (response, painter) = ui.allocate_painter(
        egui::vec2(w as f32 * scale, h as f32 * scale),
        egui::Sense::hover(),
    );
    let Some(chart) = chart else {
        return;
    };
    let mut surface = PainterSurface {
        painter: &painter,
        origin: response.rect.min,
        scale,
        size: (w, h),
    };
    if let Err(err) = chart.replay(&mut surface) {
        log::warn!("chart repaint failed: {err}");
    }
}

fn reorder_table(ui: &mut egui::Ui, dashboard: &DashboardController<DisplayList>) {
    let Some(table) = dashboard.table() else {
        return;
    };
    egui::Grid::new("reorder_table")
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for h in TABLE_HEADER {
                ui.strong(h);
            }
            ui.end_row();
            for row in &table.rows {
                let cells = row.cells();
                for cell in &cells[..5] {
                    ui.label(cell);
                }
                let qty = egui::RichText::new(&cells[5]);
                if row.is_actionable() {
                    ui.label(qty.color(egui::Color32::from_rgb(0, 128, 0)).strong());
                } else {
                    ui.label(qty.color(egui::Color32::from_rgb(0x9c, 0xa3, 0xaf)));
                }
                ui.end_row();
            }
        });
    if let Some(summary) = dashboard.summary() {
        ui.add_space(6.0);
        ui.strong(summary.to_string());
    }
}

/// Draws chart operations with an egui painter, offset and scaled into a panel.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    scale: f32,
    size: (u32, u32),
}

impl PainterSurface<'_> {
    fn pos(&self, p: Point) -> egui::Pos2 {
        self.origin + egui::vec2(p.x as f32 * self.scale, p.y as f32 * self.scale)
    }

    fn rect(&self, r: Rect) -> egui::Rect {
        egui::Rect::from_min_max(
            self.pos(Point::new(r.x, r.y)),
            self.pos(Point::new(r.x + r.width, r.y + r.height)),
        )
    }
}

fn color32(c: Rgb8) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

impl Surface for PainterSurface<'_> {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn clear(&mut self, rect: Rect) -> Result<()> {
        self.painter
            .rect_filled(self.rect(rect), 0.0, egui::Color32::WHITE);
        Ok(())
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb8) -> Result<()> {
        self.painter.rect_filled(self.rect(rect), 0.0, color32(color));
        Ok(())
    }

    fn stroke_line(&mut self, points: &[Point], stroke: &Stroke) -> Result<()> {
        let st = egui::Stroke::new(stroke.width as f32 * self.scale, color32(stroke.color));
        let pieces = match stroke.dash.as_deref() {
            Some(pattern) => dash_segments(points, pattern),
            None => vec![points.to_vec()],
        };
        for piece in pieces {
            let pts: Vec<egui::Pos2> = piece.into_iter().map(|p| self.pos(p)).collect();
            self.painter.add(egui::Shape::line(pts, st));
        }
        Ok(())
    }

    fn draw_label(&mut self, text: &str, at: Point, style: &LabelStyle) -> Result<()> {
        let align = match style.anchor {
            TextAnchor::Left => egui::Align2::LEFT_BOTTOM,
            TextAnchor::Center => egui::Align2::CENTER_BOTTOM,
        };
        self.painter.text(
            self.pos(at),
            align,
            text,
            egui::FontId::proportional(style.size_px as f32 * self.scale.max(0.8)),
            color32(style.color),
        );
        Ok(())
    }
}
