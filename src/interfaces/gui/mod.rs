//! Desktop shell: one window, one upload in flight at a time.
//!
//! The upload runs on a worker thread and reports back over an mpsc
//! channel; the egui loop drains the channel each frame, so nothing here
//! blocks the interactive surface except the deliberate pre-dialog probe.

pub mod chart;

use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use eframe::egui;
use tracing::{error, info};

use crate::domain::analysis::AnalysisResult;
use crate::domain::error::AppError;
use crate::infrastructure::api_client::EquipmentApi;
use crate::infrastructure::config::Settings;

use chart::DistributionChart;

const INFO_COLOR: egui::Color32 = egui::Color32::from_rgb(52, 152, 219);
const SUCCESS_COLOR: egui::Color32 = egui::Color32::from_rgb(46, 204, 113);
const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(231, 76, 60);

#[derive(Debug, Clone, Copy, PartialEq)]
enum StatusKind {
    Info,
    Success,
    Error,
}

pub struct MainWindow {
    api: Arc<EquipmentApi>,
    selected_file: Option<PathBuf>,
    uploading: bool,
    status: Option<(StatusKind, String)>,
    results: Option<AnalysisResult>,
    chart: DistributionChart,
    outcome_rx: Option<Receiver<Result<AnalysisResult, AppError>>>,
    /// Error message waiting to be raised as a native message box.
    pending_error_dialog: Option<String>,
}

impl MainWindow {
    pub fn new(settings: Settings) -> Self {
        Self {
            api: Arc::new(EquipmentApi::new(settings)),
            selected_file: None,
            uploading: false,
            status: None,
            results: None,
            chart: DistributionChart::default(),
            outcome_rx: None,
            pending_error_dialog: None,
        }
    }

    /// Probe the backend, then open the file dialog and start the upload.
    ///
    /// The probe runs before the dialog on purpose: a dead backend is
    /// reported without ever asking the user to pick a file.
    fn select_csv_file(&mut self, ctx: &egui::Context) {
        if !self.api.check_backend_status() {
            let message = format!(
                "Cannot connect to the backend!\n\n\
                 Expected it at {}.\n\
                 Start it with: equipment-server\n\n\
                 Then try again.",
                self.api.base_url()
            );
            self.status = Some((StatusKind::Error, "Backend is not running".to_string()));
            self.pending_error_dialog = Some(message);
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        info!(file = %path.display(), "Selected CSV file");
        self.selected_file = Some(path.clone());
        self.start_upload(ctx, path);
    }

    fn start_upload(&mut self, ctx: &egui::Context, path: PathBuf) {
        self.uploading = true;
        self.status = Some((StatusKind::Info, "Processing CSV file...".to_string()));
        self.results = None;
        self.chart = DistributionChart::default();

        let (tx, rx) = channel();
        self.outcome_rx = Some(rx);

        let api = Arc::clone(&self.api);
        let egui_ctx = ctx.clone();
        thread::spawn(move || {
            let outcome = api.upload_and_analyze(&path);
            let _ = tx.send(outcome);
            egui_ctx.request_repaint();
        });
    }

    /// Drain the worker channel and apply whichever completion signal fired.
    fn poll_worker(&mut self) {
        let Some(rx) = &self.outcome_rx else {
            return;
        };
        match rx.try_recv() {
            Ok(outcome) => {
                self.outcome_rx = None;
                self.apply_outcome(outcome);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.outcome_rx = None;
                self.apply_outcome(Err(AppError::Upload(
                    "upload worker exited unexpectedly".to_string(),
                )));
            }
        }
    }

    fn apply_outcome(&mut self, outcome: Result<AnalysisResult, AppError>) {
        self.uploading = false;
        match outcome {
            Ok(results) => {
                info!(total = results.total_equipment, "Analysis complete");
                self.status = Some((StatusKind::Success, "Analysis complete!".to_string()));
                self.chart = DistributionChart::from_counts(&results.equipment_by_type);
                self.results = Some(results);
            }
            Err(e) => {
                error!("Upload failed: {}", e);
                let message = e.to_string();
                self.status = Some((StatusKind::Error, format!("Error: {}", message)));
                self.pending_error_dialog = Some(message);
            }
        }
    }

    fn show_upload_section(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Upload CSV File").strong());
            ui.add_space(4.0);

            let button = egui::Button::new("📁 Select CSV File").min_size([0.0, 32.0].into());
            if ui.add_enabled(!self.uploading, button).clicked() {
                self.select_csv_file(ctx);
            }

            match &self.selected_file {
                Some(path) => {
                    ui.label(format!("Selected: {}", path.display()));
                }
                None => {
                    ui.label(egui::RichText::new("No file selected").weak().italics());
                }
            }
        });
    }

    fn show_status_line(&self, ui: &mut egui::Ui) {
        if let Some((kind, message)) = &self.status {
            let color = match kind {
                StatusKind::Info => INFO_COLOR,
                StatusKind::Success => SUCCESS_COLOR,
                StatusKind::Error => ERROR_COLOR,
            };
            ui.label(egui::RichText::new(message).color(color).strong());
        }
    }

    fn show_results_section(&self, ui: &mut egui::Ui) {
        let Some(results) = &self.results else {
            return;
        };

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Analysis Results").strong());
            ui.add_space(4.0);

            egui::Grid::new("stat_cards")
                .num_columns(2)
                .spacing([40.0, 12.0])
                .show(ui, |ui| {
                    stat_card(ui, "TOTAL EQUIPMENT", results.total_equipment.to_string());
                    stat_card(ui, "AVERAGE FLOWRATE", average_text(results.average_flowrate));
                    ui.end_row();
                    stat_card(ui, "AVERAGE PRESSURE", average_text(results.average_pressure));
                    stat_card(
                        ui,
                        "AVERAGE TEMPERATURE",
                        average_text(results.average_temperature),
                    );
                    ui.end_row();
                });
        });
    }

    fn show_chart_section(&self, ui: &mut egui::Ui) {
        if self.results.is_none() {
            return;
        }

        ui.group(|ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new("Equipment Distribution by Type").strong());
            ui.add_space(4.0);
            self.chart.show(ui);
        });
    }
}

impl eframe::App for MainWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker();

        if let Some(message) = self.pending_error_dialog.take() {
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Error)
                .set_title("Upload Error")
                .set_description(message)
                .show();
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("Chemical Equipment Parameter Visualizer");
                    ui.label(
                        egui::RichText::new("Upload a CSV file to analyze equipment data").weak(),
                    );
                });
                ui.add_space(8.0);

                self.show_upload_section(ui, ctx);
                ui.add_space(6.0);
                self.show_status_line(ui);
                ui.add_space(6.0);
                self.show_results_section(ui);
                ui.add_space(6.0);
                self.show_chart_section(ui);
            });
        });
    }
}

fn stat_card(ui: &mut egui::Ui, title: &str, value: String) {
    ui.vertical(|ui| {
        ui.label(egui::RichText::new(title).weak().size(11.0));
        ui.label(egui::RichText::new(value).strong().size(20.0));
    });
}

/// Display text for an average: two decimals, or a dash when the column
/// held no numeric values.
fn average_text(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "—".to_string(),
    }
}

/// Open the main window and block until it is closed.
pub fn run(settings: Settings) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1000.0, 800.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Chemical Equipment Parameter Visualizer",
        options,
        Box::new(move |_cc| Ok(Box::new(MainWindow::new(settings)))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn window() -> MainWindow {
        MainWindow::new(Settings::default())
    }

    fn sample_result() -> AnalysisResult {
        AnalysisResult {
            total_equipment: 3,
            average_flowrate: Some(10.0),
            average_pressure: Some(20.0),
            average_temperature: None,
            equipment_by_type: BTreeMap::from([
                ("Pump".to_string(), 2),
                ("Reactor".to_string(), 1),
            ]),
        }
    }

    #[test]
    fn test_success_outcome_renders_results_and_reenables_control() {
        let mut w = window();
        w.uploading = true;

        w.apply_outcome(Ok(sample_result()));

        assert!(!w.uploading);
        assert!(w.results.is_some());
        assert!(!w.chart.is_empty());
        assert_eq!(w.status.as_ref().unwrap().0, StatusKind::Success);
        assert!(w.pending_error_dialog.is_none());
    }

    #[test]
    fn test_failure_outcome_shows_error_and_reenables_control() {
        let mut w = window();
        w.uploading = true;

        w.apply_outcome(Err(AppError::Timeout("request timed out".to_string())));

        assert!(!w.uploading);
        assert!(w.results.is_none());
        assert_eq!(w.status.as_ref().unwrap().0, StatusKind::Error);
        assert!(w.pending_error_dialog.is_some());
    }

    #[test]
    fn test_disconnected_worker_is_reported_not_hung() {
        let mut w = window();
        w.uploading = true;
        let (tx, rx) = channel::<Result<AnalysisResult, AppError>>();
        w.outcome_rx = Some(rx);
        drop(tx);

        w.poll_worker();

        assert!(!w.uploading);
        assert!(w.outcome_rx.is_none());
        assert_eq!(w.status.as_ref().unwrap().0, StatusKind::Error);
    }

    #[test]
    fn test_average_text_formats_two_decimals_or_dash() {
        assert_eq!(average_text(Some(10.0)), "10.00");
        assert_eq!(average_text(Some(3.333)), "3.33");
        assert_eq!(average_text(None), "—");
    }
}
