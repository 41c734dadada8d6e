//! Bar chart of the per-type equipment counts.
//!
//! The chart owns only prepared data and renders into any caller-provided
//! `Ui`, so the container decides where it lives and how big it is.

use std::collections::BTreeMap;

use eframe::egui;
use egui_plot::{Bar, BarChart, Plot, PlotPoint, Text};

/// Equipment-distribution bar chart, one bar per distinct type.
#[derive(Debug, Default, Clone)]
pub struct DistributionChart {
    bars: Vec<(String, u64)>,
}

impl DistributionChart {
    /// Prepare bars from the per-type counts, in the mapping's iteration
    /// order.
    pub fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        Self {
            bars: counts
                .iter()
                .map(|(name, count)| (name.clone(), *count))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Render the chart, or a placeholder when there is nothing to plot.
    pub fn show(&self, ui: &mut egui::Ui) {
        if self.bars.is_empty() {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new("No data available").weak().size(14.0));
            });
            return;
        }

        let max_count = self.bars.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        let label_offset = (max_count * 0.05).max(0.2);
        let labels: Vec<String> = self.bars.iter().map(|(name, _)| name.clone()).collect();

        let bars: Vec<Bar> = self
            .bars
            .iter()
            .enumerate()
            .map(|(i, (name, count))| Bar::new(i as f64, *count as f64).name(name).width(0.6))
            .collect();
        let chart = BarChart::new(bars).name("Equipment count");

        Plot::new("equipment_distribution")
            .height(260.0)
            .include_y(0.0)
            .include_y(max_count + label_offset * 3.0)
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .allow_boxed_zoom(false)
            .x_axis_formatter(move |mark, _range| {
                let index = mark.value.round();
                if (mark.value - index).abs() > 1e-6 || index < 0.0 {
                    return String::new();
                }
                labels
                    .get(index as usize)
                    .cloned()
                    .unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| {
                // Counts are integers; hide fractional grid lines.
                let value = mark.value;
                if value >= 0.0 && (value - value.round()).abs() < 1e-6 {
                    format!("{}", value.round() as i64)
                } else {
                    String::new()
                }
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(chart);
                for (i, (_, count)) in self.bars.iter().enumerate() {
                    plot_ui.text(Text::new(
                        PlotPoint::new(i as f64, *count as f64 + label_offset),
                        egui::RichText::new(count.to_string()).strong(),
                    ));
                }
            });
    }
}
