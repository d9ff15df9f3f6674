use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::stats::{describe, Kpis, NumericSummary};
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render logo, KPIs, chart, data table and summary statistics.
pub fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(logo) = &state.logo {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.add(egui::Image::new(logo).max_width(200.0).max_height(120.0));
                });
            }
            ui.vertical_centered(|ui: &mut Ui| {
                ui.heading(RichText::new("Offshore Pipeline Projects Dashboard").size(24.0));
            });
            ui.separator();

            if state.table().is_empty() {
                welcome(ui);
                return;
            }

            kpis(ui, &Kpis::compute(&state.filtered));
            plot::pipe_type_distribution(ui, state);
            data_table(ui, state);
            summary_statistics(ui, state);
        });
}

fn welcome(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.strong("Welcome to the Offshore Pipeline Projects Dashboard!");
    ui.label("To get started:");
    ui.label("1. Upload a CSV or Excel file using the sidebar");
    ui.label("2. Or add data manually using the \"Add New Row\" form");
    ui.add_space(6.0);
    ui.label("The dashboard will automatically create appropriate filters for your data columns.");
}

fn kpis(ui: &mut Ui, kpis: &Kpis) {
    ui.heading("Key Performance Indicators");
    let metrics = [
        ("Total Pipeline Lines", kpis.total_lines),
        ("Unique Projects", kpis.unique_projects),
        ("Unique Vessels", kpis.unique_vessels),
        ("Countries", kpis.countries),
    ];
    ui.columns(metrics.len(), |cols: &mut [Ui]| {
        for (col, (label, value)) in cols.iter_mut().zip(metrics) {
            col.label(label);
            col.label(RichText::new(value.to_string()).size(28.0).strong());
        }
    });
    ui.separator();
}

fn data_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Pipeline Data Table");
    ui.label(format!(
        "Showing {} of {} total records",
        state.filtered.n_rows(),
        state.table().n_rows()
    ));
    if ui.button("Download Filtered Data as CSV").clicked() {
        panels::save_file_dialog(state);
    }

    let table = &state.filtered;
    let n_cols = table.columns().len();
    if n_cols == 0 {
        return;
    }

    ScrollArea::horizontal()
        .id_salt("data_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(Layout::left_to_right(Align::Center))
                .columns(TableColumn::auto().at_least(70.0).clip(true), n_cols)
                .min_scrolled_height(0.0)
                .max_scroll_height(state.config.table_height)
                .header(22.0, |mut header| {
                    for name in table.column_names() {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, table.n_rows(), |mut row| {
                        let r = row.index();
                        for c in 0..n_cols {
                            row.col(|ui: &mut Ui| {
                                ui.label(table.cell(r, c).to_string());
                            });
                        }
                    });
                });
        });
    ui.separator();
}

fn summary_statistics(ui: &mut Ui, state: &AppState) {
    let summary = describe(&state.filtered);
    if summary.is_empty() {
        return;
    }

    egui::CollapsingHeader::new("Numerical Summary Statistics")
        .id_salt("summary_stats")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ScrollArea::horizontal().id_salt("summary_scroll").show(ui, |ui: &mut Ui| {
                egui::Grid::new("describe_grid")
                    .striped(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.strong("");
                        for s in &summary {
                            ui.strong(&s.column);
                        }
                        ui.end_row();

                        let rows: Vec<[(&str, f64); 8]> = summary.iter().map(stat_row).collect();
                        for i in 0..8 {
                            ui.strong(rows[0][i].0);
                            for row in &rows {
                                let v = row[i].1;
                                ui.label(if v.is_nan() { "NaN".to_string() } else { format!("{v:.3}") });
                            }
                            ui.end_row();
                        }
                    });
            });
        });
}

fn stat_row(s: &NumericSummary) -> [(&'static str, f64); 8] {
    [
        ("count", s.count as f64),
        ("mean", s.mean),
        ("std", s.std),
        ("min", s.min),
        ("25%", s.q25),
        ("50%", s.median),
        ("75%", s.q75),
        ("max", s.max),
    ]
}
