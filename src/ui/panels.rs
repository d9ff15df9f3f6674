use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::config::FilterStyle;
use crate::data::filter::{classify_column, derive_control, ControlSpec, Selection};
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – data management + filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Management");
            ui.separator();
            data_management(ui, state);

            ui.add_space(8.0);
            ui.heading("Data Filters");
            ui.separator();
            if state.table().is_empty() {
                ui.label("No data loaded.");
            } else {
                filters(ui, state);
            }
        });
}

fn data_management(ui: &mut Ui, state: &mut AppState) {
    if ui
        .button("Upload New Spreadsheet…")
        .on_hover_text("Upload CSV or Excel file with pipeline data")
        .clicked()
    {
        open_file_dialog(state);
    }

    egui::CollapsingHeader::new("Add New Row")
        .id_salt("add_row")
        .default_open(false)
        .show(ui, |ui: &mut Ui| add_row_form(ui, state));

    egui::CollapsingHeader::new("Settings")
        .id_salt("settings")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.strong("Company Logo:");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("Upload Logo…").clicked() {
                    open_logo_dialog(ui.ctx(), state);
                }
                if ui
                    .add_enabled(state.logo.is_some(), egui::Button::new("Remove Logo"))
                    .clicked()
                {
                    state.logo = None;
                    state.status = Some(Status::Success("Logo removed successfully!".into()));
                }
            });
        });
}

fn add_row_form(ui: &mut Ui, state: &mut AppState) {
    let rec = &mut state.new_row;

    ui.strong("Required Fields:");
    text_field(ui, "Country*", &mut rec.country);
    text_field(ui, "Project*", &mut rec.project);
    text_field(ui, "Vessel", &mut rec.vessel);
    text_field(ui, "Pipe Type", &mut rec.pipe_type);

    ui.strong("Optional Fields:");
    text_field(ui, "Line Type", &mut rec.line_type);
    number_field(ui, "Pipe OD (mm)", &mut rec.pipe_od, true);
    number_field(ui, "Pipe Wall Thickness (mm)", &mut rec.pipe_wall_thickness, true);
    number_field(ui, "Coating Thickness (mm)", &mut rec.coating_thickness, true);
    number_field(ui, "Steel Density (kg/m³)", &mut rec.steel_density, true);
    number_field(ui, "Coating Density (kg/m³)", &mut rec.coating_density, true);
    number_field(ui, "Clad Thickness (mm)", &mut rec.clad_thickness, true);
    text_field(ui, "Vessel Name", &mut rec.vessel_name);
    number_field(ui, "Water Depth (m)", &mut rec.water_depth, true);
    number_field(ui, "Estimated Optimal JLT Angle (°)", &mut rec.estimated_optimal_jlt_angle, false);
    number_field(ui, "JLT Angle (°)", &mut rec.jlt_angle, false);
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Installation Date");
        ui.add(DatePickerButton::new(&mut rec.installation_date).id_salt("new_installation_date"));
    });

    if ui.button("Add Row").clicked() {
        state.add_row();
    }
}

fn text_field(ui: &mut Ui, label: &str, value: &mut String) {
    ui.label(label);
    ui.text_edit_singleline(value);
}

fn number_field(ui: &mut Ui, label: &str, value: &mut f64, non_negative: bool) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        let lower = if non_negative { 0.0 } else { f64::MIN };
        ui.add(
            egui::DragValue::new(value)
                .range(lower..=f64::MAX)
                .speed(0.1)
                .max_decimals(3),
        );
    });
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

fn filters(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Filter Style:");
        ui.radio_value(&mut state.filter_style, FilterStyle::Multiselect, "Multiselect");
        ui.radio_value(&mut state.filter_style, FilterStyle::Checkboxes, "Checkboxes");
    });

    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Select All").clicked() {
            state.select_all();
        }
        if ui.button("Clear All").clicked() {
            state.clear_all();
        }
    });
    ui.separator();

    // Derive every control up front so the loop below can mutate state.
    let controls: Vec<(String, ControlSpec)> = {
        let table = state.table();
        table
            .columns()
            .iter()
            .map(|col| {
                let kind = classify_column(col);
                let spec = derive_control(table, &col.name, kind, state.filters.get(&col.name));
                (col.name.clone(), spec)
            })
            .collect()
    };

    for (name, spec) in controls {
        if let Some(selection) = column_control(ui, &name, spec, state.filter_style) {
            state.set_selection(&name, selection);
        }
    }
}

/// Render one column's control. Returns the new selection if the user changed it.
fn column_control(
    ui: &mut Ui,
    name: &str,
    spec: ControlSpec,
    style: FilterStyle,
) -> Option<Selection> {
    match spec {
        ControlSpec::Categorical { options, selected } => {
            let mut chosen = selected.clone();
            let mut toggle = |ui: &mut Ui, option: &String| {
                let mut on = chosen.contains(option);
                if ui.checkbox(&mut on, option.as_str()).changed() {
                    if on {
                        chosen.insert(option.clone());
                    } else {
                        chosen.remove(option);
                    }
                }
            };

            match style {
                FilterStyle::Multiselect => {
                    ui.label(format!("Filter by {name}:"));
                    let summary = if selected.is_empty() {
                        "All".to_string()
                    } else {
                        format!("{} of {} selected", selected.len(), options.len())
                    };
                    egui::ComboBox::from_id_salt(format!("filter_{name}"))
                        .selected_text(summary)
                        .width(ui.available_width())
                        .close_behavior(egui::PopupCloseBehavior::CloseOnClickOutside)
                        .show_ui(ui, |ui: &mut Ui| {
                            for option in &options {
                                toggle(ui, option);
                            }
                        });
                }
                FilterStyle::Checkboxes => {
                    ui.strong(format!("{name}:"));
                    for option in &options {
                        toggle(ui, option);
                    }
                }
            }
            ui.add_space(4.0);
            (chosen != selected).then_some(Selection::Values(chosen))
        }
        ControlSpec::NumberRange { min, max, low, high } => {
            let (mut lo, mut hi) = (low, high);
            ui.label(format!("{name} Range:"));
            ui.add(egui::Slider::new(&mut lo, min..=max).text("min"));
            ui.add(egui::Slider::new(&mut hi, min..=max).text("max"));
            ui.add_space(4.0);
            if lo > hi {
                hi = lo;
            }
            (lo != low || hi != high).then_some(Selection::NumberRange { low: lo, high: hi })
        }
        ControlSpec::DateRange {
            min,
            max,
            start,
            end,
        } => {
            let (mut from, mut to) = (start, end);
            let from_id = format!("date_from_{name}");
            let to_id = format!("date_to_{name}");
            ui.label(format!("{name} Range:"));
            ui.horizontal(|ui: &mut Ui| {
                ui.add(DatePickerButton::new(&mut from).id_salt(&from_id));
                ui.label("to");
                ui.add(DatePickerButton::new(&mut to).id_salt(&to_id));
            });
            ui.add_space(4.0);
            let from = from.clamp(min, max);
            let to = to.clamp(from, max);
            (from != start || to != end).then_some(Selection::DateRange {
                start: from,
                end: to,
            })
        }
        ControlSpec::NoControl => None,
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload Spreadsheet…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Download Filtered CSV…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} lines loaded, {} visible",
            state.table().n_rows(),
            state.filtered.n_rows()
        ));

        ui.separator();

        match &state.status {
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(msg).color(Color32::from_rgb(60, 160, 80)));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload pipeline data")
        .add_filter("Supported files", &["csv", "xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx", "xlsm", "xls"])
        .pick_file();

    if let Some(path) = file {
        state.import_file(&path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let name = crate::data::export::export_file_name(chrono::Local::now().naive_local());
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}

fn open_logo_dialog(ctx: &egui::Context, state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload logo")
        .add_filter("Images", &["png", "jpg", "jpeg"])
        .pick_file();

    if let Some(path) = file {
        match load_logo(ctx, &path) {
            Ok(texture) => {
                log::info!("Loaded logo {}", path.display());
                state.logo = Some(texture);
                state.status = Some(Status::Success("Logo uploaded successfully!".into()));
            }
            Err(e) => {
                log::error!("Failed to load logo {}: {e}", path.display());
                state.status = Some(Status::Error(format!("Error processing logo: {e}")));
            }
        }
    }
}

fn load_logo(ctx: &egui::Context, path: &Path) -> Result<egui::TextureHandle, image::ImageError> {
    let rgba = image::open(path)?.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice());
    Ok(ctx.load_texture("company_logo", image, egui::TextureOptions::default()))
}
