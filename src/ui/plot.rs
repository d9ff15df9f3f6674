use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Legend, Plot};

use crate::data::stats::value_counts;
use crate::state::{AppState, PIPE_TYPE_COLUMN};

// ---------------------------------------------------------------------------
// Pipe type distribution (central panel)
// ---------------------------------------------------------------------------

/// Bar chart of lines per pipe type plus a textual breakdown. Renders
/// nothing when the filtered table has no pipe types.
pub fn pipe_type_distribution(ui: &mut Ui, state: &AppState) {
    let counts = value_counts(&state.filtered, PIPE_TYPE_COLUMN);
    if counts.is_empty() {
        return;
    }

    ui.heading("Data Visualization");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Pipe Type Distribution");
        Plot::new("pipe_type_chart")
            .legend(Legend::default())
            .height(260.0)
            .y_axis_label("Lines")
            .show_x(false)
            .allow_drag(false)
            .allow_scroll(false)
            .allow_zoom(false)
            .allow_boxed_zoom(false)
            .show(&mut cols[0], |plot_ui| {
                // One chart per pipe type so each gets its own legend entry.
                for (i, vc) in counts.iter().enumerate() {
                    let color = state.pipe_type_colors.color_for(&vc.value);
                    let bar = Bar::new(i as f64, vc.count as f64)
                        .name(&vc.value)
                        .width(0.7);
                    plot_ui.bar_chart(BarChart::new(vec![bar]).name(&vc.value).color(color));
                }
            });

        cols[1].strong("Distribution Details");
        for vc in &counts {
            cols[1].label(format!(
                "{}: {} lines ({:.1}%)",
                vc.value, vc.count, vc.percent
            ));
        }
    });
    ui.separator();
}
