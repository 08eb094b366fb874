use eframe::egui::Ui;
use egui_plot::{HLine, Legend, Line, Plot, PlotPoints, Points};

use trial_viewer::data::engine::Found;
use trial_viewer::data::summary::MetricSummary;

use crate::color::SeriesColors;

// ---------------------------------------------------------------------------
// Trial charts (central panel)
// ---------------------------------------------------------------------------

/// Render time-per-trial and errors-per-trial charts side by side.
pub fn trial_plots(ui: &mut Ui, found: &Found) {
    let [time_colors, error_colors] = SeriesColors::for_charts();

    let times: Vec<[f64; 2]> = found
        .trials
        .iter()
        .map(|t| [t.index as f64, t.time_secs])
        .collect();
    let errors: Vec<[f64; 2]> = found
        .trials
        .iter()
        .map(|t| [t.index as f64, f64::from(t.errors)])
        .collect();

    ui.columns(2, |cols| {
        metric_plot(
            &mut cols[0],
            "time_plot",
            "Time (s)",
            &times,
            &found.summary.time,
            time_colors,
        );
        metric_plot(
            &mut cols[1],
            "errors_plot",
            "Errors",
            &errors,
            &found.summary.errors,
            error_colors,
        );
    });
}

fn metric_plot(
    ui: &mut Ui,
    id: &str,
    label: &str,
    values: &[[f64; 2]],
    summary: &MetricSummary,
    colors: SeriesColors,
) {
    ui.strong(format!("{label} per trial"));

    Plot::new(id)
        .height(260.0)
        .legend(Legend::default())
        .x_axis_label("Trial")
        .y_axis_label(label)
        .include_y(0.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(values.to_vec()))
                    .name(label)
                    .color(colors.line)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(values.to_vec()))
                    .color(colors.line)
                    .radius(3.0),
            );
            plot_ui.hline(
                HLine::new(summary.first_two_mean)
                    .name("Trials 1–2 mean")
                    .color(colors.early_mean),
            );
            plot_ui.hline(
                HLine::new(summary.last_two_mean)
                    .name("Last two mean")
                    .color(colors.late_mean),
            );
        });
}
