use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use trial_viewer::data::engine::Found;
use trial_viewer::data::summary::MetricSummary;

// ---------------------------------------------------------------------------
// Submission table
// ---------------------------------------------------------------------------

/// Every matching submission in load order, one column per display field.
/// The latest row, which the summary and charts use, is highlighted.
pub fn submission_table(ui: &mut Ui, found: &Found) {
    ui.strong("Event Data");
    if found.submissions() > 1 {
        ui.small(format!(
            "{} submissions for this UID / EID; the last row is summarised",
            found.submissions()
        ));
    }

    let columns = &found.record.cells;
    let latest = found.record.row;
    egui::ScrollArea::horizontal()
        .id_salt("event_data")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .columns(Column::auto().at_least(36.0), columns.len())
                .header(20.0, |mut header| {
                    for (column, _) in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(column.as_str());
                        });
                    }
                })
                .body(|mut body| {
                    for view in &found.history {
                        body.row(18.0, |mut row| {
                            row.set_selected(view.row == latest);
                            for (_, value) in &view.cells {
                                row.col(|ui: &mut Ui| {
                                    ui.label(value.as_str());
                                });
                            }
                        });
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Summary grid
// ---------------------------------------------------------------------------

pub fn summary_grid(ui: &mut Ui, found: &Found) {
    let record = &found.record;
    ui.horizontal_wrapped(|ui: &mut Ui| {
        if !record.submitted_at.is_empty() {
            ui.label(format!("Submitted: {}", record.submitted_at));
        }
        for (label, value) in &record.details {
            ui.separator();
            ui.label(format!("{label}: {value}"));
        }
    });
    ui.add_space(4.0);

    egui::Grid::new("summary_grid")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui: &mut Ui| {
            ui.strong("");
            ui.strong("Trials 1–2 mean");
            ui.strong("Last two mean");
            ui.strong("Saving");
            ui.end_row();

            metric_row(ui, "Time (s)", &found.summary.time);
            metric_row(ui, "Errors", &found.summary.errors);
        });
}

fn metric_row(ui: &mut Ui, label: &str, m: &MetricSummary) {
    ui.label(label);
    ui.label(format!("{:.2}", m.first_two_mean));
    ui.label(format!("{:.2}", m.last_two_mean));
    ui.label(format!("{:+.2}", m.saving));
    ui.end_row();
}
