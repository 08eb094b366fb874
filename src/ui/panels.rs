use eframe::egui::{self, Color32, RichText, Ui};

use crate::color::severity_color;
use crate::state::{AppState, Severity};

// ---------------------------------------------------------------------------
// Left side panel – identifier inputs
// ---------------------------------------------------------------------------

/// Render the left panel with the UID / EID inputs.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Input Credentials Here");
    ui.separator();

    match (&state.source, state.is_connected()) {
        (Some(source), true) => {
            ui.label(RichText::new("Connected").color(severity_color(Severity::Success)));
            ui.small(source.path.display().to_string());
        }
        _ => {
            ui.label(RichText::new("No dataset loaded.").color(Color32::GRAY));
        }
    }
    ui.add_space(8.0);

    let mut submit = false;

    ui.label("Filter by UID");
    let uid = ui.add(
        egui::TextEdit::singleline(&mut state.subject_input)
            .hint_text("Subject UID")
            .desired_width(f32::INFINITY),
    );
    submit |= uid.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.label("Filter by EID");
    let eid = ui.add(
        egui::TextEdit::singleline(&mut state.examiner_input)
            .hint_text("Examiner UID")
            .desired_width(f32::INFINITY),
    );
    submit |= eid.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));

    ui.add_space(8.0);
    let button = ui.add_enabled(state.is_connected(), egui::Button::new("Apply Filters"));
    if button.clicked() || (submit && state.is_connected()) {
        state.apply_filters();
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label("Schema");
        let current = state.config.schema.clone();
        egui::ComboBox::from_id_salt("schema")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for name in state.config.schema_names() {
                    if ui.selectable_label(current == name, &name).clicked() && current != name {
                        state.set_schema(&name);
                    }
                }
            });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!("{} submissions loaded", ds.len()));
        }
    });
}

// ---------------------------------------------------------------------------
// Central headline
// ---------------------------------------------------------------------------

pub fn headline(ui: &mut Ui, state: &AppState) {
    ui.heading("Your Result will be shown here");
    ui.add_space(4.0);

    match state.headline() {
        Some(h) => {
            ui.label(RichText::new(h.text).strong().color(severity_color(h.severity)));
        }
        None if !state.is_connected() => {
            ui.label("Open a sheet export to get started  (File → Open…)");
        }
        None => {}
    }
    ui.add_space(8.0);
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sheet export")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_source(path);
    }
}
