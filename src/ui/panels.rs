use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::{Category, Selection};
use crate::data::model::Gender;
use crate::state::AppState;
use crate::ui::format;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let years: Vec<i32> = dataset.years.iter().copied().collect();
    let groups: Vec<(Category, Vec<String>)> = Category::ALL
        .iter()
        .map(|&cat| (cat, cat.domain(dataset).iter().cloned().collect()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Single selects ----
            ui.strong("Year");
            let mut year = state.criteria.year;
            egui::ComboBox::from_id_salt("year_filter")
                .selected_text(year.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut year, Selection::All, "All");
                    for y in &years {
                        ui.selectable_value(&mut year, Selection::Only(*y), y.to_string());
                    }
                });
            if year != state.criteria.year {
                state.set_year(year);
            }

            ui.strong("Gender");
            let mut gender = state.criteria.gender;
            egui::ComboBox::from_id_salt("gender_filter")
                .selected_text(gender.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut gender, Selection::All, "All");
                    for g in Gender::ALL {
                        ui.selectable_value(&mut gender, Selection::Only(g), g.as_str());
                    }
                });
            if gender != state.criteria.gender {
                state.set_gender(gender);
            }
            ui.separator();

            // ---- Toggle groups (collapsible) ----
            for (category, values) in &groups {
                let category = *category;
                let n_selected = state.criteria.selected(category).len();
                let header_text = format!("{}  ({n_selected}/{})", category.label(), values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(category.label())
                    .default_open(category == Category::BodyStyle)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(category);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(category);
                            }
                        });

                        for val in values {
                            let mut checked = state.criteria.selected(category).contains(val);

                            // Swatch for keys that have a chart colour
                            let mut text = RichText::new(val);
                            match category {
                                Category::BodyStyle => {
                                    text = text.color(state.colors.body_styles.color_for(val));
                                }
                                Category::Region => {
                                    text = text.color(state.colors.regions.color_for(val));
                                }
                                Category::Company => {}
                            }

                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle(category, val);
                            }
                        }
                    });
            }

            ui.separator();
            if ui.button("Reset filters").clicked() {
                state.reset();
            }
        });
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
        });

        ui.separator();

        if ui
            .selectable_label(state.sidebar_open, "☰ Filters")
            .clicked()
        {
            state.sidebar_open = !state.sidebar_open;
        }

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match",
                format::count(ds.len()),
                format::count(state.snapshot.kpis.count)
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if state.load_failed {
                Color32::RED
            } else {
                Color32::YELLOW
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

/// Render the four summary statistics.
pub fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let kpis = &state.snapshot.kpis;
    let cards = [
        ("Total Sales", format::count(kpis.count)),
        ("Average Price", format::dollars(kpis.mean_price)),
        ("Total Revenue", format::dollars(kpis.total_price)),
        ("Average Income", format::dollars(kpis.mean_income)),
    ];

    ui.columns(cards.len(), |cols: &mut [Ui]| {
        for (col, (title, value)) in cols.iter_mut().zip(cards.iter()) {
            col.group(|ui: &mut Ui| {
                ui.vertical_centered(|ui: &mut Ui| {
                    ui.label(RichText::new(*title).small());
                    ui.heading(value);
                });
            });
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open sales data")
        .add_filter("Supported files", &["csv", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
