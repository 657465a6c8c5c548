use std::path::{Path, PathBuf};

use eframe::egui::{self, Color32, RichText, Ui};

use crate::config::{self, Settings};
use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
    /// Settings as loaded at startup.
    settings: Settings,
    /// Dataset opened from the `CAR_SALES_DATA` override; never written back.
    env_path: Option<PathBuf>,
}

impl DashboardApp {
    /// Build the app and load the startup dataset before the first frame.
    pub fn new(settings: Settings, data_path: &Path, from_env: bool) -> Self {
        let mut state = AppState {
            smoothing_window: settings.charts.smoothing_window.max(1),
            sidebar_open: settings.ui.sidebar_open,
            ..AppState::default()
        };
        state.load_path(data_path);
        let env_path = if from_env { state.data_path.clone() } else { None };
        Self {
            state,
            settings,
            env_path,
        }
    }

    /// Settings to write on exit: the sidebar state, and the dataset path
    /// unless it came from the environment override.
    fn settings_to_persist(&self) -> Settings {
        let mut wanted = self.settings.clone();
        wanted.ui.sidebar_open = self.state.sidebar_open;
        if let Some(path) = &self.state.data_path {
            if self.env_path.as_ref() != Some(path) {
                wanted.data.path = Some(path.clone());
            }
        }
        wanted
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if self.state.sidebar_open {
            egui::SidePanel::left("filter_panel")
                .default_width(230.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: KPIs and charts ----
        let height = self.settings.charts.height;
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                empty_dashboard(ui, &self.state);
                return;
            }
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    panels::kpi_strip(ui, &self.state);
                    ui.add_space(8.0);
                    plot::chart_grid(ui, &self.state, height);
                });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        let wanted = self.settings_to_persist();
        if wanted != self.settings {
            if let Err(e) = config::save_settings(&wanted) {
                log::warn!("Could not save settings: {e:#}");
            }
        }
    }
}

fn empty_dashboard(ui: &mut Ui, state: &AppState) {
    ui.centered_and_justified(|ui: &mut Ui| match &state.status_message {
        Some(msg) if state.load_failed => {
            ui.label(RichText::new(msg).color(Color32::RED).heading());
        }
        _ => {
            ui.heading("Open a sales file to build the dashboard  (File → Open…)");
        }
    });
}
