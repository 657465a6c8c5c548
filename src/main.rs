mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::DashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let settings = config::load_settings();
    let env_path = std::env::var_os(config::DATA_PATH_ENV).map(PathBuf::from);
    let from_env = env_path.is_some();
    let data_path = settings.data_path(env_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Car Sales Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(settings, &data_path, from_env)))),
    )
}
