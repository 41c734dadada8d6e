use equipment_visualizer::infrastructure::config::Settings;
use equipment_visualizer::interfaces::gui;
use tracing::{info, warn};

fn main() -> Result<(), eframe::Error> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let settings = Settings::load().unwrap_or_else(|e| {
        warn!("{}; falling back to defaults", e);
        Settings::default()
    });

    info!(
        "Starting desktop shell, expecting backend at {}",
        settings.backend_url
    );
    gui::run(settings)
}
