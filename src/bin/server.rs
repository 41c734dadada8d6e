use equipment_visualizer::infrastructure::config::Settings;
use equipment_visualizer::interfaces::http::start_server;
use tracing::info;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let settings = Settings::load().map_err(|e| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    info!("Equipment aggregation service listening on {}", settings.bind_addr);
    start_server(&settings)?.await
}
