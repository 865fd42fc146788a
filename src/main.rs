use log::info;
use shop_catalog::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    info!("One-Stop Computer Shop catalog");

    let config = AppConfig::load()?;
    info!(
        "Configuration loaded: server={}:{} backend={:?}",
        config.server.host, config.server.port, config.database.backend
    );

    shop_catalog::run_server(config).await
}
