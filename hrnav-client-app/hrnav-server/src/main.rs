use std::net::SocketAddr;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use hrnav_api::{router, state::AppState};
use hrnav_core::MenuTree;
use hrnav_shared::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            hrnav_shared::telemetry::init_telemetry();
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize telemetry
    if config.app.log_format == "pretty" {
        hrnav_shared::telemetry::init_pretty_telemetry();
    } else {
        hrnav_shared::telemetry::init_telemetry();
    }

    info!("{} starting ({})...", config.app.name, config.app.env);

    // Load menu
    let tree = match &config.menu.source {
        Some(path) => MenuTree::load(path)?,
        None => {
            info!("No menu source configured, using the built-in HR dashboard menu");
            MenuTree::hr_dashboard()?
        }
    };
    if config.dev_bypass_enabled() {
        info!("Development bypass enabled: role filtering is skipped");
    }

    // Create App State
    let state = AppState::new(tree, &config);

    // Build router
    let origin: HeaderValue = config.app.allowed_origin.parse()?;
    let app = router(state).layer(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
