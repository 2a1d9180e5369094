use std::process::ExitCode;

use station_router::config::{Settings, load_stations};
use station_router::router::StationRouter;
use station_router::web::{AppState, create_router};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "station_router=info".into()),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let engine = settings.engine.build()?;
    let router = StationRouter::new(engine, settings.router_config());

    if let Some(path) = &settings.stations_file {
        let coordinates = load_stations(path)?;
        let summary = router.register(coordinates).await;
        info!(
            path = %path.display(),
            total = summary.total,
            snapped = summary.snapped,
            "registered startup stations"
        );
    }

    let app = create_router(AppState::new(router));

    let listener = tokio::net::TcpListener::bind(settings.listen_addr).await?;
    info!(addr = %settings.listen_addr, "station router listening");
    info!("  GET  /health           - Health check");
    info!("  POST /stations         - Register stations");
    info!("  GET  /stations/:index  - Look up a station");
    info!("  POST /table            - Duration row from an origin");

    axum::serve(listener, app).await?;
    Ok(())
}
