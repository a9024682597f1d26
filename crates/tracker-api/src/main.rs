use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracker_api::{config::Config, router, AppState};
use tracker_core::{Palette, ProjectStore};

const DEFAULT_LOG_FILTER: &str = "tracker_api=info,tracker_core=info,tower_http=info";

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();
    init_tracing(config.log_json);

    let store = ProjectStore::new(config.data_dir(), Palette::standard());
    store.ensure_dir()?;

    let app = router(AppState::new(store.clone())).layer(config.cors_layer());

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %config.bind,
        data_dir = %store.dir().display(),
        "serving projects"
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "server error"))?;
    Ok(())
}
