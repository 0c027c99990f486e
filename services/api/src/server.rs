use crate::cli::ServeArgs;
use crate::infra::{load_lookup, AppState};
use crate::routes::with_kommun_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use vastrabo::config::AppConfig;
use vastrabo::error::AppError;
use vastrabo::telemetry::{self, LogTarget};

pub(crate) async fn run(mut args: ServeArgs, catalog_dir: Option<PathBuf>) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry, LogTarget::Stdout)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lookup = Arc::new(load_lookup(&config, catalog_dir)?);
    let revision = lookup.catalog().revision().to_string();
    let municipalities = lookup.catalog().len();

    let app = with_kommun_routes(lookup)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        %revision,
        municipalities,
        "västrabo lookup service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
