use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;
use vastrabo::config::AppConfig;
use vastrabo::error::AppError;
use vastrabo::kommun::{KommunLookup, MunicipalityCatalog};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// The CLI flag wins over `APP_CATALOG_DIR`; with neither, the embedded table
/// is used.
pub(crate) fn load_lookup(
    config: &AppConfig,
    catalog_dir: Option<PathBuf>,
) -> Result<KommunLookup, AppError> {
    let catalog = match catalog_dir.or_else(|| config.catalog.data_dir.clone()) {
        Some(dir) => {
            info!(dir = %dir.display(), "loading municipality catalog from directory");
            MunicipalityCatalog::from_dir(dir)?
        }
        None => MunicipalityCatalog::embedded()?,
    };

    Ok(KommunLookup::new(catalog, config.portals.clone()))
}
