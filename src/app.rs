use std::sync::Arc;

use tracing::info;

use crate::application::{AppearanceService, DashboardService};
use crate::domain::error::Result;
use crate::infrastructure::backend::HttpPortsBackend;
use crate::infrastructure::config::Settings;
use crate::infrastructure::storage::PreferenceStore;
use crate::interfaces::http::start_server;

pub async fn run() -> Result<()> {
    let _ = tracing_subscriber::fmt().with_env_filter("info").try_init();

    let settings = Settings::load()?;
    info!(
        backend_url = %settings.backend_url,
        data_dir = %settings.data_dir.display(),
        "Starting port monitor"
    );

    let store = Arc::new(PreferenceStore::open(&settings.data_dir)?);
    let backend = Arc::new(HttpPortsBackend::new(settings.backend_url.clone()));
    let dashboard = Arc::new(DashboardService::new(backend, store.clone()));
    let appearance = Arc::new(AppearanceService::new(store));

    let server = start_server(dashboard, appearance, &settings.listen_host, settings.listen_port)?;
    info!(
        host = %settings.listen_host,
        port = settings.listen_port,
        "Dashboard API listening"
    );

    server.await?;
    Ok(())
}
