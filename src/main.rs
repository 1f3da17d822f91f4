use std::sync::Arc;

use anyhow::Result;
use log::{error, info};

use meter_corr::config::Settings;
use meter_corr::server;
use meter_corr::state::AppState;
use meter_corr::telemetry::snapshot_mb;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_env_and_args();
    let addr = settings.bind_addr()?;

    // Load and build before binding: no request is accepted without a matrix.
    let loaded = AppState::load_with_timeout(
        settings.data_path.clone(),
        settings.load_options(),
        settings.series_prefix.clone(),
        settings.startup_timeout(),
    )
    .await;
    let state = match loaded {
        Ok(state) => state,
        Err(e) => {
            // An expired load still occupies a blocking thread that would keep
            // the runtime alive on drop, so leave without unwinding.
            error!("startup failed: {e:#}");
            std::process::exit(1);
        }
    };

    info!(
        "serving {} series ({} samples each), mem {} MB",
        state.series.len(),
        state.samples,
        snapshot_mb()
    );

    server::serve(Arc::new(state), addr).await
}
