mod bootstrap;
mod summary;

use anyhow::Result;
use meteo_core::settings::Settings;
use meteo_data::pipeline::{ingest_archives, IngestOptions};

fn main() -> Result<()> {
    let settings = Settings::load();

    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("Meteo ingest v{} starting", env!("CARGO_PKG_VERSION"));

    let data_dir = settings.resolved_data_dir();
    let options = IngestOptions {
        limits: settings.ingest_limits()?,
        policy: settings.decode_error_policy(),
        timezone: settings.timezone.clone(),
    };
    tracing::info!(
        "Data dir: {}, Limits: {} records / {} files, On decode error: {:?}, Timezone: {}",
        data_dir.display(),
        options.limits.max_records,
        options.limits.max_files,
        options.policy,
        options.timezone
    );

    let outcome = ingest_archives(&data_dir, &options)?;

    print!("{}", summary::render(&outcome));
    Ok(())
}
