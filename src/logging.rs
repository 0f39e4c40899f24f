use std::{fs, sync::Arc};

use color_eyre::eyre::{Context, Result};
use directories::ProjectDirs;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const LOG_ENV: &str = "STOCKMATE_LOG";

/// Installs the tracing subscriber. The TUI owns stderr, so logs go to a file
/// under the platform data dir; `STOCKMATE_LOG` overrides the `-v` filter.
pub fn init(verbosity: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(spec) => EnvFilter::new(spec),
        Err(_) => match verbosity {
            0 => EnvFilter::new("stockmate=warn"),
            1 => EnvFilter::new("stockmate=debug"),
            _ => EnvFilter::new("trace"),
        },
    };

    let Some(dirs) = ProjectDirs::from("", "", "stockmate") else {
        // No home directory; run silent rather than fight the terminal.
        return Ok(());
    };
    let log_dir = dirs.data_local_dir();
    fs::create_dir_all(log_dir)
        .wrap_err_with(|| format!("Failed to create log dir {}", log_dir.display()))?;
    let log_path = log_dir.join("stockmate.log");
    let file = fs::File::options()
        .create(true)
        .append(true)
        .open(&log_path)
        .wrap_err_with(|| format!("Failed to open log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
