use std::path::PathBuf;

use color_eyre::eyre::{eyre, Result};
use flexi_logger::{FileSpec, Logger, LoggerHandle};

const LOG_FILE_BASENAME: &str = "inkcal";

/// Starts the file logger. Stdout belongs to the terminal UI, so everything
/// goes to a file under the user's data directory. The returned handle must
/// stay alive for the duration of the program.
pub fn init() -> Result<LoggerHandle> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;
    let handle = Logger::try_with_env_or_str("info")
        .map_err(|err| eyre!("invalid log spec: {err}"))?
        .log_to_file(
            FileSpec::default()
                .directory(dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| eyre!("failed to start logger: {err}"))?;
    Ok(handle)
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("inkcal"))
        .unwrap_or_else(|| PathBuf::from("."))
}
