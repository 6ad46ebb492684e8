use crate::config::Program;
use crate::errors::AppError;
use crate::models::TrackerLog;
use crate::reconcile::{default_log, reconcile};
use chrono::NaiveDate;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/track.json"))
}

/// Reads the persisted log. `None` when the file is missing or unreadable.
///
/// A file that exists but does not parse is moved aside to `*.bak` so the
/// next save cannot overwrite it.
pub async fn load_log(path: &Path) -> Option<TrackerLog> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(log) => Some(log),
            Err(err) => {
                error!("failed to parse data file: {err}");
                let backup = backup_path(path);
                match fs::rename(path, &backup).await {
                    Ok(()) => warn!("kept unreadable data file as {}", backup.display()),
                    Err(err) => error!("failed to back up data file: {err}"),
                }
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read data file: {err}");
            None
        }
    }
}

/// Persisted log reconciled up to `today`, or a fresh default one.
pub async fn load_data(path: &Path, program: &Program, today: NaiveDate) -> TrackerLog {
    let log = match load_log(path).await {
        Some(log) => log,
        None => {
            info!("starting from a fresh log");
            default_log(program, today)
        }
    };
    reconcile(log, program.start_date, today)
}

pub fn backup_path(path: &Path) -> PathBuf {
    path.with_extension("json.bak")
}

/// Writes the full log. The file is replaced atomically via a sibling temp file.
pub async fn persist_data(path: &Path, data: &TrackerLog) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, payload).await?;
    fs::rename(&tmp_path, path).await?;
    Ok(())
}
