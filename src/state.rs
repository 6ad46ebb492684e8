use crate::config::Program;
use crate::models::TrackerLog;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Shared handle to the one authoritative log.
///
/// Every mutation holds `data` across apply, reconcile and persist, so saves
/// never interleave.
#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub program: Arc<Program>,
    pub data: Arc<Mutex<TrackerLog>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, program: Program, data: TrackerLog) -> Self {
        Self {
            data_path,
            program: Arc::new(program),
            data: Arc::new(Mutex::new(data)),
        }
    }
}
