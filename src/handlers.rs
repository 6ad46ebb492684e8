use crate::dates::today;
use crate::errors::AppError;
use crate::models::{
    CellEdit, DailyRecord, MeasurementRequest, PhotoRequest, Saved, SummaryResponse, TrackerLog,
};
use crate::reconcile::{
    apply_edit, default_log, import_log, reconcile, reconcile_in_place, set_measurement, set_photo,
};
use crate::state::AppState;
use crate::stats::build_summary_at;
use crate::storage::persist_data;
use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use tracing::{error, info};

const SAVE_FAILED_NOTICE: &str = "Change kept but could not be saved; it will be retried.";

pub async fn list_records(State(state): State<AppState>) -> Json<Vec<DailyRecord>> {
    let mut data = state.data.lock().await;
    catch_up(&state, &mut data, today()).await;
    Json(data.records.clone())
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<DailyRecord>, AppError> {
    let date = today();
    let mut data = state.data.lock().await;
    catch_up(&state, &mut data, date).await;
    data.record(date)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("program has not started yet ({date})")))
}

pub async fn get_summary(State(state): State<AppState>) -> Json<SummaryResponse> {
    let date = today();
    let mut data = state.data.lock().await;
    catch_up(&state, &mut data, date).await;
    Json(build_summary_at(date, &data, &state.program))
}

pub async fn edit_record(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
    Json(edit): Json<CellEdit>,
) -> Result<Json<Saved<DailyRecord>>, AppError> {
    let mut data = state.data.lock().await;
    // Today's row may not exist yet if the day rolled over since the last tick.
    reconcile_in_place(&mut data, state.program.start_date, today());
    let updated = apply_edit(&mut data, date, edit)?;
    info!(%date, "record updated");

    let outcome = persist_data(&state.data_path, &data).await;
    Ok(Json(saved(updated, outcome)))
}

pub async fn put_photo(
    State(state): State<AppState>,
    Path(index): Path<u32>,
    Json(payload): Json<PhotoRequest>,
) -> Json<Saved<BTreeMap<u32, String>>> {
    let mut data = state.data.lock().await;
    set_photo(&mut data, index, payload.reference);
    info!(index, "photo reference stored");

    let outcome = persist_data(&state.data_path, &data).await;
    Json(saved(data.photos.clone(), outcome))
}

pub async fn put_measurement(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(payload): Json<MeasurementRequest>,
) -> Json<Saved<BTreeMap<String, String>>> {
    let mut data = state.data.lock().await;
    set_measurement(&mut data, key, payload.value);

    let outcome = persist_data(&state.data_path, &data).await;
    Json(saved(data.measurements.clone(), outcome))
}

pub async fn export(State(state): State<AppState>) -> impl IntoResponse {
    let mut data = state.data.lock().await;
    catch_up(&state, &mut data, today()).await;
    (
        [(header::CONTENT_DISPOSITION, "attachment; filename=\"track.json\"")],
        Json(data.clone()),
    )
}

/// Replaces the whole log. A rejected document leaves the current log alone.
pub async fn import(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Saved<usize>>, AppError> {
    let imported = import_log(&body)?;
    let imported = reconcile(imported, state.program.start_date, today());

    let mut data = state.data.lock().await;
    *data = imported;
    info!(records = data.records.len(), "log imported");

    let outcome = persist_data(&state.data_path, &data).await;
    Ok(Json(saved(data.records.len(), outcome)))
}

pub async fn reset(State(state): State<AppState>) -> Json<Saved<usize>> {
    let fresh: TrackerLog = default_log(&state.program, today());

    let mut data = state.data.lock().await;
    *data = fresh;
    info!("log reset to defaults");

    let outcome = persist_data(&state.data_path, &data).await;
    Json(saved(data.records.len(), outcome))
}

/// Fills in days missed since the last reconcile and writes them through.
async fn catch_up(state: &AppState, data: &mut TrackerLog, date: NaiveDate) {
    let added = reconcile_in_place(data, state.program.start_date, date);
    if added > 0 {
        if let Err(err) = persist_data(&state.data_path, data).await {
            error!("failed to save reconciled log: {err}");
        }
    }
}

fn saved<T>(data: T, outcome: Result<(), AppError>) -> Saved<T> {
    match outcome {
        Ok(()) => Saved {
            data,
            saved: true,
            notice: None,
        },
        Err(err) => {
            error!("failed to save log: {err}");
            Saved {
                data,
                saved: false,
                notice: Some(SAVE_FAILED_NOTICE.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Program;
    use crate::models::RawNumber;
    use crate::storage::load_log;
    use chrono::Duration;
    use std::path::PathBuf;

    fn unique_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let mut path = std::env::temp_dir();
        path.push(format!("weight_tracker_handlers_{name}_{}_{nanos}.json", std::process::id()));
        path
    }

    fn state_through_yesterday(data_path: PathBuf) -> AppState {
        let program = Program::default();
        let log = default_log(&program, today() - Duration::days(1));
        AppState::new(data_path, program, log)
    }

    #[tokio::test]
    async fn edit_reaches_today_after_day_rollover() {
        let path = unique_path("rollover");
        let state = state_through_yesterday(path.clone());

        let Json(response) = edit_record(
            State(state.clone()),
            Path(today()),
            Json(CellEdit::MorningWeight(RawNumber::new("95"))),
        )
        .await
        .unwrap();

        assert!(response.saved);
        assert_eq!(response.data.date, today());
        assert_eq!(response.data.weight(), Some(95.0));
        let data = state.data.lock().await;
        assert_eq!(data.records.last().map(|r| r.date), Some(today()));
        drop(data);
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn failed_save_still_applies_the_change() {
        let mut path = unique_path("missing_dir");
        path.push("nested/track.json");
        let state = state_through_yesterday(path);
        let start = state.program.start_date;

        let Json(response) = edit_record(
            State(state.clone()),
            Path(start),
            Json(CellEdit::Notes("kept in memory".into())),
        )
        .await
        .unwrap();

        assert!(!response.saved);
        assert!(response.notice.is_some());
        let data = state.data.lock().await;
        assert_eq!(data.record(start).map(|r| r.notes.as_str()), Some("kept in memory"));
    }

    #[tokio::test]
    async fn reads_write_through_newly_added_days() {
        let path = unique_path("read_catch_up");
        let state = state_through_yesterday(path.clone());

        let Json(records) = list_records(State(state)).await;
        assert_eq!(records.last().map(|r| r.date), Some(today()));

        let on_disk = load_log(&path).await.expect("reconciled log written");
        assert_eq!(on_disk.records.last().map(|r| r.date), Some(today()));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
