use crate::config::Program;
use crate::dates::date_range;
use crate::errors::AppError;
use crate::models::{CellEdit, DailyRecord, RawNumber, TrackerLog};
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Fresh log spanning `program.start_date..=today`, seeded with the starting weight.
pub fn default_log(program: &Program, today: NaiveDate) -> TrackerLog {
    let mut records: Vec<DailyRecord> = date_range(program.start_date, today)
        .into_iter()
        .map(DailyRecord::empty)
        .collect();
    if records.is_empty() {
        records.push(DailyRecord::empty(program.start_date));
    }
    records[0].morning_weight = RawNumber::from(program.start_weight);

    TrackerLog {
        records,
        photos: BTreeMap::new(),
        measurements: BTreeMap::new(),
        last_updated: Utc::now(),
    }
}

/// Ensures one record per day in `[program_start, today]`.
///
/// Existing records are never modified. Missing days get empty records, the
/// sequence is sorted by date, and repeated dates keep their first occurrence.
pub fn reconcile(mut log: TrackerLog, program_start: NaiveDate, today: NaiveDate) -> TrackerLog {
    reconcile_in_place(&mut log, program_start, today);
    log
}

/// Same as [`reconcile`], on a borrowed log. Returns the number of days added.
pub fn reconcile_in_place(log: &mut TrackerLog, program_start: NaiveDate, today: NaiveDate) -> usize {
    let mut seen = HashSet::with_capacity(log.records.len());
    let before = log.records.len();
    log.records.retain(|record| seen.insert(record.date));
    if log.records.len() != before {
        debug!(dropped = before - log.records.len(), "dropped duplicate dates");
    }

    let mut added = 0usize;
    for date in date_range(program_start, today) {
        if !seen.contains(&date) {
            log.records.push(DailyRecord::empty(date));
            added += 1;
        }
    }
    if added > 0 {
        debug!(added, "filled missing days");
    }

    log.records.sort_by_key(|record| record.date);
    added
}

pub fn apply_edit(
    log: &mut TrackerLog,
    date: NaiveDate,
    edit: CellEdit,
) -> Result<DailyRecord, AppError> {
    let record = log
        .records
        .iter_mut()
        .find(|record| record.date == date)
        .ok_or_else(|| AppError::not_found(format!("no record for {date}")))?;

    match edit {
        CellEdit::MorningWeight(value) => record.morning_weight = value,
        CellEdit::Steps(value) => record.steps = value,
        CellEdit::Water(done) => record.water = done,
        CellEdit::Meals(done) => record.meals = done,
        CellEdit::Exercise(done) => record.exercise = done,
        CellEdit::Sleep(done) => record.sleep = done,
        CellEdit::Reward(reward) => record.reward = reward,
        CellEdit::Notes(notes) => record.notes = notes,
    }

    let updated = record.clone();
    log.last_updated = Utc::now();
    Ok(updated)
}

pub fn set_photo(log: &mut TrackerLog, index: u32, reference: String) {
    log.photos.insert(index, reference);
    log.last_updated = Utc::now();
}

pub fn set_measurement(log: &mut TrackerLog, key: String, value: String) {
    log.measurements.insert(key, value);
    log.last_updated = Utc::now();
}

/// Parses an exported document. Rejects anything without a `records` array.
pub fn import_log(text: &str) -> Result<TrackerLog, AppError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| AppError::bad_request(format!("import is not valid JSON: {err}")))?;

    match value.get("records") {
        Some(Value::Array(_)) => {}
        Some(_) => return Err(AppError::bad_request("import field `records` must be an array")),
        None => return Err(AppError::bad_request("import is missing the `records` field")),
    }

    serde_json::from_value(value)
        .map_err(|err| AppError::bad_request(format!("import has malformed content: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn log_with(records: Vec<DailyRecord>) -> TrackerLog {
        TrackerLog {
            records,
            photos: BTreeMap::new(),
            measurements: BTreeMap::new(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn fills_gaps_and_sorts() {
        let start = d(2025, 12, 3);
        let today = d(2025, 12, 8);
        let mut late = DailyRecord::empty(d(2025, 12, 6));
        late.notes = "kept".into();
        let log = log_with(vec![late.clone(), DailyRecord::empty(d(2025, 12, 4))]);

        let reconciled = reconcile(log, start, today);
        let dates: Vec<NaiveDate> = reconciled.records.iter().map(|r| r.date).collect();
        assert_eq!(dates, date_range(start, today));
        assert_eq!(reconciled.record(d(2025, 12, 6)), Some(&late));
    }

    #[test]
    fn reconcile_is_idempotent() {
        let start = d(2025, 12, 3);
        let today = d(2026, 1, 15);
        let mut first = DailyRecord::empty(d(2025, 12, 20));
        first.morning_weight = RawNumber::new("97");
        let once = reconcile(log_with(vec![first]), start, today);
        let twice = reconcile(once.clone(), start, today);
        assert_eq!(once, twice);
    }

    #[test]
    fn in_place_reports_days_added() {
        let start = d(2025, 12, 3);
        let mut log = log_with(vec![DailyRecord::empty(start)]);
        assert_eq!(reconcile_in_place(&mut log, start, d(2025, 12, 5)), 2);
        assert_eq!(reconcile_in_place(&mut log, start, d(2025, 12, 5)), 0);
    }

    #[test]
    fn duplicate_dates_keep_first_entry() {
        let start = d(2025, 12, 3);
        let mut a = DailyRecord::empty(start);
        a.notes = "first".into();
        let mut b = DailyRecord::empty(start);
        b.notes = "second".into();

        let reconciled = reconcile(log_with(vec![a, b]), start, start);
        assert_eq!(reconciled.records.len(), 1);
        assert_eq!(reconciled.records[0].notes, "first");
    }

    #[test]
    fn today_before_start_adds_nothing() {
        let reconciled = reconcile(log_with(vec![]), d(2025, 12, 3), d(2025, 12, 1));
        assert!(reconciled.records.is_empty());
    }

    #[test]
    fn default_log_seeds_first_weight_only() {
        let program = Program::default();
        let log = default_log(&program, d(2025, 12, 10));
        assert_eq!(log.records.len(), 8);
        assert_eq!(log.records[0].weight(), Some(100.0));
        assert!(log.records[1..].iter().all(|r| r.morning_weight.is_absent()));
        assert_eq!(reconcile(log.clone(), program.start_date, d(2025, 12, 10)), log);
    }

    #[test]
    fn default_log_is_never_empty() {
        let program = Program::default();
        let log = default_log(&program, d(2025, 1, 1));
        assert_eq!(log.records.len(), 1);
        assert_eq!(log.records[0].date, program.start_date);
    }

    #[test]
    fn edit_touches_one_field() {
        let program = Program::default();
        let mut log = default_log(&program, d(2025, 12, 5));
        let before = log.records[0].clone();

        let updated = apply_edit(&mut log, d(2025, 12, 3), CellEdit::Steps(RawNumber::new("-5")))
            .unwrap();
        assert_eq!(updated.steps.raw(), "-5");
        assert_eq!(updated.morning_weight, before.morning_weight);
        assert_eq!(log.records[0], updated);

        let err = apply_edit(&mut log, d(2030, 1, 1), CellEdit::Water(true)).unwrap_err();
        assert_eq!(err.status, axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn import_requires_records_array() {
        for bad in ["not json", "{}", r#"{"records": {}}"#, r#"{"records": [{"date": "nope"}]}"#] {
            let err = import_log(bad).unwrap_err();
            assert_eq!(err.status, axum::http::StatusCode::BAD_REQUEST, "{bad}");
        }

        let log = import_log(r#"{"records": [{"date": "2025-12-03", "morningWeight": 99}]}"#)
            .unwrap();
        assert_eq!(log.records[0].weight(), Some(99.0));
        assert!(log.photos.is_empty());
    }

    #[test]
    fn photos_and_measurements_round_trip_through_import() {
        let program = Program::default();
        let mut log = default_log(&program, d(2025, 12, 4));
        set_photo(&mut log, 2, "photos/2.jpg".into());
        set_measurement(&mut log, "waist_0".into(), "92".into());

        let exported = serde_json::to_string(&log).unwrap();
        let imported = import_log(&exported).unwrap();
        assert_eq!(imported.photos.get(&2).map(String::as_str), Some("photos/2.jpg"));
        assert_eq!(imported.measurements.get("waist_0").map(String::as_str), Some("92"));
    }
}
