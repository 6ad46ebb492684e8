use crate::config::{MilestoneLadder, Program};
use crate::dates::{today, weeks_since};
use crate::models::{
    ChartPoint, DailyRecord, Milestone, MilestoneKind, Period, PeriodSummary, SummaryResponse,
    TrackerLog, WindowStat,
};
use chrono::NaiveDate;

pub fn build_summary(log: &TrackerLog, program: &Program) -> SummaryResponse {
    build_summary_at(today(), log, program)
}

pub fn build_summary_at(today: NaiveDate, log: &TrackerLog, program: &Program) -> SummaryResponse {
    let current = current_weight(log, program.start_weight);
    let lost = total_lost(log, program.start_weight);

    SummaryResponse {
        date: today,
        program_day: program_day(program, today),
        program_days: program.days,
        start_weight: program.start_weight,
        current_weight: current,
        total_lost: lost,
        target_min: program.target_min,
        target_max: program.target_max,
        remaining_to_target: (current - program.target_max).max(0.0),
        weekly_quote: weekly_message(&program.weekly_quotes, program.start_date, today)
            .map(str::to_string),
        monthly: period_summary(log, &program.periods),
        weekly: windowed_stats(log, program.window_days as usize, program.days as usize),
        rewards: milestone_rewards(log, program.start_weight, &program.ladder),
        chart: chart_series(log),
    }
}

/// Most recent positive weight, or `start_weight` when none was logged.
pub fn current_weight(log: &TrackerLog, start_weight: f64) -> f64 {
    log.records
        .iter()
        .rev()
        .find_map(DailyRecord::weight)
        .unwrap_or(start_weight)
}

/// Kilograms lost so far. Gains report as zero.
pub fn total_lost(log: &TrackerLog, start_weight: f64) -> f64 {
    (start_weight - current_weight(log, start_weight)).max(0.0)
}

pub fn period_summary(log: &TrackerLog, periods: &[Period]) -> Vec<PeriodSummary> {
    periods
        .iter()
        .map(|period| {
            let (start_weight, end_weight, change) = weight_span(
                log.records
                    .iter()
                    .filter(|record| record.date >= period.start && record.date <= period.end),
            );
            PeriodSummary {
                label: period.label.clone(),
                start_date: period.start,
                end_date: period.end,
                start_weight,
                end_weight,
                change,
            }
        })
        .collect()
}

/// Splits the first `total_days` records into `window_days`-sized windows.
///
/// The window count is fixed by `total_days`; windows past the end of the
/// log come back with no records.
pub fn windowed_stats(log: &TrackerLog, window_days: usize, total_days: usize) -> Vec<WindowStat> {
    if window_days == 0 {
        return Vec::new();
    }

    let covered = &log.records[..total_days.min(log.records.len())];
    let window_count = total_days.div_ceil(window_days);

    (0..window_count)
        .map(|index| {
            let start = (index * window_days).min(covered.len());
            let end = ((index + 1) * window_days).min(total_days).min(covered.len());
            let records = &covered[start..end];

            let (start_weight, end_weight, change) = weight_span(records.iter());
            let habits: u32 = records.iter().map(DailyRecord::habits_done).sum();
            let completion_pct = if records.is_empty() {
                0.0
            } else {
                round1(f64::from(habits) / (records.len() as f64 * 4.0) * 100.0)
            };
            let total_steps = records.iter().filter_map(DailyRecord::step_count).sum();

            WindowStat {
                window: index + 1,
                record_count: records.len(),
                start_weight,
                end_weight,
                change,
                completion_pct,
                total_steps,
            }
        })
        .collect()
}

pub fn milestone_rewards(
    log: &TrackerLog,
    start_weight: f64,
    ladder: &MilestoneLadder,
) -> Vec<Milestone> {
    if ladder.step_kg == 0 {
        return Vec::new();
    }

    let lost = total_lost(log, start_weight);
    (ladder.step_kg..=ladder.max_kg)
        .step_by(ladder.step_kg as usize)
        .map(|kg| {
            let major = ladder.major_interval_kg != 0 && kg % ladder.major_interval_kg == 0;
            let (kind, suggestion) = if major {
                (MilestoneKind::Major, ladder.major_reward)
            } else {
                (MilestoneKind::Minor, ladder.minor_reward)
            };
            Milestone {
                kg,
                kind,
                suggestion: suggestion.to_string(),
                achieved: lost >= f64::from(kg),
            }
        })
        .collect()
}

/// Message for the current program week; sticks on the last one once the list runs out.
pub fn weekly_message<'a>(
    messages: &'a [String],
    program_start: NaiveDate,
    today: NaiveDate,
) -> Option<&'a str> {
    let last = messages.len().checked_sub(1)?;
    let index = weeks_since(program_start, today).min(last);
    Some(messages[index].as_str())
}

pub fn chart_series(log: &TrackerLog) -> Vec<ChartPoint> {
    log.records
        .iter()
        .filter_map(|record| {
            record.weight().map(|weight| ChartPoint {
                date: record.date,
                weight,
            })
        })
        .collect()
}

/// 1-based day of the program, 0 before it starts, capped at its length.
pub fn program_day(program: &Program, today: NaiveDate) -> u32 {
    let elapsed = (today - program.start_date).num_days();
    if elapsed < 0 {
        0
    } else {
        (elapsed as u64 + 1).min(u64::from(program.days)) as u32
    }
}

fn weight_span<'a>(
    records: impl Iterator<Item = &'a DailyRecord>,
) -> (Option<f64>, Option<f64>, Option<f64>) {
    let mut first = None;
    let mut last = None;
    for weight in records.filter_map(DailyRecord::weight) {
        first.get_or_insert(weight);
        last = Some(weight);
    }
    let change = first.zip(last).map(|(first, last)| first - last);
    (first, last, change)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
