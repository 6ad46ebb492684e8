use crate::models::Period;
use chrono::{Datelike, Duration, Local, NaiveDate};

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Every calendar date in `[start, end]`, ascending. Empty when `end < start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|date| *date <= end).collect()
}

/// Whole weeks elapsed since `start`, never negative.
pub fn weeks_since(start: NaiveDate, today: NaiveDate) -> usize {
    let days = (today - start).num_days();
    if days <= 0 { 0 } else { (days / 7) as usize }
}

/// Calendar months touching `[start, end]`, each clipped to that range.
pub fn calendar_months(start: NaiveDate, end: NaiveDate) -> Vec<Period> {
    let mut periods = Vec::new();
    let mut cursor = start;
    while cursor <= end {
        let month_end = last_day_of_month(cursor).min(end);
        periods.push(Period {
            label: cursor.format("%b %Y").to_string(),
            start: cursor,
            end: month_end,
        });
        cursor = month_end + Duration::days(1);
    }
    periods
}

fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|first| first.pred_opt())
        .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn date_range_is_inclusive() {
        let range = date_range(d(2025, 12, 30), d(2026, 1, 2));
        assert_eq!(range, vec![d(2025, 12, 30), d(2025, 12, 31), d(2026, 1, 1), d(2026, 1, 2)]);
        assert!(date_range(d(2026, 1, 2), d(2026, 1, 1)).is_empty());
    }

    #[test]
    fn weeks_since_clamps_before_start() {
        assert_eq!(weeks_since(d(2025, 12, 3), d(2025, 12, 1)), 0);
        assert_eq!(weeks_since(d(2025, 12, 3), d(2025, 12, 9)), 0);
        assert_eq!(weeks_since(d(2025, 12, 3), d(2025, 12, 10)), 1);
    }

    #[test]
    fn february_month_end_respects_leap_years() {
        let months = calendar_months(d(2028, 2, 10), d(2028, 3, 5));
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].end, d(2028, 2, 29));
        assert_eq!(months[1].start, d(2028, 3, 1));
        assert_eq!(months[1].end, d(2028, 3, 5));
    }
}
