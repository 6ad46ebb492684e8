//! Program constants and runtime knobs.
//!
//! The program itself (start date, length, weights, reward ladder, quotes)
//! is fixed at build time. Only the data path, port and reconcile interval
//! come from the environment.

use crate::dates::calendar_months;
use crate::models::Period;
use chrono::{Duration, NaiveDate};
use std::env;
use std::time::Duration as StdDuration;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 60 * 60;

const WEEKLY_QUOTES: &[&str] = &[
    "کام جاری رکھو — چھوٹے قدم بڑی کامیابی بناتے ہیں۔",
    "روزانہ ایک بہتر انتخاب، لمبی کامیابی کی کنجی۔",
    "صبر اور مستقل مزاجی کے ساتھ وزن کم کرنا ممکن ہے۔",
    "آج کا عزم کل کی طاقت ہے۔",
    "ایک دن میں تبدیلی نظر نہیں آتی، مگر ہر دن فرق بناتا ہے۔",
    "اپنے آپ کو پہچانو، اور اپنی طاقت کو جگاؤ۔",
    "مستقل مزاجی سے ہر حد پار ہو جاتی ہے۔",
    "صحت دولت سے بڑھ کر ہے — اپنے آپ میں سرمایہ کاری کرو۔",
    "آہستہ مگر پائیدار — یہی کامیابی ہے۔",
    "آج ہی بہتر انتخاب کرو، کل شکریہ کہو گے۔",
    "چھوٹے اہداف بڑے نتائج لاتے ہیں۔",
    "اپنے سفر میں خود کا بہترین دوست بنو۔",
    "ہر پسینہ محنت کا ثبوت ہے — جاری رکھو۔",
    "خود پر یقین رکھو — تم یہ کر سکتے ہو۔",
    "عادتیں بناؤ، نتائج پیچھے آئیں گے۔",
    "آج کی قربانی کل کی کامیابی ہے۔",
    "پانی پیو، چلو، اور صحت مند کھاؤ — سادہ مگر مؤثر۔",
    "ہر دن نیا موقع ہے بہتر بننے کا۔",
];

/// Reward ladder: one milestone every `step_kg` up to `max_kg`.
#[derive(Debug, Clone)]
pub struct MilestoneLadder {
    pub step_kg: u32,
    pub max_kg: u32,
    /// Milestones divisible by this are major.
    pub major_interval_kg: u32,
    pub minor_reward: &'static str,
    pub major_reward: &'static str,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub start_date: NaiveDate,
    pub days: u32,
    pub start_weight: f64,
    pub target_min: f64,
    pub target_max: f64,
    /// Window used for the weekly stats table.
    pub window_days: u32,
    pub ladder: MilestoneLadder,
    pub weekly_quotes: Vec<String>,
    pub periods: Vec<Period>,
}

impl Program {
    /// Last calendar day of the program (inclusive).
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Duration::days(i64::from(self.days.saturating_sub(1)))
    }
}

impl Default for Program {
    fn default() -> Self {
        let start_date = NaiveDate::from_ymd_opt(2025, 12, 3).unwrap_or_default();
        let days = 120;
        let end_date = start_date + Duration::days(days as i64 - 1);
        Self {
            start_date,
            days,
            start_weight: 100.0,
            target_min: 75.0,
            target_max: 80.0,
            window_days: 7,
            ladder: MilestoneLadder {
                step_kg: 2,
                max_kg: 25,
                major_interval_kg: 5,
                minor_reward: "Gol gappa / Ice cream",
                major_reward: "New shirt / Movie / Zinger",
            },
            weekly_quotes: WEEKLY_QUOTES.iter().map(|quote| quote.to_string()).collect(),
            periods: calendar_months(start_date, end_date),
        }
    }
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_reconcile_interval() -> StdDuration {
    let secs = env::var("RECONCILE_INTERVAL_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_RECONCILE_INTERVAL_SECS);
    StdDuration::from_secs(secs)
}
