use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A numeric cell exactly as the user typed it.
///
/// Blank input means "no data". Anything that does not parse to a finite
/// number is kept verbatim but never reaches an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawNumber(String);

impl RawNumber {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn absent() -> Self {
        Self::default()
    }

    pub fn raw(&self) -> &str {
        &self.0
    }

    pub fn is_absent(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn value(&self) -> Option<f64> {
        let trimmed = self.0.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
    }
}

impl From<f64> for RawNumber {
    fn from(value: f64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for RawNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Numbers go back out as JSON numbers only when that loses nothing.
        if let Ok(int) = self.0.parse::<i64>() {
            if int.to_string() == self.0 {
                return serializer.serialize_i64(int);
            }
        }
        match self.value() {
            Some(value) if value.fract() != 0.0 && value.to_string() == self.0 => {
                serializer.serialize_f64(value)
            }
            _ => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RawNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::absent()),
            Value::Number(number) => Ok(Self(number.to_string())),
            Value::String(raw) => Ok(Self(raw)),
            other => Err(serde::de::Error::custom(format!(
                "expected a number or string, got {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reward {
    Yes,
    #[default]
    No,
}

impl Serialize for Reward {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Reward::Yes => "Y",
            Reward::No => "N",
        })
    }
}

impl<'de> Deserialize<'de> for Reward {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        if raw.trim().to_ascii_uppercase().starts_with('Y') {
            Ok(Reward::Yes)
        } else {
            Ok(Reward::No)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub morning_weight: RawNumber,
    #[serde(default)]
    pub steps: RawNumber,
    #[serde(default)]
    pub water: bool,
    #[serde(default)]
    pub meals: bool,
    #[serde(default)]
    pub exercise: bool,
    #[serde(default)]
    pub sleep: bool,
    #[serde(default)]
    pub reward: Reward,
    #[serde(default)]
    pub notes: String,
}

impl DailyRecord {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            morning_weight: RawNumber::absent(),
            steps: RawNumber::absent(),
            water: false,
            meals: false,
            exercise: false,
            sleep: false,
            reward: Reward::No,
            notes: String::new(),
        }
    }

    /// Weight in kg when it was entered and is positive.
    pub fn weight(&self) -> Option<f64> {
        self.morning_weight.value().filter(|weight| *weight > 0.0)
    }

    /// Step count when it was entered as a non-negative whole number.
    pub fn step_count(&self) -> Option<u64> {
        self.steps
            .value()
            .filter(|steps| *steps >= 0.0 && steps.fract() == 0.0)
            .map(|steps| steps as u64)
    }

    pub fn habits_done(&self) -> u32 {
        [self.water, self.meals, self.exercise, self.sleep]
            .into_iter()
            .filter(|done| *done)
            .count() as u32
    }
}

/// The whole tracker document, as persisted and as exchanged by import/export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerLog {
    pub records: Vec<DailyRecord>,
    #[serde(default)]
    pub photos: BTreeMap<u32, String>,
    #[serde(default)]
    pub measurements: BTreeMap<String, String>,
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
}

impl TrackerLog {
    pub fn record(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.iter().find(|record| record.date == date)
    }
}

/// One field of one record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum CellEdit {
    MorningWeight(RawNumber),
    Steps(RawNumber),
    Water(bool),
    Meals(bool),
    Exercise(bool),
    Sleep(bool),
    Reward(Reward),
    Notes(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct PhotoRequest {
    pub reference: String,
}

#[derive(Debug, Deserialize)]
pub struct MeasurementRequest {
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_weight: Option<f64>,
    pub end_weight: Option<f64>,
    pub change: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowStat {
    pub window: usize,
    pub record_count: usize,
    pub start_weight: Option<f64>,
    pub end_weight: Option<f64>,
    pub change: Option<f64>,
    pub completion_pct: f64,
    pub total_steps: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MilestoneKind {
    Minor,
    Major,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Milestone {
    pub kg: u32,
    pub kind: MilestoneKind,
    pub suggestion: String,
    pub achieved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub weight: f64,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub date: NaiveDate,
    pub program_day: u32,
    pub program_days: u32,
    pub start_weight: f64,
    pub current_weight: f64,
    pub total_lost: f64,
    pub target_min: f64,
    pub target_max: f64,
    pub remaining_to_target: f64,
    pub weekly_quote: Option<String>,
    pub monthly: Vec<PeriodSummary>,
    pub weekly: Vec<WindowStat>,
    pub rewards: Vec<Milestone>,
    pub chart: Vec<ChartPoint>,
}

/// Mutation result. A failed save still returns the applied change.
#[derive(Debug, Serialize)]
pub struct Saved<T> {
    pub data: T,
    pub saved: bool,
    pub notice: Option<String>,
}
