use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treats a JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let opt: Option<T> = Option::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Keeps the whole-number entries of `actualReps`. Anything else, such as a
/// `null` left behind by an unchecked write, is dropped with a warning so
/// one bad exercise doesn't sink the whole document.
fn lenient_reps<'de, D>(deserializer: D) -> Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    let mut reps = Vec::new();
    for value in raw.unwrap_or_default() {
        match value.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => reps.push(n),
            None => tracing::warn!("Skipping malformed rep entry: {}", value),
        }
    }
    Ok(reps)
}

/// A client's training program as served by the backend.
///
/// Documents are read-only snapshots: handlers fetch them per render and
/// never write them back. `current_week`/`current_day` only mean something
/// while `completed` is false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDocument {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub program_name: String,
    #[serde(default)]
    pub client_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub completed: bool,
    #[serde(default)]
    pub current_week: Option<u32>,
    #[serde(default)]
    pub current_day: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_weeks: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub weeks: Vec<Week>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub week_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub days: Vec<Day>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub day_number: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub exercises: Vec<Exercise>,
}

impl Day {
    /// A day is complete once every exercise has logged reps.
    pub fn is_complete(&self) -> bool {
        self.exercises.iter().all(Exercise::is_logged)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sets: u32,
    /// Target load in pounds.
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub target_reps: TargetReps,
    #[serde(default)]
    pub rest: Option<String>,
    #[serde(default, deserialize_with = "lenient_reps")]
    pub actual_reps: Vec<u32>,
    #[serde(default)]
    pub rpe: Option<f64>,
}

impl Exercise {
    pub fn is_logged(&self) -> bool {
        !self.actual_reps.is_empty()
    }

    pub fn total_reps(&self) -> u64 {
        self.actual_reps.iter().map(|&r| u64::from(r)).sum()
    }
}

/// Programs carry rep targets either as a plain count or as free text
/// such as `"8-12"` or `"AMRAP"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TargetReps {
    Count(u32),
    Text(String),
}

impl Default for TargetReps {
    fn default() -> Self {
        TargetReps::Text(String::new())
    }
}

/// Whole numbers become a count; any other value is kept as text.
impl<'de> Deserialize<'de> for TargetReps {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => match n.as_u64().and_then(|n| u32::try_from(n).ok()) {
                Some(count) => TargetReps::Count(count),
                None => TargetReps::Text(n.to_string()),
            },
            Value::String(text) => TargetReps::Text(text),
            Value::Null => TargetReps::default(),
            other => {
                tracing::warn!("Unexpected rep target: {}", other);
                TargetReps::Text(other.to_string())
            }
        })
    }
}

impl fmt::Display for TargetReps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetReps::Count(n) => write!(f, "{}", n),
            TargetReps::Text(s) => write!(f, "{}", s),
        }
    }
}
