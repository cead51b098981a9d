use std::sync::OnceLock;

use regex::Regex;

use super::{parse_digits, ParseError};

static REPS_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn reps_pattern() -> Option<&'static Regex> {
    REPS_PATTERN
        .get_or_init(|| Regex::new(r"^([0-9]+\s*,\s*)*[0-9]+$").ok())
        .as_ref()
}

/// Comma-separated digit runs, whitespace allowed around the commas.
/// Blank input is not valid.
pub fn validate_reps_text(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && reps_pattern().is_some_and(|re| re.is_match(trimmed))
}

pub fn parse_reps_text(text: &str) -> Result<Vec<u32>, ParseError> {
    text.split(',')
        .map(|segment| {
            parse_digits(segment.trim()).ok_or_else(|| ParseError::Reps(text.to_string()))
        })
        .collect()
}

/// Where one exercise's reps entry stands in the logging flow.
///
/// Every edit re-evaluates the entry with [`RepsState::from_input`]. Only a
/// `Valid` entry can be submitted, and a submitted entry stays submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepsState {
    Empty,
    Valid(Vec<u32>),
    Invalid(String),
    Submitted(Vec<u32>),
}

impl RepsState {
    pub fn from_input(text: &str) -> Self {
        if text.trim().is_empty() {
            return RepsState::Empty;
        }
        if !validate_reps_text(text) {
            return RepsState::Invalid(text.to_string());
        }
        match parse_reps_text(text) {
            Ok(reps) => RepsState::Valid(reps),
            Err(_) => RepsState::Invalid(text.to_string()),
        }
    }

    /// Hands out the reps to write and moves to `Submitted`.
    /// Returns `None`, leaving the state untouched, for anything but `Valid`.
    pub fn submit(&mut self) -> Option<Vec<u32>> {
        match self {
            RepsState::Valid(reps) => {
                let reps = std::mem::take(reps);
                *self = RepsState::Submitted(reps.clone());
                Some(reps)
            }
            _ => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, RepsState::Valid(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RepsState::Empty => "empty",
            RepsState::Valid(_) => "valid",
            RepsState::Invalid(_) => "invalid",
            RepsState::Submitted(_) => "submitted",
        }
    }
}
