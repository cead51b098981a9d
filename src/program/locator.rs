use crate::models::{Day, Exercise, ProgramDocument};

use super::{parse_digits, ParseError};

/// Highest week and the last day of that week, by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBounds {
    pub week: u32,
    pub day: u32,
}

/// Parses a `"day-week"` locator such as `"3-2"` or `"Day 3-2"`.
///
/// A single label may precede the numeric pair, separated by whitespace.
pub fn parse_locator(compound: &str) -> Result<(u32, u32), ParseError> {
    let err = || ParseError::Locator(compound.to_string());

    let trimmed = compound.trim();
    let pair = match trimmed.rsplit_once(char::is_whitespace) {
        Some((_label, pair)) => pair,
        None => trimmed,
    };

    let (day, week) = pair.split_once('-').ok_or_else(err)?;
    let day = parse_digits(day).ok_or_else(err)?;
    let week = parse_digits(week).ok_or_else(err)?;
    Ok((day, week))
}

pub fn format_locator(day: u32, week: u32) -> String {
    format!("{}-{}", day, week)
}

/// Exercises of one day, or an empty slice when the document, week, or
/// day isn't there.
pub fn select_exercises(doc: Option<&ProgramDocument>, day: u32, week: u32) -> &[Exercise] {
    doc.and_then(|doc| doc.weeks.iter().find(|w| w.week_number == week))
        .and_then(|w| w.days.iter().find(|d| d.day_number == day))
        .map(|d| d.exercises.as_slice())
        .unwrap_or(&[])
}

/// Positional bounds used to cap day navigation. Assumes the backend sends
/// weeks and days in ascending order.
pub fn select_latest_week_bounds(doc: &ProgramDocument) -> Option<LatestBounds> {
    let week = doc.weeks.last()?;
    let day = week.days.last()?;
    Some(LatestBounds {
        week: week.week_number,
        day: day.day_number,
    })
}

pub fn sorted_week_numbers(doc: &ProgramDocument) -> Vec<u32> {
    let mut weeks: Vec<u32> = doc.weeks.iter().map(|w| w.week_number).collect();
    weeks.sort_unstable();
    weeks.dedup();
    weeks
}

/// Days of `week` ordered by day number.
pub fn sorted_days(doc: &ProgramDocument, week: u32) -> Vec<&Day> {
    let mut days: Vec<&Day> = doc
        .weeks
        .iter()
        .find(|w| w.week_number == week)
        .map(|w| w.days.iter().collect())
        .unwrap_or_default();
    days.sort_by_key(|d| d.day_number);
    days
}

/// The `(day, week)` the client should train next. Falls back to the first
/// session when the backend hasn't set a pointer yet.
pub fn current_locator(doc: &ProgramDocument) -> Option<(u32, u32)> {
    if doc.completed {
        return None;
    }
    let week = doc
        .current_week
        .or_else(|| sorted_week_numbers(doc).first().copied())?;
    let day = doc
        .current_day
        .or_else(|| sorted_days(doc, week).first().map(|d| d.day_number))?;
    Some((day, week))
}
