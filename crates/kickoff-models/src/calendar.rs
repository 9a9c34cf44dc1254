//! Sprint calendar generation.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// One sprint's name and inclusive date window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintWindow {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Back-to-back sprint windows of `length_weeks` starting at `start`.
///
/// Sprints are named `Sprint 1`..`Sprint N`. Each window ends the day
/// before the next one starts.
pub fn sprint_windows(start: NaiveDate, count: u32, length_weeks: u32) -> Vec<SprintWindow> {
    let length_days = u64::from(length_weeks) * 7;
    (0..u64::from(count))
        .filter_map(|i| {
            let sprint_start = start.checked_add_days(Days::new(i * length_days))?;
            let sprint_end = sprint_start
                .checked_add_days(Days::new(length_days))?
                .pred_opt()?;
            Some(SprintWindow {
                name: format!("Sprint {}", i + 1),
                start: sprint_start,
                end: sprint_end,
            })
        })
        .collect()
}
