//! Heuristic best-alternative scorer.
//!
//! Scores every candidate location from a fresh snapshot and recommends the
//! one with the best combination of free capacity and short wait, but only
//! when switching away from the busiest candidate saves a meaningful amount
//! of time. Nothing is cached between snapshots.

use crate::status::{classify, occupancy_percent};
use crate::types::LocationId;

/// Minimum wait-time gap (minutes) between the busiest and the recommended
/// location before a suggestion is worth surfacing.
pub const MIN_TIME_SAVED_MINS: i32 = 5;

/// Wait-time scale (minutes) used to weight waits against free capacity.
const WAIT_SCALE_MINS: f64 = 30.0;

/// Per-location inputs to the scorer, taken from a live snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationStats {
    pub id: LocationId,
    pub name: String,
    pub current_occupancy: i32,
    pub max_capacity: i32,
    pub avg_wait_time_mins: i32,
}

/// A recommendation produced by [`suggest`].
#[derive(Debug, Clone, serde::Serialize)]
pub struct Suggestion {
    pub message: String,
    pub location_id: LocationId,
    pub location_name: String,
    /// Estimated minutes saved versus the busiest candidate.
    pub time_saved_mins: i32,
}

/// Composite desirability score: free capacity and short waits both help,
/// each weighted equally.
fn score(stats: &LocationStats) -> f64 {
    let percent = occupancy_percent(stats.current_occupancy, stats.max_capacity);
    ((100.0 - percent) + (WAIT_SCALE_MINS - stats.avg_wait_time_mins as f64)) / 2.0
}

/// Recommend the best alternative location, or `None` when no candidate is
/// worth suggesting.
///
/// `exclude` removes the caller's current location from the candidate set
/// (both for the best and the worst pick). Returns `None` when fewer than
/// two candidates remain or the best-versus-worst wait gap is at most
/// [`MIN_TIME_SAVED_MINS`].
pub fn suggest(locations: &[LocationStats], exclude: Option<&str>) -> Option<Suggestion> {
    let candidates: Vec<&LocationStats> = locations
        .iter()
        .filter(|l| exclude != Some(l.id.as_str()))
        .collect();

    let best = candidates
        .iter()
        .copied()
        .max_by(|a, b| score(a).total_cmp(&score(b)))?;

    let worst = candidates.iter().copied().max_by(|a, b| {
        occupancy_percent(a.current_occupancy, a.max_capacity)
            .total_cmp(&occupancy_percent(b.current_occupancy, b.max_capacity))
    })?;

    let time_saved_mins = worst.avg_wait_time_mins - best.avg_wait_time_mins;
    if time_saved_mins <= MIN_TIME_SAVED_MINS {
        return None;
    }

    let tier = classify(best.current_occupancy, best.max_capacity);
    Some(Suggestion {
        message: format!(
            "{} is currently {}. Head there to save {} mins!",
            best.name,
            tier.crowd_label(),
            time_saved_mins
        ),
        location_id: best.id.clone(),
        location_name: best.name.clone(),
        time_saved_mins,
    })
}
