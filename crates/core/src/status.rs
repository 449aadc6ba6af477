//! Occupancy-ratio status classification.
//!
//! Status is derived, never stored: every read recomputes the tier from the
//! raw occupancy and capacity so a stale cached value can never win.

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Occupancy percentage below which a location is considered safe.
pub const SAFE_BELOW_PERCENT: f64 = 50.0;
/// Occupancy percentage below which a location is considered busy
/// (at or above this it is crowded).
pub const BUSY_BELOW_PERCENT: f64 = 80.0;

// ---------------------------------------------------------------------------
// Status tier
// ---------------------------------------------------------------------------

/// Crowding tier derived from the occupancy ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusTier {
    Safe,
    Busy,
    Crowded,
}

impl StatusTier {
    /// Wording used in suggestion messages.
    pub fn crowd_label(self) -> &'static str {
        match self {
            Self::Safe => "empty",
            Self::Busy | Self::Crowded => "less crowded",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Busy => "busy",
            Self::Crowded => "crowded",
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Occupancy ratio as a percentage of capacity.
///
/// A non-positive capacity yields 100% so malformed rows surface as crowded
/// rather than inviting everyone in.
pub fn occupancy_percent(occupancy: i32, capacity: i32) -> f64 {
    if capacity <= 0 {
        return 100.0;
    }
    occupancy as f64 / capacity as f64 * 100.0
}

/// Classify raw occupancy/capacity into a [`StatusTier`].
///
/// < 50% safe, < 80% busy, otherwise crowded.
pub fn classify(occupancy: i32, capacity: i32) -> StatusTier {
    let percent = occupancy_percent(occupancy, capacity);
    if percent < SAFE_BELOW_PERCENT {
        StatusTier::Safe
    } else if percent < BUSY_BELOW_PERCENT {
        StatusTier::Busy
    } else {
        StatusTier::Crowded
    }
}
