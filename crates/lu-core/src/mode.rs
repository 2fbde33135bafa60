//! Travel modes and time-of-day periods.

use serde::{Deserialize, Serialize};

/// Means of travel for which travel times are produced.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Car,
    Transit,
    Walk,
    Bike,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Car, Mode::Transit, Mode::Walk, Mode::Bike];

    /// Human-readable label, useful for CSV column values.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Car     => "car",
            Mode::Transit => "transit",
            Mode::Walk    => "walk",
            Mode::Bike    => "bike",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-of-day bucket.  Peak periods carry congestion; off-peak is free flow.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Period {
    Peak,
    OffPeak,
}

/// Morning and evening peak windows, seconds after midnight, `[start, end)`.
const PEAK_WINDOWS: [(u32, u32); 2] = [(6 * 3_600, 9 * 3_600), (16 * 3_600, 19 * 3_600)];

impl Period {
    /// Classify a departure time given in seconds after midnight.  Values past
    /// one day wrap.
    pub fn from_seconds(seconds_after_midnight: u32) -> Period {
        let t = seconds_after_midnight % 86_400;
        if PEAK_WINDOWS.iter().any(|&(start, end)| t >= start && t < end) {
            Period::Peak
        } else {
            Period::OffPeak
        }
    }
}
