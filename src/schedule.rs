use serde::{Deserialize, Serialize};

/// Event time schedules handed to the simulation engine. Event generation
/// itself happens on the engine side; these are descriptions only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Schedule {
    /// Poisson point process with rate `freq` (kHz) starting at `tstart` (ms).
    Poisson { tstart: f64, freq: f64, seed: u64 },
    Regular { tstart: f64, dt: f64 },
    Explicit { times: Vec<f64> },
}

impl Schedule {
    pub fn poisson(tstart: f64, freq: f64, seed: u64) -> Self {
        Schedule::Poisson { tstart, freq, seed }
    }

    pub fn regular(dt: f64) -> Self {
        Schedule::Regular { tstart: 0.0, dt }
    }

    pub fn explicit(times: &[f64]) -> Self {
        Schedule::Explicit {
            times: times.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGenerator {
    pub target: String,
    pub weight: f64,
    pub schedule: Schedule,
}

impl EventGenerator {
    pub fn new(target: impl Into<String>, weight: f64, schedule: Schedule) -> Self {
        Self {
            target: target.into(),
            weight,
            schedule,
        }
    }
}
