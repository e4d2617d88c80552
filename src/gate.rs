use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use crate::types::TelemetryFrame;

pub const DEFAULT_MIN_CALL_INTERVAL: Duration = Duration::from_secs(15);
pub const TIRE_WARNING_WEAR: f64 = 70.0;
pub const TOP_POSITIONS: u32 = 5;
/// Position assumed when a frame does not carry one.
const UNKNOWN_POSITION: u32 = 99;

/// Process-wide engineer bookkeeping. Owned by one loop, never persisted.
#[derive(Debug)]
pub struct EngineerState {
    pub last_lap_seen: HashMap<u32, u32>,
    /// Drivers that already got the high-wear call. Never cleared.
    pub pit_warning_issued: HashSet<u32>,
    pub last_call: Option<Instant>,
    pub min_call_interval: Duration,
    pub api_calls: u64,
    pub api_errors: u64,
}

impl Default for EngineerState {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CALL_INTERVAL)
    }
}

impl EngineerState {
    pub fn new(min_call_interval: Duration) -> Self {
        Self {
            last_lap_seen: HashMap::new(),
            pit_warning_issued: HashSet::new(),
            last_call: None,
            min_call_interval,
            api_calls: 0,
            api_errors: 0,
        }
    }

    pub fn record_call(&mut self, at: Instant) {
        self.last_call = Some(at);
    }

    fn throttled(&self, now: Instant) -> bool {
        match self.last_call {
            Some(at) => now.saturating_duration_since(at) < self.min_call_interval,
            None => false,
        }
    }
}

/// Decide whether this frame warrants a strategy call right now.
pub fn should_act(frame: &TelemetryFrame, state: &mut EngineerState, force: bool) -> bool {
    should_act_at(frame, state, force, Instant::now())
}

pub fn should_act_at(
    frame: &TelemetryFrame,
    state: &mut EngineerState,
    force: bool,
    now: Instant,
) -> bool {
    if force {
        return true;
    }
    if state.throttled(now) {
        return false;
    }

    let driver = frame.driver_id;

    let last_lap = state.last_lap_seen.get(&driver).copied().unwrap_or(0);
    if frame.current_lap != last_lap {
        state.last_lap_seen.insert(driver, frame.current_lap);
        return true;
    }

    if frame.tire_wear_percent > TIRE_WARNING_WEAR && !state.pit_warning_issued.contains(&driver) {
        state.pit_warning_issued.insert(driver);
        return true;
    }

    // No "already issued" marker here: keeps firing while in the top 5.
    frame.race_position.unwrap_or(UNKNOWN_POSITION) <= TOP_POSITIONS
}
