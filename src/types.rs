use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// One decoded telemetry snapshot as emitted by the simulation in JSON mode.
/// Every field is optional on the wire; absent keys fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    pub driver_id: u32,
    pub driver_name: String,
    pub current_lap: u32,
    pub race_position: Option<u32>, // None renders as "?" and never counts as top-5
    pub sector: u32,
    pub tire_wear_percent: f64,
    pub speed_kmh: f64,
    pub throttle: f64, // 0..1
    pub brake: f64,    // 0..1
    pub is_pitting: PitFlag,
    // driver profile scores, 0..1
    pub aggression: f64,
    pub tire_management: f64,
    pub consistency: f64,
    pub optimal_pit_lap: Option<i64>, // rendered as sent, negative included
}

impl Default for TelemetryFrame {
    fn default() -> Self {
        Self {
            driver_id: 0,
            driver_name: "Unknown".to_string(),
            current_lap: 0,
            race_position: None,
            sector: 1,
            tire_wear_percent: 0.0,
            speed_kmh: 0.0,
            throttle: 0.0,
            brake: 0.0,
            is_pitting: PitFlag::default(),
            aggression: 0.5,
            tire_management: 0.5,
            consistency: 0.5,
            optimal_pit_lap: None,
        }
    }
}

impl TelemetryFrame {
    /// Decode one input line. Only the outer shape is enforced: anything that
    /// is not a JSON object yields `None`.
    pub fn from_json_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if !line.starts_with('{') {
            return None;
        }
        match serde_json::from_str::<Value>(line).ok()? {
            Value::Object(map) => Some(Self::from_map(&map)),
            _ => None,
        }
    }

    /// Build a frame from a decoded object. A key that is absent, null or of
    /// an unusable type keeps its default; any JSON number fills a numeric field.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let d = Self::default();
        Self {
            driver_id: read_u32(map, "driver_id").unwrap_or(d.driver_id),
            driver_name: map.get("driver_name").and_then(text).unwrap_or(d.driver_name),
            current_lap: read_u32(map, "current_lap").unwrap_or(d.current_lap),
            race_position: read_u32(map, "race_position"),
            sector: read_u32(map, "sector").unwrap_or(d.sector),
            tire_wear_percent: read_f64(map, "tire_wear_percent").unwrap_or(d.tire_wear_percent),
            speed_kmh: read_f64(map, "speed_kmh").unwrap_or(d.speed_kmh),
            throttle: read_f64(map, "throttle").unwrap_or(d.throttle),
            brake: read_f64(map, "brake").unwrap_or(d.brake),
            is_pitting: map.get("is_pitting").and_then(pit_flag).unwrap_or(d.is_pitting),
            aggression: read_f64(map, "aggression").unwrap_or(d.aggression),
            tire_management: read_f64(map, "tire_management").unwrap_or(d.tire_management),
            consistency: read_f64(map, "consistency").unwrap_or(d.consistency),
            optimal_pit_lap: map.get("optimal_pit_lap").and_then(whole_number),
        }
    }

    /// Position as text: `"3"` or `"?"` when unknown.
    pub fn position_label(&self) -> String {
        self.race_position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "?".to_string())
    }
}

fn read_f64(map: &Map<String, Value>, key: &str) -> Option<f64> {
    map.get(key)?.as_f64()
}

/// Integral part of any JSON number (`2.0` -> 2). Casts saturate.
fn whole_number(value: &Value) -> Option<i64> {
    match value.as_i64() {
        Some(n) => Some(n),
        None => value.as_f64().map(|f| f.trunc() as i64),
    }
}

/// Counters such as laps and ids; negative values are unusable.
fn read_u32(map: &Map<String, Value>, key: &str) -> Option<u32> {
    whole_number(map.get(key)?).and_then(|n| u32::try_from(n).ok())
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn pit_flag(value: &Value) -> Option<PitFlag> {
    match value {
        Value::Bool(b) => Some(PitFlag::Bool(*b)),
        other => text(other).map(PitFlag::Text),
    }
}

/// The simulation writes `true`/`false`; hand-written frames often quote it.
#[derive(Debug, Clone, PartialEq)]
pub enum PitFlag {
    Bool(bool),
    Text(String),
}

impl Default for PitFlag {
    fn default() -> Self {
        PitFlag::Bool(false)
    }
}

impl fmt::Display for PitFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitFlag::Bool(b) => write!(f, "{}", b),
            PitFlag::Text(s) => f.write_str(s),
        }
    }
}

/// Fixed race-wide parameters, set once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceContext {
    pub total_laps: u32,
    pub safety_car_prob: f64,
    pub overtaking_difficulty: f64,
}

impl Default for RaceContext {
    fn default() -> Self {
        Self {
            total_laps: 52,
            safety_car_prob: 0.01,
            overtaking_difficulty: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Anything else the model wrote, kept verbatim.
    Other(String),
}

impl RiskLevel {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        match text.to_ascii_uppercase().as_str() {
            "LOW" => RiskLevel::Low,
            "MEDIUM" => RiskLevel::Medium,
            "HIGH" => RiskLevel::High,
            _ => RiskLevel::Other(text.to_string()),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => f.write_str("LOW"),
            RiskLevel::Medium => f.write_str("MEDIUM"),
            RiskLevel::High => f.write_str("HIGH"),
            RiskLevel::Other(s) => f.write_str(s),
        }
    }
}

/// A race engineer's strategic recommendation.
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyCall {
    pub radio_message: String,
    pub reasoning: String,
    pub alternatives: [String; 3],
    pub risk_level: RiskLevel,
    pub confidence: f64, // nominally 0..1, not clamped
}
