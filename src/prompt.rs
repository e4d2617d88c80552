use crate::types::{RaceContext, TelemetryFrame};

/// Output contract appended to every prompt. The parser keys on these labels.
const RESPONSE_FORMAT: &str = "\
YOUR TASK:
Provide a strategic recommendation in this EXACT format:

RADIO: [One concise sentence, max 15 words, like real F1 radio]
REASONING: [2-3 sentences explaining the strategy]
OPTION_A: [Primary recommendation with brief rationale]
OPTION_B: [Alternative approach with tradeoff]
OPTION_C: [Conservative backup option]
RISK: [LOW/MEDIUM/HIGH]
CONFIDENCE: [0.0-1.0]

Be decisive, concise, and speak like a real F1 race engineer (not verbose).
";

/// Summarise the current state into a compact request. We send a state
/// summary, never raw high-rate telemetry.
pub fn build_prompt(frame: &TelemetryFrame, context: &RaceContext) -> String {
    let optimal_pit = frame
        .optimal_pit_lap
        .map(|lap| lap.to_string())
        .unwrap_or_else(|| "Unknown".to_string());

    format!(
        "You are FARVIS, an F1 Race Engineer AI providing strategic guidance.

CURRENT RACE STATE:
Driver: {driver}
Lap: {lap}/{total} (Sector {sector})
Position: P{position}
Tire Wear: {wear:.1}%
Speed: {speed:.1} km/h
Throttle: {throttle:.1}%
Brake: {brake:.1}%
In Pits: {pitting}

DRIVER PROFILE:
Aggression: {aggression:.2} (0=conservative, 1=aggressive)
Tire Management: {tire_mgmt:.2}
Consistency: {consistency:.2}

PIT STRATEGY:
Optimal Pit Window: Lap {optimal_pit}

RACE CONTEXT:
Safety Car Probability: {sc_prob:.2}%
Track Overtaking Difficulty: {overtaking:.2}

{RESPONSE_FORMAT}",
        driver = frame.driver_name,
        lap = frame.current_lap,
        total = context.total_laps,
        sector = frame.sector,
        position = frame.position_label(),
        wear = frame.tire_wear_percent,
        speed = frame.speed_kmh,
        throttle = frame.throttle * 100.0,
        brake = frame.brake * 100.0,
        pitting = frame.is_pitting,
        aggression = frame.aggression,
        tire_mgmt = frame.tire_management,
        consistency = frame.consistency,
        sc_prob = context.safety_car_prob * 100.0,
        overtaking = context.overtaking_difficulty,
    )
}
