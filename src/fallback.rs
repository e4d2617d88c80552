use crate::types::{RiskLevel, StrategyCall, TelemetryFrame};

pub const CRITICAL_WEAR: f64 = 75.0;
pub const SEVERE_WEAR: f64 = 85.0;
pub const PIT_WINDOW_WEAR: f64 = 60.0;

/// Rule-based recommendation used in mock mode and whenever the remote
/// advisor fails. Depends only on tire wear and the current lap.
pub fn recommend(frame: &TelemetryFrame) -> StrategyCall {
    let wear = frame.tire_wear_percent;

    if wear > CRITICAL_WEAR {
        StrategyCall {
            radio_message: "Box this lap, box this lap. Tires critical.".to_string(),
            reasoning: format!(
                "Tire wear at {:.0}%, pit now to avoid catastrophic degradation",
                wear
            ),
            alternatives: [
                "Pit now: Fresh tires, rejoin P5-P6, strong pace to end".to_string(),
                "Stay out 1 more lap: Risk tire failure, potential track position".to_string(),
                "Go long: Gamble on safety car, high risk strategy".to_string(),
            ],
            risk_level: if wear > SEVERE_WEAR {
                RiskLevel::High
            } else {
                RiskLevel::Medium
            },
            confidence: 0.85,
        }
    } else if wear > PIT_WINDOW_WEAR {
        StrategyCall {
            radio_message: "Approaching pit window. Prepare for undercut.".to_string(),
            reasoning: format!(
                "Optimal pit window opening, lap {}. Tire wear {:.0}%. Monitor competitors.",
                frame.current_lap, wear
            ),
            alternatives: [
                "Pit in 2 laps: Standard timing, safe strategy".to_string(),
                "Undercut now: Jump cars ahead, aggressive play".to_string(),
                "Overcut: Stay out, hope for clear air advantage".to_string(),
            ],
            risk_level: RiskLevel::Medium,
            confidence: 0.75,
        }
    } else {
        StrategyCall {
            radio_message: "Pace is good. Push now, manage delta.".to_string(),
            reasoning: format!(
                "Tire condition strong at {:.0}% wear on lap {}, focus on building gap or closing",
                wear, frame.current_lap
            ),
            alternatives: [
                "Push mode: Build gap, manage tire temps".to_string(),
                "Conservation: Extend stint, late pit advantage".to_string(),
                "Attack mode: Prepare overtake, use ERS wisely".to_string(),
            ],
            risk_level: RiskLevel::Low,
            confidence: 0.8,
        }
    }
}
