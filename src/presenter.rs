use crate::types::{StrategyCall, TelemetryFrame};

/// Inner width of the header box, in characters.
const BOX_WIDTH: usize = 62;

/// Render a strategy call as a fixed-layout block for the terminal.
pub fn render(call: &StrategyCall, frame: &TelemetryFrame) -> String {
    let title = format!(
        "  FARVIS RACE ENGINEER - LAP {} - P{} - {}",
        frame.current_lap,
        frame.position_label(),
        frame.driver_name.to_uppercase()
    );
    let pad = BOX_WIDTH.saturating_sub(title.chars().count());
    let rule = "═".repeat(BOX_WIDTH);

    format!(
        "
╔{rule}╗
║{title}{spaces}║
╚{rule}╝

RADIO: \"{radio}\"

REASONING: {reasoning}

STRATEGIC OPTIONS:
   A) {a}
   B) {b}
   C) {c}

RISK: {risk}
CONFIDENCE: {confidence:.0}%

{footer}
",
        spaces = " ".repeat(pad),
        radio = call.radio_message,
        reasoning = call.reasoning,
        a = call.alternatives[0],
        b = call.alternatives[1],
        c = call.alternatives[2],
        risk = call.risk_level,
        confidence = call.confidence * 100.0,
        footer = "═".repeat(BOX_WIDTH + 2),
    )
}
