//! Tolerant reader for the labeled reply format requested by the prompt.
//!
//! The reply is scanned line by line against a fixed prefix table. Whatever
//! is missing or garbled is filled from defaults, so parsing cannot fail.

use crate::types::{RiskLevel, StrategyCall};

pub const DEFAULT_RADIO: &str = "Box box, box box";
pub const DEFAULT_REASONING: &str = "Strategy analysis in progress";
pub const DEFAULT_OPTIONS: [&str; 3] = ["Option A", "Option B", "Option C"];
pub const DEFAULT_CONFIDENCE: f64 = 0.7;

#[derive(Default)]
struct Draft {
    radio: Option<String>,
    reasoning: Option<String>,
    options: [Option<String>; 3],
    risk: Option<RiskLevel>,
    confidence: Option<f64>,
}

type Setter = fn(&mut Draft, &str);

const FIELDS: &[(&str, Setter)] = &[
    ("RADIO:", |d: &mut Draft, v: &str| d.radio = Some(v.to_string())),
    ("REASONING:", |d: &mut Draft, v: &str| d.reasoning = Some(v.to_string())),
    ("OPTION_A:", |d: &mut Draft, v: &str| d.options[0] = Some(v.to_string())),
    ("OPTION_B:", |d: &mut Draft, v: &str| d.options[1] = Some(v.to_string())),
    ("OPTION_C:", |d: &mut Draft, v: &str| d.options[2] = Some(v.to_string())),
    ("RISK:", |d: &mut Draft, v: &str| d.risk = Some(RiskLevel::parse(v))),
    ("CONFIDENCE:", |d: &mut Draft, v: &str| {
        d.confidence = Some(parse_confidence(v).unwrap_or(DEFAULT_CONFIDENCE))
    }),
];

/// Parse a free-text model reply into a complete [`StrategyCall`].
/// Labels are case-sensitive and only count at the start of a line; the last
/// occurrence of a label wins.
pub fn parse(text: &str) -> StrategyCall {
    let mut draft = Draft::default();

    for line in text.lines() {
        if let Some((prefix, set)) = FIELDS.iter().find(|(p, _)| line.starts_with(*p)) {
            set(&mut draft, line[prefix.len()..].trim());
        }
    }

    let [a, b, c] = draft.options;
    StrategyCall {
        radio_message: draft.radio.unwrap_or_else(|| DEFAULT_RADIO.to_string()),
        reasoning: draft
            .reasoning
            .unwrap_or_else(|| DEFAULT_REASONING.to_string()),
        alternatives: [
            a.unwrap_or_else(|| DEFAULT_OPTIONS[0].to_string()),
            b.unwrap_or_else(|| DEFAULT_OPTIONS[1].to_string()),
            c.unwrap_or_else(|| DEFAULT_OPTIONS[2].to_string()),
        ],
        risk_level: draft.risk.unwrap_or(RiskLevel::Medium),
        confidence: draft.confidence.unwrap_or(DEFAULT_CONFIDENCE),
    }
}

/// `0.8` reads as 0.8; `80%` reads as 0.8.
fn parse_confidence(value: &str) -> Option<f64> {
    match value.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().ok().map(|p| p / 100.0),
        None => value.parse::<f64>().ok(),
    }
}
