//! Find a model name the configured key can actually use.

use crate::advisor::GeminiAdvisor;

pub const PROBE_PROMPT: &str = "Say 'OK' if you can read this.";

pub const DEFAULT_CANDIDATES: &[&str] = &[
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash",
    "gemini-flash-latest",
    "models/gemini-1.5-flash",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ProbeOutcome {
    Success { model: String, reply: String },
    Failed { model: String, error: String },
}

/// Try each candidate in order, stopping at the first that answers.
/// The returned list ends with the success, if any.
pub async fn probe_models(base: &GeminiAdvisor, candidates: &[String]) -> Vec<ProbeOutcome> {
    let mut outcomes = Vec::with_capacity(candidates.len());

    for name in candidates {
        let advisor = base.with_model(name);
        tracing::debug!(model = %advisor.model(), "probing");
        match advisor.generate(PROBE_PROMPT).await {
            Ok(reply) => {
                outcomes.push(ProbeOutcome::Success {
                    model: name.clone(),
                    reply: reply.trim().to_string(),
                });
                break;
            }
            Err(e) => outcomes.push(ProbeOutcome::Failed {
                model: name.clone(),
                error: truncate(&e.to_string(), 100),
            }),
        }
    }

    outcomes
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("abc", 100), "abc");
        assert_eq!(truncate("€€€€", 2), "€€");
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let base = GeminiAdvisor::new("k".into(), "http://127.0.0.1:9".into(), "x");
        assert!(probe_models(&base, &[]).await.is_empty());
    }
}
