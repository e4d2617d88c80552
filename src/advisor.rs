//! Sources of strategy calls.
//!
//! The engineer is generic over [`Advisor`]; the mode is chosen once at
//! startup. [`MockAdvisor`] never leaves the process, [`GeminiAdvisor`] sends
//! one prompt per call to the Gemini `generateContent` endpoint.

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::AdvisorSettings;
use crate::error::RemoteError;
use crate::types::{RaceContext, StrategyCall, TelemetryFrame};
use crate::{fallback, parser, prompt};

#[allow(async_fn_in_trait)]
pub trait Advisor {
    /// Short name for logs, e.g. the model.
    fn label(&self) -> &str;

    /// Whether `advise` talks to a remote service (and counts as an API call).
    fn is_remote(&self) -> bool;

    async fn advise(
        &self,
        frame: &TelemetryFrame,
        context: &RaceContext,
    ) -> Result<StrategyCall, RemoteError>;
}

/// Deterministic rule-based advisor used without credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct MockAdvisor;

impl Advisor for MockAdvisor {
    fn label(&self) -> &str {
        "mock"
    }

    fn is_remote(&self) -> bool {
        false
    }

    async fn advise(
        &self,
        frame: &TelemetryFrame,
        _context: &RaceContext,
    ) -> Result<StrategyCall, RemoteError> {
        Ok(fallback::recommend(frame))
    }
}

/// Single-shot client for the Gemini text-generation API.
pub struct GeminiAdvisor {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiAdvisor {
    pub fn new(api_key: String, api_base: String, model: &str) -> Self {
        Self {
            client: Client::new(),
            api_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            model: normalize_model(model),
        }
    }

    /// `None` when the settings carry no usable key.
    pub fn from_settings(settings: &AdvisorSettings) -> Option<Self> {
        if settings.is_mock() {
            return None;
        }
        let key = settings.api_key.clone()?;
        Some(Self::new(key, settings.api_base.clone(), &settings.model))
    }

    /// Same credentials and endpoint, different model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            client: self.client.clone(),
            api_key: self.api_key.clone(),
            api_base: self.api_base.clone(),
            model: normalize_model(model),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.api_base, self.model)
    }

    /// Send one prompt and return the reply text. No retries.
    pub async fn generate(&self, prompt: &str) -> Result<String, RemoteError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::from_status(status.as_u16(), body, &self.model));
        }

        let reply: GenerateResponse = response.json().await?;
        reply.text().ok_or(RemoteError::EmptyResponse)
    }
}

impl Advisor for GeminiAdvisor {
    fn label(&self) -> &str {
        &self.model
    }

    fn is_remote(&self) -> bool {
        true
    }

    async fn advise(
        &self,
        frame: &TelemetryFrame,
        context: &RaceContext,
    ) -> Result<StrategyCall, RemoteError> {
        let prompt = prompt::build_prompt(frame, context);
        let text = self.generate(&prompt).await?;
        tracing::debug!(model = %self.model, chars = text.len(), "advice received");
        Ok(parser::parse(&text))
    }
}

/// Gemini addresses models as `models/<name>`; accept bare names too.
pub fn normalize_model(model: &str) -> String {
    let model = model.trim();
    if model.contains('/') {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

// ---------- Wire types ----------

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_model() {
        assert_eq!(normalize_model("gemini-1.5-flash"), "models/gemini-1.5-flash");
        assert_eq!(
            normalize_model("models/gemini-3-flash-preview"),
            "models/gemini-3-flash-preview"
        );
        assert_eq!(normalize_model("tunedModels/pitwall"), "tunedModels/pitwall");
    }

    #[test]
    fn test_endpoint() {
        let advisor = GeminiAdvisor::new(
            "key".into(),
            "https://generativelanguage.googleapis.com/v1beta/".into(),
            "gemini-flash-latest",
        );
        assert_eq!(
            advisor.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-flash-latest:generateContent"
        );
        assert_eq!(advisor.with_model("gemini-1.5-flash").model(), "models/gemini-1.5-flash");
    }

    #[test]
    fn test_from_settings_requires_key() {
        let mut settings = AdvisorSettings {
            api_key: None,
            model: "gemini-1.5-flash".into(),
            api_base: "http://localhost".into(),
        };
        assert!(GeminiAdvisor::from_settings(&settings).is_none());
        settings.api_key = Some("AIza-test".into());
        let advisor = GeminiAdvisor::from_settings(&settings).unwrap();
        assert!(advisor.is_remote());
        assert_eq!(advisor.label(), "models/gemini-1.5-flash");
    }

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hello".into()),
                }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({"contents":[{"parts":[{"text":"hello"}]}]})
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"RADIO: Box\n"},{"text":"RISK: LOW"}]},"finishReason":"STOP"}]}"#;
        let reply: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(reply.text().as_deref(), Some("RADIO: Box\nRISK: LOW"));
    }

    #[test]
    fn test_response_without_candidates() {
        let reply: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(reply.text().is_none());
    }

    #[tokio::test]
    async fn test_mock_advisor_uses_fallback() {
        let frame = TelemetryFrame {
            tire_wear_percent: 90.0,
            ..TelemetryFrame::default()
        };
        let call = MockAdvisor
            .advise(&frame, &RaceContext::default())
            .await
            .unwrap();
        assert_eq!(call, fallback::recommend(&frame));
        assert!(!MockAdvisor.is_remote());
    }
}
