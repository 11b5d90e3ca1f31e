//! Gemini `generateContent` client.
//!
//! # Invariants
//! - Without an API key no request is sent.
//! - Every request carries a timeout.

use super::{ExternalServiceError, ItinerarySuggestion, SuggestionClient, SuggestionRequest};
use log::debug;
use serde_json::{json, Value};

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: Option<String>,
    endpoint: String,
    model: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Reads the key from `GEMINI_API_KEY`, then `API_KEY`.
    pub fn from_env() -> Self {
        let api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|value| !value.trim().is_empty());
        Self::new(api_key)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl SuggestionClient for GeminiClient {
    fn request_suggestion(
        &self,
        request: &SuggestionRequest,
    ) -> Result<ItinerarySuggestion, ExternalServiceError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ExternalServiceError::MissingCredential)?;

        debug!(
            "event=suggest_request module=suggest model={} timeout_secs={}",
            self.model, self.timeout_secs
        );
        let response = minreq::post(self.generate_url())
            .with_header("x-goog-api-key", api_key)
            .with_timeout(self.timeout_secs)
            .with_json(&build_request_body(request))?
            .send()?;

        let body = response.as_str()?;
        if !(200..300).contains(&response.status_code) {
            return Err(ExternalServiceError::Status {
                code: response.status_code,
                body: body.chars().take(500).collect(),
            });
        }
        parse_generate_response(body)
    }
}

pub fn prompt_for(request: &SuggestionRequest) -> String {
    format!(
        "Suggest a luxury itinerary for a {} in Egypt for {} guests. \
         Include high-end venues like historical palaces or desert luxury camps. Output as JSON.",
        request.event_kind, request.guest_count
    )
}

/// Request body asking for JSON constrained to the itinerary schema.
pub fn build_request_body(request: &SuggestionRequest) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [{ "text": prompt_for(request) }]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": {
                "type": "OBJECT",
                "properties": {
                    "themeName": { "type": "STRING" },
                    "venue": { "type": "STRING" },
                    "itinerary": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "time": { "type": "STRING" },
                                "activity": { "type": "STRING" },
                                "description": { "type": "STRING" }
                            }
                        }
                    }
                },
                "required": ["themeName", "venue", "itinerary"]
            }
        }
    })
}

/// Extracts the itinerary from a `generateContent` response body.
pub fn parse_generate_response(body: &str) -> Result<ItinerarySuggestion, ExternalServiceError> {
    let value: Value = serde_json::from_str(body).map_err(ExternalServiceError::Payload)?;
    let parts = value
        .pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .ok_or_else(|| ExternalServiceError::MalformedResponse("no candidate content".to_string()))?;

    let text = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<String>();
    if text.trim().is_empty() {
        return Err(ExternalServiceError::MalformedResponse(
            "candidate has no text".to_string(),
        ));
    }

    serde_json::from_str(strip_code_blocks(&text)).map_err(ExternalServiceError::Payload)
}

/// Strips a surrounding markdown code fence, if any.
fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::suggest;

    fn wrap(text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        })
        .to_string()
    }

    #[test]
    fn parses_candidate_text_as_itinerary() {
        let body = wrap(
            r#"{"themeName":"Pharaoh Nights","venue":"Baron Palace","itinerary":[{"time":"19:00","activity":"Dinner"}]}"#,
        );
        let suggestion = parse_generate_response(&body).unwrap();
        assert_eq!(suggestion.theme_name, "Pharaoh Nights");
        assert_eq!(suggestion.venue, "Baron Palace");
        assert_eq!(suggestion.itinerary.len(), 1);
        assert_eq!(suggestion.itinerary[0].description, "");
    }

    #[test]
    fn fenced_json_is_accepted() {
        let body = wrap("```json\n{\"themeName\":\"a\",\"venue\":\"b\",\"itinerary\":[]}\n```");
        assert_eq!(parse_generate_response(&body).unwrap().theme_name, "a");
    }

    #[test]
    fn missing_required_field_is_a_failure() {
        let body = wrap(r#"{"themeName":"a","itinerary":[]}"#);
        assert!(matches!(
            parse_generate_response(&body),
            Err(ExternalServiceError::Payload(_))
        ));
    }

    #[test]
    fn response_without_candidates_is_malformed() {
        assert!(matches!(
            parse_generate_response(r#"{"promptFeedback":{}}"#),
            Err(ExternalServiceError::MalformedResponse(_))
        ));
    }

    #[test]
    fn request_body_carries_prompt_and_schema() {
        let body = build_request_body(&SuggestionRequest {
            event_kind: "Wedding".to_string(),
            guest_count: 100,
        });
        let prompt = body
            .pointer("/contents/0/parts/0/text")
            .and_then(Value::as_str)
            .unwrap();
        assert!(prompt.starts_with("Suggest a luxury itinerary for a Wedding in Egypt for 100 guests."));
        assert_eq!(
            body.pointer("/generationConfig/responseSchema/required"),
            Some(&json!(["themeName", "venue", "itinerary"]))
        );
    }

    #[test]
    fn missing_key_yields_none_without_network() {
        let client = GeminiClient::new(Some("   ".to_string()))
            .with_endpoint("http://127.0.0.1:9");
        assert!(!client.has_credential());
        assert!(suggest(&client, "Wedding", 100).is_none());
    }

    #[test]
    fn url_targets_model_generate_content() {
        let client = GeminiClient::new(None).with_endpoint("https://host/v1beta/");
        assert_eq!(
            client.generate_url(),
            "https://host/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }
}
