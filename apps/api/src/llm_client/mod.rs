//! LLM Client — the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the generative-model API
//! directly. All model interactions MUST go through this module.
//!
//! Every operation is strict request/response: the caller declares the output
//! shape and a reply that does not parse is a `GatewayError`, never an
//! empty-but-plausible default.

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// Fast model used for most extraction, generation, and search-grounded calls.
pub const FLASH_MODEL: &str = "gemini-3-flash-preview";
/// Stronger model reserved for identity-sensitive lookups.
pub const PRO_MODEL: &str = "gemini-3-pro-preview";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("model returned empty content")]
    EmptyContent,

    #[error("no model API credential configured")]
    CredentialMissing,
}

impl GatewayError {
    /// Whether this failure points at an invalid, expired, or missing
    /// credential rather than a transient fault. The autopilot uses this to
    /// re-gate its preflight instead of retrying.
    pub fn indicates_credential_failure(&self) -> bool {
        match self {
            GatewayError::CredentialMissing => true,
            GatewayError::Api { status, message } => {
                matches!(status, 401 | 403)
                    || message.contains("Requested entity was not found")
                    || message.contains("API key")
            }
            _ => false,
        }
    }
}

/// A normalized search-grounding citation. Entries without a usable locator
/// are dropped during normalization, never surfaced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceRef {
    pub title: String,
    pub uri: String,
}

/// One prior conversational turn, as submitted by the chat surface.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    fn wire(self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }
}

/// A single model invocation, assembled with the builder methods below.
#[derive(Debug, Clone)]
pub struct ModelCall {
    model: &'static str,
    prompt: String,
    system: Option<String>,
    history: Vec<ChatTurn>,
    grounded: bool,
    json_output: bool,
}

impl ModelCall {
    pub fn new(model: &'static str, prompt: impl Into<String>) -> Self {
        Self {
            model,
            prompt: prompt.into(),
            system: None,
            history: Vec::new(),
            grounded: false,
            json_output: false,
        }
    }

    pub fn with_system(mut self, system: &str) -> Self {
        self.system = Some(system.to_string());
        self
    }

    pub fn with_history(mut self, history: Vec<ChatTurn>) -> Self {
        self.history = history;
        self
    }

    /// Augments the call with live web search; citations come back on the
    /// reply as normalized `SourceRef`s.
    pub fn grounded(mut self) -> Self {
        self.grounded = true;
        self
    }

    /// Constrains the reply to `application/json`.
    pub fn json_output(mut self) -> Self {
        self.json_output = true;
        self
    }
}

/// A completed model reply: the text plus any normalized grounding citations.
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub text: String,
    pub sources: Vec<SourceRef>,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire format
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: EmptyConfig,
}

#[derive(Debug, Serialize)]
struct EmptyConfig {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebSource>,
}

#[derive(Debug, Deserialize)]
struct WebSource {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The single LLM client used by every feature in the service.
/// Wraps the Gemini `generateContent` API with retry logic, grounding
/// normalization, and structured-output helpers.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    /// Whether a credential is configured at all. Absence is the autopilot's
    /// credential-missing preflight state, not an error here.
    pub fn has_credential(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Makes a call to the Gemini API, returning text plus normalized
    /// grounding sources. Retries on 429 (rate limit) and 5xx errors with
    /// exponential backoff.
    pub async fn call(&self, call: &ModelCall) -> Result<ModelReply, GatewayError> {
        if !self.has_credential() {
            return Err(GatewayError::CredentialMissing);
        }

        let request_body = build_request(call);
        let url = format!("{GEMINI_API_BASE}/{}:generateContent", call.model);

        let mut last_error: Option<GatewayError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "model call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .header("content-type", "application/json")
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(GatewayError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("model API returned {}: {}", status, body);
                last_error = Some(GatewayError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                // Try to parse error message
                let message = serde_json::from_str::<GeminiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(GatewayError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let reply: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &reply.usage_metadata {
                debug!(
                    "model call succeeded: prompt_tokens={}, reply_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            let candidate = reply
                .candidates
                .into_iter()
                .next()
                .ok_or(GatewayError::EmptyContent)?;

            let text = candidate
                .content
                .map(|c| {
                    c.parts
                        .into_iter()
                        .filter_map(|p| p.text)
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();

            if text.is_empty() {
                return Err(GatewayError::EmptyContent);
            }

            return Ok(ModelReply {
                text,
                sources: normalize_sources(candidate.grounding_metadata),
            });
        }

        Err(last_error.unwrap_or(GatewayError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }

    /// Convenience method that calls the model and deserializes the text
    /// reply as JSON. The call must instruct the model to return valid JSON.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        call: &ModelCall,
    ) -> Result<T, GatewayError> {
        self.call_json_with_sources(call)
            .await
            .map(|(value, _)| value)
    }

    /// As `call_json`, but also returns the normalized grounding citations —
    /// used by identity-sensitive lookups that pair structured data with the
    /// sources it was derived from.
    pub async fn call_json_with_sources<T: DeserializeOwned>(
        &self,
        call: &ModelCall,
    ) -> Result<(T, Vec<SourceRef>), GatewayError> {
        let reply = self.call(call).await?;

        // Strip markdown code fences if the model wraps JSON in them
        let text = strip_json_fences(&reply.text);

        let value = serde_json::from_str(text).map_err(GatewayError::Parse)?;
        Ok((value, reply.sources))
    }
}

fn build_request(call: &ModelCall) -> GenerateContentRequest {
    let mut contents: Vec<Content> = call
        .history
        .iter()
        .map(|turn| Content {
            role: Some(turn.role.wire().to_string()),
            parts: vec![Part {
                text: Some(turn.content.clone()),
            }],
        })
        .collect();

    contents.push(Content {
        role: Some("user".to_string()),
        parts: vec![Part {
            text: Some(call.prompt.clone()),
        }],
    });

    GenerateContentRequest {
        contents,
        system_instruction: call.system.as_ref().map(|s| Content {
            role: None,
            parts: vec![Part {
                text: Some(s.clone()),
            }],
        }),
        tools: if call.grounded {
            vec![Tool {
                google_search: EmptyConfig {},
            }]
        } else {
            Vec::new()
        },
        generation_config: call.json_output.then_some(GenerationConfig {
            response_mime_type: "application/json",
        }),
    }
}

/// Normalizes grounding chunks into `{title, uri}` citations, dropping
/// entries without a usable locator and defaulting missing titles.
fn normalize_sources(metadata: Option<GroundingMetadata>) -> Vec<SourceRef> {
    metadata
        .unwrap_or_default()
        .grounding_chunks
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            let uri = web.uri.unwrap_or_default();
            if uri.is_empty() {
                return None;
            }
            Some(SourceRef {
                title: web
                    .title
                    .filter(|t| !t.is_empty())
                    .unwrap_or_else(|| "Search Result".to_string()),
                uri,
            })
        })
        .collect()
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_normalize_sources_drops_entries_without_locator() {
        let metadata: GroundingMetadata = serde_json::from_str(
            r#"{
                "groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"web": {"uri": "", "title": "No locator"}},
                    {"web": {"title": "Missing uri"}},
                    {"web": {"uri": "https://b.example"}},
                    {}
                ]
            }"#,
        )
        .unwrap();

        let sources = normalize_sources(Some(metadata));
        assert_eq!(
            sources,
            vec![
                SourceRef {
                    title: "A".to_string(),
                    uri: "https://a.example".to_string()
                },
                SourceRef {
                    title: "Search Result".to_string(),
                    uri: "https://b.example".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_normalize_sources_tolerates_missing_metadata() {
        assert!(normalize_sources(None).is_empty());
    }

    #[test]
    fn test_build_request_wire_shape() {
        let call = ModelCall::new(FLASH_MODEL, "hello")
            .with_system("be terse")
            .grounded()
            .json_output();
        let body = serde_json::to_value(build_request(&call)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be terse");
        assert!(body["tools"][0].get("googleSearch").is_some());
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_build_request_history_maps_assistant_to_model_role() {
        let call = ModelCall::new(FLASH_MODEL, "next").with_history(vec![
            ChatTurn {
                role: ChatRole::User,
                content: "hi".to_string(),
            },
            ChatTurn {
                role: ChatRole::Assistant,
                content: "hello".to_string(),
            },
        ]);
        let body = serde_json::to_value(build_request(&call)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "next");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_credential_failure_detection() {
        assert!(GatewayError::CredentialMissing.indicates_credential_failure());
        assert!(GatewayError::Api {
            status: 403,
            message: "forbidden".to_string()
        }
        .indicates_credential_failure());
        assert!(GatewayError::Api {
            status: 404,
            message: "Requested entity was not found.".to_string()
        }
        .indicates_credential_failure());
        assert!(!GatewayError::Api {
            status: 500,
            message: "internal".to_string()
        }
        .indicates_credential_failure());
        assert!(!GatewayError::EmptyContent.indicates_credential_failure());
    }

    #[test]
    fn test_empty_api_key_means_no_credential() {
        assert!(!LlmClient::new(String::new()).has_credential());
        assert!(!LlmClient::new("   ".to_string()).has_credential());
        assert!(LlmClient::new("key-123".to_string()).has_credential());
    }
}
