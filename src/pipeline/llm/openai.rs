use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::types::{CompletionRequest, LlmClient};
use super::LlmError;
use crate::config::LlmSettings;

/// Default OpenAI API root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OpenAiClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Result<Self, LlmError> {
        if api_key.trim().is_empty() {
            return Err(LlmError::MissingApiKey);
        }
        if timeout_secs == 0 {
            return Err(LlmError::InvalidTimeout);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LlmError::HttpClient(e.to_string()))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            client,
            timeout_secs,
        })
    }

    /// Build a client from resolved settings. Fails fast when no key is set,
    /// so nothing reaches the network without credentials.
    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        let key = settings.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;
        Self::new(&settings.base_url, key, settings.timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Request body for `/chat/completions`.
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatCompletionRequest<'a> {
    fn from_request(request: &'a CompletionRequest) -> Self {
        Self {
            model: &request.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Response body from `/chat/completions`.
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Extract the first choice's text from a raw response body.
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::MalformedResponse(e.to_string()))?;

    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::MalformedResponse("response has no choices".into()))?;

    if choice.finish_reason.as_deref() == Some("length") {
        tracing::warn!("Completion stopped at max_tokens; summary may be truncated");
    }

    choice.message.content.ok_or(LlmError::EmptyResponse)
}

/// Map a failed send. A timeout during connect is still a timeout.
fn transport_error(
    is_timeout: bool,
    is_connect: bool,
    base_url: &str,
    timeout_secs: u64,
    detail: String,
) -> LlmError {
    if is_timeout {
        LlmError::Timeout(timeout_secs)
    } else if is_connect {
        LlmError::Connection(base_url.to_string())
    } else {
        LlmError::HttpClient(detail)
    }
}

/// Map a non-success HTTP status to the matching error kind.
fn status_error(status: u16, retry_after: Option<String>, body: String) -> LlmError {
    match status {
        401 | 403 => LlmError::Unauthorized { status },
        429 => LlmError::RateLimited(match retry_after {
            Some(secs) => format!("retry after {secs}s: {body}"),
            None => body,
        }),
        _ => LlmError::Api { status, body },
    }
}

impl LlmClient for OpenAiClient {
    fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let url = self.completions_url();
        let body = ChatCompletionRequest::from_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| {
                transport_error(
                    e.is_timeout(),
                    e.is_connect(),
                    &self.base_url,
                    self.timeout_secs,
                    e.to_string(),
                )
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body = response.text().unwrap_or_default();
            return Err(status_error(status.as_u16(), retry_after, body));
        }

        let text = response.text().map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(self.timeout_secs)
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        parse_completion(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CompletionRequest {
        CompletionRequest {
            model: "gpt-4".into(),
            system: "You are a helpful and concise product strategist.".into(),
            prompt: "Group these".into(),
            temperature: 0.5,
            max_tokens: 1000,
        }
    }

    #[test]
    fn client_trims_trailing_slash() {
        let client = OpenAiClient::new("https://api.openai.com/v1/", "sk-test", 30).unwrap();
        assert_eq!(client.base_url(), "https://api.openai.com/v1");
        assert_eq!(
            client.completions_url(),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(client.timeout_secs, 30);
    }

    #[test]
    fn blank_api_key_rejected() {
        let result = OpenAiClient::new(DEFAULT_BASE_URL, "   ", 30);
        assert!(matches!(result, Err(LlmError::MissingApiKey)));
    }

    #[test]
    fn zero_timeout_rejected() {
        let result = OpenAiClient::new(DEFAULT_BASE_URL, "sk-test", 0);
        assert!(matches!(result, Err(LlmError::InvalidTimeout)));

        let settings = LlmSettings {
            api_key: Some("sk-test".into()),
            timeout_secs: 0,
            ..LlmSettings::default()
        };
        assert!(matches!(
            OpenAiClient::from_settings(&settings),
            Err(LlmError::InvalidTimeout)
        ));
    }

    #[test]
    fn from_settings_requires_key() {
        let settings = LlmSettings {
            api_key: None,
            ..LlmSettings::default()
        };
        assert!(matches!(
            OpenAiClient::from_settings(&settings),
            Err(LlmError::MissingApiKey)
        ));
    }

    #[test]
    fn request_body_has_system_then_user() {
        let request = sample_request();
        let body = ChatCompletionRequest::from_request(&request);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4");
        assert_eq!(json["max_tokens"], 1000);
        assert!((json["temperature"].as_f64().unwrap() - 0.5).abs() < 1e-6);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(
            json["messages"][0]["content"],
            "You are a helpful and concise product strategist."
        );
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "Group these");
    }

    #[test]
    fn parses_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"**Theme 1**"},"finish_reason":"stop"}]}"#;
        assert_eq!(parse_completion(body).unwrap(), "**Theme 1**");
    }

    #[test]
    fn missing_choices_is_malformed() {
        let result = parse_completion(r#"{"choices":[]}"#);
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn null_content_is_empty_response() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#;
        assert!(matches!(parse_completion(body), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn non_json_body_is_malformed() {
        let result = parse_completion("<html>gateway error</html>");
        assert!(matches!(result, Err(LlmError::MalformedResponse(_))));
    }

    #[test]
    fn connect_timeout_reported_as_timeout() {
        let url = DEFAULT_BASE_URL;
        assert!(matches!(
            transport_error(true, true, url, 120, String::new()),
            LlmError::Timeout(120)
        ));
        assert!(matches!(
            transport_error(true, false, url, 120, String::new()),
            LlmError::Timeout(120)
        ));
        match transport_error(false, true, url, 120, String::new()) {
            LlmError::Connection(base) => assert_eq!(base, url),
            other => panic!("expected Connection, got {other:?}"),
        }
        assert!(matches!(
            transport_error(false, false, url, 120, "redirect loop".into()),
            LlmError::HttpClient(_)
        ));
    }

    #[test]
    fn status_mapping() {
        assert!(matches!(
            status_error(401, None, String::new()),
            LlmError::Unauthorized { status: 401 }
        ));
        match status_error(429, Some("20".into()), "slow down".into()) {
            LlmError::RateLimited(msg) => {
                assert!(msg.contains("retry after 20s"));
                assert!(msg.contains("slow down"));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
        assert!(matches!(
            status_error(500, None, "boom".into()),
            LlmError::Api { status: 500, .. }
        ));
    }
}
