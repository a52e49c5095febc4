use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::client::{ModelClient, PROBE_PROMPT};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-pro";

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidatePart {
    text: String,
}

/// HTTP client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, body));
        }

        let generated: GenerateResponse = response.json().await?;
        generated
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| anyhow!("Gemini response contained no candidates"))
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn probe(&self) -> Result<String> {
        self.generate(PROBE_PROMPT).await
    }

    async fn send(&self, prompt: &str) -> Result<String> {
        tracing::debug!(model = %self.model, chars = prompt.len(), "sending prompt to Gemini");
        let reply = self.generate(prompt).await?;
        tracing::debug!(chars = reply.len(), "received Gemini reply");
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate_body(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [
                { "content": { "parts": [ { "text": text } ] } }
            ]
        })
    }

    #[tokio::test]
    async fn send_returns_first_candidate_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-pro:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "Typically 2-5% of purchase price.",
            )))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "test-key", "gemini-pro");
        let reply = client.send("What is the average closing cost?").await.unwrap();
        assert_eq!(reply, "Typically 2-5% of purchase price.");
    }

    #[tokio::test]
    async fn prompt_is_forwarded_in_request_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "contents": [ { "parts": [ { "text": "hello there" } ] } ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body("hi")))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "k", "gemini-pro");
        client.send("hello there").await.unwrap();
    }

    #[tokio::test]
    async fn probe_uses_the_fixed_probe_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(serde_json::json!({
                "contents": [ { "parts": [ { "text": PROBE_PROMPT } ] } ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(candidate_body(
                "Connection successful",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "k", "gemini-pro");
        let ack = client.probe().await.unwrap();
        assert_eq!(ack, "Connection successful");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("key rejected"))
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "bad-key", "gemini-pro");
        let err = client.send("hi").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn missing_candidates_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "candidates": [] })),
            )
            .mount(&server)
            .await;

        let client = GeminiClient::new(&server.uri(), "k", "gemini-pro");
        assert!(client.send("hi").await.is_err());
    }
}
