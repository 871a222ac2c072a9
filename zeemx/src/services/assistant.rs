//! Assistant service
//!
//! Chat with a generative-text model. The network client sits behind
//! [`TextGenerator`] so the chat logic can run against a stub.
//!
//! Requests are never retried or streamed. While one reply is pending,
//! further messages are dropped rather than queued.

use crate::config::{
    AppConfig, ASSISTANT_CLEARED_GREETING, ASSISTANT_EMPTY_REPLY, ASSISTANT_FALLBACK,
    ASSISTANT_GREETING, ASSISTANT_SYSTEM_INSTRUCTION, ASSISTANT_TEMPERATURE,
};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Something that turns a prompt into text
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Client for the Gemini `generateContent` endpoint
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("zeemx/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.assistant_model.clone(),
            endpoint: config.assistant_endpoint.clone(),
        })
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "systemInstruction": { "parts": [{ "text": ASSISTANT_SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": ASSISTANT_TEMPERATURE },
        })
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        let body = Self::request_body(prompt);
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);

        async move {
            let api_key = self
                .api_key
                .as_deref()
                .ok_or_else(|| AppError::Assistant("no API key configured".to_string()))?;

            let response = self
                .client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&body)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AppError::Assistant(format!("service returned {}", status)));
            }

            let reply: GenerateResponse = response.json().await?;
            let text = reply
                .candidates
                .into_iter()
                .next()
                .and_then(|candidate| candidate.content)
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect::<String>()
                })
                .unwrap_or_default();

            Ok(text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: Role::User,
            content: content.to_string(),
        }
    }

    fn assistant(content: &str) -> Self {
        Self {
            role: Role::Assistant,
            content: content.to_string(),
        }
    }
}

/// Clears the in-flight flag however the request ends
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Chat transcript plus the generator behind it
pub struct AssistantService<G> {
    generator: Arc<G>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    busy: Arc<AtomicBool>,
}

impl<G> Clone for AssistantService<G> {
    fn clone(&self) -> Self {
        Self {
            generator: Arc::clone(&self.generator),
            transcript: Arc::clone(&self.transcript),
            busy: Arc::clone(&self.busy),
        }
    }
}

impl<G: TextGenerator> AssistantService<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator: Arc::new(generator),
            transcript: Arc::new(Mutex::new(vec![ChatMessage::assistant(ASSISTANT_GREETING)])),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    /// One-shot prompt. Failures are logged and answered with the fallback.
    pub async fn ask(&self, prompt: &str) -> String {
        match self.generator.generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Assistant request failed: {}", e);
                ASSISTANT_FALLBACK.to_string()
            }
        }
    }

    /// Send a chat message and wait for the reply.
    ///
    /// Blank input, or input arriving while a reply is pending, is ignored
    /// and returns `None`.
    pub async fn send(&self, text: &str) -> Option<ChatMessage> {
        if text.trim().is_empty() {
            return None;
        }
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("Assistant is still replying; message dropped");
            return None;
        }
        let _in_flight = InFlight(self.busy.as_ref());

        self.transcript.lock().await.push(ChatMessage::user(text));

        let reply = self.ask(text).await;
        let reply = if reply.is_empty() {
            ChatMessage::assistant(ASSISTANT_EMPTY_REPLY)
        } else {
            ChatMessage::assistant(&reply)
        };

        self.transcript.lock().await.push(reply.clone());
        Some(reply)
    }

    /// Ask for a summary of the given document titles
    pub async fn summarize_docs(&self, titles: &[String]) -> Option<ChatMessage> {
        let prompt = summary_prompt(titles);
        self.send(&prompt).await
    }

    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().await.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Reset the transcript to a single greeting
    pub async fn clear(&self) {
        *self.transcript.lock().await = vec![ChatMessage::assistant(ASSISTANT_CLEARED_GREETING)];
    }
}

pub fn summary_prompt(titles: &[String]) -> String {
    if titles.is_empty() {
        return "Could you give me some ideas for what I should write about in my first document?"
            .to_string();
    }
    format!(
        "Can you summarize my current active documents for me? I have these titles: {}. (Simulating document awareness)",
        titles.join(", ")
    )
}
