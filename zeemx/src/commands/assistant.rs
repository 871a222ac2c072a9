//! Assistant commands

use crate::app::AppState;
use crate::services::assistant::ChatMessage;

/// One-shot prompt outside the chat transcript
pub async fn ask_assistant(state: &AppState, prompt: String) -> String {
    state.assistant.ask(&prompt).await
}

/// Returns the reply, or `None` when the message was ignored (blank, or
/// a reply is still pending)
pub async fn send_message(state: &AppState, text: String) -> Option<ChatMessage> {
    state.assistant.send(&text).await
}

/// Ask about the current documents by title
pub async fn summarize_docs(state: &AppState) -> Option<ChatMessage> {
    let titles = state.docs.titles().await;
    state.assistant.summarize_docs(&titles).await
}

pub async fn get_transcript(state: &AppState) -> Vec<ChatMessage> {
    state.assistant.transcript().await
}

pub async fn clear_chat(state: &AppState) {
    state.assistant.clear().await;
}
