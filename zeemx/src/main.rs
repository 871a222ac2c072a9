// zeemX - local-first personal workspace
// Entry point: line-delimited JSON commands on stdin, replies on stdout

use anyhow::Context;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use zeemx::app::AppState;
use zeemx::commands;
use zeemx::config::AppConfig;

#[derive(Debug, Deserialize)]
struct Request {
    command: String,
    #[serde(default)]
    args: Value,
}

async fn handle_line(state: &AppState, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return json!({ "error": format!("Malformed request: {}", e) }),
    };

    match commands::invoke(state, &request.command, request.args).await {
        Ok(value) => json!({ "ok": value }),
        Err(e) => {
            tracing::warn!("Command {} failed: {}", request.command, e);
            json!({ "error": e })
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries replies only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "zeemx=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting zeemX {}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::from_env();
    let state = AppState::open(config).context("failed to open data directory")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_line(&state, &line).await;
        let mut out = serde_json::to_vec(&response)?;
        out.push(b'\n');
        stdout.write_all(&out).await?;
        stdout.flush().await?;
    }

    // Don't lose a pending notepad save on exit
    state
        .notepad
        .flush()
        .await
        .context("failed to save notepad")?;

    tracing::info!("Input closed, shutting down");

    Ok(())
}
