//! Headless explorer: reads edits from stdin and logs each settled view.
//!
//! Plain lines are query text. Commands:
//!   :lang <code>     toggle a language filter
//!   :select <word>   toggle word selection
//!   :recenter        recompute coordinates for active words + history
//!   :dismiss         clear the error message

use std::sync::Arc;

use explorer::{init_tracing, ExplorerConfig, ExplorerRuntime, HttpBackend, Input, Session, StaticToken};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_tracing();

    let config = ExplorerConfig::from_env();
    info!(api = %config.api_url, merge = config.search_merge.as_str(), "starting explorer");

    let tokens = Arc::new(StaticToken::new(config.token.clone()));
    let backend = match HttpBackend::new(config.api_url.clone(), tokens) {
        Ok(backend) => backend,
        Err(err) => {
            error!(%err, "cannot build HTTP client");
            std::process::exit(1);
        }
    };

    let session = Session::new(config.session_config());
    let runtime = ExplorerRuntime::new(session, Arc::new(backend), config.frame_interval());
    let (snap_tx, mut snap_rx) = runtime.snapshot_channel();
    let (input_tx, input_rx) = mpsc::channel(64);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(parse_input(&line)).await.is_err() {
                break;
            }
        }
    });

    tokio::spawn(async move {
        let mut last_loading = None;
        while snap_rx.changed().await.is_ok() {
            let snap = snap_rx.borrow_and_update().clone();
            if last_loading == Some(snap.loading) {
                continue;
            }
            last_loading = Some(snap.loading);
            if let Some(err) = &snap.error {
                error!(%err, "search failed");
            }
            info!(
                loading = snap.loading,
                pending = snap.pending,
                origin = snap.origin.as_ref().map(|o| o.word.as_str()).unwrap_or(""),
                words = snap.words.len(),
                distance = snap.camera.distance,
                "view"
            );
        }
    });

    let session = runtime.run(input_rx, snap_tx).await;
    info!(words = session.corpus().len(), "bye");
}

fn parse_input(line: &str) -> Input {
    let line = line.trim();
    match line.split_once(' ') {
        Some((":lang", code)) => Input::ToggleLanguage(code.trim().to_string()),
        Some((":select", word)) => Input::ToggleSelection(word.trim().to_string()),
        _ if line == ":recenter" => Input::Recenter,
        _ if line == ":dismiss" => Input::DismissError,
        _ => Input::Text(line.to_string()),
    }
}
