//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use homolog_query::{FetchError, FetchRequest, ListData, QueryKey, RecordFetcher};
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum TuiEvent {
    Input(KeyEvent),
    Resize { width: u16, height: u16 },
    /// A spawned fetch finished.
    QueryResolved {
        key: QueryKey,
        outcome: Result<ListData, FetchError>,
    },
}

/// Run a fetch on the runtime and report its outcome on `sender`.
pub fn spawn_fetch(
    request: FetchRequest,
    fetcher: Arc<dyn RecordFetcher>,
    sender: mpsc::Sender<TuiEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = request.execute(fetcher.as_ref()).await;
        if let Err(err) = &outcome {
            tracing::warn!(key = %request.key, error = %err, "Fetch failed");
        }
        let event = TuiEvent::QueryResolved {
            key: request.key,
            outcome,
        };
        if sender.send(event).await.is_err() {
            tracing::debug!("Event loop closed before fetch resolved");
        }
    })
}
