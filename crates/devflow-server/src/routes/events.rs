use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::{Stream, StreamExt};

use crate::state::AppState;

/// GET /api/events — SSE stream ticking whenever the workspace state file
/// changes (API mutations and external CLI updates both count).
pub async fn sse_events(
    State(app): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = app.event_tx.subscribe();
    // Lagged receivers just produce an extra tick; clients re-fetch state
    // either way.
    let stream = BroadcastStream::new(rx).map(|_| Ok(Event::default().data("changed")));
    Sse::new(stream).keep_alive(KeepAlive::default())
}
