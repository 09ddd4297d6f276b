//! Server-Sent Events support

use crate::runtime::SseEvent;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

/// Convert broadcast stream to SSE stream
pub fn sse_stream(
    init_event: SseEvent,
    broadcast_rx: tokio::sync::broadcast::Receiver<SseEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // Create stream that starts with init event then broadcasts
    let init = futures::stream::once(async move { Ok(sse_event_to_axum(init_event)) });

    let broadcasts = BroadcastStream::new(broadcast_rx).filter_map(|result| match result {
        Ok(event) => Some(Ok(sse_event_to_axum(event))),
        Err(_) => None, // Skip lagged messages
    });

    let combined = init.chain(broadcasts);

    Sse::new(combined).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

fn sse_event_to_axum(event: SseEvent) -> Event {
    let (event_type, data) = event_payload(event);
    Event::default().event(event_type).data(data.to_string())
}

fn event_payload(event: SseEvent) -> (String, Value) {
    match event {
        SseEvent::Init {
            session_id,
            snapshot,
            messages,
        } => (
            "init".to_string(),
            json!({
                "type": "init",
                "session_id": session_id,
                "state": snapshot.state,
                "pending_question": snapshot.pending_question,
                "messages": messages
            }),
        ),
        SseEvent::Message { entry } => (
            "message".to_string(),
            json!({
                "type": "message",
                "message": entry
            }),
        ),
        SseEvent::StateChange { state } => (
            "state_change".to_string(),
            json!({
                "type": "state_change",
                "state": state
            }),
        ),
        SseEvent::Question { question } => (
            "question".to_string(),
            json!({
                "type": "question",
                "question": question
            }),
        ),
        SseEvent::Notify { event_type, data } => {
            let payload = json!({
                "type": event_type,
                "data": data
            });
            (event_type, payload)
        }
        SseEvent::Error { message } => (
            "error".to_string(),
            json!({
                "type": "error",
                "message": message
            }),
        ),
    }
}
