//! Runtime for executing the guided session
//!
//! One [`SessionRuntime`] task owns the session state and its pending
//! question slot. Everything else (HTTP handlers, the resolution engine)
//! talks to it through the inbound queue.

mod executor;
pub mod traits;


pub use executor::SessionRuntime;
pub use traits::*;

use crate::interaction::InteractionChannel;
use crate::lookup::LookupService;
use crate::message_log::LogEntry;
use crate::state_machine::{Event, SessionState};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};

/// Capacity of the inbound queue
const INBOUND_CAPACITY: usize = 64;
/// Capacity of the client broadcast channel
const BROADCAST_CAPACITY: usize = 256;

/// Work items processed by the runtime, one at a time in arrival order
#[derive(Debug)]
pub enum Inbound {
    /// Input for the state machine. User messages are routed to the pending
    /// question first when one is installed.
    Event(Event),
    /// The resolution engine asks the user something and waits on `reply`
    Ask {
        question: String,
        reply: oneshot::Sender<String>,
    },
    /// The resolution engine posts a system notice
    Notice { text: String },
}

/// Fatal runtime conditions. The runtime stops when it hits one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("Question asked while another is pending: {question}")]
    AnswerChannelMisuse { question: String },
    #[error("Message log failure: {0}")]
    Log(String),
    #[error("Session runtime is not running")]
    Stopped,
}

/// Events sent to SSE clients
#[derive(Debug, Clone)]
pub enum SseEvent {
    Init {
        session_id: String,
        snapshot: SessionSnapshot,
        messages: Vec<LogEntry>,
    },
    Message {
        entry: LogEntry,
    },
    StateChange {
        state: SessionState,
    },
    Question {
        question: String,
    },
    /// Client notification raised by the state machine (e.g. `resolution_done`)
    Notify {
        event_type: String,
        data: Value,
    },
    Error {
        message: String,
    },
}

/// The state a session owns: conversation state plus the single pending question
#[derive(Debug, Default)]
pub struct Session {
    pub state: SessionState,
    pub interaction: InteractionChannel,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            pending_question: self.interaction.pending_question().map(str::to_string),
        }
    }
}

/// Read-only view of a session, published through a watch channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub state: SessionState,
    pub pending_question: Option<String>,
}

/// Handle to interact with the running session
#[derive(Clone)]
pub struct SessionHandle {
    pub session_id: String,
    inbound_tx: mpsc::Sender<Inbound>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    log: Arc<dyn MessageLog>,
}

impl SessionHandle {
    /// Spawn a runtime for a fresh session and return a handle to it
    pub fn start<L, M>(lookup: Arc<L>, log: Arc<M>) -> Self
    where
        L: LookupService + ?Sized + 'static,
        M: MessageLog + 'static,
    {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(SessionSnapshot::default());

        let runtime = SessionRuntime::new(
            session_id.clone(),
            lookup,
            log.clone(),
            inbound_rx,
            inbound_tx.downgrade(),
            broadcast_tx.clone(),
            snapshot_tx,
        );

        let id = session_id.clone();
        tokio::spawn(async move {
            if let Err(e) = runtime.run().await {
                tracing::error!(session_id = %id, error = %e, "Session runtime stopped with error");
            }
        });

        Self {
            session_id,
            inbound_tx,
            broadcast_tx,
            snapshot_rx,
            log,
        }
    }

    /// Queue a user message
    pub async fn send_message(&self, text: impl Into<String>) -> Result<(), RuntimeError> {
        self.send(Event::user_message(text)).await
    }

    /// Queue an event for the state machine
    pub async fn send(&self, event: Event) -> Result<(), RuntimeError> {
        self.inbound_tx
            .send(Inbound::Event(event))
            .await
            .map_err(|_| RuntimeError::Stopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SseEvent> {
        self.broadcast_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    pub async fn messages(&self) -> Result<Vec<LogEntry>, RuntimeError> {
        self.log.entries().await.map_err(RuntimeError::Log)
    }
}
