//! Single-slot question channel between background work and the dialogue
//!
//! Background work (the resolution engine) holds an [`InteractionHandle`].
//! Asking a question sends it to the session runtime, which logs it and
//! installs it in the session's [`InteractionChannel`]; the asker is
//! suspended on a oneshot until the next user message arrives. At most one
//! question may be installed at a time.

use crate::runtime::Inbound;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InteractionError {
    /// A second question was asked while one is outstanding. This is a
    /// programming error, not a user-facing condition.
    #[error("A question is already pending")]
    AlreadyPending,
    /// The session went away before an answer arrived
    #[error("Interaction channel closed")]
    ChannelClosed,
}

/// The one outstanding question of a session
#[derive(Debug)]
pub struct PendingQuestion {
    pub question: String,
    reply: oneshot::Sender<String>,
}

impl PendingQuestion {
    pub fn new(question: impl Into<String>, reply: oneshot::Sender<String>) -> Self {
        Self {
            question: question.into(),
            reply,
        }
    }
}

/// What happened to a message offered to the channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// The pending question was answered and cleared
    Delivered,
    /// No question pending; the message is ordinary dialogue input
    NotPending,
    /// A question was pending but its asker is gone; the slot was cleared
    AskerGone,
}

/// Session-owned slot holding at most one [`PendingQuestion`]
#[derive(Debug, Default)]
pub struct InteractionChannel {
    pending: Option<PendingQuestion>,
}

impl InteractionChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a question. Fails without touching the slot if one is already installed.
    pub fn install(&mut self, question: PendingQuestion) -> Result<(), InteractionError> {
        if self.pending.is_some() {
            return Err(InteractionError::AlreadyPending);
        }
        self.pending = Some(question);
        Ok(())
    }

    /// Hand `text` to the pending question, consuming it.
    pub fn supply_answer(&mut self, text: String) -> AnswerOutcome {
        match self.pending.take() {
            None => AnswerOutcome::NotPending,
            Some(pending) => match pending.reply.send(text) {
                Ok(()) => AnswerOutcome::Delivered,
                Err(_) => AnswerOutcome::AskerGone,
            },
        }
    }

    pub fn pending_question(&self) -> Option<&str> {
        self.pending.as_ref().map(|p| p.question.as_str())
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// User-facing side effects available to background work
#[async_trait]
pub trait Interaction: Send + Sync {
    /// Ask the user a question and wait (without timeout) for the answer
    async fn ask(&self, question: String) -> Result<String, InteractionError>;

    /// Post a system notice to the dialogue
    async fn notify(&self, text: String);
}

/// [`Interaction`] backed by the session runtime's inbound queue
#[derive(Clone)]
pub struct InteractionHandle {
    inbound_tx: mpsc::Sender<Inbound>,
}

impl InteractionHandle {
    pub fn new(inbound_tx: mpsc::Sender<Inbound>) -> Self {
        Self { inbound_tx }
    }
}

#[async_trait]
impl Interaction for InteractionHandle {
    async fn ask(&self, question: String) -> Result<String, InteractionError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.inbound_tx
            .send(Inbound::Ask {
                question,
                reply: reply_tx,
            })
            .await
            .map_err(|_| InteractionError::ChannelClosed)?;

        reply_rx.await.map_err(|_| InteractionError::ChannelClosed)
    }

    async fn notify(&self, text: String) {
        if self.inbound_tx.send(Inbound::Notice { text }).await.is_err() {
            tracing::debug!("Session gone, dropping notice");
        }
    }
}
