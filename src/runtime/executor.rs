//! Session runtime executor

use super::traits::MessageLog;
use super::{Inbound, RuntimeError, Session, SessionSnapshot, SseEvent};

use crate::interaction::{AnswerOutcome, InteractionHandle, PendingQuestion};
use crate::lookup::LookupService;
use crate::message_log::{Direction, MessageKind};
use crate::prompts;
use crate::resolution::resolve_cells;
use crate::state_machine::{transition, Cell, Effect, Event, TransitionError};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Owns one session and executes the effects its transitions produce
pub struct SessionRuntime<L, M>
where
    L: LookupService + ?Sized + 'static,
    M: MessageLog + 'static,
{
    session_id: String,
    session: Session,
    lookup: Arc<L>,
    log: Arc<M>,
    inbound_rx: mpsc::Receiver<Inbound>,
    /// Weak so the loop ends once every handle and engine task is gone
    inbound_tx: mpsc::WeakSender<Inbound>,
    broadcast_tx: broadcast::Sender<SseEvent>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
}

impl<L, M> SessionRuntime<L, M>
where
    L: LookupService + ?Sized + 'static,
    M: MessageLog + 'static,
{
    pub fn new(
        session_id: String,
        lookup: Arc<L>,
        log: Arc<M>,
        inbound_rx: mpsc::Receiver<Inbound>,
        inbound_tx: mpsc::WeakSender<Inbound>,
        broadcast_tx: broadcast::Sender<SseEvent>,
        snapshot_tx: watch::Sender<SessionSnapshot>,
    ) -> Self {
        Self {
            session_id,
            session: Session::new(),
            lookup,
            log,
            inbound_rx,
            inbound_tx,
            broadcast_tx,
            snapshot_tx,
        }
    }

    pub async fn run(mut self) -> Result<(), RuntimeError> {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        self.append(&prompts::sector_menu(), Direction::Outgoing, MessageKind::Question)
            .await?;
        self.publish_snapshot();

        // Process inbound work in a loop, one item at a time
        while let Some(inbound) = self.inbound_rx.recv().await {
            if let Err(e) = self.process_inbound(inbound).await {
                tracing::error!(session_id = %self.session_id, error = %e, "Fatal session error");
                let _ = self.broadcast_tx.send(SseEvent::Error {
                    message: e.to_string(),
                });
                return Err(e);
            }
        }

        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
        Ok(())
    }

    async fn process_inbound(&mut self, inbound: Inbound) -> Result<(), RuntimeError> {
        match inbound {
            Inbound::Event(Event::UserMessage { text }) => self.handle_user_message(text).await,
            Inbound::Event(event) => self.process_event(event).await,
            Inbound::Ask { question, reply } => self.install_question(question, reply).await,
            Inbound::Notice { text } => {
                self.append(&text, Direction::Outgoing, MessageKind::System)
                    .await
            }
        }
    }

    /// Every user message is logged. It answers the pending question if one
    /// is installed; otherwise it is dialogue input for the state machine.
    async fn handle_user_message(&mut self, text: String) -> Result<(), RuntimeError> {
        self.append(&text, Direction::Incoming, MessageKind::Response)
            .await?;

        if !self.session.interaction.is_pending() {
            return self.process_event(Event::UserMessage { text }).await;
        }

        match self.session.interaction.supply_answer(text) {
            AnswerOutcome::Delivered => {
                tracing::debug!(session_id = %self.session_id, "Answer delivered");
            }
            AnswerOutcome::AskerGone => {
                tracing::warn!(session_id = %self.session_id, "Answer arrived after the asker went away");
            }
            AnswerOutcome::NotPending => {}
        }
        self.publish_snapshot();
        Ok(())
    }

    async fn install_question(
        &mut self,
        question: String,
        reply: tokio::sync::oneshot::Sender<String>,
    ) -> Result<(), RuntimeError> {
        let pending = PendingQuestion::new(question.clone(), reply);
        if let Err(e) = self.session.interaction.install(pending) {
            tracing::error!(
                session_id = %self.session_id,
                pending = ?self.session.interaction.pending_question(),
                rejected = %question,
                error = %e,
                "Question asked while another is pending"
            );
            return Err(RuntimeError::AnswerChannelMisuse { question });
        }

        self.append(&question, Direction::Outgoing, MessageKind::System)
            .await?;
        let _ = self.broadcast_tx.send(SseEvent::Question { question });
        self.publish_snapshot();
        Ok(())
    }

    async fn process_event(&mut self, event: Event) -> Result<(), RuntimeError> {
        let event_name = event.name();

        // Pure state transition
        let result = match transition(&self.session.state, event) {
            Ok(r) => r,
            Err(e) => return self.reject(event_name, &e).await,
        };

        self.session.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect).await?;
        }
        Ok(())
    }

    /// A rejected event leaves the session untouched and is reported to clients
    async fn reject(&self, event_name: &str, error: &TransitionError) -> Result<(), RuntimeError> {
        let TransitionError::InvalidTransition(reason) = error;
        tracing::warn!(
            session_id = %self.session_id,
            phase = self.session.state.phase.as_str(),
            event = event_name,
            reason = %reason,
            "Event rejected"
        );
        if event_name == "file_ingested" {
            self.append(
                &prompts::file_rejected(reason),
                Direction::Outgoing,
                MessageKind::System,
            )
            .await?;
        }

        let _ = self.broadcast_tx.send(SseEvent::Error {
            message: error.to_string(),
        });
        Ok(())
    }

    /// Execute an effect
    async fn execute_effect(&mut self, effect: Effect) -> Result<(), RuntimeError> {
        match effect {
            Effect::AppendMessage {
                text,
                direction,
                kind,
            } => self.append(&text, direction, kind).await,

            Effect::PublishState => {
                let _ = self.broadcast_tx.send(SseEvent::StateChange {
                    state: self.session.state.clone(),
                });
                self.publish_snapshot();
                Ok(())
            }

            Effect::StartResolution { cells } => {
                self.start_resolution(cells);
                Ok(())
            }

            Effect::NotifyClient { event_type, data } => {
                let _ = self
                    .broadcast_tx
                    .send(SseEvent::Notify { event_type, data });
                Ok(())
            }
        }
    }

    /// Spawn the resolution engine as a background task. It reports back
    /// through the inbound queue only. A supervising task turns a panicked
    /// engine into `ResolutionFailed` so the session never stays in
    /// `ResolvingCells`.
    fn start_resolution(&self, cells: Vec<Cell>) {
        let Some(inbound_tx) = self.inbound_tx.upgrade() else {
            tracing::warn!(session_id = %self.session_id, "No session handles left, not starting resolution");
            return;
        };
        let lookup = Arc::clone(&self.lookup);
        let session_id = self.session_id.clone();

        let engine_tx = inbound_tx.clone();
        let engine_session_id = session_id.clone();
        let engine = tokio::spawn(async move {
            tracing::info!(
                session_id = %engine_session_id,
                cells = cells.len(),
                lookup = %lookup.name(),
                "Starting resolution (background)"
            );

            let interaction = InteractionHandle::new(engine_tx);
            let report = resolve_cells(&cells, lookup.as_ref(), &interaction).await;

            tracing::info!(
                session_id = %engine_session_id,
                resolved = report.resolved(),
                failed = report.failed(),
                "Resolution finished"
            );
            report
        });

        tokio::spawn(async move {
            let event = match engine.await {
                Ok(report) => Event::ResolutionComplete { report },
                Err(e) => {
                    tracing::error!(session_id = %session_id, error = %e, "Resolution engine died");
                    let reason = if e.is_panic() {
                        "the resolution engine crashed"
                    } else {
                        "the resolution engine was cancelled"
                    };
                    Event::ResolutionFailed {
                        reason: reason.to_string(),
                    }
                }
            };

            if inbound_tx.send(Inbound::Event(event)).await.is_err() {
                tracing::warn!(session_id = %session_id, "Session gone before resolution completed");
            }
        });
    }

    async fn append(
        &self,
        text: &str,
        direction: Direction,
        kind: MessageKind,
    ) -> Result<(), RuntimeError> {
        let entry = self
            .log
            .append(text, direction, kind)
            .await
            .map_err(RuntimeError::Log)?;
        let _ = self.broadcast_tx.send(SseEvent::Message { entry });
        Ok(())
    }

    fn publish_snapshot(&self) {
        self.snapshot_tx.send_replace(self.session.snapshot());
    }
}
