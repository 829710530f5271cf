// ── Mutation coordinator ──
//
// Mutate-then-resync: send the write, then force a status poll whatever
// the write's outcome. The snapshot is never modified optimistically; the
// resync poll is the only path by which a write becomes visible.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use netcut_api::Ack;

use crate::command::{Command, ScheduleUpdate};
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::MacAddress;
use crate::store::{PollOutcome, ReconciliationStore};
use crate::stream::StateStream;

/// Observable progress of user writes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MutationState {
    /// Writes currently between dispatch and resync completion.
    pub in_flight: usize,
    /// Whether the most recently finished write was rejected or failed.
    pub last_mutation_failed: bool,
    pub last_error: Option<String>,
    /// Writes finished since startup.
    pub completed: u64,
}

impl MutationState {
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }
}

/// Result of one `execute`. Informational only; failures are already
/// reflected by the resync poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MutationOutcome {
    /// The backend acknowledged the write with `success: true`.
    pub accepted: bool,
    pub message: Option<String>,
    pub resync: PollOutcome,
}

/// Executes user intents against the gateway and resyncs the store.
pub struct MutationCoordinator<G> {
    gateway: Arc<G>,
    store: Arc<ReconciliationStore<G>>,
    state: watch::Sender<MutationState>,
}

impl<G: Gateway> MutationCoordinator<G> {
    pub fn new(gateway: Arc<G>, store: Arc<ReconciliationStore<G>>) -> Self {
        let (state, _) = watch::channel(MutationState::default());
        Self {
            gateway,
            store,
            state,
        }
    }

    /// Run one intent: mark in flight, write, resync, clear.
    ///
    /// Never fails. A rejected or failed write is logged, recorded in
    /// [`MutationState::last_mutation_failed`], and otherwise left for the
    /// resync poll to reveal.
    pub async fn execute(&self, command: Command) -> MutationOutcome {
        let mut guard = InFlight::enter(&self.state);
        debug!(command = command.kind(), "dispatching {command}");

        let (accepted, message) = match route_command(self.gateway.as_ref(), &command).await {
            Ok(ack) if ack.success => {
                info!(command = command.kind(), "{command} accepted");
                (true, ack.message)
            }
            Ok(ack) => {
                warn!(
                    command = command.kind(),
                    message = ack.message.as_deref().unwrap_or(""),
                    "{command} rejected by backend"
                );
                (false, ack.message)
            }
            Err(err) => {
                warn!(command = command.kind(), error = %err, "{command} failed");
                (false, Some(err.to_string()))
            }
        };

        let resync = self.store.poll().await;
        guard.finish(accepted, message.clone());

        MutationOutcome {
            accepted,
            message,
            resync,
        }
    }

    // ── Convenience intents ──────────────────────────────────────────

    pub async fn set_blocking(&self, block: bool) -> MutationOutcome {
        self.execute(Command::SetBlocking { block }).await
    }

    pub async fn activate_mode(&self, mode: &str) -> Result<MutationOutcome, CoreError> {
        Ok(self.execute(Command::activate_mode(mode)?).await)
    }

    pub async fn update_schedule(&self, update: ScheduleUpdate) -> MutationOutcome {
        self.execute(Command::UpdateSchedule(update)).await
    }

    pub async fn select_target(&self, mac: MacAddress, name: Option<String>) -> MutationOutcome {
        self.execute(Command::SelectTarget { mac, name }).await
    }

    pub async fn clear_target(&self) -> MutationOutcome {
        self.execute(Command::ClearTarget).await
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn subscribe(&self) -> StateStream<MutationState> {
        StateStream::new(self.state.subscribe())
    }

    pub fn watch(&self) -> watch::Receiver<MutationState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub fn store(&self) -> &Arc<ReconciliationStore<G>> {
        &self.store
    }
}

// ── Command routing ──────────────────────────────────────────────────

async fn route_command<G: Gateway>(gateway: &G, command: &Command) -> Result<Ack, CoreError> {
    match command {
        Command::SetBlocking { block } => gateway.set_blocking(*block).await,
        Command::ActivateMode { mode } => gateway.activate_mode(mode).await,
        Command::UpdateSchedule(update) => {
            gateway
                .update_schedule(
                    update.preset(),
                    update.start(),
                    update.end(),
                    update.enabled(),
                )
                .await
        }
        Command::SelectTarget { mac, name } => gateway.select_target(mac, name.as_deref()).await,
        Command::ClearTarget => gateway.clear_target().await,
    }
}

// ── In-flight bookkeeping ────────────────────────────────────────────

/// Holds one unit of `in_flight` for the duration of a write. Released on
/// drop, so a cancelled `execute` never leaves the count raised.
struct InFlight<'a> {
    state: &'a watch::Sender<MutationState>,
    result: Option<(bool, Option<String>)>,
}

impl<'a> InFlight<'a> {
    fn enter(state: &'a watch::Sender<MutationState>) -> Self {
        state.send_modify(|s| s.in_flight += 1);
        Self {
            state,
            result: None,
        }
    }

    fn finish(&mut self, accepted: bool, message: Option<String>) {
        self.result = Some((accepted, message));
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let result = self.result.take();
        self.state.send_modify(|s| {
            s.in_flight = s.in_flight.saturating_sub(1);
            if let Some((accepted, message)) = result {
                s.completed += 1;
                s.last_mutation_failed = !accepted;
                s.last_error = if accepted { None } else { message };
            }
        });
    }
}
