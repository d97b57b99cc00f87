//! One reconciliation pass between the local clipboard and the remote store.

use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, warn, Instrument};

use cs_core::clipboard::{ClipboardEntry, ContentType};
use cs_core::ids::CommandId;
use cs_core::ports::{KeystrokeError, RemoteStoreError, RemoteStorePort, SystemClipboardPort};
use cs_core::sync::{
    admit_command, AgentSession, CommandDecision, ConnectionHealth, HealthTransition,
    StalenessFilter,
};

use crate::usecases::typing::{TypingExecutor, TypingOutcome};

/// Faults that abort a tick and trigger the error cooldown.
#[derive(Debug, Error)]
pub enum TickError {
    #[error("failed to read local clipboard: {0:#}")]
    ClipboardRead(anyhow::Error),

    #[error("failed to write local clipboard: {0:#}")]
    ClipboardWrite(anyhow::Error),
}

/// What happened to the remote command seen during a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Executed(CommandId),
    SkippedEmpty(CommandId),
    Failed {
        command_id: CommandId,
        error: KeystrokeError,
    },
    Duplicate(CommandId),
    Stale(CommandId),
    Malformed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub pushed: bool,
    pub applied_remote: bool,
    pub command: Option<CommandOutcome>,
    /// Result of the probe issued during this tick, if any.
    pub probe: Option<ConnectionHealth>,
    pub transport_failures: u32,
    pub protocol_errors: u32,
}

impl TickReport {
    pub fn had_transport_fault(&self) -> bool {
        self.transport_failures > 0
    }
}

/// Sync loop body.
///
/// ## Behavior
/// - (a) Non-empty local text that differs from the last known value is pushed;
///   the last known value moves only when the push succeeds
/// - (b) The latest remote entry is pulled and classified: typing commands go
///   through admission and then the executor, text is written locally when new
/// - Transport failures feed the health tracker; protocol errors drop the item
/// - At most one probe per tick: at the start when degraded, or as soon as the
///   failure threshold is crossed so it lands before classification
pub struct ClipboardReconciler {
    remote: Arc<dyn RemoteStorePort>,
    clipboard: Arc<dyn SystemClipboardPort>,
    executor: Arc<TypingExecutor>,
    staleness: StalenessFilter,
}

struct TickState {
    report: TickReport,
    probed: bool,
}

impl ClipboardReconciler {
    pub fn new(
        remote: Arc<dyn RemoteStorePort>,
        clipboard: Arc<dyn SystemClipboardPort>,
        executor: Arc<TypingExecutor>,
        staleness: StalenessFilter,
    ) -> Self {
        Self {
            remote,
            clipboard,
            executor,
            staleness,
        }
    }

    /// Seed `last_known_clipboard` so existing local content is not pushed on start.
    pub fn seed_baseline(&self, session: &mut AgentSession) {
        match self.clipboard.read_text() {
            Ok(Some(text)) => session.remember(text),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Failed to read initial clipboard baseline"),
        }
    }

    pub async fn tick(
        &self,
        session: &mut AgentSession,
        cancel: &CancellationToken,
    ) -> Result<TickReport, TickError> {
        let span = info_span!(
            "usecase.sync.tick",
            health = ?session.health.state(),
            failures = session.health.consecutive_failures(),
        );

        async {
            let mut state = TickState {
                report: TickReport::default(),
                probed: false,
            };

            if session.health.needs_probe() {
                self.probe(session, &mut state).await;
            }

            self.push_local(session, &mut state).await?;
            self.pull_remote(session, &mut state, cancel).await?;

            Ok(state.report)
        }
        .instrument(span)
        .await
    }

    async fn push_local(
        &self,
        session: &mut AgentSession,
        state: &mut TickState,
    ) -> Result<(), TickError> {
        let current = self.clipboard.read_text().map_err(TickError::ClipboardRead)?;
        let Some(current) = current else {
            return Ok(());
        };
        if current.trim().is_empty() || session.is_known(&current) {
            return Ok(());
        }

        debug!(bytes = current.len(), "Local clipboard changed");
        match self.remote.push(&current).await {
            Ok(()) => {
                session.remember(current);
                session.health.record_success();
                state.report.pushed = true;
            }
            Err(err) => self.on_remote_error("push", err, session, state).await,
        }
        Ok(())
    }

    async fn pull_remote(
        &self,
        session: &mut AgentSession,
        state: &mut TickState,
        cancel: &CancellationToken,
    ) -> Result<(), TickError> {
        let entry = match self.remote.pull_latest().await {
            Ok(entry) => {
                session.health.record_success();
                entry
            }
            Err(err) => {
                self.on_remote_error("pull", err, session, state).await;
                return Ok(());
            }
        };

        let Some(entry) = entry else {
            return Ok(());
        };

        match entry.content_type {
            ContentType::TypingCommand => {
                let outcome = self.handle_command(&entry, session, cancel).await;
                if outcome == CommandOutcome::Malformed {
                    state.report.protocol_errors += 1;
                }
                state.report.command = Some(outcome);
            }
            ContentType::Text => self.apply_remote_text(entry, session, state)?,
            ContentType::Unsupported => {
                debug!("Ignoring remote entry with unsupported content type");
            }
        }
        Ok(())
    }

    fn apply_remote_text(
        &self,
        entry: ClipboardEntry,
        session: &mut AgentSession,
        state: &mut TickState,
    ) -> Result<(), TickError> {
        if entry.content.is_empty() || session.is_known(&entry.content) {
            return Ok(());
        }

        self.clipboard
            .write_text(&entry.content)
            .map_err(TickError::ClipboardWrite)?;
        info!(bytes = entry.content.len(), "Applied remote clipboard content");
        session.remember(entry.content);
        state.report.applied_remote = true;
        Ok(())
    }

    async fn handle_command(
        &self,
        entry: &ClipboardEntry,
        session: &mut AgentSession,
        cancel: &CancellationToken,
    ) -> CommandOutcome {
        let decision = admit_command(
            entry,
            &mut session.processed,
            &self.staleness,
            &session.start_time,
        );

        match decision {
            CommandDecision::Duplicate(command_id) => CommandOutcome::Duplicate(command_id),
            CommandDecision::Malformed(err) => {
                warn!(error = %err, "Discarding malformed typing command");
                CommandOutcome::Malformed
            }
            CommandDecision::Stale { command_id, lag } => {
                info!(
                    command_id = %command_id,
                    lag_ms = lag.as_millis() as u64,
                    "Ignoring typing command issued before agent start"
                );
                CommandOutcome::Stale(command_id)
            }
            CommandDecision::Execute(command) => {
                info!(command_id = %command.command_id, "Executing typing command");
                match self.executor.execute_command(&command, cancel).await {
                    Ok(TypingOutcome::Typed { .. }) => CommandOutcome::Executed(command.command_id),
                    Ok(TypingOutcome::SkippedEmpty) => {
                        CommandOutcome::SkippedEmpty(command.command_id)
                    }
                    Err(error) => {
                        warn!(
                            command_id = %command.command_id,
                            error = %error,
                            "Typing command failed"
                        );
                        CommandOutcome::Failed {
                            command_id: command.command_id,
                            error,
                        }
                    }
                }
            }
        }
    }

    async fn on_remote_error(
        &self,
        op: &'static str,
        err: RemoteStoreError,
        session: &mut AgentSession,
        state: &mut TickState,
    ) {
        if !err.is_transport() {
            warn!(op, error = %err, "Remote store returned a malformed response");
            state.report.protocol_errors += 1;
            return;
        }

        state.report.transport_failures += 1;
        let transition = session.health.record_failure();
        warn!(
            op,
            error = %err,
            failures = session.health.consecutive_failures(),
            "Remote store request failed"
        );

        if transition == HealthTransition::BecameDegraded {
            warn!("Connection degraded");
            if !state.probed {
                self.probe(session, state).await;
            }
        }
    }

    async fn probe(&self, session: &mut AgentSession, state: &mut TickState) {
        state.probed = true;
        let health = self.remote.probe().await;
        state.report.probe = Some(health);

        match session.health.on_probe(health == ConnectionHealth::Healthy) {
            HealthTransition::Recovered => info!("Connection recovered"),
            _ if health == ConnectionHealth::Degraded => {
                debug!("Probe failed, staying degraded")
            }
            _ => {}
        }
    }
}
