//! Background worker lifecycle for the sync loop.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn, Instrument};

use cs_core::ports::{ClockPort, RemoteStorePort, SettingsPort};
use cs_core::settings::Settings;
use cs_core::sync::{AgentSession, ConnectionHealth};

use super::reconciler::ClipboardReconciler;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("sync agent is already running")]
    AlreadyRunning,

    #[error("sync agent is not running")]
    NotRunning,

    #[error("server is unreachable")]
    ServerUnreachable,

    #[error("not logged in; run `clipsync login` first")]
    NotLoggedIn,

    #[error("failed to load settings: {0:#}")]
    Settings(anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct SyncAgentConfig {
    pub interval: Duration,
    pub error_cooldown: Duration,
    pub stop_join_timeout: Duration,
    pub dedup_capacity: usize,
    pub failure_threshold: u32,
    /// Refuse to start without a stored session token.
    pub require_session: bool,
}

impl From<&Settings> for SyncAgentConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            interval: settings.sync.interval(),
            error_cooldown: settings.sync.error_cooldown(),
            stop_join_timeout: settings.sync.stop_join_timeout(),
            dedup_capacity: settings.commands.dedup_capacity,
            failure_threshold: settings.sync.failure_threshold,
            require_session: true,
        }
    }
}

/// How `stop` ended.
#[derive(Debug)]
pub enum StopOutcome {
    /// The worker exited at a tick boundary; its final session is returned.
    Joined(Box<AgentSession>),
    /// The worker did not exit within the join timeout and was aborted.
    Aborted,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<AgentSession>,
}

/// Owns the single background sync worker.
///
/// ## Behavior
/// - `start` probes the server, builds a fresh [`AgentSession`] and spawns the loop
/// - `start` while a worker is alive fails with [`AgentError::AlreadyRunning`]
/// - `stop` cancels the worker and waits at most `stop_join_timeout`, so the
///   caller blocks for at most one in-flight tick bounded by that timeout
/// - The worker lock is held across both, so a restart never overlaps a tick
pub struct SyncAgent {
    remote: Arc<dyn RemoteStorePort>,
    reconciler: Arc<ClipboardReconciler>,
    settings: Arc<dyn SettingsPort>,
    clock: Arc<dyn ClockPort>,
    config: SyncAgentConfig,
    worker: Mutex<Option<Worker>>,
}

impl SyncAgent {
    pub fn new(
        remote: Arc<dyn RemoteStorePort>,
        reconciler: Arc<ClipboardReconciler>,
        settings: Arc<dyn SettingsPort>,
        clock: Arc<dyn ClockPort>,
        config: SyncAgentConfig,
    ) -> Self {
        Self {
            remote,
            reconciler,
            settings,
            clock,
            config,
            worker: Mutex::new(None),
        }
    }

    pub async fn is_running(&self) -> bool {
        self.worker
            .lock()
            .await
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished())
    }

    pub async fn start(&self) -> Result<(), AgentError> {
        let span = info_span!("usecase.sync_agent.start");

        async {
            let mut worker = self.worker.lock().await;
            if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
                return Err(AgentError::AlreadyRunning);
            }

            if self.config.require_session {
                let settings = self.settings.load().await.map_err(AgentError::Settings)?;
                if !settings.account.has_session() {
                    return Err(AgentError::NotLoggedIn);
                }
            }

            if self.remote.probe().await != ConnectionHealth::Healthy {
                warn!("Server probe failed; not starting");
                return Err(AgentError::ServerUnreachable);
            }

            let mut session = AgentSession::new(
                self.clock.now(),
                self.config.dedup_capacity,
                self.config.failure_threshold,
            );
            self.reconciler.seed_baseline(&mut session);

            let cancel = CancellationToken::new();
            let handle = tokio::spawn(run_loop(
                self.reconciler.clone(),
                session,
                cancel.clone(),
                self.config.interval,
                self.config.error_cooldown,
            ));

            *worker = Some(Worker { cancel, handle });
            info!(
                interval_ms = self.config.interval.as_millis() as u64,
                "Sync agent started"
            );
            Ok(())
        }
        .instrument(span)
        .await
    }

    pub async fn stop(&self) -> Result<StopOutcome, AgentError> {
        let span = info_span!("usecase.sync_agent.stop");

        async {
            let mut guard = self.worker.lock().await;
            let Some(Worker { cancel, mut handle }) = guard.take() else {
                return Err(AgentError::NotRunning);
            };

            cancel.cancel();
            match tokio::time::timeout(self.config.stop_join_timeout, &mut handle).await {
                Ok(Ok(session)) => {
                    info!(
                        processed_commands = session.processed.len(),
                        "Sync agent stopped"
                    );
                    Ok(StopOutcome::Joined(Box::new(session)))
                }
                Ok(Err(join_err)) => {
                    error!(error = %join_err, "Sync worker ended abnormally");
                    Ok(StopOutcome::Aborted)
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.config.stop_join_timeout.as_millis() as u64,
                        "Sync worker did not stop in time; aborting"
                    );
                    handle.abort();
                    Ok(StopOutcome::Aborted)
                }
            }
        }
        .instrument(span)
        .await
    }
}

async fn run_loop(
    reconciler: Arc<ClipboardReconciler>,
    mut session: AgentSession,
    cancel: CancellationToken,
    interval: Duration,
    error_cooldown: Duration,
) -> AgentSession {
    while !cancel.is_cancelled() {
        // Remote failures are absorbed by the health tracker and keep the
        // normal cadence; only a fault that aborts the tick cools down.
        let pause = match reconciler.tick(&mut session, &cancel).await {
            Ok(report) => {
                if report.had_transport_fault() {
                    debug!(
                        failures = report.transport_failures,
                        health = ?session.health.state(),
                        "Tick finished with remote errors"
                    );
                }
                interval
            }
            Err(err) => {
                warn!(
                    error = %err,
                    cooldown_ms = error_cooldown.as_millis() as u64,
                    "Tick failed; cooling down"
                );
                error_cooldown
            }
        };

        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(pause) => {}
        }
    }
    session
}
