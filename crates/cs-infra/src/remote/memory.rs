//! In-process remote store used by offline mode and tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use cs_core::clipboard::{ClipboardEntry, ContentType};
use cs_core::ids::CommandId;
use cs_core::ports::{
    Credentials, IssuedTypingCommand, NewTypingCommand, RemoteAccountPort, RemoteClient,
    RemoteStoreError, RemoteStorePort, SessionGrant, SessionRequest,
};
use cs_core::sync::ConnectionHealth;
use cs_core::typing::TypingCommand;

#[derive(Default)]
struct MemoryState {
    entries: Vec<ClipboardEntry>,
    users: HashMap<String, String>,
    clients: Vec<RemoteClient>,
}

/// Remote store kept entirely in memory.
///
/// Reachability can be toggled to simulate outages; while unreachable every
/// call fails with a transport error and probes report degraded.
pub struct InMemoryRemoteStore {
    state: Mutex<MemoryState>,
    reachable: AtomicBool,
    pushes: AtomicUsize,
    pulls: AtomicUsize,
    probes: AtomicUsize,
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            reachable: AtomicBool::new(true),
            pushes: AtomicUsize::new(0),
            pulls: AtomicUsize::new(0),
            probes: AtomicUsize::new(0),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    /// Append an entry as if another agent had pushed it.
    pub fn publish(&self, mut entry: ClipboardEntry) {
        let mut state = self.lock();
        entry.id = Some(state.entries.len() as i64 + 1);
        if entry.timestamp.is_none() {
            entry.timestamp = Some(now_stamp());
        }
        state.entries.push(entry);
    }

    /// Publish a typing command stamped with `timestamp`.
    pub fn publish_command(&self, command: &TypingCommand, timestamp: Option<String>) {
        let content = match command.encode() {
            Ok(content) => content,
            Err(_) => return,
        };
        let entry = ClipboardEntry {
            id: None,
            content,
            content_type: ContentType::TypingCommand,
            timestamp: Some(timestamp.unwrap_or_else(now_stamp)),
        };
        self.publish(entry);
    }

    pub fn entries(&self) -> Vec<ClipboardEntry> {
        self.lock().entries.clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn ensure_reachable(&self) -> Result<(), RemoteStoreError> {
        if self.reachable.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(RemoteStoreError::Transport(
                "in-memory store is unreachable".to_string(),
            ))
        }
    }
}

fn now_stamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[async_trait]
impl RemoteStorePort for InMemoryRemoteStore {
    async fn push(&self, content: &str) -> Result<(), RemoteStoreError> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        self.ensure_reachable()?;
        self.publish(ClipboardEntry::text(content));
        Ok(())
    }

    async fn pull_latest(&self) -> Result<Option<ClipboardEntry>, RemoteStoreError> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        self.ensure_reachable()?;
        Ok(self.lock().entries.last().cloned())
    }

    async fn probe(&self) -> ConnectionHealth {
        self.probes.fetch_add(1, Ordering::SeqCst);
        if self.reachable.load(Ordering::SeqCst) {
            ConnectionHealth::Healthy
        } else {
            ConnectionHealth::Degraded
        }
    }
}

#[async_trait]
impl RemoteAccountPort for InMemoryRemoteStore {
    async fn register(&self, credentials: &Credentials) -> Result<(), RemoteStoreError> {
        self.ensure_reachable()?;
        let mut state = self.lock();
        if state.users.contains_key(&credentials.username) {
            return Err(RemoteStoreError::Http {
                status: 409,
                body: "username taken".to_string(),
            });
        }
        state
            .users
            .insert(credentials.username.clone(), credentials.password.clone());
        Ok(())
    }

    async fn create_session(
        &self,
        request: &SessionRequest,
    ) -> Result<SessionGrant, RemoteStoreError> {
        self.ensure_reachable()?;
        let mut state = self.lock();
        match state.users.get(&request.username) {
            Some(password) if *password == request.password => {}
            _ => return Err(RemoteStoreError::Unauthorized),
        }

        if !state
            .clients
            .iter()
            .any(|c| c.client_id == request.client_id)
        {
            state.clients.push(RemoteClient {
                client_id: request.client_id.clone(),
                client_name: Some(request.client_name.clone()),
                last_seen: Some(now_stamp()),
            });
        }

        Ok(SessionGrant {
            token: format!("memory-{}", Uuid::new_v4().simple()),
            user_id: None,
        })
    }

    async fn list_clients(&self) -> Result<Vec<RemoteClient>, RemoteStoreError> {
        self.ensure_reachable()?;
        Ok(self.lock().clients.clone())
    }

    async fn send_typing_command(
        &self,
        command: &NewTypingCommand,
    ) -> Result<IssuedTypingCommand, RemoteStoreError> {
        self.ensure_reachable()?;
        let command_id = CommandId::new(Uuid::new_v4().to_string());
        let typing = TypingCommand::new(
            command_id.clone(),
            command.content.clone(),
            Some(command.typing_speed as i64),
        );
        self.publish_command(&typing, None);
        Ok(IssuedTypingCommand { command_id })
    }
}
