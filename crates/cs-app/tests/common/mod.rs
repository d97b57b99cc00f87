#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local};

use cs_app::{ClipboardReconciler, SyncAgent, SyncAgentConfig, TypingCapability, TypingExecutor};
use cs_core::ports::{
    ClockPort, KeystrokeEmitterPort, KeystrokeError, RemoteStorePort, SettingsPort,
    SystemClipboardPort,
};
use cs_core::settings::Settings;
use cs_core::sync::StalenessFilter;

#[derive(Default)]
pub struct FakeClipboard {
    text: Mutex<Option<String>>,
    writes: Mutex<Vec<String>>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
}

impl FakeClipboard {
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn set(&self, text: &str) {
        *self.text.lock().unwrap() = Some(text.to_string());
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

impl SystemClipboardPort for FakeClipboard {
    fn read_text(&self) -> anyhow::Result<Option<String>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            anyhow::bail!("clipboard is locked by another process");
        }
        Ok(self.text.lock().unwrap().clone())
    }

    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        *self.text.lock().unwrap() = Some(text.to_string());
        self.writes.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingEmitter {
    typed: Mutex<Vec<String>>,
}

impl RecordingEmitter {
    pub fn typed(&self) -> Vec<String> {
        self.typed.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeystrokeEmitterPort for RecordingEmitter {
    async fn emit(&self, text: &str, _per_char_delay: Duration) -> Result<(), KeystrokeError> {
        self.typed.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct SettableClock {
    now: Mutex<DateTime<Local>>,
}

impl SettableClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap() = now;
    }
}

impl ClockPort for SettableClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }
}

pub struct MemorySettings {
    inner: Mutex<Settings>,
}

impl MemorySettings {
    pub fn logged_in() -> Self {
        let mut settings = Settings::default();
        settings.account.username = Some("alice".into());
        settings.account.session_token = Some("token".into());
        Self {
            inner: Mutex::new(settings),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            inner: Mutex::new(Settings::default()),
        }
    }
}

#[async_trait]
impl SettingsPort for MemorySettings {
    async fn load(&self) -> anyhow::Result<Settings> {
        Ok(self.inner.lock().unwrap().clone())
    }

    async fn save(&self, settings: &Settings) -> anyhow::Result<()> {
        *self.inner.lock().unwrap() = settings.clone();
        Ok(())
    }
}

pub struct AgentHarness {
    pub clipboard: Arc<FakeClipboard>,
    pub emitter: Arc<RecordingEmitter>,
    pub clock: Arc<SettableClock>,
    pub agent: SyncAgent,
}

pub fn agent_config() -> SyncAgentConfig {
    SyncAgentConfig {
        interval: Duration::from_secs(2),
        error_cooldown: Duration::from_secs(5),
        stop_join_timeout: Duration::from_secs(5),
        dedup_capacity: 100,
        failure_threshold: 3,
        require_session: true,
    }
}

pub fn build_agent(remote: Arc<dyn RemoteStorePort>, settings: Arc<dyn SettingsPort>) -> AgentHarness {
    let clipboard = Arc::new(FakeClipboard::default());
    let emitter = Arc::new(RecordingEmitter::default());
    let clock = Arc::new(SettableClock::new(Local::now()));

    let executor = Arc::new(TypingExecutor::new(
        TypingCapability::Direct(emitter.clone()),
        Duration::from_millis(100),
        Duration::from_secs(3),
    ));
    let reconciler = Arc::new(ClipboardReconciler::new(
        remote.clone(),
        clipboard.clone(),
        executor,
        StalenessFilter::default(),
    ));
    let agent = SyncAgent::new(remote, reconciler, settings, clock.clone(), agent_config());

    AgentHarness {
        clipboard,
        emitter,
        clock,
        agent,
    }
}
