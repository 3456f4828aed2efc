//! Shared test fixtures: a configurable fake enricher and store setup
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use zap_notes::ai::{OrganizationService, SummarizationService, TranscriptionService};
use zap_notes::notes::NoteStore;
use zap_notes::{Result, ZapError};

type Scripted<T> = std::result::Result<T, String>;

/// Fake enricher with scriptable responses and optional latency
pub struct FakeAi {
    pub transcript: Mutex<Scripted<String>>,
    pub summary: Mutex<Scripted<String>>,
    pub plan: Mutex<Scripted<Vec<String>>>,
    pub transcribe_delay: Mutex<Duration>,
    pub transcribe_calls: AtomicUsize,
    pub summarize_calls: AtomicUsize,
    pub organize_calls: AtomicUsize,
}

impl Default for FakeAi {
    fn default() -> Self {
        Self {
            transcript: Mutex::new(Ok("fake transcription".to_string())),
            summary: Mutex::new(Ok("fake summary".to_string())),
            plan: Mutex::new(Ok(Vec::new())),
            transcribe_delay: Mutex::new(Duration::ZERO),
            transcribe_calls: AtomicUsize::new(0),
            summarize_calls: AtomicUsize::new(0),
            organize_calls: AtomicUsize::new(0),
        }
    }
}

impl FakeAi {
    pub fn with_transcript(self, text: &str) -> Self {
        *self.transcript.lock() = Ok(text.to_string());
        self
    }

    pub fn with_transcribe_delay(self, delay: Duration) -> Self {
        *self.transcribe_delay.lock() = delay;
        self
    }

    pub fn with_summary(self, text: &str) -> Self {
        *self.summary.lock() = Ok(text.to_string());
        self
    }

    pub fn failing_summary(self, message: &str) -> Self {
        *self.summary.lock() = Err(message.to_string());
        self
    }

    pub fn with_plan(self, entries: &[&str]) -> Self {
        *self.plan.lock() = Ok(entries.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn failing_plan(self, message: &str) -> Self {
        *self.plan.lock() = Err(message.to_string());
        self
    }
}

#[async_trait]
impl TranscriptionService for FakeAi {
    async fn transcribe(&self, _file_name: &str, _audio: Vec<u8>) -> Result<String> {
        self.transcribe_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.transcribe_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.transcript
            .lock()
            .clone()
            .map_err(ZapError::TranscriptionError)
    }
}

#[async_trait]
impl SummarizationService for FakeAi {
    async fn summarize(&self, _digest: &str) -> Result<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        self.summary
            .lock()
            .clone()
            .map_err(ZapError::SummarizationError)
    }
}

#[async_trait]
impl OrganizationService for FakeAi {
    async fn organize(&self, _digest: &str) -> Result<Vec<String>> {
        self.organize_calls.fetch_add(1, Ordering::SeqCst);
        self.plan
            .lock()
            .clone()
            .map_err(ZapError::OrganizationError)
    }
}

/// Open a store over a fresh temp directory with the given fake
pub fn store_with(fake: FakeAi) -> (tempfile::TempDir, Arc<FakeAi>, NoteStore) {
    let dir = tempfile::tempdir().unwrap();
    let fake = Arc::new(fake);
    let store = NoteStore::open(dir.path(), fake.clone()).unwrap();
    (dir, fake, store)
}

/// Poll until `predicate` holds or the deadline passes
pub async fn wait_for(predicate: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    predicate()
}
