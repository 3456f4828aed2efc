//! AI enrichment collaborators
//!
//! The store never talks to the proxy directly; it is handed an enricher
//! implementing these capability traits. Production uses [`ProxyClient`];
//! tests inject fakes.

pub mod client;
pub mod config;
pub mod prompts;

pub use client::ProxyClient;
pub use config::ProxyConfig;

use crate::Result;
use async_trait::async_trait;

/// Speech-to-text over a finished audio recording
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribe the given audio bytes; `file_name` is forwarded so the
    /// provider can infer the container format
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> Result<String>;
}

/// Natural-language summary of a notes digest
#[async_trait]
pub trait SummarizationService: Send + Sync {
    async fn summarize(&self, digest: &str) -> Result<String>;
}

/// Restructure a notes digest into short actionable entries
#[async_trait]
pub trait OrganizationService: Send + Sync {
    async fn organize(&self, digest: &str) -> Result<Vec<String>>;
}

/// Full enrichment capability set expected by the note store
pub trait NoteEnricher:
    TranscriptionService + SummarizationService + OrganizationService
{
}

impl<T> NoteEnricher for T where
    T: TranscriptionService + SummarizationService + OrganizationService
{
}
