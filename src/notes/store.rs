//! The note store
//!
//! Single owner of the ordered note collection. Local mutations are applied
//! synchronously and re-persist the whole manifest; enrichment (transcription,
//! summarization, organization) runs as independent async calls against the
//! injected enricher and reports back through store state and events.
//!
//! Summarize and organize carry a generation counter: starting a new request
//! supersedes any in-flight one, and a superseded result is dropped instead of
//! racing the newer call for shared state.

use super::events::{EventFeed, StoreEvent};
use super::manifest::Manifest;
use super::types::{render_digest, Note, NoteContent};
use crate::ai::{NoteEnricher, OrganizationService, SummarizationService, TranscriptionService};
use crate::media::MediaStorage;
use crate::{Result, ZapError};
use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    notes: Vec<Note>,
    is_capturing_audio: bool,
    is_summarizing: bool,
    is_organizing: bool,
    last_error: Option<String>,
    latest_summary: Option<String>,
}

/// Owner of the note collection and its manifest
#[derive(Clone)]
pub struct NoteStore {
    state: Arc<RwLock<StoreState>>,
    manifest: Manifest,
    media: MediaStorage,
    enricher: Arc<dyn NoteEnricher>,
    summarize_gen: Arc<AtomicU64>,
    organize_gen: Arc<AtomicU64>,
    events: EventFeed,
}

impl NoteStore {
    /// Open a store over the given managed storage directory.
    ///
    /// Creates the directory if needed and loads the existing manifest; a
    /// missing or unreadable manifest yields an empty collection.
    pub fn open(dir: impl AsRef<Path>, enricher: Arc<dyn NoteEnricher>) -> Result<Self> {
        let media = MediaStorage::open(dir.as_ref())?;
        let manifest = Manifest::new(media.root());
        let notes = manifest.load();
        info!("Note store opened with {} notes", notes.len());

        Ok(Self {
            state: Arc::new(RwLock::new(StoreState {
                notes,
                ..Default::default()
            })),
            manifest,
            media,
            enricher,
            summarize_gen: Arc::new(AtomicU64::new(0)),
            organize_gen: Arc::new(AtomicU64::new(0)),
            events: EventFeed::new(),
        })
    }

    // --- snapshots and transient flags ---

    /// Snapshot of the collection, most recent first
    pub fn notes(&self) -> Vec<Note> {
        self.state.read().notes.clone()
    }

    /// Look up a single note by id
    pub fn get(&self, note_id: Uuid) -> Option<Note> {
        self.state.read().notes.iter().find(|n| n.id == note_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().notes.is_empty()
    }

    /// Event feed for the rendering layer
    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.events.receiver()
    }

    /// Managed media storage backing this store
    pub fn media(&self) -> &MediaStorage {
        &self.media
    }

    /// Whether the note's media blob is present in managed storage.
    ///
    /// Always true for text notes. A missing blob is a rendering condition
    /// for the UI, not an error.
    pub fn media_available(&self, note: &Note) -> bool {
        match note.content.media_ref() {
            Some(media_ref) => self.media.exists(media_ref),
            None => true,
        }
    }

    pub fn is_capturing_audio(&self) -> bool {
        self.state.read().is_capturing_audio
    }

    pub fn set_capturing_audio(&self, capturing: bool) {
        self.state.write().is_capturing_audio = capturing;
    }

    pub fn is_summarizing(&self) -> bool {
        self.state.read().is_summarizing
    }

    pub fn is_organizing(&self) -> bool {
        self.state.read().is_organizing
    }

    pub fn latest_summary(&self) -> Option<String> {
        self.state.read().latest_summary.clone()
    }

    pub fn last_error(&self) -> Option<String> {
        self.state.read().last_error.clone()
    }

    // --- local mutations ---

    /// Add a text note at the head of the collection
    pub fn add_text(&self, body: impl Into<String>) -> Uuid {
        self.insert_at_head(Note::text(body))
    }

    /// Add an audio note and kick off automatic transcription.
    ///
    /// Returns immediately; the transcription result lands later via a
    /// mutation to the note's `transcription` field. Without an async runtime
    /// the automatic pass is skipped and transcription stays available
    /// through the manual [`NoteStore::transcribe`] retry.
    pub fn add_audio(&self, media_ref: impl Into<String>, duration_seconds: f64) -> Uuid {
        let note_id = self.insert_at_head(Note::audio(media_ref, duration_seconds));

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.clone();
                handle.spawn(async move {
                    if let Err(e) = store.transcribe(note_id).await {
                        debug!("Automatic transcription for {} failed: {}", note_id, e);
                    }
                });
            }
            Err(_) => debug!("No async runtime; skipping automatic transcription"),
        }

        note_id
    }

    /// Add a photo note at the head of the collection
    pub fn add_photo(&self, media_ref: impl Into<String>) -> Uuid {
        self.insert_at_head(Note::photo(media_ref))
    }

    /// Add a video note at the head of the collection
    pub fn add_video(&self, media_ref: impl Into<String>, duration_seconds: f64) -> Uuid {
        self.insert_at_head(Note::video(media_ref, duration_seconds))
    }

    /// Flip the completion flag on a note; no-op for unknown ids
    pub fn toggle_completion(&self, note_id: Uuid) {
        self.mutate_note(note_id, |note| {
            note.is_completed = !note.is_completed;
        });
    }

    /// Set the transcription text on a note.
    ///
    /// This is the manual-edit path and always applies; automatic results go
    /// through the enrichment flow, which yields to text already present.
    pub fn update_transcription(&self, note_id: Uuid, text: impl Into<String>) {
        let text = text.into();
        self.mutate_note(note_id, move |note| {
            note.transcription = Some(text);
        });
    }

    /// Replace the body of a text note; warns and leaves the collection
    /// untouched for any other content kind
    pub fn edit_text(&self, note_id: Uuid, new_body: impl Into<String>) {
        let new_body = new_body.into();
        self.mutate_note(note_id, move |note| match &mut note.content {
            NoteContent::Text { body } => *body = new_body,
            other => warn!(
                "Ignoring text edit for {} note {}",
                other.kind(),
                note.id
            ),
        });
    }

    /// Point a photo note at a new media file (e.g. after annotation),
    /// preserving id, timestamp, completion, and transcription
    pub fn replace_media(&self, note_id: Uuid, new_media_ref: impl Into<String>) {
        let new_media_ref = new_media_ref.into();
        self.mutate_note(note_id, move |note| match &mut note.content {
            NoteContent::Photo { media_ref } => *media_ref = new_media_ref,
            other => warn!(
                "Ignoring media replacement for {} note {}",
                other.kind(),
                note.id
            ),
        });
    }

    /// Remove a note and best-effort delete its media blob.
    ///
    /// The manifest is persisted regardless of the media-deletion outcome;
    /// an orphaned blob is an accepted gap.
    pub fn delete(&self, note_id: Uuid) {
        let (removed, snapshot) = {
            let mut state = self.state.write();
            let Some(index) = state.notes.iter().position(|n| n.id == note_id) else {
                debug!("Delete for unknown note {}", note_id);
                return;
            };
            let removed = state.notes.remove(index);
            (removed, state.notes.clone())
        };

        if let Some(media_ref) = removed.content.media_ref() {
            self.media.remove(media_ref);
        }

        self.persist(&snapshot);
        self.events.emit(StoreEvent::NotesChanged);
    }

    // --- enrichment ---

    /// Transcribe an audio note's recording.
    ///
    /// Invoked automatically after [`NoteStore::add_audio`] and manually as a
    /// retry. Missing note, wrong content kind, or missing media file fail
    /// locally without a network call.
    pub async fn transcribe(&self, note_id: Uuid) -> Result<()> {
        let media_ref = {
            let state = self.state.read();
            let note = state
                .notes
                .iter()
                .find(|n| n.id == note_id)
                .ok_or(ZapError::NoteNotFound(note_id))?;
            match &note.content {
                NoteContent::Audio { media_ref, .. } => media_ref.clone(),
                other => {
                    return Err(ZapError::WrongContentType(format!(
                        "expected audio, got {}",
                        other.kind()
                    )))
                }
            }
        };

        let audio = self.media.read(&media_ref)?;

        match self.enricher.transcribe(&media_ref, audio).await {
            Ok(text) => {
                self.apply_transcription(note_id, text);
                Ok(())
            }
            Err(e) => {
                warn!("Transcription failed for note {}: {}", note_id, e);
                self.events.emit(StoreEvent::TranscriptionFailed {
                    note_id,
                    error: e.user_message(),
                });
                Err(e)
            }
        }
    }

    /// Summarize the current collection.
    ///
    /// Runs to a terminal state: on success `latest_summary` is replaced and
    /// `last_error` cleared; on failure `last_error` carries an advisory
    /// message. Either way `is_summarizing` returns to false. A call that has
    /// been superseded by a newer one drops its result silently.
    pub async fn summarize(&self) {
        let generation = self.summarize_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let digest = {
            let mut state = self.state.write();
            state.is_summarizing = true;
            render_digest(&state.notes)
        };

        info!("Summarize request started (generation {})", generation);
        let result = self.enricher.summarize(&digest).await;

        if self.summarize_gen.load(Ordering::SeqCst) != generation {
            debug!("Dropping superseded summary (generation {})", generation);
            return;
        }

        match result {
            Ok(summary) => {
                {
                    let mut state = self.state.write();
                    state.is_summarizing = false;
                    state.latest_summary = Some(summary);
                    state.last_error = None;
                }
                self.events.emit(StoreEvent::SummaryReady);
            }
            Err(e) => {
                warn!("Summarize failed: {}", e);
                let message = e.user_message();
                {
                    let mut state = self.state.write();
                    state.is_summarizing = false;
                    state.last_error = Some(message.clone());
                }
                self.events.emit(StoreEvent::SummaryFailed { error: message });
            }
        }
    }

    /// Organize the current collection into a task plan.
    ///
    /// Synthesized entries become new text notes prepended above the
    /// existing collection; the originals are retained untouched. Failure
    /// and supersession behave as in [`NoteStore::summarize`].
    pub async fn organize_and_plan(&self) {
        let generation = self.organize_gen.fetch_add(1, Ordering::SeqCst) + 1;
        let digest = {
            let mut state = self.state.write();
            state.is_organizing = true;
            render_digest(&state.notes)
        };

        info!("Organize request started (generation {})", generation);
        let result = self.enricher.organize(&digest).await;

        if self.organize_gen.load(Ordering::SeqCst) != generation {
            debug!("Dropping superseded plan (generation {})", generation);
            return;
        }

        match result {
            Ok(entries) => {
                let added = entries.len();
                let snapshot = {
                    let mut state = self.state.write();
                    state.is_organizing = false;
                    state.last_error = None;
                    for entry in entries.into_iter().rev() {
                        state.notes.insert(0, Note::text(entry));
                    }
                    state.notes.clone()
                };
                info!("Organize added {} planned notes", added);
                self.persist(&snapshot);
                self.events.emit(StoreEvent::PlanReady { added });
                self.events.emit(StoreEvent::NotesChanged);
            }
            Err(e) => {
                warn!("Organize failed: {}", e);
                let message = e.user_message();
                {
                    let mut state = self.state.write();
                    state.is_organizing = false;
                    state.last_error = Some(message.clone());
                }
                self.events.emit(StoreEvent::PlanFailed { error: message });
            }
        }
    }

    // --- internals ---

    fn insert_at_head(&self, note: Note) -> Uuid {
        let note_id = note.id;
        debug!("Adding {} note {}", note.content.kind(), note_id);
        let snapshot = {
            let mut state = self.state.write();
            state.notes.insert(0, note);
            state.notes.clone()
        };
        self.persist(&snapshot);
        self.events.emit(StoreEvent::NotesChanged);
        note_id
    }

    /// Apply a mutation to one note and re-persist; no-op for unknown ids
    fn mutate_note(&self, note_id: Uuid, mutate: impl FnOnce(&mut Note)) {
        let snapshot = {
            let mut state = self.state.write();
            let Some(note) = state.notes.iter_mut().find(|n| n.id == note_id) else {
                debug!("Mutation for unknown note {}", note_id);
                return;
            };
            mutate(note);
            state.notes.clone()
        };
        self.persist(&snapshot);
        self.events.emit(StoreEvent::NotesChanged);
    }

    /// Record an automatic transcription result.
    ///
    /// Yields to any text already present so a manual edit is never clobbered
    /// by a late-arriving result, and tolerates the note having been deleted
    /// while the request was in flight.
    fn apply_transcription(&self, note_id: Uuid, text: String) {
        let snapshot = {
            let mut state = self.state.write();
            let Some(note) = state.notes.iter_mut().find(|n| n.id == note_id) else {
                debug!("Note {} deleted before transcription arrived", note_id);
                return;
            };
            if note.transcription.is_some() {
                debug!("Note {} already has text, keeping it", note_id);
                return;
            }
            note.transcription = Some(text);
            state.notes.clone()
        };
        self.persist(&snapshot);
        self.events.emit(StoreEvent::TranscriptionReady { note_id });
        self.events.emit(StoreEvent::NotesChanged);
    }

    /// Persist the given snapshot; write failures are logged, not raised
    fn persist(&self, notes: &[Note]) {
        if let Err(e) = self.manifest.save(notes) {
            warn!("Failed to persist manifest: {}", e);
        }
    }
}
