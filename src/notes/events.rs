//! Store events for the UI layer
//!
//! The store publishes coarse-grained events over per-subscriber channels so
//! the rendering layer can refresh without polling. Events are advisory;
//! missing one only delays a refresh, so sends never block. With no
//! subscribers an event is dropped outright rather than queued, and a
//! disconnected subscriber is pruned on the next emit.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::sync::Arc;
use uuid::Uuid;

/// Events emitted by the note store
#[derive(Debug, Clone)]
pub enum StoreEvent {
    /// The collection or a note's metadata changed
    NotesChanged,

    /// Automatic transcription completed for a note
    TranscriptionReady { note_id: Uuid },

    /// Automatic transcription failed for a note
    TranscriptionFailed { note_id: Uuid, error: String },

    /// A summary request completed
    SummaryReady,

    /// A summary request failed
    SummaryFailed { error: String },

    /// An organize request completed, prepending `added` synthesized notes
    PlanReady { added: usize },

    /// An organize request failed
    PlanFailed { error: String },
}

/// Fan-out of store events to registered observers
#[derive(Debug, Clone, Default)]
pub struct EventFeed {
    subscribers: Arc<Mutex<Vec<Sender<StoreEvent>>>>,
}

impl EventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver an event to every live subscriber, pruning disconnected ones
    pub fn emit(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    /// Register an observer; it sees the stream from this point onward
    pub fn receiver(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }
}
