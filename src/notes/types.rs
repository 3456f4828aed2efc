use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content payload of a note, tagged by capture kind.
///
/// The `type` discriminator is part of the manifest wire format and must stay
/// stable when new kinds are added. Media-backed variants carry a relative
/// filename (`media_ref`), never an absolute path, so the manifest survives
/// storage-directory relocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteContent {
    Text {
        body: String,
    },
    Audio {
        media_ref: String,
        duration_seconds: f64,
    },
    Photo {
        media_ref: String,
    },
    Video {
        media_ref: String,
        duration_seconds: f64,
    },
}

impl NoteContent {
    /// Human-readable kind name, matching the wire discriminator
    pub fn kind(&self) -> &'static str {
        match self {
            NoteContent::Text { .. } => "text",
            NoteContent::Audio { .. } => "audio",
            NoteContent::Photo { .. } => "photo",
            NoteContent::Video { .. } => "video",
        }
    }

    /// Relative filename of the backing media blob, if any
    pub fn media_ref(&self) -> Option<&str> {
        match self {
            NoteContent::Text { .. } => None,
            NoteContent::Audio { media_ref, .. } => Some(media_ref),
            NoteContent::Photo { media_ref } => Some(media_ref),
            NoteContent::Video { media_ref, .. } => Some(media_ref),
        }
    }

    /// Recorded duration for audio/video content
    pub fn duration_seconds(&self) -> Option<f64> {
        match self {
            NoteContent::Audio {
                duration_seconds, ..
            }
            | NoteContent::Video {
                duration_seconds, ..
            } => Some(*duration_seconds),
            _ => None,
        }
    }
}

/// A single captured note plus its task/enrichment metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub content: NoteContent,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub transcription: Option<String>,
}

impl Note {
    /// Create a new note with a fresh id and the current timestamp
    pub fn new(content: NoteContent) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            content,
            is_completed: false,
            transcription: None,
        }
    }

    /// Create a text note
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(NoteContent::Text { body: body.into() })
    }

    /// Create an audio note referencing a finished recording
    pub fn audio(media_ref: impl Into<String>, duration_seconds: f64) -> Self {
        Self::new(NoteContent::Audio {
            media_ref: media_ref.into(),
            duration_seconds,
        })
    }

    /// Create a photo note
    pub fn photo(media_ref: impl Into<String>) -> Self {
        Self::new(NoteContent::Photo {
            media_ref: media_ref.into(),
        })
    }

    /// Create a video note
    pub fn video(media_ref: impl Into<String>, duration_seconds: f64) -> Self {
        Self::new(NoteContent::Video {
            media_ref: media_ref.into(),
            duration_seconds,
        })
    }

    /// Renderable text fragment for summary/organize digests.
    ///
    /// Text notes contribute their body verbatim; audio notes contribute the
    /// transcription when one exists; media without usable text falls back to
    /// a filename placeholder.
    pub fn digest_fragment(&self) -> String {
        match &self.content {
            NoteContent::Text { body } => body.clone(),
            NoteContent::Audio { media_ref, .. } => match &self.transcription {
                Some(text) => text.clone(),
                None => format!("Audio: {}", media_ref),
            },
            NoteContent::Photo { media_ref } => format!("Image: {}", media_ref),
            NoteContent::Video { media_ref, .. } => format!("Video: {}", media_ref),
        }
    }
}

/// Build the plain-text digest of a collection, in collection order
pub fn render_digest(notes: &[Note]) -> String {
    let mut digest = String::new();
    for note in notes {
        digest.push_str(&note.digest_fragment());
        digest.push_str("\n\n");
    }
    digest
}
