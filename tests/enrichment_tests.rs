//! Async enrichment orchestration: summarize, organize, transcription races

mod common;

use async_trait::async_trait;
use common::{store_with, wait_for, FakeAi};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use zap_notes::ai::{OrganizationService, SummarizationService, TranscriptionService};
use zap_notes::notes::{NoteContent, NoteStore};
use zap_notes::{Result, ZapError};

#[tokio::test]
async fn summarize_success_updates_summary_and_clears_error() {
    let (_dir, fake, store) = store_with(FakeAi::default().with_summary("milk and eggs"));
    store.add_text("buy milk");

    store.summarize().await;

    assert_eq!(store.latest_summary().as_deref(), Some("milk and eggs"));
    assert!(store.last_error().is_none());
    assert!(!store.is_summarizing());
    assert_eq!(
        fake.summarize_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        1
    );
}

#[tokio::test]
async fn summarize_failure_leaves_prior_summary_untouched() {
    let (_dir, fake, store) = store_with(FakeAi::default().with_summary("first summary"));
    store.add_text("buy milk");
    store.summarize().await;
    assert_eq!(store.latest_summary().as_deref(), Some("first summary"));

    // The provider starts failing on the same store
    *fake.summary.lock() = Err("proxy down".to_string());
    let before = store.notes();
    store.summarize().await;

    assert_eq!(store.latest_summary().as_deref(), Some("first summary"));
    assert!(store.last_error().is_some());
    assert!(!store.is_summarizing());
    // The collection itself is untouched by a failed enrichment
    assert_eq!(store.notes(), before);
}

#[tokio::test]
async fn organize_prepends_plan_above_original_notes() {
    let (_dir, _fake, store) =
        store_with(FakeAi::default().with_plan(&["call mom", "buy milk", "send report"]));

    let old_first = store.add_text("scattered thought one");
    let old_head = store.add_text("scattered thought two");

    store.organize_and_plan().await;

    let notes = store.notes();
    assert_eq!(notes.len(), 5);
    assert_eq!(
        notes[0].content,
        NoteContent::Text {
            body: "call mom".to_string()
        }
    );
    assert_eq!(
        notes[1].content,
        NoteContent::Text {
            body: "buy milk".to_string()
        }
    );
    assert_eq!(
        notes[2].content,
        NoteContent::Text {
            body: "send report".to_string()
        }
    );
    // Originals retained below, relative order preserved
    assert_eq!(notes[3].id, old_head);
    assert_eq!(notes[4].id, old_first);
    assert!(!store.is_organizing());
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn organize_failure_sets_error_and_keeps_collection() {
    let (_dir, _fake, store) = store_with(FakeAi::default().failing_plan("proxy down"));
    store.add_text("thought");
    let before = store.notes();

    store.organize_and_plan().await;

    assert_eq!(store.notes(), before);
    assert!(store.last_error().is_some());
    assert!(!store.is_organizing());
}

#[tokio::test]
async fn empty_plan_is_a_success_with_no_new_notes() {
    let (_dir, _fake, store) = store_with(FakeAi::default().with_plan(&[]));
    store.add_text("thought");

    store.organize_and_plan().await;

    assert_eq!(store.len(), 1);
    assert!(store.last_error().is_none());
}

#[tokio::test]
async fn manual_edit_wins_over_late_transcription() {
    let (_dir, _fake, store) = store_with(
        FakeAi::default()
            .with_transcript("late automatic text")
            .with_transcribe_delay(Duration::from_millis(150)),
    );
    store.media().write("rec1.m4a", b"audio bytes").unwrap();

    let id = store.add_audio("rec1.m4a", 3.0);
    store.update_transcription(id, "manual edit");

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(
        store.get(id).unwrap().transcription.as_deref(),
        Some("manual edit")
    );
}

#[tokio::test]
async fn transcription_skips_network_when_media_is_missing() {
    let (_dir, fake, store) = store_with(FakeAi::default());

    let id = store.add_text("not audio");
    let err = store.transcribe(id).await.unwrap_err();
    assert!(matches!(err, ZapError::WrongContentType(_)));

    // add_audio's automatic attempt also fails locally: the file was never written
    let audio = store.add_audio("ghost.m4a", 1.0);
    tokio::time::sleep(Duration::from_millis(100)).await;
    let err = store.transcribe(audio).await.unwrap_err();
    assert!(matches!(err, ZapError::MediaMissing(_)));
    assert_eq!(
        fake.transcribe_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        0
    );

    let unknown = store.transcribe(uuid::Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(unknown, ZapError::NoteNotFound(_)));
}

#[tokio::test]
async fn manual_retry_fills_in_failed_transcription() {
    let (_dir, fake, store) = store_with(FakeAi::default().with_transcript("second time lucky"));
    *fake.transcript.lock() = Err("provider hiccup".to_string());
    store.media().write("rec1.m4a", b"audio bytes").unwrap();

    let id = store.add_audio("rec1.m4a", 2.0);
    assert!(
        wait_for({
            let fake = fake.clone();
            move || fake.transcribe_calls.load(std::sync::atomic::Ordering::SeqCst) >= 1
        })
        .await
    );
    assert!(store.get(id).unwrap().transcription.is_none());

    *fake.transcript.lock() = Ok("second time lucky".to_string());
    store.transcribe(id).await.unwrap();

    assert_eq!(
        store.get(id).unwrap().transcription.as_deref(),
        Some("second time lucky")
    );
}

#[tokio::test]
async fn deleting_note_during_transcription_is_tolerated() {
    let (_dir, _fake, store) = store_with(
        FakeAi::default()
            .with_transcript("too late")
            .with_transcribe_delay(Duration::from_millis(100)),
    );
    store.media().write("rec1.m4a", b"audio bytes").unwrap();

    let id = store.add_audio("rec1.m4a", 2.0);
    store.delete(id);

    tokio::time::sleep(Duration::from_millis(300)).await;

    assert!(store.is_empty());
    assert!(store.get(id).is_none());
}

/// Summarizer that replays scripted (delay, result) responses in call order
struct ScriptedSummarizer {
    responses: Mutex<VecDeque<(Duration, std::result::Result<String, String>)>>,
}

#[async_trait]
impl TranscriptionService for ScriptedSummarizer {
    async fn transcribe(&self, _file_name: &str, _audio: Vec<u8>) -> Result<String> {
        Err(ZapError::TranscriptionError("not scripted".to_string()))
    }
}

#[async_trait]
impl SummarizationService for ScriptedSummarizer {
    async fn summarize(&self, _digest: &str) -> Result<String> {
        let (delay, result) = self
            .responses
            .lock()
            .pop_front()
            .expect("unscripted summarize call");
        tokio::time::sleep(delay).await;
        result.map_err(ZapError::SummarizationError)
    }
}

#[async_trait]
impl OrganizationService for ScriptedSummarizer {
    async fn organize(&self, _digest: &str) -> Result<Vec<String>> {
        Err(ZapError::OrganizationError("not scripted".to_string()))
    }
}

#[tokio::test]
async fn superseded_summary_is_dropped() {
    let scripted = ScriptedSummarizer {
        responses: Mutex::new(VecDeque::from(vec![
            (Duration::from_millis(200), Ok("stale".to_string())),
            (Duration::ZERO, Ok("fresh".to_string())),
        ])),
    };
    let dir = tempfile::tempdir().unwrap();
    let store = NoteStore::open(dir.path(), Arc::new(scripted)).unwrap();
    store.add_text("buy milk");

    let slow = {
        let store = store.clone();
        tokio::spawn(async move { store.summarize().await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    store.summarize().await;

    assert_eq!(store.latest_summary().as_deref(), Some("fresh"));

    // The slow first request finishes and must not clobber the newer result
    slow.await.unwrap();
    assert_eq!(store.latest_summary().as_deref(), Some("fresh"));
    assert!(!store.is_summarizing());
}
