// Shared test doubles: stub media capabilities and a recording chat sink.
#![allow(dead_code)]

use anyhow::{bail, Result};
use polysub::{
    ChatSink, JobStatusView, MediaToolkit, MediaTrack, ProgressSink, SubtitleSegment,
    Transcriber, Translator,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Media toolkit that just writes placeholder artifacts.
pub struct StubMedia;

#[async_trait::async_trait]
impl MediaToolkit for StubMedia {
    async fn analyze_media(&self, _file: &Path) -> Result<Vec<MediaTrack>> {
        Ok(vec![
            MediaTrack {
                index: 0,
                kind: "video".to_string(),
                codec: "h264".to_string(),
                lang: "und".to_string(),
                is_default: true,
                is_forced: false,
                title: String::new(),
            },
            MediaTrack {
                index: 1,
                kind: "audio".to_string(),
                codec: "aac".to_string(),
                lang: "en".to_string(),
                is_default: true,
                is_forced: false,
                title: String::new(),
            },
        ])
    }

    async fn extract_audio(
        &self,
        _video: &Path,
        output: &Path,
        _audio_track: Option<usize>,
    ) -> Result<()> {
        std::fs::write(output, b"wav")?;
        Ok(())
    }

    async fn burn_subtitles(&self, _video: &Path, _subtitles: &Path, output: &Path) -> Result<()> {
        std::fs::write(output, b"video")?;
        Ok(())
    }

    async fn mux_soft_subtitles(
        &self,
        _video: &Path,
        _subtitles: &[(PathBuf, String)],
        output: &Path,
    ) -> Result<()> {
        std::fs::write(output, b"mkv")?;
        Ok(())
    }
}

/// Transcriber returning canned segments, or failing on demand.
pub struct StubTranscriber {
    pub segments: Vec<SubtitleSegment>,
    pub fail: bool,
}

impl StubTranscriber {
    pub fn with_segments() -> Self {
        Self {
            segments: vec![
                SubtitleSegment {
                    index: 1,
                    start: 0.0,
                    end: 1.5,
                    text: "hello".to_string(),
                },
                SubtitleSegment {
                    index: 2,
                    start: 1.5,
                    end: 3.0,
                    text: "world".to_string(),
                },
            ],
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            segments: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _model: &str,
        _language: Option<&str>,
        _backend: &str,
        _align: bool,
    ) -> Result<Vec<SubtitleSegment>> {
        if self.fail {
            bail!("whisper backend exploded");
        }
        Ok(self.segments.clone())
    }
}

/// Translator that tags text with the target language.
pub struct TaggingTranslator;

#[async_trait::async_trait]
impl Translator for TaggingTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &str,
        target: &str,
        _model: &str,
    ) -> Result<String> {
        Ok(format!("[{}] {}", target, text))
    }
}

/// Chat sink that records everything sent through it.
#[derive(Default)]
pub struct SpyChat {
    pub messages: Mutex<Vec<(i64, String)>>,
    pub files: Mutex<Vec<(i64, PathBuf, String)>>,
    next_id: AtomicI64,
}

impl SpyChat {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages_containing(&self, needle: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, text)| text.contains(needle))
            .count()
    }

    pub fn file_count(&self) -> usize {
        self.files.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ChatSink for SpyChat {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        self.messages.lock().unwrap().push((chat_id, text.to_string()));
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn edit_message(&self, chat_id: i64, _message_id: i64, text: &str) -> Result<()> {
        self.messages.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn send_file(&self, chat_id: i64, file: &Path, caption: &str) -> Result<()> {
        self.files
            .lock()
            .unwrap()
            .push((chat_id, file.to_path_buf(), caption.to_string()));
        Ok(())
    }
}

/// Progress sink collecting every published estimate.
#[derive(Default)]
pub struct RecordingSink {
    pub values: Mutex<Vec<u8>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for RecordingSink {
    fn publish(&self, _job_id: &str, percent: u8) {
        self.values.lock().unwrap().push(percent);
    }
}

/// Status source that fails a configurable number of queries before
/// reporting a terminal status, for transient-error coverage.
pub struct FlakySource {
    pub failures_remaining: AtomicUsize,
    pub queries: AtomicUsize,
    pub final_view: JobStatusView,
    delivered: AtomicBool,
}

impl FlakySource {
    pub fn new(failures: usize, final_view: JobStatusView) -> Self {
        Self {
            failures_remaining: AtomicUsize::new(failures),
            queries: AtomicUsize::new(0),
            final_view,
            delivered: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl polysub::JobStatusSource for FlakySource {
    async fn query(&self, _job_id: &str) -> Result<JobStatusView> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            bail!("network fault");
        }
        Ok(self.final_view.clone())
    }

    async fn is_delivered(&self, _job_id: &str) -> bool {
        self.delivered.load(Ordering::SeqCst)
    }

    async fn try_claim_delivery(&self, _job_id: &str) -> bool {
        !self.delivered.swap(true, Ordering::SeqCst)
    }
}
