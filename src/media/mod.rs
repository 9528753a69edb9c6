//! External media capabilities
//!
//! Everything that touches actual media or model inference lives behind the
//! traits in this module: container analysis, audio extraction, subtitle
//! burning/muxing, transcription, and per-segment translation. The shipped
//! implementations shell out to ffmpeg/ffprobe and the python helper scripts;
//! tests substitute in-memory fakes.

mod ffmpeg;
mod script;

pub use ffmpeg::FfmpegToolkit;
pub use script::{ScriptTranscriber, ScriptTranslator};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One stream inside a media container, as reported by analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaTrack {
    pub index: usize,
    /// Stream type: "video", "audio" or "subtitle".
    pub kind: String,
    pub codec: String,
    /// ISO language tag, "und" when the container carries none.
    pub lang: String,
    pub is_default: bool,
    pub is_forced: bool,
    pub title: String,
}

impl MediaTrack {
    pub fn is_audio(&self) -> bool {
        self.kind == "audio"
    }

    pub fn is_subtitle(&self) -> bool {
        self.kind == "subtitle"
    }
}

/// A timestamped piece of transcribed or translated text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleSegment {
    /// 1-based position within the subtitle file.
    pub index: usize,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    pub text: String,
}

/// Container analysis and audio/subtitle manipulation.
#[async_trait::async_trait]
pub trait MediaToolkit: Send + Sync {
    /// Probe a media file and return its streams in container order.
    async fn analyze_media(&self, file: &Path) -> Result<Vec<MediaTrack>>;

    /// Extract one audio track as 16kHz mono WAV. `audio_track` selects a
    /// specific stream, otherwise the container default is used.
    async fn extract_audio(
        &self,
        video: &Path,
        output: &Path,
        audio_track: Option<usize>,
    ) -> Result<()>;

    /// Render subtitles into the video picture, copying the audio stream.
    async fn burn_subtitles(&self, video: &Path, subtitles: &Path, output: &Path) -> Result<()>;

    /// Mux subtitle files as separate selectable tracks, each tagged with its
    /// language code, alongside the original video and audio.
    async fn mux_soft_subtitles(
        &self,
        video: &Path,
        subtitles: &[(PathBuf, String)],
        output: &Path,
    ) -> Result<()>;
}

/// Speech-to-text over an extracted audio track.
#[async_trait::async_trait]
pub trait Transcriber: Send + Sync {
    /// Returns timestamped segments. `language` of `None` means auto-detect.
    async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        language: Option<&str>,
        backend: &str,
        align: bool,
    ) -> Result<Vec<SubtitleSegment>>;
}

/// Text translation for a single segment.
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str, model: &str)
        -> Result<String>;
}
