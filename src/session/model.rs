use crate::job::JobParams;
use crate::media::MediaTrack;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Languages offered for source selection and translation targets.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("ru", "Russian"),
    ("he", "Hebrew"),
    ("ar", "Arabic"),
];

/// Whisper model sizes offered during transcription setup.
pub const WHISPER_MODELS: &[&str] = &["tiny", "base", "small", "medium", "large"];

pub fn language_name(code: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Where a conversation currently is in the parameter-gathering flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    FileUploaded,
    AnalyzingMedia,
    SelectingTranscriptionOptions,
    SelectingTranslationOptions,
    Processing,
    Completed,
}

/// One chat identity's conversational state machine.
#[derive(Debug, Clone)]
pub struct UserSession {
    pub chat_id: i64,
    pub state: SessionState,
    pub file_name: Option<String>,
    pub file_path: Option<PathBuf>,
    /// Track descriptors from media analysis, once available.
    pub tracks: Option<Vec<MediaTrack>>,
    /// The parameter set being gathered; copied onto the job at submission.
    pub params: JobParams,
    /// Message id of the last prompt, so selections can edit it in place.
    pub last_prompt_id: Option<i64>,
    /// At most one active job per session.
    pub job_id: Option<String>,
}

impl UserSession {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            state: SessionState::Idle,
            file_name: None,
            file_path: None,
            tracks: None,
            params: JobParams::default(),
            last_prompt_id: None,
            job_id: None,
        }
    }

    /// Toggle a target language: add if absent, remove if present.
    pub fn toggle_target_language(&mut self, code: &str) {
        if let Some(pos) = self.params.target_languages.iter().position(|l| l == code) {
            self.params.target_languages.remove(pos);
        } else {
            self.params.target_languages.push(code.to_string());
        }
    }

    pub fn subtitle_tracks(&self) -> Vec<&MediaTrack> {
        self.tracks
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|t| t.is_subtitle())
            .collect()
    }

    pub fn audio_tracks(&self) -> Vec<&MediaTrack> {
        self.tracks
            .as_deref()
            .unwrap_or_default()
            .iter()
            .filter(|t| t.is_audio())
            .collect()
    }
}
