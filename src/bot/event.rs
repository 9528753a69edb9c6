use crate::job::SubtitleMode;
use std::path::PathBuf;

/// One discrete user interaction.
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// A slash command ("/start", "/help", "/cancel") or free text.
    Command(String),
    /// A media file arrived, already persisted to local storage.
    MediaUpload {
        file_name: String,
        file_path: PathBuf,
    },
    /// One option picked from a prompt.
    Selection(Selection),
}

/// The selections offered during parameter gathering, in flow order.
#[derive(Debug, Clone)]
pub enum Selection {
    UseExistingSubtitles,
    TranscribeNew,
    WhisperModel(String),
    WhisperBackend(String),
    AlignOutput(bool),
    /// `None` means auto-detect.
    SourceLanguage(Option<String>),
    /// Toggle membership in the target set; its own inverse.
    ToggleLanguage(String),
    LanguagesDone,
    TranslationModel(String),
    SubtitleMode(SubtitleMode),
    StartProcessing,
    Cancel,
}
