use thiserror::Error;

/// What went wrong, per pipeline stage. The failing stage aborts the rest of
/// the sequence; the description lands on the job record.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("audio extraction failed: {0:#}")]
    ExtractAudio(anyhow::Error),

    #[error("transcription failed: {0:#}")]
    Transcribe(anyhow::Error),

    #[error("writing subtitles failed: {0:#}")]
    WriteSubtitles(anyhow::Error),

    #[error("translation to {lang} failed: {cause:#}")]
    Translate { lang: String, cause: anyhow::Error },

    #[error("burning {lang} subtitles failed: {cause:#}")]
    Burn { lang: String, cause: anyhow::Error },

    #[error("muxing soft subtitles failed: {0:#}")]
    Mux(anyhow::Error),
}

/// Stage diagnostics can carry whole subprocess logs; cap what is stored on
/// the job record.
pub fn truncate_diagnostic(message: &str) -> String {
    const MAX_CHARS: usize = 500;
    if message.chars().count() <= MAX_CHARS {
        message.to_string()
    } else {
        message.chars().take(MAX_CHARS).collect()
    }
}
