use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Internal job lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    /// How the status is reported externally.
    pub fn as_external(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "done",
            JobStatus::Failed => "failed",
        }
    }
}

/// How subtitles end up in the delivered artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleMode {
    /// Burned into the video picture.
    Hard,
    /// Separate selectable tracks in one container.
    Soft,
    /// Both renditions.
    Both,
}

impl SubtitleMode {
    pub fn burns(self) -> bool {
        matches!(self, SubtitleMode::Hard | SubtitleMode::Both)
    }

    pub fn muxes(self) -> bool {
        matches!(self, SubtitleMode::Soft | SubtitleMode::Both)
    }
}

/// The parameter set a session accumulates, frozen onto the job at submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParams {
    /// Unique, order-preserving list of translation targets.
    pub target_languages: Vec<String>,
    pub whisper_model: String,
    pub whisper_backend: String,
    pub align_output: bool,
    pub translation_model: String,
    pub subtitle_mode: SubtitleMode,
    pub use_existing_subtitles: bool,
    /// `None` means auto-detect.
    pub source_language: Option<String>,
    pub audio_track: Option<usize>,
    pub subtitle_track: Option<usize>,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            target_languages: Vec::new(),
            whisper_model: "large".to_string(),
            whisper_backend: "faster-whisper".to_string(),
            align_output: true,
            translation_model: "m2m100".to_string(),
            subtitle_mode: SubtitleMode::Hard,
            use_existing_subtitles: false,
            source_language: None,
            audio_track: None,
            subtitle_track: None,
        }
    }
}

/// One submitted processing request and its lifecycle record.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub file_name: String,
    pub file_path: PathBuf,
    pub status: JobStatus,
    /// Output key (e.g. "orig_srt", "es", "multi_soft") to produced filename.
    pub outputs: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error_message: Option<String>,
    pub params: JobParams,
    /// Set exactly once by the notifier's delivery claim.
    pub delivered: bool,
}

impl Job {
    pub fn new(id: String, file_name: &str, file_path: PathBuf, params: JobParams) -> Self {
        Self {
            id,
            file_name: file_name.to_string(),
            file_path,
            status: JobStatus::Pending,
            outputs: BTreeMap::new(),
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error_message: None,
            params,
            delivered: false,
        }
    }

    /// Wall time spent processing; 0 until both timestamps exist.
    pub fn duration_seconds(&self) -> i64 {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => end.signed_duration_since(start).num_seconds(),
            _ => 0,
        }
    }

    pub fn status_view(&self) -> JobStatusView {
        JobStatusView {
            status: self.status.as_external().to_string(),
            outputs: self.outputs.clone(),
            duration_seconds: self.duration_seconds(),
            error: self.error_message.clone(),
        }
    }
}

/// The externally visible status of a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusView {
    /// "pending", "processing", "done" or "failed".
    pub status: String,
    pub outputs: BTreeMap<String, String>,
    pub duration_seconds: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl JobStatusView {
    pub fn is_done(&self) -> bool {
        self.status == "done"
    }

    pub fn is_failed(&self) -> bool {
        self.status == "failed"
    }
}
