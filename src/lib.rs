pub mod bot;
pub mod config;
pub mod http;
pub mod job;
pub mod media;
pub mod notify;
pub mod pipeline;
pub mod session;
pub mod storage;

pub use bot::{BotService, Selection, UserEvent};
pub use config::Config;
pub use http::{create_router, AppState};
pub use job::{Job, JobParams, JobRegistry, JobStatus, JobStatusView, SubtitleMode};
pub use media::{
    FfmpegToolkit, MediaToolkit, MediaTrack, ScriptTranscriber, ScriptTranslator,
    SubtitleSegment, Transcriber, Translator,
};
pub use notify::{ChatSink, CompletionNotifier, JobStatusSource, LogChatSink, PollHandle};
pub use pipeline::{PipelineExecutor, ProgressSink, Stage, StageError};
pub use session::{SessionState, SessionStore, UserSession};
pub use storage::Storage;
