//! Pipeline execution
//!
//! Drives a submitted job through the fixed stage sequence: extract audio,
//! transcribe, write/burn the original subtitles, translate per target
//! language, mux soft subtitle tracks, clean up. Stages run strictly
//! sequentially within one job; jobs run concurrently on the tokio pool.

mod error;
mod executor;
pub mod progress;
pub mod srt;

pub use error::StageError;
pub use executor::{PipelineExecutor, ProgressSink};
pub use progress::Stage;
