//! Completion notification
//!
//! One recurring status check per watched job. When a terminal status is
//! observed, the outcome is delivered to the originating chat exactly once
//! and the check cancels itself. Transient query errors never cancel the
//! check; polling continues until a terminal status or explicit teardown.

mod chat;
mod poller;

pub use chat::{ChatSink, LogChatSink};
pub use poller::{CompletionNotifier, JobStatusSource, PollHandle};
