//! Conversation driver
//!
//! Turns discrete user events (commands, a media upload, one selection per
//! parameter) into session state transitions and prompts, and submits the
//! finished parameter set as a job.

mod event;
mod prompts;
mod service;

pub use event::{Selection, UserEvent};
pub use service::BotService;
