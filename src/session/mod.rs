//! Per-chat conversational sessions
//!
//! One `UserSession` per chat identity collects the parameter set for a job
//! before submission. Sessions are created on first contact, mutated by every
//! interaction, and discarded on cancel, on unrecoverable errors, or once the
//! job's results have been delivered.

mod model;
mod store;

pub use model::{language_name, SessionState, UserSession, SUPPORTED_LANGUAGES, WHISPER_MODELS};
pub use store::SessionStore;
