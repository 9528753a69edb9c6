use anyhow::Result;
use std::path::Path;
use std::sync::atomic::{AtomicI64, Ordering};
use tracing::info;

/// Outbound messaging to a chat identity. The concrete transport lives
/// outside the core; prompts, completion handling, and failure reports all go
/// through this seam.
#[async_trait::async_trait]
pub trait ChatSink: Send + Sync {
    /// Send a message, returning its id so later prompts can edit it.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64>;

    /// Replace the text of a previously sent message.
    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()>;

    /// Deliver a produced artifact with a caption.
    async fn send_file(&self, chat_id: i64, file: &Path, caption: &str) -> Result<()>;
}

/// Transport-less sink that logs outbound traffic. Stands in wherever no chat
/// platform is wired up.
#[derive(Default)]
pub struct LogChatSink {
    next_message_id: AtomicI64,
}

impl LogChatSink {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ChatSink for LogChatSink {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<i64> {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        info!("[chat {}] {}", chat_id, text);
        Ok(id)
    }

    async fn edit_message(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        info!("[chat {} edit {}] {}", chat_id, message_id, text);
        Ok(())
    }

    async fn send_file(&self, chat_id: i64, file: &Path, caption: &str) -> Result<()> {
        info!("[chat {}] file {} ({})", chat_id, file.display(), caption);
        Ok(())
    }
}
