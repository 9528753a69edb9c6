use super::chat::ChatSink;
use crate::job::{JobRegistry, JobStatusView};
use crate::session::{SessionState, SessionStore};
use crate::storage::Storage;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Where the poller reads job status from: the local registry, or a remote
/// status endpoint speaking the same contract.
#[async_trait::async_trait]
pub trait JobStatusSource: Send + Sync {
    async fn query(&self, job_id: &str) -> Result<JobStatusView>;

    /// Whether this job's outcome was already delivered.
    async fn is_delivered(&self, job_id: &str) -> bool;

    /// Exactly-once claim; true only for the single winning caller.
    async fn try_claim_delivery(&self, job_id: &str) -> bool;
}

#[async_trait::async_trait]
impl JobStatusSource for JobRegistry {
    async fn query(&self, job_id: &str) -> Result<JobStatusView> {
        self.status_view(job_id)
            .await
            .ok_or_else(|| anyhow!("job {} not found", job_id))
    }

    async fn is_delivered(&self, job_id: &str) -> bool {
        JobRegistry::is_delivered(self, job_id).await
    }

    async fn try_claim_delivery(&self, job_id: &str) -> bool {
        JobRegistry::try_claim_delivery(self, job_id).await
    }
}

/// Cancellation token plus task handle for one job's recurring check.
pub struct PollHandle {
    cancelled: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Signal the repeating task to stop. An in-flight check finishes.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Await the task's end, for local testing.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

enum CheckOutcome {
    Continue,
    Cancel,
}

/// Schedules one recurring status check per watched job and delivers the
/// outcome exactly once.
pub struct CompletionNotifier {
    source: Arc<dyn JobStatusSource>,
    chat: Arc<dyn ChatSink>,
    sessions: SessionStore,
    storage: Arc<Storage>,
    interval: Duration,
    watches: Mutex<HashMap<String, PollHandle>>,
}

impl CompletionNotifier {
    pub fn new(
        source: Arc<dyn JobStatusSource>,
        chat: Arc<dyn ChatSink>,
        sessions: SessionStore,
        storage: Arc<Storage>,
        interval: Duration,
    ) -> Self {
        Self {
            source,
            chat,
            sessions,
            storage,
            interval,
            watches: Mutex::new(HashMap::new()),
        }
    }

    /// Start the recurring check for a job. The first check fires
    /// immediately, then on the configured interval.
    pub async fn watch(self: Arc<Self>, job_id: String, chat_id: i64) {
        info!("Starting job status polling for job {} (chat {})", job_id, chat_id);

        let cancelled = Arc::new(AtomicBool::new(false));
        let notifier = Arc::clone(&self);
        let flag = Arc::clone(&cancelled);
        let id = job_id.clone();

        // The task removes its own handle when it finishes. Holding the lock
        // across spawn and insert keeps that removal from running before the
        // handle is registered, which would leave a dead entry behind.
        let mut watches = self.watches.lock().await;

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(notifier.interval);
            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                match notifier.check(&id, chat_id).await {
                    CheckOutcome::Continue => {}
                    CheckOutcome::Cancel => break,
                }
            }
            notifier.watches.lock().await.remove(&id);
            info!("Polling task finished for job {}", id);
        });

        watches.insert(job_id, PollHandle { cancelled, handle });
    }

    /// Explicit teardown (e.g. session cancel): stop the job's recurring
    /// check if one is still running.
    pub async fn cancel_watch(&self, job_id: &str) {
        if let Some(handle) = self.watches.lock().await.remove(job_id) {
            handle.cancel();
            info!("Polling task canceled for job {}", job_id);
        }
    }

    /// Take over a job's poll handle, for tests that await its end.
    pub async fn take_watch(&self, job_id: &str) -> Option<PollHandle> {
        self.watches.lock().await.remove(job_id)
    }

    async fn check(&self, job_id: &str, chat_id: i64) -> CheckOutcome {
        // A duplicate firing after delivery cancels cleanly.
        if self.source.is_delivered(job_id).await {
            return CheckOutcome::Cancel;
        }

        let status = match self.source.query(job_id).await {
            Ok(status) => status,
            Err(e) => {
                // Transient query faults never cancel the check.
                warn!("Error polling job status for job {}: {:#}", job_id, e);
                return CheckOutcome::Continue;
            }
        };

        if status.is_done() {
            if !self.source.try_claim_delivery(job_id).await {
                info!("Job {} already claimed by another check", job_id);
                return CheckOutcome::Cancel;
            }

            info!("Job {} completed, delivering results to chat {}", job_id, chat_id);
            if let Err(e) = self.deliver(job_id, chat_id, &status).await {
                error!("Error delivering results for job {}: {:#}", job_id, e);
            }
            CheckOutcome::Cancel
        } else if status.is_failed() {
            let message = status.error.as_deref().unwrap_or("unknown error");
            error!("Job {} failed: {}", job_id, message);
            if let Err(e) = self
                .chat
                .send_message(chat_id, &format!("❌ Processing failed: {}", message))
                .await
            {
                warn!("Failed to report job failure: {:#}", e);
            }
            CheckOutcome::Cancel
        } else {
            CheckOutcome::Continue
        }
    }

    async fn deliver(&self, job_id: &str, chat_id: i64, status: &JobStatusView) -> Result<()> {
        self.chat
            .send_message(
                chat_id,
                &format!("✅ Processing completed in {} seconds!", status.duration_seconds),
            )
            .await?;

        for (key, file_name) in &status.outputs {
            let path = self.storage.output_path(job_id, file_name);
            let caption = if file_name.ends_with(".srt") {
                format!("📝 {} subtitles", key.to_uppercase())
            } else {
                format!("📹 {} version", key.to_uppercase())
            };
            self.chat.send_file(chat_id, &path, &caption).await?;
        }

        self.chat
            .send_message(chat_id, "✨ All files sent! Send another video to process.")
            .await?;

        // Successful delivery tears the session down.
        if let Some(mut session) = self.sessions.get(chat_id).await {
            session.state = SessionState::Completed;
            self.sessions.update(chat_id, session).await;
        }
        self.sessions.clear(chat_id).await;

        Ok(())
    }
}
