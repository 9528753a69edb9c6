use super::model::{Job, JobParams, JobStatus, JobStatusView};
use chrono::Utc;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// Process-wide job store. Callers never observe a partially updated record;
/// every mutation happens under the write lock, and terminal status is
/// absorbing.
#[derive(Default)]
pub struct JobRegistry {
    jobs: RwLock<HashMap<String, Job>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, file_name: &str, file_path: &Path, params: JobParams) -> Job {
        let job = Job::new(
            uuid::Uuid::new_v4().to_string(),
            file_name,
            file_path.to_path_buf(),
            params,
        );

        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id.clone(), job.clone());
        info!("Created job: {}", job.id);
        job
    }

    pub async fn get(&self, job_id: &str) -> Option<Job> {
        self.jobs.read().await.get(job_id).cloned()
    }

    pub async fn status_view(&self, job_id: &str) -> Option<JobStatusView> {
        self.jobs.read().await.get(job_id).map(Job::status_view)
    }

    /// Move a job to a new status. Sets `started_at` the first time the job
    /// becomes Processing and `completed_at` when it reaches a terminal
    /// status. A transition requested after a terminal status is a no-op, so
    /// duplicate terminal signals are tolerated.
    pub async fn transition(&self, job_id: &str, status: JobStatus) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(job_id) else {
            return;
        };

        if job.status.is_terminal() {
            debug!("Job {} already terminal, ignoring transition to {:?}", job_id, status);
            return;
        }

        job.status = status;
        if status == JobStatus::Processing && job.started_at.is_none() {
            job.started_at = Some(Utc::now());
        } else if status.is_terminal() && job.completed_at.is_none() {
            job.completed_at = Some(Utc::now());
        }
        info!("Job {} status updated to: {:?}", job_id, status);
    }

    /// Record a produced artifact. Outputs are immutable once terminal.
    pub async fn add_output(&self, job_id: &str, key: &str, file_name: &str) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(job_id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }

        job.outputs.insert(key.to_string(), file_name.to_string());
        debug!("Added output to job {}: {} -> {}", job_id, key, file_name);
    }

    /// Mark the job failed with the triggering error's description.
    pub async fn fail(&self, job_id: &str, message: &str) {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(job_id) else {
            return;
        };
        if job.status.is_terminal() {
            return;
        }

        job.status = JobStatus::Failed;
        job.error_message = Some(message.to_string());
        if job.completed_at.is_none() {
            job.completed_at = Some(Utc::now());
        }
        error!("Job {} failed: {}", job_id, message);
    }

    /// Explicit external deletion; jobs are never removed automatically.
    pub async fn delete(&self, job_id: &str) {
        self.jobs.write().await.remove(job_id);
        info!("Deleted job: {}", job_id);
    }

    pub async fn is_delivered(&self, job_id: &str) -> bool {
        self.jobs
            .read()
            .await
            .get(job_id)
            .map(|job| job.delivered)
            .unwrap_or(false)
    }

    /// Exactly-once delivery claim: test-and-set on the job's delivered flag.
    /// Returns true for the single caller that wins the claim.
    pub async fn try_claim_delivery(&self, job_id: &str) -> bool {
        let mut jobs = self.jobs.write().await;
        let Some(job) = jobs.get_mut(job_id) else {
            return false;
        };
        if job.delivered {
            return false;
        }
        job.delivered = true;
        true
    }
}
