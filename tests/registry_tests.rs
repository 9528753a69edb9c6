use polysub::{JobParams, JobRegistry, JobStatus};
use std::path::Path;
use std::sync::Arc;

#[tokio::test]
async fn create_starts_pending_with_empty_outputs() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    assert_eq!(job.status, JobStatus::Pending);
    assert!(job.outputs.is_empty());
    assert!(job.started_at.is_none());
    assert!(job.completed_at.is_none());
    assert!(!job.delivered);

    let fetched = registry.get(&job.id).await.unwrap();
    assert_eq!(fetched.id, job.id);
}

#[tokio::test]
async fn transition_records_lifecycle_timestamps() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    registry.transition(&job.id, JobStatus::Processing).await;
    let processing = registry.get(&job.id).await.unwrap();
    assert_eq!(processing.status, JobStatus::Processing);
    assert!(processing.started_at.is_some());
    assert!(processing.completed_at.is_none());

    registry.transition(&job.id, JobStatus::Completed).await;
    let completed = registry.get(&job.id).await.unwrap();
    assert_eq!(completed.status, JobStatus::Completed);
    assert!(completed.completed_at.is_some());
}

#[tokio::test]
async fn terminal_status_absorbs_later_transitions() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    registry.transition(&job.id, JobStatus::Processing).await;
    registry.fail(&job.id, "boom").await;

    registry.transition(&job.id, JobStatus::Completed).await;
    registry.transition(&job.id, JobStatus::Processing).await;
    registry.fail(&job.id, "a different error").await;

    let current = registry.get(&job.id).await.unwrap();
    assert_eq!(current.status, JobStatus::Failed);
    assert_eq!(current.error_message.as_deref(), Some("boom"));
}

#[tokio::test]
async fn outputs_are_frozen_once_terminal() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    registry.transition(&job.id, JobStatus::Processing).await;
    registry.add_output(&job.id, "orig_srt", "movie_orig.srt").await;
    registry.transition(&job.id, JobStatus::Completed).await;
    registry.add_output(&job.id, "es", "movie_es.mp4").await;

    let outputs = registry.get(&job.id).await.unwrap().outputs;
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs.get("orig_srt").map(String::as_str), Some("movie_orig.srt"));
}

#[tokio::test]
async fn status_view_maps_internal_statuses_to_external_names() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    assert_eq!(registry.status_view(&job.id).await.unwrap().status, "pending");

    registry.transition(&job.id, JobStatus::Processing).await;
    assert_eq!(registry.status_view(&job.id).await.unwrap().status, "processing");

    registry.transition(&job.id, JobStatus::Completed).await;
    let view = registry.status_view(&job.id).await.unwrap();
    assert_eq!(view.status, "done");
    assert!(view.is_done());
    assert!(view.duration_seconds >= 0);
}

#[tokio::test]
async fn failed_view_carries_error_message() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    registry.fail(&job.id, "ffmpeg exited with status 1").await;

    let view = registry.status_view(&job.id).await.unwrap();
    assert!(view.is_failed());
    assert_eq!(view.error.as_deref(), Some("ffmpeg exited with status 1"));
}

#[tokio::test]
async fn delete_removes_the_job() {
    let registry = JobRegistry::new();
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;

    registry.delete(&job.id).await;
    assert!(registry.get(&job.id).await.is_none());
    assert!(registry.status_view(&job.id).await.is_none());
}

#[tokio::test]
async fn delivery_claim_succeeds_exactly_once_under_contention() {
    let registry = Arc::new(JobRegistry::new());
    let job = registry
        .create("movie.mp4", Path::new("/tmp/movie.mp4"), JobParams::default())
        .await;
    registry.transition(&job.id, JobStatus::Processing).await;
    registry.transition(&job.id, JobStatus::Completed).await;

    let mut handles = Vec::new();
    for _ in 0..32 {
        let registry = Arc::clone(&registry);
        let id = job.id.clone();
        handles.push(tokio::spawn(async move { registry.try_claim_delivery(&id).await }));
    }

    let mut wins = 0;
    for handle in handles {
        if handle.await.unwrap() {
            wins += 1;
        }
    }
    assert_eq!(wins, 1);
    assert!(registry.is_delivered(&job.id).await);
}

#[tokio::test]
async fn claim_on_unknown_job_fails() {
    let registry = JobRegistry::new();
    assert!(!registry.try_claim_delivery("no-such-job").await);
    assert!(!registry.is_delivered("no-such-job").await);
}
