mod common;

use common::{RecordingSink, StubMedia, StubTranscriber, TaggingTranslator};
use polysub::{
    JobParams, JobRegistry, JobStatus, PipelineExecutor, Storage, SubtitleMode, Transcriber,
};
use std::sync::Arc;
use tempfile::TempDir;

struct TestRig {
    _dir: TempDir,
    registry: Arc<JobRegistry>,
    storage: Arc<Storage>,
    executor: Arc<PipelineExecutor>,
    source: std::path::PathBuf,
}

fn rig(transcriber: Arc<dyn Transcriber>) -> TestRig {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(Storage::new(
        dir.path().join("uploads"),
        dir.path().join("outputs"),
    ));
    storage.init().unwrap();

    let source = storage.upload_path("movie.mp4");
    std::fs::write(&source, b"not really a video").unwrap();

    let registry = Arc::new(JobRegistry::new());
    let executor = Arc::new(PipelineExecutor::new(
        Arc::clone(&registry),
        Arc::clone(&storage),
        Arc::new(StubMedia),
        transcriber,
        Arc::new(TaggingTranslator),
    ));

    TestRig {
        _dir: dir,
        registry,
        storage,
        executor,
        source,
    }
}

fn params(mode: SubtitleMode, targets: &[&str]) -> JobParams {
    JobParams {
        target_languages: targets.iter().map(|s| s.to_string()).collect(),
        subtitle_mode: mode,
        ..JobParams::default()
    }
}

#[tokio::test]
async fn hard_mode_produces_srt_and_burned_video_per_language() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Hard, &["es", "fr"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let job = rig.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let keys: Vec<&str> = job.outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["es", "es_srt", "fr", "fr_srt", "orig", "orig_srt"]);
    assert_eq!(job.outputs["orig_srt"], "movie_orig.srt");
    assert_eq!(job.outputs["orig"], "movie_orig.mp4");
    assert_eq!(job.outputs["es_srt"], "movie_es.srt");
    assert_eq!(job.outputs["es"], "movie_es.mp4");
    assert!(!job.outputs.contains_key("multi_soft"));

    for file_name in job.outputs.values() {
        assert!(rig.storage.output_path(&job.id, file_name).exists());
    }
}

#[tokio::test]
async fn soft_mode_produces_srts_and_single_muxed_container() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Soft, &["es", "fr"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let job = rig.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let keys: Vec<&str> = job.outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["es_srt", "fr_srt", "multi_soft", "orig_srt"]);
    assert_eq!(job.outputs["multi_soft"], "movie_multi_soft.mkv");
    assert!(!job.outputs.contains_key("orig"));
    assert!(!job.outputs.contains_key("es"));
}

#[tokio::test]
async fn both_mode_produces_burned_and_muxed_outputs() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Both, &["es"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let job = rig.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Completed);

    let keys: Vec<&str> = job.outputs.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["es", "es_srt", "multi_soft", "orig", "orig_srt"]);
}

#[tokio::test]
async fn translated_subtitles_keep_original_timing() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Soft, &["es"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let srt = std::fs::read_to_string(rig.storage.output_path(&job.id, "movie_es.srt")).unwrap();
    assert!(srt.contains("1\n00:00:00,000 --> 00:00:01,500\n[es] hello"));
    assert!(srt.contains("2\n00:00:01,500 --> 00:00:03,000\n[es] world"));
}

#[tokio::test]
async fn transcription_failure_fails_the_job_before_any_subtitle_output() {
    let rig = rig(Arc::new(StubTranscriber::failing()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Hard, &["es"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let job = rig.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    let message = job.error_message.unwrap();
    assert!(message.contains("transcription failed"), "got: {message}");
    assert!(message.contains("whisper backend exploded"), "got: {message}");
    assert!(!job.outputs.contains_key("orig_srt"));
}

#[tokio::test]
async fn empty_transcription_is_a_failure() {
    let transcriber = StubTranscriber {
        segments: Vec::new(),
        fail: false,
    };
    let rig = rig(Arc::new(transcriber));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Hard, &["es"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let job = rig.registry.get(&job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert!(job.error_message.unwrap().contains("no usable segments"));
}

#[tokio::test]
async fn transient_audio_is_removed_after_a_successful_run() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Soft, &["es"]))
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    assert_eq!(rig.registry.get(&job.id).await.unwrap().status, JobStatus::Completed);
    assert!(!rig.storage.output_path(&job.id, "audio.wav").exists());
}

#[tokio::test]
async fn progress_estimates_never_decrease_and_end_at_completion() {
    let rig = rig(Arc::new(StubTranscriber::with_segments()));
    let job = rig
        .registry
        .create("movie.mp4", &rig.source, params(SubtitleMode::Both, &["es", "fr", "de"]))
        .await;

    let sink = Arc::new(RecordingSink::new());
    rig.executor
        .register_progress_sink(&job.id, sink.clone())
        .await;

    Arc::clone(&rig.executor).spawn(job.id.clone()).await.unwrap();

    let values = sink.values.lock().unwrap().clone();
    assert!(!values.is_empty());
    for pair in values.windows(2) {
        assert!(pair[1] >= pair[0], "progress went backwards: {:?}", values);
    }
    assert_eq!(*values.last().unwrap(), 100);
    assert_eq!(values.iter().filter(|&&v| v == 100).count(), 1);
}
