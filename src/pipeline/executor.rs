use super::error::{truncate_diagnostic, StageError};
use super::progress::{estimate, Stage};
use super::srt;
use crate::job::{Job, JobRegistry, JobStatus};
use crate::media::{MediaToolkit, SubtitleSegment, Transcriber, Translator};
use crate::storage::Storage;
use anyhow::anyhow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Receives overall progress estimates for a job while its pipeline runs.
pub trait ProgressSink: Send + Sync {
    fn publish(&self, job_id: &str, percent: u8);
}

/// Runs submitted jobs through the stage sequence. Submission is
/// fire-and-forget: `spawn` returns a handle immediately while the stages run
/// on the worker pool.
pub struct PipelineExecutor {
    registry: Arc<JobRegistry>,
    storage: Arc<Storage>,
    media: Arc<dyn MediaToolkit>,
    transcriber: Arc<dyn Transcriber>,
    translator: Arc<dyn Translator>,
    sinks: RwLock<HashMap<String, Arc<dyn ProgressSink>>>,
}

impl PipelineExecutor {
    pub fn new(
        registry: Arc<JobRegistry>,
        storage: Arc<Storage>,
        media: Arc<dyn MediaToolkit>,
        transcriber: Arc<dyn Transcriber>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            registry,
            storage,
            media,
            transcriber,
            translator,
            sinks: RwLock::new(HashMap::new()),
        }
    }

    /// Register a sink to receive progress estimates for one job.
    pub async fn register_progress_sink(&self, job_id: &str, sink: Arc<dyn ProgressSink>) {
        self.sinks.write().await.insert(job_id.to_string(), sink);
    }

    /// Start the pipeline for a job. Returns immediately; the handle can be
    /// awaited for local testing while production dispatch ignores it.
    pub fn spawn(self: Arc<Self>, job_id: String) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.process(&job_id).await;
            self.sinks.write().await.remove(&job_id);
        })
    }

    async fn process(&self, job_id: &str) {
        info!("Starting job processing: {}", job_id);

        let Some(job) = self.registry.get(job_id).await else {
            error!("Job not found: {}", job_id);
            return;
        };

        self.registry.transition(job_id, JobStatus::Processing).await;

        match self.run_stages(&job).await {
            Ok(()) => {
                self.registry.transition(job_id, JobStatus::Completed).await;
                self.report(job_id, Stage::Done, 0, job.params.target_languages.len(), 100)
                    .await;
                info!("Job completed successfully: {}", job_id);
            }
            Err(err) => {
                self.registry
                    .fail(job_id, &truncate_diagnostic(&err.to_string()))
                    .await;
            }
        }
    }

    async fn run_stages(&self, job: &Job) -> Result<(), StageError> {
        let job_id = &job.id;
        let params = &job.params;
        let total_langs = params.target_languages.len();

        let output_dir = self
            .storage
            .create_output_dir(job_id)
            .map_err(StageError::ExtractAudio)?;

        self.report(job_id, Stage::Init, 0, total_langs, 100).await;

        // Stage 1: extract the audio track.
        info!("Step 1: Extracting audio");
        self.report(job_id, Stage::ExtractAudio, 0, total_langs, 0).await;
        let audio_path = output_dir.join("audio.wav");
        self.media
            .extract_audio(&job.file_path, &audio_path, params.audio_track)
            .await
            .map_err(StageError::ExtractAudio)?;

        // Stage 2: transcribe it.
        info!(
            "Step 2: Transcribing audio with {} backend, align={}",
            params.whisper_backend, params.align_output
        );
        self.report(job_id, Stage::Transcribe, 0, total_langs, 0).await;
        let raw_segments = self
            .transcriber
            .transcribe(
                &audio_path,
                &params.whisper_model,
                params.source_language.as_deref(),
                &params.whisper_backend,
                params.align_output,
            )
            .await
            .map_err(StageError::Transcribe)?;

        let original_segments = srt::normalize_segments(raw_segments);
        if original_segments.is_empty() {
            return Err(StageError::Transcribe(anyhow!(
                "transcription produced no usable segments"
            )));
        }

        // Stage 3: persist the original subtitles, burning if requested.
        let stem = file_stem(&job.file_name);
        self.report(job_id, Stage::WriteOriginal, 0, total_langs, 0).await;
        let orig_srt_name = format!("{}_orig.srt", stem);
        let orig_srt_path = output_dir.join(&orig_srt_name);
        srt::write_srt(&original_segments, &orig_srt_path).map_err(StageError::WriteSubtitles)?;
        self.registry.add_output(job_id, "orig_srt", &orig_srt_name).await;

        if params.subtitle_mode.burns() {
            info!("Step 3: Burning original subtitles");
            let orig_video_name = format!("{}_orig.mp4", stem);
            self.media
                .burn_subtitles(&job.file_path, &orig_srt_path, &output_dir.join(&orig_video_name))
                .await
                .map_err(|e| StageError::Burn {
                    lang: "orig".to_string(),
                    cause: e,
                })?;
            self.registry.add_output(job_id, "orig", &orig_video_name).await;
        }
        self.report(job_id, Stage::WriteOriginal, 0, total_langs, 100).await;

        let source_lang = params.source_language.as_deref().unwrap_or("en");

        // Stages 4/5: translate each target language, burning as we go.
        let mut soft_subtitles: Vec<(PathBuf, String)> =
            vec![(orig_srt_path.clone(), source_lang.to_string())];

        for (lang_idx, target_lang) in params.target_languages.iter().enumerate() {
            info!("Step 4: Translating to {}", target_lang);

            let mut translated = Vec::with_capacity(original_segments.len());
            for (i, segment) in original_segments.iter().enumerate() {
                let text = self
                    .translator
                    .translate(&segment.text, source_lang, target_lang, &params.translation_model)
                    .await
                    .map_err(|e| StageError::Translate {
                        lang: target_lang.clone(),
                        cause: e,
                    })?;

                // Timing is preserved; only the text changes.
                translated.push(SubtitleSegment {
                    index: i + 1,
                    start: segment.start,
                    end: segment.end,
                    text,
                });

                let pct = ((i + 1) * 100 / original_segments.len()) as u8;
                self.report(job_id, Stage::Translate, lang_idx, total_langs, pct).await;
            }

            let srt_name = format!("{}_{}.srt", stem, target_lang);
            let srt_path = output_dir.join(&srt_name);
            srt::write_srt(&translated, &srt_path).map_err(StageError::WriteSubtitles)?;
            self.registry
                .add_output(job_id, &format!("{}_srt", target_lang), &srt_name)
                .await;
            soft_subtitles.push((srt_path.clone(), target_lang.clone()));

            if params.subtitle_mode.burns() {
                info!("Step 5: Burning {} subtitles", target_lang);
                self.report(job_id, Stage::BurnTranslated, lang_idx, total_langs, 0).await;
                let video_name = format!("{}_{}.mp4", stem, target_lang);
                self.media
                    .burn_subtitles(&job.file_path, &srt_path, &output_dir.join(&video_name))
                    .await
                    .map_err(|e| StageError::Burn {
                        lang: target_lang.clone(),
                        cause: e,
                    })?;
                self.registry.add_output(job_id, target_lang, &video_name).await;
            }
        }

        // Stage 6: mux everything as soft tracks, original subtitle first.
        if params.subtitle_mode.muxes() {
            info!("Step 6: Creating soft subtitle version");
            self.report(job_id, Stage::MuxSoft, total_langs, total_langs, 0).await;
            let soft_name = format!("{}_multi_soft.mkv", stem);
            self.media
                .mux_soft_subtitles(&job.file_path, &soft_subtitles, &output_dir.join(&soft_name))
                .await
                .map_err(StageError::Mux)?;
            self.registry.add_output(job_id, "multi_soft", &soft_name).await;
        }

        // The extracted audio is transient; its removal must not fail the job.
        if let Err(e) = std::fs::remove_file(&audio_path) {
            warn!("Failed to remove transient audio {}: {}", audio_path.display(), e);
        }

        Ok(())
    }

    async fn report(
        &self,
        job_id: &str,
        stage: Stage,
        languages_done: usize,
        total_languages: usize,
        percent: u8,
    ) {
        let sinks = self.sinks.read().await;
        if let Some(sink) = sinks.get(job_id) {
            sink.publish(job_id, estimate(stage, languages_done, total_languages, percent));
        }
    }
}

/// Source name without its final extension, mirroring how output artifacts
/// are named after the upload.
fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string())
}

#[cfg(test)]
mod tests {
    use super::file_stem;

    #[test]
    fn file_stem_strips_last_extension_only() {
        assert_eq!(file_stem("movie.mp4"), "movie");
        assert_eq!(file_stem("my.holiday.mkv"), "my.holiday");
        assert_eq!(file_stem("noext"), "noext");
    }
}
