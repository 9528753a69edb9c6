use super::event::{Selection, UserEvent};
use super::prompts;
use crate::job::JobRegistry;
use crate::media::MediaToolkit;
use crate::notify::{ChatSink, CompletionNotifier};
use crate::pipeline::PipelineExecutor;
use crate::session::{language_name, SessionState, SessionStore, UserSession, WHISPER_MODELS};
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

/// Drives the per-chat state machine: every user event mutates the session,
/// produces the next prompt, and eventually submits the gathered parameters
/// as a job.
pub struct BotService {
    sessions: SessionStore,
    chat: Arc<dyn ChatSink>,
    media: Arc<dyn MediaToolkit>,
    registry: Arc<JobRegistry>,
    executor: Arc<PipelineExecutor>,
    notifier: Arc<CompletionNotifier>,
}

impl BotService {
    pub fn new(
        sessions: SessionStore,
        chat: Arc<dyn ChatSink>,
        media: Arc<dyn MediaToolkit>,
        registry: Arc<JobRegistry>,
        executor: Arc<PipelineExecutor>,
        notifier: Arc<CompletionNotifier>,
    ) -> Self {
        Self {
            sessions,
            chat,
            media,
            registry,
            executor,
            notifier,
        }
    }

    pub async fn handle_event(&self, chat_id: i64, event: UserEvent) -> Result<()> {
        match event {
            UserEvent::Command(text) => self.handle_command(chat_id, &text).await,
            UserEvent::MediaUpload { file_name, file_path } => {
                self.handle_media_upload(chat_id, file_name, file_path).await
            }
            UserEvent::Selection(selection) => self.handle_selection(chat_id, selection).await,
        }
    }

    async fn handle_command(&self, chat_id: i64, text: &str) -> Result<()> {
        match text.to_lowercase().as_str() {
            "/start" => {
                self.chat.send_message(chat_id, &prompts::welcome()).await?;
            }
            "/help" => {
                self.chat.send_message(chat_id, &prompts::help()).await?;
            }
            "/cancel" => {
                self.cancel_session(chat_id).await?;
            }
            _ => {
                self.chat
                    .send_message(
                        chat_id,
                        "Please send a video file or use /help for available commands.",
                    )
                    .await?;
            }
        }
        Ok(())
    }

    /// A media file arrived: record it on the session, then analyze it in the
    /// background. The session only reaches the transcription options once
    /// analysis returns.
    async fn handle_media_upload(
        &self,
        chat_id: i64,
        file_name: String,
        file_path: std::path::PathBuf,
    ) -> Result<()> {
        let mut session = self.sessions.get_or_create(chat_id).await;
        session.state = SessionState::FileUploaded;
        session.file_name = Some(file_name.clone());
        session.file_path = Some(file_path.clone());
        self.sessions.update(chat_id, session.clone()).await;

        self.chat
            .send_message(
                chat_id,
                &format!("📥 File received: {}\n\n⏳ Analyzing media file...", file_name),
            )
            .await?;

        session.state = SessionState::AnalyzingMedia;
        self.sessions.update(chat_id, session).await;

        let sessions = self.sessions.clone();
        let chat = Arc::clone(&self.chat);
        let media = Arc::clone(&self.media);
        tokio::spawn(async move {
            match media.analyze_media(&file_path).await {
                Ok(tracks) => {
                    let Some(mut session) = sessions.get(chat_id).await else {
                        return;
                    };
                    session.tracks = Some(tracks);
                    session.state = SessionState::SelectingTranscriptionOptions;
                    let summary = prompts::analysis_summary(&session);
                    sessions.update(chat_id, session).await;

                    if let Err(e) = chat.send_message(chat_id, &summary).await {
                        error!("Failed to send analysis results: {:#}", e);
                    }
                }
                Err(e) => {
                    // Unrecoverable: the session is discarded, not reset.
                    error!("Error analyzing media for chat {}: {:#}", chat_id, e);
                    let _ = chat
                        .send_message(chat_id, &format!("❌ Error analyzing file: {:#}", e))
                        .await;
                    sessions.clear(chat_id).await;
                }
            }
        });

        Ok(())
    }

    async fn handle_selection(&self, chat_id: i64, selection: Selection) -> Result<()> {
        let Some(mut session) = self.sessions.get(chat_id).await else {
            self.chat.send_message(chat_id, prompts::SESSION_EXPIRED).await?;
            return Ok(());
        };

        match selection {
            Selection::UseExistingSubtitles => {
                session.params.use_existing_subtitles = true;
                session.state = SessionState::SelectingTranslationOptions;
                let prompt = prompts::target_language_selection(&session);
                self.store_and_prompt(session, &prompt).await?;
            }
            Selection::TranscribeNew => {
                session.params.use_existing_subtitles = false;
                session.state = SessionState::SelectingTranscriptionOptions;
                self.store_and_prompt(session, &prompts::whisper_model_selection()).await?;
            }
            Selection::WhisperModel(model) => {
                if !WHISPER_MODELS.contains(&model.as_str()) {
                    self.store_and_prompt(session, &prompts::whisper_model_selection()).await?;
                    return Ok(());
                }
                session.params.whisper_model = model;
                self.store_and_prompt(session, &prompts::whisper_backend_selection()).await?;
            }
            Selection::WhisperBackend(backend) => {
                session.params.whisper_backend = backend;
                self.store_and_prompt(session, &prompts::align_selection()).await?;
            }
            Selection::AlignOutput(align) => {
                session.params.align_output = align;
                self.store_and_prompt(session, &prompts::source_language_selection()).await?;
            }
            Selection::SourceLanguage(lang) => {
                session.params.source_language = lang;
                session.state = SessionState::SelectingTranslationOptions;
                let prompt = prompts::target_language_selection(&session);
                self.store_and_prompt(session, &prompt).await?;
            }
            Selection::ToggleLanguage(code) => {
                if language_name(&code).is_some() {
                    session.toggle_target_language(&code);
                }
                // Re-display the toggle set after every change.
                let prompt = prompts::target_language_selection(&session);
                self.store_and_prompt(session, &prompt).await?;
            }
            Selection::LanguagesDone => {
                if session.params.target_languages.is_empty() {
                    let prompt = prompts::target_language_selection(&session);
                    self.store_and_prompt(session, &prompt).await?;
                    return Ok(());
                }
                self.store_and_prompt(session, &prompts::translation_model_selection())
                    .await?;
            }
            Selection::TranslationModel(model) => {
                session.params.translation_model = model;
                self.store_and_prompt(session, &prompts::subtitle_mode_selection()).await?;
            }
            Selection::SubtitleMode(mode) => {
                session.params.subtitle_mode = mode;
                let summary = prompts::processing_summary(&session);
                self.store_and_prompt(session, &summary).await?;
            }
            Selection::StartProcessing => {
                self.start_processing(session).await?;
            }
            Selection::Cancel => {
                self.cancel_session(chat_id).await?;
            }
        }

        Ok(())
    }

    /// Persist the session, then show the next prompt: edit the previous
    /// prompt message when there is one, otherwise send a fresh one.
    async fn store_and_prompt(&self, mut session: UserSession, text: &str) -> Result<()> {
        let chat_id = session.chat_id;
        match session.last_prompt_id {
            Some(message_id) => {
                self.sessions.update(chat_id, session).await;
                self.chat.edit_message(chat_id, message_id, text).await?;
            }
            None => {
                let message_id = self.chat.send_message(chat_id, text).await?;
                session.last_prompt_id = Some(message_id);
                self.sessions.update(chat_id, session).await;
            }
        }
        Ok(())
    }

    /// Freeze the session's parameters into a job, start the pipeline, and
    /// register the completion watch. Validation failures reject the
    /// submission without creating a job.
    async fn start_processing(&self, mut session: UserSession) -> Result<()> {
        let chat_id = session.chat_id;

        let Some(file_path) = session.file_path.clone() else {
            self.chat
                .send_message(chat_id, "❌ No file on this session. Please send the video again.")
                .await?;
            self.sessions.clear(chat_id).await;
            return Ok(());
        };
        let file_name = session.file_name.clone().unwrap_or_default();
        if session.params.target_languages.is_empty() {
            self.chat
                .send_message(chat_id, "❌ Select at least one target language first.")
                .await?;
            return Ok(());
        }

        session.state = SessionState::Processing;
        self.sessions.update(chat_id, session.clone()).await;

        self.chat
            .send_message(chat_id, "⏳ Processing started...\nThis may take several minutes.")
            .await?;

        let job = self
            .registry
            .create(&file_name, &file_path, session.params.clone())
            .await;

        session.job_id = Some(job.id.clone());
        self.sessions.update(chat_id, session).await;

        self.chat
            .send_message(
                chat_id,
                &format!(
                    "✅ Job submitted successfully!\nJob ID: {}\n\n⏳ Processing... I'll notify you when it's done.",
                    job.id
                ),
            )
            .await?;

        info!("Submitted job {} for chat {}", job.id, chat_id);
        Arc::clone(&self.executor).spawn(job.id.clone());
        Arc::clone(&self.notifier).watch(job.id, chat_id).await;

        Ok(())
    }

    /// Explicit cancel: valid from every state, discards the session and
    /// stops any completion watch. An in-flight pipeline run keeps going.
    async fn cancel_session(&self, chat_id: i64) -> Result<()> {
        if let Some(session) = self.sessions.get(chat_id).await {
            if let Some(job_id) = &session.job_id {
                self.notifier.cancel_watch(job_id).await;
            }
        }
        self.sessions.clear(chat_id).await;
        self.chat
            .send_message(chat_id, "Session cancelled. Send /start to begin again.")
            .await?;
        Ok(())
    }
}
