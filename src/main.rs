use anyhow::Result;
use clap::Parser;
use polysub::{
    create_router, AppState, CompletionNotifier, Config, FfmpegToolkit, JobRegistry,
    LogChatSink, PipelineExecutor, ScriptTranscriber, ScriptTranslator, SessionStore, Storage,
};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "polysub", about = "Media transcription and translation service")]
struct Args {
    /// Configuration file (without extension, e.g. "config/polysub")
    #[arg(long, default_value = "config/polysub")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} starting", cfg.service.name);

    let storage = Arc::new(Storage::new(&cfg.storage.upload_dir, &cfg.storage.output_dir));
    storage.init()?;

    let registry = Arc::new(JobRegistry::new());
    let sessions = SessionStore::new();

    let media = Arc::new(FfmpegToolkit::new(&cfg.tools.ffmpeg, &cfg.tools.ffprobe));
    let transcriber = Arc::new(ScriptTranscriber::new(&cfg.tools.python, &cfg.tools.scripts_dir));
    let translator = Arc::new(ScriptTranslator::new(&cfg.tools.python, &cfg.tools.scripts_dir));

    let executor = Arc::new(PipelineExecutor::new(
        Arc::clone(&registry),
        Arc::clone(&storage),
        media,
        transcriber,
        translator,
    ));

    let notifier = Arc::new(CompletionNotifier::new(
        Arc::clone(&registry) as _,
        Arc::new(LogChatSink::new()),
        sessions,
        Arc::clone(&storage),
        cfg.notifier.poll_interval(),
    ));

    let state = AppState::new(registry, executor, notifier);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
