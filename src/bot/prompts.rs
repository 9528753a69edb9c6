//! Prompt texts shown during parameter gathering.

use crate::session::{language_name, UserSession, SUPPORTED_LANGUAGES, WHISPER_MODELS};

pub const SESSION_EXPIRED: &str = "Session expired. Please send the file again.";

pub fn welcome() -> String {
    "👋 Hello!\n\n\
     I'm a video subtitle translation bot powered by AI.\n\n\
     🎬 Send me a video file and I can:\n\
     • Generate subtitles using Whisper AI\n\
     • Translate to multiple languages\n\
     • Burn subtitles into video or add as separate tracks\n\n\
     Just send me a video to get started!"
        .to_string()
}

pub fn help() -> String {
    let languages: Vec<&str> = SUPPORTED_LANGUAGES.iter().map(|(_, name)| *name).collect();
    format!(
        "📖 Help & Commands:\n\n\
         /start - Start the bot\n\
         /help - Show this message\n\
         /cancel - Cancel current session\n\n\
         🎥 How to use:\n\
         1. Send a video file\n\
         2. I'll analyze it and show available options\n\
         3. Choose transcription model and target languages\n\
         4. Select subtitle type (hard/soft/both)\n\
         5. Wait for processing\n\
         6. Download your translated videos!\n\n\
         Supported languages:\n{}",
        languages.join(", ")
    )
}

pub fn analysis_summary(session: &UserSession) -> String {
    let audio = session.audio_tracks();
    let subtitles = session.subtitle_tracks();

    let mut text = String::from("📊 Media Analysis Results:\n\n");
    text.push_str(&format!("🎵 Audio tracks: {}\n", audio.len()));
    for track in &audio {
        text.push_str(&format!(
            "  - Track #{} ({}) Language: {}\n",
            track.index, track.codec, track.lang
        ));
    }

    text.push_str(&format!("\n📝 Subtitle tracks: {}\n", subtitles.len()));
    if subtitles.is_empty() {
        text.push_str("  - No existing subtitles found\n");
    } else {
        for track in &subtitles {
            text.push_str(&format!("  - Track #{} Language: {}\n", track.index, track.lang));
        }
    }

    text.push_str("\n🔄 What would you like to do?");
    text
}

pub fn whisper_model_selection() -> String {
    let mut text = String::from(
        "🎙️ Select Whisper Model:\n\n\
         Larger models are more accurate but take longer to process.\n\n",
    );
    for model in WHISPER_MODELS {
        text.push_str(&format!("• {}\n", model));
    }
    text
}

pub fn whisper_backend_selection() -> String {
    "🔧 Select Transcription Backend:\n\n\
     • Faster-Whisper - Optimized for speed (recommended)\n\
     • OpenAI-Whisper - Original implementation"
        .to_string()
}

pub fn align_selection() -> String {
    "🎯 Enable Subtitle Alignment?\n\n\
     Alignment improves subtitle timing accuracy using WhisperX."
        .to_string()
}

pub fn source_language_selection() -> String {
    "🎤 Source Language (Optional):\n\n\
     If you know the language of the video, select it to improve transcription \
     accuracy and speed. Or skip to auto-detect."
        .to_string()
}

pub fn target_language_selection(session: &UserSession) -> String {
    let selected = if session.params.target_languages.is_empty() {
        "None".to_string()
    } else {
        session
            .params
            .target_languages
            .iter()
            .map(|code| language_name(code).unwrap_or(code.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        "🌍 Select Target Languages:\n\n\
         Choose one or more languages for translation.\n\n\
         Selected: {}",
        selected
    )
}

pub fn translation_model_selection() -> String {
    "🔤 Select Translation Model:\n\n\
     • M2M100 - Balanced speed and quality (recommended)\n\
     • NLLB - Better quality for many languages"
        .to_string()
}

pub fn subtitle_mode_selection() -> String {
    "🎬 Select Subtitle Type:\n\n\
     • Hard - Subtitles burned into video (compatible with all players)\n\
     • Soft - Subtitles as separate tracks (can be toggled on/off)\n\
     • Both - Generate both versions"
        .to_string()
}

pub fn processing_summary(session: &UserSession) -> String {
    let params = &session.params;
    let mut text = String::from("📋 Processing Summary:\n\n");
    text.push_str(&format!(
        "📁 File: {}\n\n",
        session.file_name.as_deref().unwrap_or("unknown")
    ));

    if params.use_existing_subtitles {
        text.push_str("📝 Mode: Use existing subtitles\n");
    } else {
        text.push_str("🎙️ Transcription:\n");
        text.push_str(&format!("  • Model: {}\n", params.whisper_model.to_uppercase()));
        text.push_str(&format!("  • Backend: {}\n", params.whisper_backend));
        text.push_str(&format!(
            "  • Alignment: {}\n",
            if params.align_output { "Enabled" } else { "Disabled" }
        ));
        match params.source_language.as_deref() {
            Some(code) => text.push_str(&format!(
                "  • Source language: {}\n",
                language_name(code).unwrap_or(code)
            )),
            None => text.push_str("  • Source language: Auto-detect\n"),
        }
    }

    text.push_str("\n🔤 Translation:\n");
    text.push_str(&format!(
        "  • Model: {}\n",
        params.translation_model.to_uppercase()
    ));
    text.push_str(&format!(
        "  • Target languages: {}\n",
        params
            .target_languages
            .iter()
            .map(|code| language_name(code).unwrap_or(code.as_str()))
            .collect::<Vec<_>>()
            .join(", ")
    ));

    text.push_str(&format!("\n🎬 Subtitle type: {:?}\n\n", params.subtitle_mode));
    text.push_str("Ready to process?");
    text
}
