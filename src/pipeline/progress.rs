//! Overall progress estimation.
//!
//! Pure mapping from where the pipeline currently is to a 0-100 percentage.
//! Fixed weights per stage; the translation weight is split evenly across the
//! target languages and interpolated within the language in flight, while the
//! burn weight is credited per fully completed language. Estimates never
//! decrease as the pipeline advances, and `Stage::Done` is exactly 100.

/// Pipeline position, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    ExtractAudio,
    Transcribe,
    WriteOriginal,
    Translate,
    BurnTranslated,
    MuxSoft,
    Done,
}

const INIT: f64 = 5.0;
const EXTRACT: f64 = 10.0;
const TRANSCRIBE: f64 = 20.0;
const BURN_ORIGINAL: f64 = 10.0;
const TRANSLATE: f64 = 30.0;
const BURN_TRANSLATED: f64 = 20.0;
const MUX: f64 = 5.0;

/// Weight of everything before the per-language work.
const FIXED: f64 = INIT + EXTRACT + TRANSCRIBE + BURN_ORIGINAL;

/// Estimate overall progress.
///
/// `languages_done` counts target languages fully processed (translated, and
/// burned when burning is requested); `percent` is progress within the current
/// stage or language, 0-100.
pub fn estimate(stage: Stage, languages_done: usize, total_languages: usize, percent: u8) -> u8 {
    let pct = f64::from(percent.min(100)) / 100.0;
    let total = total_languages.max(1) as f64;
    let done = languages_done.min(total_languages) as f64;
    let per_language = (TRANSLATE + BURN_TRANSLATED) / total;

    let value = match stage {
        Stage::Init => INIT * pct,
        Stage::ExtractAudio => INIT + EXTRACT * pct,
        Stage::Transcribe => INIT + EXTRACT + TRANSCRIBE * pct,
        Stage::WriteOriginal => INIT + EXTRACT + TRANSCRIBE + BURN_ORIGINAL * pct,
        // Translating the current language: completed languages carry their
        // full share, the one in flight is interpolated by percent.
        Stage::Translate => FIXED + per_language * done + (TRANSLATE / total) * pct,
        // Burning the current language: its translation share is earned, the
        // burn share lands only once the language completes.
        Stage::BurnTranslated => FIXED + per_language * done + TRANSLATE / total,
        Stage::MuxSoft => FIXED + TRANSLATE + BURN_TRANSLATED + MUX * pct,
        Stage::Done => 100.0,
    };

    value.round().clamp(0.0, 100.0) as u8
}
