use super::{SubtitleSegment, Transcriber, Translator};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// Run a python helper script and return its combined output lines.
async fn run_script(python: &str, args: &[String]) -> Result<Vec<String>> {
    debug!("Executing {} {}", python, args.join(" "));

    let output = Command::new(python)
        .args(args)
        .output()
        .await
        .with_context(|| format!("failed to spawn {}", python))?;

    // Model libraries write warnings to stderr; keep everything for diagnostics.
    let mut lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect();
    lines.extend(
        String::from_utf8_lossy(&output.stderr)
            .lines()
            .map(str::to_string),
    );

    if !output.status.success() {
        bail!(
            "script exited with {}\nOutput: {}",
            output.status,
            lines.join("\n")
        );
    }

    Ok(lines)
}

/// The helper scripts print progress chatter followed by a single JSON object.
/// Scan from the end for the line opening that object and parse from there.
fn parse_json_output(lines: &[String]) -> Result<serde_json::Value> {
    for (i, line) in lines.iter().enumerate().rev() {
        let trimmed = line.trim();
        if !trimmed.starts_with('{') {
            continue;
        }

        let json_text = if trimmed.ends_with('}') {
            trimmed.to_string()
        } else {
            lines[i..].join("\n")
        };

        let value: serde_json::Value = serde_json::from_str(json_text.trim())
            .with_context(|| format!("failed to parse script JSON output:\n{}", json_text))?;

        if let Some(error) = value.get("error").and_then(|e| e.as_str()) {
            bail!("script reported error: {}", error);
        }

        return Ok(value);
    }

    bail!("no JSON output found in script output:\n{}", lines.join("\n"))
}

/// Transcription via the whisper helper scripts.
pub struct ScriptTranscriber {
    python: String,
    scripts_dir: PathBuf,
}

impl ScriptTranscriber {
    pub fn new(python: impl Into<String>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            scripts_dir: scripts_dir.into(),
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for ScriptTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        model: &str,
        language: Option<&str>,
        backend: &str,
        align: bool,
    ) -> Result<Vec<SubtitleSegment>> {
        let script = if backend == "openai-whisper" {
            "openai_whisper_transcribe.py"
        } else {
            "whisper_transcribe.py"
        };

        let mut args = vec![
            self.scripts_dir.join(script).display().to_string(),
            audio.display().to_string(),
            "--model".to_string(),
            model.to_string(),
        ];
        if let Some(lang) = language {
            args.push("--language".to_string());
            args.push(lang.to_string());
        }
        if align {
            args.push("--align".to_string());
        }

        let lines = run_script(&self.python, &args).await?;
        let result = parse_json_output(&lines)?;

        let segments = result
            .get("segments")
            .and_then(|s| s.as_array())
            .context("transcription output carries no segments")?;

        let segments: Vec<SubtitleSegment> = segments
            .iter()
            .enumerate()
            .map(|(i, seg)| SubtitleSegment {
                index: i + 1,
                start: seg.get("start").and_then(|v| v.as_f64()).unwrap_or(0.0),
                end: seg.get("end").and_then(|v| v.as_f64()).unwrap_or(0.0),
                text: seg
                    .get("text")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .trim()
                    .to_string(),
            })
            .collect();

        info!("Transcription completed: {} segments", segments.len());
        Ok(segments)
    }
}

/// Translation via the m2m100/nllb helper scripts.
pub struct ScriptTranslator {
    python: String,
    scripts_dir: PathBuf,
}

impl ScriptTranslator {
    pub fn new(python: impl Into<String>, scripts_dir: impl Into<PathBuf>) -> Self {
        Self {
            python: python.into(),
            scripts_dir: scripts_dir.into(),
        }
    }
}

#[async_trait::async_trait]
impl Translator for ScriptTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
        model: &str,
    ) -> Result<String> {
        // The NLLB script takes a different argument format.
        let args = if model.eq_ignore_ascii_case("nllb") {
            vec![
                self.scripts_dir.join("nllb_translate.py").display().to_string(),
                "--text".to_string(),
                text.to_string(),
                "--src-lang".to_string(),
                source.to_string(),
                "--tgt-lang".to_string(),
                target.to_string(),
            ]
        } else {
            vec![
                self.scripts_dir.join("translate_text.py").display().to_string(),
                text.to_string(),
                "--source".to_string(),
                source.to_string(),
                "--target".to_string(),
                target.to_string(),
            ]
        };

        debug!("Translating with {}: {} -> {}", model, source, target);

        let lines = run_script(&self.python, &args).await?;
        let result = parse_json_output(&lines)?;

        // The two models name the result field differently.
        result
            .get("translated")
            .or_else(|| result.get("translated_text"))
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .context("unexpected translation response format")
    }
}
