use super::{MediaToolkit, MediaTrack};
use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// ffmpeg/ffprobe-backed media toolkit.
pub struct FfmpegToolkit {
    ffmpeg: String,
    ffprobe: String,
}

impl FfmpegToolkit {
    pub fn new(ffmpeg: impl Into<String>, ffprobe: impl Into<String>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
        }
    }

    async fn run(&self, program: &str, args: &[String]) -> Result<Vec<u8>> {
        debug!("Executing {} {}", program, args.join(" "));

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", program))?;

        if !output.status.success() {
            bail!(
                "{} exited with {}: {}",
                program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(output.stdout)
    }
}

#[async_trait::async_trait]
impl MediaToolkit for FfmpegToolkit {
    async fn analyze_media(&self, file: &Path) -> Result<Vec<MediaTrack>> {
        let args = vec![
            "-v".to_string(),
            "quiet".to_string(),
            "-print_format".to_string(),
            "json".to_string(),
            "-show_streams".to_string(),
            file.display().to_string(),
        ];

        let stdout = self.run(&self.ffprobe, &args).await?;
        let root: serde_json::Value =
            serde_json::from_slice(&stdout).context("failed to parse ffprobe output")?;

        let streams = root
            .get("streams")
            .and_then(|s| s.as_array())
            .context("ffprobe output carries no streams")?;

        let tracks: Vec<MediaTrack> = streams
            .iter()
            .enumerate()
            .map(|(index, stream)| {
                let tags = stream.get("tags");
                let tag = |name: &str| {
                    tags.and_then(|t| t.get(name))
                        .and_then(|v| v.as_str())
                        .map(str::to_string)
                };

                MediaTrack {
                    index,
                    kind: stream
                        .get("codec_type")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    codec: stream
                        .get("codec_name")
                        .and_then(|v| v.as_str())
                        .unwrap_or("unknown")
                        .to_string(),
                    lang: tag("language").unwrap_or_else(|| "und".to_string()),
                    is_default: stream
                        .get("disposition")
                        .and_then(|d| d.get("default"))
                        .and_then(|v| v.as_i64())
                        .unwrap_or(0)
                        != 0,
                    is_forced: stream
                        .get("disposition")
                        .and_then(|d| d.get("forced"))
                        .and_then(|v| v.as_i64())
                        .unwrap_or(0)
                        != 0,
                    title: tag("title").unwrap_or_default(),
                }
            })
            .collect();

        info!("Analyzed {}: {} tracks found", file.display(), tracks.len());
        Ok(tracks)
    }

    async fn extract_audio(
        &self,
        video: &Path,
        output: &Path,
        audio_track: Option<usize>,
    ) -> Result<()> {
        let mut args = vec![
            "-i".to_string(),
            video.display().to_string(),
            "-y".to_string(),
        ];

        if let Some(track) = audio_track {
            args.push("-map".to_string());
            args.push(format!("0:a:{}", track));
        }

        // 16kHz mono PCM, the format the transcription backends expect.
        args.extend(
            [
                "-vn", "-acodec", "pcm_s16le", "-ar", "16000", "-ac", "1",
            ]
            .iter()
            .map(|s| s.to_string()),
        );
        args.push(output.display().to_string());

        self.run(&self.ffmpeg, &args).await?;
        info!("Audio extracted to {}", output.display());
        Ok(())
    }

    async fn burn_subtitles(&self, video: &Path, subtitles: &Path, output: &Path) -> Result<()> {
        // The subtitles filter parses ':' specially, so escape it in paths.
        let filter_path = subtitles
            .display()
            .to_string()
            .replace('\\', "/")
            .replace(':', "\\:");

        let args = vec![
            "-i".to_string(),
            video.display().to_string(),
            "-y".to_string(),
            "-vf".to_string(),
            format!("subtitles={}", filter_path),
            "-c:a".to_string(),
            "copy".to_string(),
            output.display().to_string(),
        ];

        self.run(&self.ffmpeg, &args).await?;
        info!("Subtitles burned to {}", output.display());
        Ok(())
    }

    async fn mux_soft_subtitles(
        &self,
        video: &Path,
        subtitles: &[(PathBuf, String)],
        output: &Path,
    ) -> Result<()> {
        let mut args = vec![
            "-i".to_string(),
            video.display().to_string(),
            "-y".to_string(),
        ];

        for (path, _) in subtitles {
            args.push("-i".to_string());
            args.push(path.display().to_string());
        }

        args.push("-map".to_string());
        args.push("0:v".to_string());
        args.push("-map".to_string());
        args.push("0:a".to_string());

        for (i, (_, lang)) in subtitles.iter().enumerate() {
            args.push("-map".to_string());
            args.push(format!("{}:s", i + 1));
            args.push(format!("-metadata:s:s:{}", i));
            args.push(format!("language={}", lang));
        }

        args.extend(
            ["-c:v", "copy", "-c:a", "copy", "-c:s", "srt"]
                .iter()
                .map(|s| s.to_string()),
        );
        args.push(output.display().to_string());

        self.run(&self.ffmpeg, &args).await?;
        info!("Soft subtitles muxed to {}", output.display());
        Ok(())
    }
}
