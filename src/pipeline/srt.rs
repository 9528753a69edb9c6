//! SRT subtitle serialization.

use crate::media::SubtitleSegment;
use anyhow::{Context, Result};
use std::path::Path;

/// Prepare raw transcription output for use as subtitles: drop segments with
/// no text, order by start time, renumber 1..N.
pub fn normalize_segments(mut segments: Vec<SubtitleSegment>) -> Vec<SubtitleSegment> {
    segments.retain(|s| !s.text.trim().is_empty());
    segments.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(std::cmp::Ordering::Equal));
    for (i, segment) in segments.iter_mut().enumerate() {
        segment.index = i + 1;
    }
    segments
}

/// `HH:MM:SS,mmm`
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = seconds.max(0.0);
    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = (seconds % 60.0) as u64;
    let millis = ((seconds - seconds.floor()) * 1000.0) as u64;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}

pub fn to_srt(segments: &[SubtitleSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            segment.index,
            format_timestamp(segment.start),
            format_timestamp(segment.end),
            segment.text
        ));
    }
    out
}

pub fn write_srt(segments: &[SubtitleSegment], path: &Path) -> Result<()> {
    std::fs::write(path, to_srt(segments))
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(index: usize, start: f64, end: f64, text: &str) -> SubtitleSegment {
        SubtitleSegment {
            index,
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn timestamps_format_as_srt() {
        assert_eq!(format_timestamp(0.0), "00:00:00,000");
        assert_eq!(format_timestamp(61.5), "00:01:01,500");
        assert_eq!(format_timestamp(3725.25), "01:02:05,250");
    }

    #[test]
    fn fractional_milliseconds_truncate() {
        // 3725.042 is not exactly representable; the stored value is a hair
        // below, and milliseconds truncate rather than round.
        assert_eq!(format_timestamp(3725.042), "01:02:05,041");
        assert_eq!(format_timestamp(1.9999), "00:00:01,999");
    }

    #[test]
    fn normalization_sorts_filters_and_renumbers() {
        let segments = normalize_segments(vec![
            segment(7, 5.0, 6.0, "second"),
            segment(2, 1.0, 2.0, "first"),
            segment(3, 3.0, 4.0, "   "),
        ]);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].index, 1);
        assert_eq!(segments[0].text, "first");
        assert_eq!(segments[1].index, 2);
        assert_eq!(segments[1].text, "second");
    }

    #[test]
    fn srt_output_layout() {
        let srt = to_srt(&[segment(1, 0.0, 1.5, "hello")]);
        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,500\nhello\n\n");
    }
}
