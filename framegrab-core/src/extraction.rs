//! The frame extraction adapter.
//!
//! Issues a single extraction request to the external engine (one ffmpeg
//! child process) and returns the ordered list of frame files it produced.
//! There is no retry and no partial-result recovery: a failed request fails
//! the whole operation even if some frames were written before the failure.

use crate::config::ExtractionConfig;
use crate::error::{command_failed_error, CoreError, CoreResult};
use crate::external::{FfmpegProcess, FfmpegSpawner};
use crate::media::MediaSource;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use std::path::{Path, PathBuf};

/// Builds the ffmpeg command for one extraction request.
///
/// The seek (`-ss`) goes before the input for fast keyframe seeking; the
/// window and sampling rate apply on the output side. Frames are written as
/// `<prefix>_<n>.jpg` starting at n=1, which is the ordering the caller gets
/// back.
fn build_extraction_command(source: &MediaSource, config: &ExtractionConfig) -> FfmpegCommand {
    let output_pattern = config.output_dir.join(format!("{}_%d.jpg", config.prefix));

    let mut cmd = FfmpegCommand::new();
    cmd.arg("-y");
    cmd.arg("-ss");
    cmd.arg(config.start_secs.to_string());
    cmd.input(source.path.to_string_lossy().as_ref());
    cmd.arg("-t");
    cmd.arg(config.duration_secs.to_string());
    cmd.arg("-vf");
    cmd.arg(format!("fps={}", config.fps));
    cmd.arg("-f");
    cmd.arg("image2");
    cmd.arg("-q:v"); // JPEG quality, 2 is near-lossless
    cmd.arg("2");
    cmd.output(output_pattern.to_string_lossy().as_ref());
    cmd
}

/// Extracts frames from `source` according to `config`.
///
/// Exactly one engine request is issued per call. The caller is blocked until
/// the engine terminates; the engine's exit status is the single completion
/// signal (success and failure are mutually exclusive).
///
/// On success returns the produced frame paths ordered by frame index, which
/// is guaranteed non-empty. On failure returns an error carrying the engine's
/// stderr payload verbatim.
pub fn extract_frames<S: FfmpegSpawner>(
    spawner: &S,
    source: &MediaSource,
    config: &ExtractionConfig,
) -> CoreResult<Vec<PathBuf>> {
    config.validate()?;

    // Frames matching the prefix that survived an earlier run would be
    // indistinguishable from this run's output (`-y` only overwrites the
    // indices the engine regenerates), so clear them before the engine runs.
    clear_stale_frames(&config.output_dir, &config.prefix)?;

    if let Some(duration) = source.properties.duration_secs {
        if config.start_secs >= duration {
            // The engine will simply produce nothing; surface the likely cause
            // before it does.
            log::warn!(
                "Start offset {}s is at or beyond source duration {}s for {}",
                config.start_secs,
                duration,
                source.path.display()
            );
        }
    }

    log::info!(
        "Extracting frames: input={}, start={}s, duration={}s, fps={}, prefix={}, out_dir={}",
        source.path.display(),
        config.start_secs,
        config.duration_secs,
        config.fps,
        config.prefix,
        config.output_dir.display()
    );

    let cmd = build_extraction_command(source, config);
    log::debug!("Running extraction command: {:?}", cmd);

    let mut process = spawner.spawn(cmd)?;

    // Collect the engine's error output while draining events; it becomes the
    // error payload if the process exits non-zero.
    let mut engine_errors: Vec<String> = Vec::new();
    process.handle_events(|event| {
        match event {
            FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg) => {
                log::debug!("ffmpeg: {}", msg);
                engine_errors.push(msg);
            }
            FfmpegEvent::Error(msg) => {
                log::debug!("ffmpeg: {}", msg);
                engine_errors.push(msg);
            }
            FfmpegEvent::Log(_, msg) => log::trace!("ffmpeg: {}", msg),
            _ => {}
        }
        Ok(())
    })?;

    let status = process.wait()?;
    if !status.success() {
        log::error!("Frame extraction failed: {}", status);
        return Err(command_failed_error(
            "ffmpeg (frame extraction)",
            status,
            engine_errors.join("\n"),
        ));
    }

    let frames = collect_frames(&config.output_dir, &config.prefix)?;
    if frames.is_empty() {
        // Engine reported success but wrote nothing, e.g. the window starts
        // past the end of the source.
        return Err(CoreError::NoFramesProduced(config.output_dir.clone()));
    }

    log::info!("Extracted {} frame(s)", frames.len());
    Ok(frames)
}

/// Removes frames matching `<prefix>_<n>.jpg` left over from a previous run,
/// so [`collect_frames`] reports only what the current request produced.
///
/// A missing output directory is treated as already clean; the engine will
/// fail on it with its own diagnostics.
fn clear_stale_frames(output_dir: &Path, prefix: &str) -> CoreResult<()> {
    let entries = match std::fs::read_dir(output_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if parse_frame_index(name, prefix).is_some() {
            log::debug!("Removing stale frame from previous run: {}", path.display());
            std::fs::remove_file(&path)?;
        }
    }
    Ok(())
}

/// Lists the frames the engine produced in `output_dir`, ordered by frame index.
///
/// Only files matching `<prefix>_<n>.jpg` count; anything else in the
/// directory is ignored. Ordering is numeric on `n`, not lexicographic, so
/// `r_10.jpg` sorts after `r_2.jpg`.
pub fn collect_frames(output_dir: &Path, prefix: &str) -> CoreResult<Vec<PathBuf>> {
    let mut indexed: Vec<(u64, PathBuf)> = Vec::new();

    for entry in std::fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if let Some(index) = parse_frame_index(name, prefix) {
            indexed.push((index, path));
        }
    }

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// Parses the frame index out of a filename of the form `<prefix>_<n>.jpg`.
fn parse_frame_index(file_name: &str, prefix: &str) -> Option<u64> {
    let rest = file_name.strip_prefix(prefix)?.strip_prefix('_')?;
    let index_str = rest.strip_suffix(".jpg")?;
    if index_str.is_empty() || !index_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    index_str.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_parse_frame_index() {
        assert_eq!(parse_frame_index("r_1.jpg", "r"), Some(1));
        assert_eq!(parse_frame_index("r_42.jpg", "r"), Some(42));
        assert_eq!(parse_frame_index("frame_7.jpg", "frame"), Some(7));
        // Wrong prefix, extension, or shape
        assert_eq!(parse_frame_index("x_1.jpg", "r"), None);
        assert_eq!(parse_frame_index("r_1.png", "r"), None);
        assert_eq!(parse_frame_index("r_.jpg", "r"), None);
        assert_eq!(parse_frame_index("r_1a.jpg", "r"), None);
        assert_eq!(parse_frame_index("r1.jpg", "r"), None);
    }

    #[test]
    fn test_collect_frames_numeric_order() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        for n in [10, 2, 1, 11, 3] {
            File::create(tmp.path().join(format!("r_{n}.jpg")))?;
        }
        // Noise that must be ignored
        File::create(tmp.path().join("other_1.jpg"))?;
        File::create(tmp.path().join("r_1.png"))?;

        let frames = collect_frames(tmp.path(), "r")?;
        let names: Vec<String> = frames
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["r_1.jpg", "r_2.jpg", "r_3.jpg", "r_10.jpg", "r_11.jpg"]);
        Ok(())
    }

    #[test]
    fn test_collect_frames_empty_dir() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        assert!(collect_frames(tmp.path(), "r")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_clear_stale_frames_only_touches_matching_files() -> Result<(), Box<dyn std::error::Error>> {
        let tmp = tempdir()?;
        File::create(tmp.path().join("r_1.jpg"))?;
        File::create(tmp.path().join("r_12.jpg"))?;
        File::create(tmp.path().join("other_1.jpg"))?;
        File::create(tmp.path().join("r_1.png"))?;

        clear_stale_frames(tmp.path(), "r")?;

        assert!(!tmp.path().join("r_1.jpg").exists());
        assert!(!tmp.path().join("r_12.jpg").exists());
        assert!(tmp.path().join("other_1.jpg").exists());
        assert!(tmp.path().join("r_1.png").exists());
        Ok(())
    }

    #[test]
    fn test_clear_stale_frames_missing_dir_is_clean() {
        assert!(clear_stale_frames(Path::new("surely/does/not/exist"), "r").is_ok());
    }
}
