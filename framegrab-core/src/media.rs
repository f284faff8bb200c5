//! Opening and probing media sources.
//!
//! A [`MediaSource`] is the opened handle the extraction adapter operates on.
//! Opening delegates all format validation to ffprobe; this module only
//! insists that the file probes cleanly and contains a video stream.

use crate::error::{command_failed_error, command_start_error, CoreError, CoreResult};
use ffprobe::{ffprobe, FfProbeError};
use std::path::{Path, PathBuf};

/// Properties of the video stream reported by ffprobe.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoProperties {
    pub width: u32,
    pub height: u32,
    /// Container duration in seconds, when the container reports one.
    pub duration_secs: Option<f64>,
}

/// An opened media resource, identified by its filesystem path.
///
/// Owned by a single invocation. There is no explicit close: the engine is a
/// process-per-request collaborator, so nothing stays open between calls.
#[derive(Debug, Clone)]
pub struct MediaSource {
    pub path: PathBuf,
    pub properties: VideoProperties,
}

impl MediaSource {
    /// Opens `path` by probing it with ffprobe.
    ///
    /// Fails if the file cannot be probed or has no video stream. The probe
    /// is the only validation performed; codec support and seekability stay
    /// the engine's problem.
    pub fn open(path: &Path) -> CoreResult<Self> {
        log::debug!("Probing media source: {}", path.display());
        let metadata = ffprobe(path).map_err(|err| {
            log::error!("ffprobe failed for {}: {:?}", path.display(), err);
            map_ffprobe_error(err, path)
        })?;

        let video_stream = metadata
            .streams
            .iter()
            .find(|s| s.codec_type.as_deref() == Some("video"))
            .ok_or_else(|| {
                CoreError::VideoInfo(format!("No video stream found in {}", path.display()))
            })?;

        let width = video_stream.width.unwrap_or(0);
        let height = video_stream.height.unwrap_or(0);
        if width <= 0 || height <= 0 {
            return Err(CoreError::VideoInfo(format!(
                "Invalid video dimensions in {}: width={:?}, height={:?}",
                path.display(),
                video_stream.width,
                video_stream.height
            )));
        }

        let duration_secs = metadata
            .format
            .duration
            .as_deref()
            .and_then(|d| d.parse::<f64>().ok());

        log::debug!(
            "Opened {}: {}x{}, duration={:?}s",
            path.display(),
            width,
            height,
            duration_secs
        );

        Ok(Self {
            path: path.to_path_buf(),
            properties: VideoProperties {
                width: width as u32,
                height: height as u32,
                duration_secs,
            },
        })
    }
}

fn map_ffprobe_error(err: FfProbeError, path: &Path) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => {
            command_start_error(format!("ffprobe ({})", path.display()), io_err)
        }
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({})", path.display()), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => CoreError::FfprobeParse(format!(
            "ffprobe output deserialization for {}: {}",
            path.display(),
            err
        )),
        _ => CoreError::FfprobeParse(format!(
            "Unknown ffprobe error for {}: {:?}",
            path.display(),
            err
        )),
    }
}
