// ============================================================================
// framegrab-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with the external media engine
//
// This module encapsulates interactions with the external command-line tools
// (ffmpeg, ffprobe). ffmpeg execution is abstracted behind traits so the
// extraction adapter can be exercised against a mock engine in tests; the
// default implementations use the ffmpeg-sidecar crate.

use crate::error::{CoreError, CoreResult};
use std::io;
use std::process::{Command, Stdio};

/// Traits and implementations for spawning and driving ffmpeg processes
pub mod ffmpeg_executor;

pub use ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};

/// Checks that a required external command is available and executable.
///
/// Runs `<cmd_name> -version` with all output discarded; only the ability to
/// start the process matters.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check for '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
