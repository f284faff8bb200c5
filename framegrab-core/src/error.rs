//! Error types shared across the framegrab-core library.

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Custom error types for framegrab
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Required external dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start command '{0}': {1}")]
    CommandStart(String, std::io::Error),

    #[error("Failed waiting for command '{0}': {1}")]
    CommandWait(String, std::io::Error),

    #[error("Command '{cmd}' failed ({status}): {stderr}")]
    CommandFailed {
        cmd: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Failed to parse ffprobe output: {0}")]
    FfprobeParse(String),

    #[error("Video info error: {0}")]
    VideoInfo(String),

    #[error("Invalid extraction config: {0}")]
    Config(String),

    #[error("No frames were produced in {0}")]
    NoFramesProduced(PathBuf),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

/// Result type for framegrab-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Creates a `CoreError::CommandStart` for the named command.
pub fn command_start_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(cmd.into(), err)
}

/// Creates a `CoreError::CommandWait` for the named command.
pub fn command_wait_error(cmd: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(cmd.into(), err)
}

/// Creates a `CoreError::CommandFailed` carrying the command's exit status and
/// captured stderr payload verbatim.
pub fn command_failed_error(
    cmd: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        cmd: cmd.into(),
        status,
        stderr: stderr.into(),
    }
}
