//! Extraction request configuration.
//!
//! The extraction window is a fixed set of parameters in the default case
//! (start at 6s, sample 1s at 3fps, prefix "r"). They live in an explicit
//! config struct so the boundary between what is fixed and what a caller may
//! override is visible in the API rather than buried in a literal.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

/// Default start offset into the source, in seconds.
pub const DEFAULT_START_SECS: f64 = 6.0;
/// Default length of the sampled window, in seconds.
pub const DEFAULT_DURATION_SECS: f64 = 1.0;
/// Default sampling rate, in frames per second.
pub const DEFAULT_FPS: f64 = 3.0;
/// Default output filename prefix.
pub const DEFAULT_PREFIX: &str = "r";
/// Default directory frames are written into.
pub const DEFAULT_OUTPUT_DIR: &str = "frames";

/// Immutable description of one extraction request.
///
/// Constructed once per invocation and never mutated afterwards; the engine
/// call receives it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionConfig {
    /// Seek offset into the source, in seconds.
    pub start_secs: f64,
    /// Length of the window to sample, in seconds.
    pub duration_secs: f64,
    /// Sampling rate in frames per second.
    pub fps: f64,
    /// Filename prefix for produced frames (e.g. "r" -> r_1.jpg, r_2.jpg...).
    pub prefix: String,
    /// Directory the engine writes frames into.
    pub output_dir: PathBuf,
}

impl ExtractionConfig {
    /// Creates a config with the fixed default window, writing into `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_secs: DEFAULT_START_SECS,
            duration_secs: DEFAULT_DURATION_SECS,
            fps: DEFAULT_FPS,
            prefix: DEFAULT_PREFIX.to_string(),
            output_dir: output_dir.into(),
        }
    }

    /// Validates the request before it is handed to the engine.
    ///
    /// The engine would reject most of these itself, but with much worse
    /// diagnostics (and a prefix containing a path separator would silently
    /// scatter frames outside the output directory).
    pub fn validate(&self) -> CoreResult<()> {
        if !self.start_secs.is_finite() || self.start_secs < 0.0 {
            return Err(CoreError::Config(format!(
                "start offset must be a non-negative number of seconds, got {}",
                self.start_secs
            )));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(CoreError::Config(format!(
                "duration must be a positive number of seconds, got {}",
                self.duration_secs
            )));
        }
        if !self.fps.is_finite() || self.fps <= 0.0 {
            return Err(CoreError::Config(format!(
                "frame rate must be positive, got {}",
                self.fps
            )));
        }
        if self.prefix.is_empty() {
            return Err(CoreError::Config("frame prefix must not be empty".to_string()));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(CoreError::Config(format!(
                "frame prefix must not contain path separators: '{}'",
                self.prefix
            )));
        }
        Ok(())
    }
}
