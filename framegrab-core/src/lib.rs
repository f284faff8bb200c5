//! Core library for extracting still JPEG frames from video files using
//! ffmpeg and ffprobe as external processes.
//!
//! The library opens a media source by probing it, then issues a single
//! extraction request to ffmpeg for a fixed window (by default: 1 second
//! starting at 6 seconds, sampled at 3 fps) and returns the ordered list of
//! frame files the engine produced. A companion annotation stage draws
//! detection results (bounding box and label) onto single frames at given
//! timestamps.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use framegrab_core::{ExtractionConfig, MediaSource, extract_frames};
//! use framegrab_core::external::SidecarSpawner;
//! use std::path::Path;
//!
//! let source = MediaSource::open(Path::new("input.mp4")).unwrap();
//! let config = ExtractionConfig::new("frames");
//! let frames = extract_frames(&SidecarSpawner, &source, &config).unwrap();
//! for frame in frames {
//!     println!("{}", frame.display());
//! }
//! ```

pub mod annotation;
pub mod config;
pub mod error;
pub mod external;
pub mod extraction;
pub mod media;

// Re-exports for public API
pub use annotation::{annotate_frames, load_annotations, Annotation, BoundingBox};
pub use config::{
    ExtractionConfig, DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX,
    DEFAULT_START_SECS,
};
pub use error::{CoreError, CoreResult};
pub use external::check_dependency;
pub use extraction::extract_frames;
pub use media::{MediaSource, VideoProperties};
