// framegrab-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Parser, Subcommand};
use framegrab_core::{
    DEFAULT_DURATION_SECS, DEFAULT_FPS, DEFAULT_OUTPUT_DIR, DEFAULT_PREFIX, DEFAULT_START_SECS,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "Framegrab: JPEG frame extraction tool",
    long_about = "Extracts a short burst of still JPEG frames from a video file using ffmpeg via the framegrab-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extracts JPEG frames from a video file
    Extract(ExtractArgs),
    /// Draws detection boxes and labels onto frames at detected timestamps
    Annotate(AnnotateArgs),
}

#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Input video file to extract frames from
    #[arg(required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Directory where extracted frames will be written
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Start offset into the video, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_START_SECS)]
    pub start: f64,

    /// Length of the window to sample, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_DURATION_SECS)]
    pub duration: f64,

    /// Sampling rate in frames per second
    #[arg(long, value_name = "RATE", default_value_t = DEFAULT_FPS)]
    pub fps: f64,

    /// Filename prefix for the produced frames
    #[arg(long, value_name = "NAME", default_value = DEFAULT_PREFIX)]
    pub prefix: String,
}

#[derive(Parser, Debug)]
pub struct AnnotateArgs {
    /// Input video file to annotate frames from
    #[arg(required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// JSON file with detection results (timestamps, bounding boxes, labels)
    #[arg(required = true, value_name = "DETECTIONS_JSON")]
    pub detections: PathBuf,

    /// Directory where annotated frames will be written
    #[arg(short = 'o', long = "output-dir", value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_extract_defaults() {
        let cli = Cli::parse_from(["framegrab", "extract", "clip.mp4"]);
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("clip.mp4"));
                assert_eq!(args.output_dir, PathBuf::from("frames"));
                assert_eq!(args.start, 6.0);
                assert_eq!(args.duration, 1.0);
                assert_eq!(args.fps, 3.0);
                assert_eq!(args.prefix, "r");
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_parse_extract_overrides() {
        let cli = Cli::parse_from([
            "framegrab",
            "extract",
            "clip.mkv",
            "--output-dir",
            "out",
            "--start",
            "12.5",
            "--duration",
            "2",
            "--fps",
            "1",
            "--prefix",
            "shot",
        ]);
        match cli.command {
            Commands::Extract(args) => {
                assert_eq!(args.input, PathBuf::from("clip.mkv"));
                assert_eq!(args.output_dir, PathBuf::from("out"));
                assert_eq!(args.start, 12.5);
                assert_eq!(args.duration, 2.0);
                assert_eq!(args.fps, 1.0);
                assert_eq!(args.prefix, "shot");
            }
            _ => panic!("Expected Extract command"),
        }
    }

    #[test]
    fn test_parse_extract_requires_input() {
        assert!(Cli::try_parse_from(["framegrab", "extract"]).is_err());
    }

    #[test]
    fn test_parse_annotate_args() {
        let cli = Cli::parse_from(["framegrab", "annotate", "clip.mp4", "detections.json"]);
        match cli.command {
            Commands::Annotate(args) => {
                assert_eq!(args.input, PathBuf::from("clip.mp4"));
                assert_eq!(args.detections, PathBuf::from("detections.json"));
                assert_eq!(args.output_dir, PathBuf::from("frames"));
            }
            _ => panic!("Expected Annotate command"),
        }
    }

    #[test]
    fn test_parse_annotate_requires_detections_file() {
        assert!(Cli::try_parse_from(["framegrab", "annotate", "clip.mp4"]).is_err());
    }
}
