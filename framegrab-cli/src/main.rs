// framegrab-cli/src/main.rs
//
// Entry point for the framegrab CLI. Parses arguments, sets up logging,
// drives the core extraction library, and prints the resulting frame paths.
//
// Output contract: the input path is echoed to stdout first, then (on
// success) the ordered frame paths, one per line. Everything else (progress,
// summary, errors) goes to stderr so stdout stays pipeable.

use clap::Parser;
use framegrab_core::external::SidecarSpawner;
use framegrab_core::{
    annotate_frames, check_dependency, extract_frames, load_annotations, CoreResult,
    ExtractionConfig, MediaSource,
};
use owo_colors::OwoColorize;
use std::process;
use std::time::Instant;

mod cli;

use cli::{AnnotateArgs, Cli, Commands, ExtractArgs};

fn run_extract(args: ExtractArgs) -> CoreResult<()> {
    let start_time = Instant::now();

    // Echo the input path before any extraction output.
    println!("{}", args.input.display());

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    std::fs::create_dir_all(&args.output_dir)?;

    let source = MediaSource::open(&args.input)?;
    log::info!(
        "Opened {} ({}x{})",
        source.path.display(),
        source.properties.width,
        source.properties.height
    );

    let config = ExtractionConfig {
        start_secs: args.start,
        duration_secs: args.duration,
        fps: args.fps,
        prefix: args.prefix,
        output_dir: args.output_dir,
    };

    let frames = extract_frames(&SidecarSpawner, &source, &config)?;

    for frame in &frames {
        println!("{}", frame.display());
    }
    log::info!(
        "Extracted {} frame(s) in {:.2}s",
        frames.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn run_annotate(args: AnnotateArgs) -> CoreResult<()> {
    let start_time = Instant::now();

    println!("{}", args.input.display());

    let annotations = load_annotations(&args.detections)?;

    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;

    std::fs::create_dir_all(&args.output_dir)?;

    let source = MediaSource::open(&args.input)?;
    log::info!(
        "Opened {} ({}x{})",
        source.path.display(),
        source.properties.width,
        source.properties.height
    );

    let written = annotate_frames(&SidecarSpawner, &source, &annotations, &args.output_dir)?;

    for frame in &written {
        println!("{}", frame.display());
    }
    log::info!(
        "Annotated {} of {} detection(s) in {:.2}s",
        written.len(),
        annotations.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Extract(args) => run_extract(args),
        Commands::Annotate(args) => run_annotate(args),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}
