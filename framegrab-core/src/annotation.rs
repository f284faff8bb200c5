//! Annotating single frames with detection results.
//!
//! Companion stage to extraction: given a list of detections (timestamp,
//! relative bounding box, label) produced by an external analysis service,
//! seek to each timestamp and write one JPEG with the box and label drawn
//! onto it. Drawing is delegated to the engine's `drawbox`/`drawtext`
//! filters; box geometry is expressed relative to the frame (`iw`/`ih`), so
//! no pixel math happens on this side.

use crate::error::{command_failed_error, CoreError, CoreResult};
use crate::external::{FfmpegProcess, FfmpegSpawner};
use crate::media::MediaSource;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Box outline color (pure green, matching the analysis overlay convention).
const BOX_COLOR: &str = "lime";
/// Box outline thickness in pixels.
const BOX_THICKNESS: u32 = 3;
/// Label position, in pixels from the top-left corner.
const LABEL_X: u32 = 10;
const LABEL_Y: u32 = 100;
const LABEL_FONT_SIZE: u32 = 24;
const LABEL_COLOR: &str = "white";

/// A bounding box in frame-relative coordinates (0.0..=1.0).
#[derive(Debug, Clone, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// One detection to draw: where in the video, where in the frame, and what
/// to say about it.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Timestamp of the frame, in milliseconds from the start.
    pub ts_millis: u64,
    pub region: BoundingBox,
    pub label: String,
}

// --- Detection file parsing ---
//
// The detections file is the JSON array emitted by the analysis job driver.
// Each entry carries "TS" and "boundingBox", plus either "personInfo" (person
// tracking, confidence only) or "faceInfo" (face match, confidence and the
// matched image id).

#[derive(Debug, Deserialize)]
struct RawDetection {
    #[serde(rename = "TS")]
    ts: u64,
    #[serde(rename = "boundingBox")]
    bounding_box: RawBoundingBox,
    #[serde(rename = "personInfo")]
    person_info: Option<RawPersonInfo>,
    #[serde(rename = "faceInfo")]
    face_info: Option<RawFaceInfo>,
}

#[derive(Debug, Deserialize)]
struct RawBoundingBox {
    #[serde(rename = "Left")]
    left: f64,
    #[serde(rename = "Top")]
    top: f64,
    #[serde(rename = "Width")]
    width: f64,
    #[serde(rename = "Height")]
    height: f64,
}

#[derive(Debug, Deserialize)]
struct RawPersonInfo {
    #[serde(rename = "Face")]
    face: RawFace,
}

#[derive(Debug, Deserialize)]
struct RawFace {
    #[serde(rename = "Confidence")]
    confidence: f64,
}

#[derive(Debug, Deserialize)]
struct RawFaceInfo {
    #[serde(rename = "Confidence")]
    confidence: f64,
    #[serde(rename = "ExternalImageId")]
    external_image_id: String,
}

impl RawDetection {
    fn into_annotation(self) -> CoreResult<Annotation> {
        let label = if let Some(person) = &self.person_info {
            format!("confidence: {}", person.face.confidence)
        } else if let Some(face) = &self.face_info {
            format!("confidence: {}( {} )", face.confidence, face.external_image_id)
        } else {
            return Err(CoreError::JsonParse(format!(
                "detection at TS={} has neither personInfo nor faceInfo",
                self.ts
            )));
        };

        Ok(Annotation {
            ts_millis: self.ts,
            region: BoundingBox {
                left: self.bounding_box.left,
                top: self.bounding_box.top,
                width: self.bounding_box.width,
                height: self.bounding_box.height,
            },
            label,
        })
    }
}

/// Loads annotations from a detections JSON file.
pub fn load_annotations(path: &Path) -> CoreResult<Vec<Annotation>> {
    log::debug!("Loading detections from {}", path.display());
    let data = std::fs::read_to_string(path)?;
    let raw: Vec<RawDetection> = serde_json::from_str(&data)
        .map_err(|e| CoreError::JsonParse(format!("{}: {}", path.display(), e)))?;
    raw.into_iter().map(RawDetection::into_annotation).collect()
}

/// Escapes a string for use as a filter argument value.
///
/// A backslash escapes the next character in the engine's filter syntax;
/// everything the filtergraph or option parser treats as structure gets one.
fn escape_filter_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '\'' | ':' | ',' | ';' | '=' | '[' | ']') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Builds the ffmpeg command annotating one frame.
fn build_annotation_command(
    source: &MediaSource,
    annotation: &Annotation,
    output_path: &Path,
) -> FfmpegCommand {
    let filter = format!(
        "drawbox=x=iw*{}:y=ih*{}:w=iw*{}:h=ih*{}:color={}:t={},\
         drawtext=text={}:x={}:y={}:fontcolor={}:fontsize={}",
        annotation.region.left,
        annotation.region.top,
        annotation.region.width,
        annotation.region.height,
        BOX_COLOR,
        BOX_THICKNESS,
        escape_filter_text(&annotation.label),
        LABEL_X,
        LABEL_Y,
        LABEL_COLOR,
        LABEL_FONT_SIZE,
    );

    let mut cmd = FfmpegCommand::new();
    cmd.arg("-y");
    cmd.arg("-ss");
    cmd.arg((annotation.ts_millis as f64 / 1000.0).to_string());
    cmd.input(source.path.to_string_lossy().as_ref());
    cmd.arg("-frames:v");
    cmd.arg("1");
    cmd.arg("-vf");
    cmd.arg(filter);
    cmd.arg("-q:v");
    cmd.arg("2");
    cmd.output(output_path.to_string_lossy().as_ref());
    cmd
}

/// Writes one annotated JPEG per detection into `output_dir`, named
/// `<ts>.jpg`, and returns the written paths in input order.
///
/// One engine request is issued per annotation. A timestamp past the end of
/// the source yields no frame; such detections are skipped with a warning
/// rather than failing the run. An engine failure aborts the remaining
/// annotations.
pub fn annotate_frames<S: FfmpegSpawner>(
    spawner: &S,
    source: &MediaSource,
    annotations: &[Annotation],
    output_dir: &Path,
) -> CoreResult<Vec<PathBuf>> {
    log::info!(
        "Annotating {} detection(s) from {} into {}",
        annotations.len(),
        source.path.display(),
        output_dir.display()
    );

    let mut written = Vec::with_capacity(annotations.len());
    for annotation in annotations {
        let output_path = output_dir.join(format!("{}.jpg", annotation.ts_millis));
        let cmd = build_annotation_command(source, annotation, &output_path);
        log::debug!("Running annotation command: {:?}", cmd);

        let mut process = spawner.spawn(cmd)?;
        let mut engine_errors: Vec<String> = Vec::new();
        process.handle_events(|event| {
            match event {
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, msg)
                | FfmpegEvent::Error(msg) => {
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
            log::error!("Frame annotation failed at TS={}: {}", annotation.ts_millis, status);
            return Err(command_failed_error(
                "ffmpeg (frame annotation)",
                status,
                engine_errors.join("\n"),
            ));
        }

        // A seek past the end exits cleanly without writing anything.
        if output_path.is_file() {
            written.push(output_path);
        } else {
            log::warn!(
                "No frame at TS={}ms in {}, skipping",
                annotation.ts_millis,
                source.path.display()
            );
        }
    }

    log::info!("Annotated {} frame(s)", written.len());
    Ok(written)
}
