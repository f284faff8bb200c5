// framegrab-core/tests/common/mod.rs
//
// Mock engine shared by the adapter test suites: records every spawned
// command's arguments and materializes the output files ffmpeg would have
// written.

#![allow(dead_code)]

use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use framegrab_core::error::{command_start_error, CoreResult};
use framegrab_core::external::{FfmpegProcess, FfmpegSpawner};
use framegrab_core::media::{MediaSource, VideoProperties};
use std::cell::RefCell;
use std::os::unix::process::ExitStatusExt;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::rc::Rc;

#[derive(Clone)]
pub enum MockOutcome {
    /// Exit 0 after writing `frames` files matching the output pattern (the
    /// last argument; `%d` is replaced by 1..=frames, a plain path gets one
    /// file when frames > 0).
    Success { frames: u64 },
    /// Exit non-zero after emitting the given stderr lines as error events.
    ExitFailure { stderr_lines: Vec<String> },
    /// Fail to spawn at all.
    SpawnError,
}

pub struct MockProcess {
    events: Vec<FfmpegEvent>,
    exit_status: ExitStatus,
}

impl FfmpegProcess for MockProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        for event in self.events.drain(..) {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

#[derive(Clone)]
pub struct MockSpawner {
    outcome: MockOutcome,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockSpawner {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            received_calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockSpawner {
    type Process = MockProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args: Vec<String> = cmd
            .as_inner()
            .get_args()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();
        self.received_calls.borrow_mut().push(args.clone());

        match &self.outcome {
            MockOutcome::Success { frames } => {
                let pattern = args.last().expect("command should have an output argument");
                if pattern.contains("%d") {
                    for n in 1..=*frames {
                        let path = PathBuf::from(pattern.replace("%d", &n.to_string()));
                        std::fs::File::create(&path).expect("failed to create mock frame file");
                    }
                } else if *frames > 0 {
                    std::fs::File::create(pattern).expect("failed to create mock frame file");
                }
                Ok(MockProcess {
                    events: vec![],
                    exit_status: ExitStatus::from_raw(0),
                })
            }
            MockOutcome::ExitFailure { stderr_lines } => Ok(MockProcess {
                events: stderr_lines
                    .iter()
                    .map(|l| FfmpegEvent::Log(LogLevel::Error, l.clone()))
                    .collect(),
                exit_status: ExitStatus::from_raw(256),
            }),
            MockOutcome::SpawnError => Err(command_start_error(
                "ffmpeg",
                std::io::Error::new(std::io::ErrorKind::NotFound, "mock spawn failure"),
            )),
        }
    }
}

pub fn test_source() -> MediaSource {
    MediaSource {
        path: PathBuf::from("input.mp4"),
        properties: VideoProperties {
            width: 1920,
            height: 1080,
            duration_secs: Some(60.0),
        },
    }
}

pub fn arg_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.iter()
        .position(|a| a == flag)
        .is_some_and(|i| args.get(i + 1).map(String::as_str) == Some(value))
}
