//! Consumer-side reducer: decode relay traffic and fold it into view state.
//!
//! The relay is type-oblivious; this is where the `type` tag finally gets
//! looked at. Unknown tags and malformed payloads are logged at `warn` and
//! dropped, and the stream carries on.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::protocol::{ControlCommand, Envelope, ImageStream};
use crate::telemetry::{TelemetryField, TelemetrySnapshot};

/// Log lines kept for display.
pub const LOG_CAPACITY: usize = 200;

const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Frames-per-second counter over fixed one-second windows.
#[derive(Debug, Clone)]
pub struct FrameRate {
    window_start: Instant,
    window_frames: u32,
    fps: u32,
    total: u64,
}

impl FrameRate {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            window_frames: 0,
            fps: 0,
            total: 0,
        }
    }

    pub fn tick(&mut self, now: Instant) {
        self.roll(now);
        self.window_frames += 1;
        self.total += 1;
    }

    /// Rate of the last completed window.
    pub fn fps(&mut self, now: Instant) -> u32 {
        self.roll(now);
        self.fps
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = (f64::from(self.window_frames) / elapsed.as_secs_f64()).round() as u32;
            self.window_frames = 0;
            self.window_start = now;
        }
    }
}

/// View state of one camera stream.
#[derive(Debug, Clone)]
pub struct StreamView {
    pub rate: FrameRate,
    pub resolution: Option<(u32, u32)>,
    pub last_frame: Option<String>,
}

impl StreamView {
    fn new(now: Instant) -> Self {
        Self {
            rate: FrameRate::new(now),
            resolution: None,
            last_frame: None,
        }
    }
}

/// What a single message did to the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Log(String),
    /// A control command from another operator, seen on the shared stream.
    Control(ControlCommand),
    /// Telemetry fields that were present in the delta.
    Telemetry(Vec<TelemetryField>),
    Frame {
        stream: ImageStream,
        resolution: Option<(u32, u32)>,
    },
    /// Unrecognised tag; nothing changed.
    Ignored { kind: Option<String> },
}

/// Everything a dashboard shows, minus the pixels.
#[derive(Debug)]
pub struct Dashboard {
    pub telemetry: TelemetrySnapshot,
    pub raw: StreamView,
    pub processed: StreamView,
    pub bev: StreamView,
    log: VecDeque<String>,
    unknown: u64,
    malformed: u64,
}

impl Dashboard {
    pub fn new(now: Instant) -> Self {
        Self {
            telemetry: TelemetrySnapshot::default(),
            raw: StreamView::new(now),
            processed: StreamView::new(now),
            bev: StreamView::new(now),
            log: VecDeque::with_capacity(LOG_CAPACITY),
            unknown: 0,
            malformed: 0,
        }
    }

    /// Decode and apply one text frame. `None` means it was discarded.
    pub fn handle_text(&mut self, text: &str, now: Instant) -> Option<Applied> {
        match Envelope::decode(text) {
            Ok(env) => Some(self.apply(env, now)),
            Err(e) => {
                self.malformed += 1;
                tracing::warn!(error = %e, "error parsing message");
                None
            }
        }
    }

    pub fn apply(&mut self, env: Envelope, now: Instant) -> Applied {
        if let Some(delta) = env.telemetry_delta() {
            return Applied::Telemetry(self.telemetry.merge(delta));
        }
        if let Some((stream, frame)) = env.image() {
            let resolution = frame.resolution();
            let view = self.stream_mut(stream);
            view.rate.tick(now);
            if resolution.is_some() {
                view.resolution = resolution;
            }
            view.last_frame = Some(frame.data_uri());
            return Applied::Frame { stream, resolution };
        }

        match env {
            Envelope::Log { message } => {
                if self.log.len() == LOG_CAPACITY {
                    self.log.pop_front();
                }
                self.log.push_back(message.clone());
                Applied::Log(message)
            }
            Envelope::Control { command } => Applied::Control(command),
            Envelope::Unknown { kind } => {
                self.unknown += 1;
                tracing::warn!(kind = kind.as_deref().unwrap_or("<missing>"), "unknown message type");
                Applied::Ignored { kind }
            }
            // Telemetry and image variants returned above.
            other => Applied::Ignored {
                kind: Some(other.tag().to_owned()),
            },
        }
    }

    pub fn stream_mut(&mut self, stream: ImageStream) -> &mut StreamView {
        match stream {
            ImageStream::Raw => &mut self.raw,
            ImageStream::Processed => &mut self.processed,
            ImageStream::Bev => &mut self.bev,
        }
    }

    pub fn log_lines(&self) -> impl Iterator<Item = &str> {
        self.log.iter().map(String::as_str)
    }

    pub fn unknown_count(&self) -> u64 {
        self.unknown
    }

    pub fn malformed_count(&self) -> u64 {
        self.malformed
    }
}
