//! Message envelope (JSON, discriminated by `type`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::{IrisError, Result};
use crate::telemetry::TelemetryDelta;

/// Tags this build knows how to interpret.
pub const KNOWN_TAGS: [&str; 8] = [
    "log",
    "control",
    "telemetry",
    "image_raw",
    "image_processed",
    "image_bev",
    "steering_angle",
    "obstacle",
];

/// One unit of relay traffic as seen by a consumer.
///
/// `Unknown` is never produced by serde; `decode` builds it for any tag
/// outside [`KNOWN_TAGS`] (or a missing tag) so callers can warn and move on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// Human-readable notice. The relay's welcome uses this.
    Log { message: String },
    /// Operator command addressed to the producer.
    Control { command: ControlCommand },
    /// Partial telemetry update.
    Telemetry { data: TelemetryDelta },
    ImageRaw(ImageFrame),
    ImageProcessed(ImageFrame),
    ImageBev(ImageFrame),
    /// Steering angle in degrees, unclamped.
    SteeringAngle { value: f64 },
    Obstacle(ObstacleReport),
    #[serde(skip)]
    Unknown { kind: Option<String> },
}

impl Envelope {
    pub fn log(message: impl Into<String>) -> Self {
        Envelope::Log {
            message: message.into(),
        }
    }

    pub fn control(command: ControlCommand) -> Self {
        Envelope::Control { command }
    }

    /// Decode one text frame.
    ///
    /// Unparseable JSON, or a known tag whose fields have the wrong shape, is
    /// `IrisError::Decode`. An unrecognised or missing tag is not an error.
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| IrisError::Decode(format!("invalid json: {e}")))?;

        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind {
            Some(tag) if KNOWN_TAGS.contains(&tag.as_str()) => serde_json::from_value(value)
                .map_err(|e| IrisError::Decode(format!("invalid {tag} payload: {e}"))),
            other => Ok(Envelope::Unknown { kind: other }),
        }
    }

    /// Encode to wire JSON.
    pub fn encode(&self) -> Result<String> {
        if let Envelope::Unknown { kind } = self {
            return Err(IrisError::BadRequest(format!(
                "cannot encode unknown envelope type {kind:?}"
            )));
        }
        serde_json::to_string(self).map_err(|e| IrisError::Internal(format!("json encode failed: {e}")))
    }

    /// Wire tag, or `"<missing>"` when the sender omitted it.
    pub fn tag(&self) -> &str {
        match self {
            Envelope::Log { .. } => "log",
            Envelope::Control { .. } => "control",
            Envelope::Telemetry { .. } => "telemetry",
            Envelope::ImageRaw(_) => "image_raw",
            Envelope::ImageProcessed(_) => "image_processed",
            Envelope::ImageBev(_) => "image_bev",
            Envelope::SteeringAngle { .. } => "steering_angle",
            Envelope::Obstacle(_) => "obstacle",
            Envelope::Unknown { kind } => kind.as_deref().unwrap_or("<missing>"),
        }
    }

    /// Image frame and the stream it belongs to, if this is an image envelope.
    pub fn image(&self) -> Option<(ImageStream, &ImageFrame)> {
        match self {
            Envelope::ImageRaw(f) => Some((ImageStream::Raw, f)),
            Envelope::ImageProcessed(f) => Some((ImageStream::Processed, f)),
            Envelope::ImageBev(f) => Some((ImageStream::Bev, f)),
            _ => None,
        }
    }

    /// Telemetry delta carried by this envelope, for the telemetry family
    /// (`telemetry`, `steering_angle`, `obstacle`).
    pub fn telemetry_delta(&self) -> Option<TelemetryDelta> {
        match self {
            Envelope::Telemetry { data } => Some(data.clone()),
            Envelope::SteeringAngle { value } => Some(TelemetryDelta {
                steering_angle: Some(*value),
                ..TelemetryDelta::default()
            }),
            Envelope::Obstacle(report) => Some(report.to_delta()),
            _ => None,
        }
    }
}

/// Control command. Parsed case-insensitively, written in snake_case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
    ResetDistance,
}

impl ControlCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlCommand::Start => "start",
            ControlCommand::Stop => "stop",
            ControlCommand::ResetDistance => "reset_distance",
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ControlCommand {
    type Err = IrisError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start" => Ok(ControlCommand::Start),
            "stop" => Ok(ControlCommand::Stop),
            "reset_distance" => Ok(ControlCommand::ResetDistance),
            other => Err(IrisError::Decode(format!("unknown control command: {other}"))),
        }
    }
}

impl Serialize for ControlCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ControlCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Camera stream an image envelope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageStream {
    Raw,
    Processed,
    Bev,
}

impl ImageStream {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageStream::Raw => "raw",
            ImageStream::Processed => "processed",
            ImageStream::Bev => "bev",
        }
    }
}

/// One encoded camera frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageFrame {
    /// Base64 JPEG, or a full `data:image/...` URI.
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl ImageFrame {
    const JPEG_PREFIX: &'static str = "data:image/jpeg;base64,";

    /// Displayable data URI; bare base64 is assumed to be JPEG.
    pub fn data_uri(&self) -> String {
        if self.data.starts_with("data:image") {
            self.data.clone()
        } else {
            format!("{}{}", Self::JPEG_PREFIX, self.data)
        }
    }

    /// `(width, height)` when both are present and non-zero.
    pub fn resolution(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }
}

/// Obstacle sensor report. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObstacleReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl ObstacleReport {
    pub fn to_delta(&self) -> TelemetryDelta {
        TelemetryDelta {
            obstacle_detected: self.detected,
            obstacle_distance: self.distance,
            obstacle_position: self.position.clone(),
            ..TelemetryDelta::default()
        }
    }
}
