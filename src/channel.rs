//! Host Channel Codec
//!
//! Method calls arriving from the host, the commands they decode into, the
//! replies sent back, and the events the bridge pushes to the host. Calls and
//! events share the `{"method": ..., "arguments": ...}` envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::geometry::ViewGeometry;
use crate::symbology::ScanResult;

pub const SET_DIMENSIONS: &str = "setDimensions";
pub const FLIP_CAMERA: &str = "flipCamera";
pub const TOGGLE_FLASH: &str = "toggleFlash";
pub const PAUSE_CAMERA: &str = "pauseCamera";
pub const RESUME_CAMERA: &str = "resumeCamera";

/// Name of the channel serving the view with the given id
pub fn channel_name(prefix: &str, view_id: u64) -> String {
    format!("{prefix}/qrview_{view_id}")
}

/// A method invocation sent by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    #[serde(default)]
    pub arguments: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Value) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }

    /// Call without arguments
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Value::Null)
    }

    pub fn set_dimensions(width: f64, height: f64, scan_area: f64, offset: f64) -> Self {
        Self::new(
            SET_DIMENSIONS,
            serde_json::json!({
                "width": width,
                "height": height,
                "scanArea": scan_area,
                "offset": offset,
            }),
        )
    }
}

/// Arguments of `setDimensions`; absent keys read as zero
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DimensionArgs {
    width: f64,
    height: f64,
    #[serde(rename = "scanArea")]
    scan_area: f64,
    offset: f64,
}

/// Commands the bridge understands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    SetDimensions(ViewGeometry),
    FlipCamera,
    ToggleFlash,
    PauseCamera,
    ResumeCamera,
}

impl Command {
    /// Decode a method call; `Ok(None)` means the method is not known
    pub fn from_call(call: &MethodCall) -> BridgeResult<Option<Self>> {
        let command = match call.method.as_str() {
            SET_DIMENSIONS => {
                let args: DimensionArgs = serde_json::from_value(call.arguments.clone())
                    .map_err(|err| BridgeError::InvalidArguments {
                        method: call.method.clone(),
                        reason: err.to_string(),
                    })?;
                Command::SetDimensions(ViewGeometry::new(
                    args.width,
                    args.height,
                    args.scan_area,
                    args.offset,
                ))
            }
            FLIP_CAMERA => Command::FlipCamera,
            TOGGLE_FLASH => Command::ToggleFlash,
            PAUSE_CAMERA => Command::PauseCamera,
            RESUME_CAMERA => Command::ResumeCamera,
            _ => return Ok(None),
        };
        Ok(Some(command))
    }
}

/// Reply to a host method call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Reply {
    /// Command accepted; it carries no result payload
    Empty,
    /// The method is not handled by this bridge
    NotImplemented,
    /// The call was rejected
    Error { code: String, message: String },
}

impl Reply {
    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Reply::Error {
            code: "INVALID_ARGUMENTS".to_string(),
            message: message.into(),
        }
    }
}

/// Event pushed from the bridge to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method", content = "arguments")]
pub enum HostEvent {
    #[serde(rename = "onRecognizeQR")]
    RecognizeQr(ScanResult),
}

impl HostEvent {
    pub fn to_json(&self) -> BridgeResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
