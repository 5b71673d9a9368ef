//! QR View Bridge Library
//!
//! Lets a host application drive a native barcode/QR scanning view over a
//! method channel. The bridge forwards a handful of camera commands to a
//! capability provider and turns the provider's decoded codes into
//! `onRecognizeQR` events for the host.

pub mod bridge;
pub mod channel;
pub mod config;
pub mod error;
pub mod geometry;
pub mod notice;
pub mod provider;
pub mod registry;
pub mod symbology;

// Re-export commonly used types
pub use bridge::{BridgeHandle, BridgeState, ScanBridge, SpawnedBridge};
pub use channel::{Command, HostEvent, MethodCall, Reply};
pub use config::BridgeConfig;
pub use error::{BridgeError, BridgeResult, ConfigError, ProviderError};
pub use geometry::{PreviewSurface, ScanRect, ViewGeometry};
pub use notice::{LogNotifier, UnavailableNotice, UserNotifier};
pub use provider::{CapabilityProvider, Detection, DetectionSink, PermissionResponder};
pub use registry::ViewRegistry;
pub use symbology::{CodeKind, ScanResult, Symbology};
