//! Capability Provider Interface
//!
//! The scan bridge never captures or decodes anything itself. Both are done
//! by a capability provider, consumed through [`CapabilityProvider`]. The
//! provider answers permission requests through a [`PermissionResponder`]
//! and pushes decoded frames into a [`DetectionSink`].

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{UnboundedSender, WeakUnboundedSender};
use tracing::{debug, trace};

use crate::bridge::BridgeMessage;
use crate::channel::HostEvent;
use crate::error::ProviderError;
use crate::geometry::{PreviewSurface, ScanRect};
use crate::symbology::{CodeKind, ScanResult};

pub mod simulated;

pub use simulated::{PermissionMode, ProviderCall, SimulatedController, SimulatedOptions, SimulatedProvider};

/// A single code decoded by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub kind: CodeKind,
    /// Decoded text, absent when the provider could not render the payload as text
    #[serde(default)]
    pub payload: Option<String>,
}

impl Detection {
    pub fn new(kind: CodeKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: Some(payload.into()),
        }
    }

    /// Detection whose payload could not be decoded as text
    pub fn binary(kind: CodeKind) -> Self {
        Self { kind, payload: None }
    }
}

/// Native capture and decode backend driven by the bridge
///
/// All methods are called from the bridge task, one at a time. Capture and
/// decode work is expected to run on the provider's own threads.
pub trait CapabilityProvider: Send + 'static {
    /// Ask for camera access; the answer may arrive later from any thread
    fn request_permission(&mut self, responder: PermissionResponder);

    /// Start capturing into `surface`, delivering decoded frames to `sink`
    ///
    /// With a `scan_rect`, recognition is limited to that region.
    fn start_session(
        &mut self,
        surface: PreviewSurface,
        scan_rect: Option<ScanRect>,
        sink: DetectionSink,
    ) -> Result<(), ProviderError>;

    /// Resize the preview surface of the running session
    fn resize(&mut self, surface: PreviewSurface);

    fn has_multiple_cameras(&self) -> bool;

    /// Switch to the opposite camera
    fn switch_camera(&mut self);

    fn has_torch(&self) -> bool;

    fn toggle_torch(&mut self);

    /// Whether frames are currently being captured and decoded
    fn is_capturing(&self) -> bool;

    /// Stop preview and decoding, keeping the session allocated
    fn freeze(&mut self);

    fn unfreeze(&mut self);

    /// Release the session; called once when the bridge shuts down
    fn stop_session(&mut self) {}
}

/// One-shot answer channel for a permission request
///
/// Dropping the responder without answering counts as a denial.
#[derive(Debug)]
pub struct PermissionResponder {
    inbox: Option<WeakUnboundedSender<BridgeMessage>>,
}

impl PermissionResponder {
    pub(crate) fn new(inbox: WeakUnboundedSender<BridgeMessage>) -> Self {
        Self { inbox: Some(inbox) }
    }

    /// Deliver the user's decision to the bridge
    pub fn resolve(mut self, granted: bool) {
        self.send(granted);
    }

    fn send(&mut self, granted: bool) {
        let Some(inbox) = self.inbox.take() else {
            return;
        };
        match inbox.upgrade() {
            Some(tx) => {
                if tx.send(BridgeMessage::Permission(granted)).is_err() {
                    debug!("Bridge closed before permission answer arrived");
                }
            }
            None => debug!("Bridge dropped before permission answer arrived"),
        }
    }
}

impl Drop for PermissionResponder {
    fn drop(&mut self) {
        self.send(false);
    }
}

/// Receives decoded frames from the provider and forwards them to the host
///
/// Delivery never blocks: events go onto an unbounded channel and are
/// dropped if the host has stopped listening.
#[derive(Debug, Clone)]
pub struct DetectionSink {
    view_id: u64,
    events: UnboundedSender<HostEvent>,
}

impl DetectionSink {
    pub(crate) fn new(view_id: u64, events: UnboundedSender<HostEvent>) -> Self {
        Self { view_id, events }
    }

    /// Forward every reportable code of a frame, in order
    ///
    /// Returns the number of events emitted.
    pub fn deliver<I>(&self, frame: I) -> usize
    where
        I: IntoIterator<Item = Detection>,
    {
        let mut delivered = 0;
        for detection in frame {
            let Some(result) = ScanResult::from_detection(detection.kind, detection.payload.as_deref())
            else {
                trace!(view_id = self.view_id, kind = ?detection.kind, "Dropping unreportable detection");
                continue;
            };

            debug!(view_id = self.view_id, symbology = %result.symbology, "Recognized code");
            if self.events.send(HostEvent::RecognizeQr(result)).is_err() {
                debug!(view_id = self.view_id, "Host event channel closed");
                break;
            }
            delivered += 1;
        }
        delivered
    }
}
