//! Scan Bridge
//!
//! Owns one scanning session on behalf of a host view. Host method calls,
//! permission answers and state queries all arrive on a single inbox and are
//! handled strictly in order by one task, so the provider and the view
//! geometry are never touched concurrently.

use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::channel::{channel_name, Command, HostEvent, MethodCall, Reply};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::geometry::ViewGeometry;
use crate::notice::{UnavailableNotice, UserNotifier};
use crate::provider::{CapabilityProvider, DetectionSink, PermissionResponder};

pub mod state;

pub use state::{BridgeState, Lifecycle, Phase, Unavailable};

/// Messages processed by the bridge task
#[derive(Debug)]
pub(crate) enum BridgeMessage {
    Call {
        call: MethodCall,
        reply: Option<oneshot::Sender<Reply>>,
    },
    Permission(bool),
    State(oneshot::Sender<BridgeState>),
    Geometry(oneshot::Sender<ViewGeometry>),
    Close,
}

/// A spawned bridge: its handle, the host event stream, and the task
pub struct SpawnedBridge {
    pub handle: BridgeHandle,
    pub events: UnboundedReceiver<HostEvent>,
    pub task: JoinHandle<()>,
}

/// Bridge between a host view and a capability provider
pub struct ScanBridge<P: CapabilityProvider> {
    view_id: u64,
    provider: P,
    notifier: Arc<dyn UserNotifier>,
    notice: UnavailableNotice,
    lifecycle: Lifecycle,
    geometry: ViewGeometry,
    inbox: UnboundedReceiver<BridgeMessage>,
    responder_tx: WeakUnboundedSender<BridgeMessage>,
    events: UnboundedSender<HostEvent>,
}

impl<P: CapabilityProvider> ScanBridge<P> {
    /// Build a bridge and its host handle without starting it
    pub fn new(
        view_id: u64,
        provider: P,
        notifier: Arc<dyn UserNotifier>,
        config: &BridgeConfig,
    ) -> (Self, BridgeHandle, UnboundedReceiver<HostEvent>) {
        let (tx, inbox) = mpsc::unbounded_channel();
        let (events, events_rx) = mpsc::unbounded_channel();

        let bridge = Self {
            view_id,
            provider,
            notifier,
            notice: config.unavailable_notice.clone(),
            lifecycle: Lifecycle::default(),
            geometry: ViewGeometry::default(),
            inbox,
            responder_tx: tx.downgrade(),
            events,
        };
        let handle = BridgeHandle {
            view_id,
            channel: Arc::from(channel_name(&config.channel_prefix, view_id)),
            tx,
        };
        (bridge, handle, events_rx)
    }

    /// Build a bridge and run it on the current tokio runtime
    pub fn spawn(
        view_id: u64,
        provider: P,
        notifier: Arc<dyn UserNotifier>,
        config: &BridgeConfig,
    ) -> SpawnedBridge {
        let (bridge, handle, events) = Self::new(view_id, provider, notifier, config);
        let task = tokio::spawn(bridge.run());
        SpawnedBridge {
            handle,
            events,
            task,
        }
    }

    /// Process messages until the handle closes or every handle is dropped
    pub async fn run(mut self) {
        info!(view_id = self.view_id, "Scan bridge started");
        while let Some(message) = self.inbox.recv().await {
            match message {
                BridgeMessage::Call { call, reply } => {
                    let response = self.dispatch(&call);
                    if let Some(reply) = reply {
                        let _ = reply.send(response);
                    }
                }
                BridgeMessage::Permission(granted) => self.on_permission(granted),
                BridgeMessage::State(reply) => {
                    let _ = reply.send(self.lifecycle.phase().public());
                }
                BridgeMessage::Geometry(reply) => {
                    let _ = reply.send(self.geometry);
                }
                BridgeMessage::Close => break,
            }
        }
        self.teardown();
    }

    /// Decode and execute one host call
    fn dispatch(&mut self, call: &MethodCall) -> Reply {
        match Command::from_call(call) {
            Ok(Some(command)) => {
                self.execute(command);
                Reply::Empty
            }
            Ok(None) => {
                debug!(view_id = self.view_id, method = %call.method, "Method not implemented");
                Reply::NotImplemented
            }
            Err(e) => {
                warn!(view_id = self.view_id, "Rejected call: {}", e);
                Reply::invalid_arguments(e.to_string())
            }
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::SetDimensions(geometry) => self.set_dimensions(geometry),
            Command::FlipCamera => self.flip_camera(),
            Command::ToggleFlash => self.toggle_flash(),
            Command::PauseCamera => self.pause_camera(),
            Command::ResumeCamera => self.resume_camera(),
        }
    }

    fn set_dimensions(&mut self, geometry: ViewGeometry) {
        self.geometry = geometry;

        match self.lifecycle.phase() {
            Phase::Uninitialized => {
                self.lifecycle.advance(Phase::AwaitingPermission);
                debug!(view_id = self.view_id, "Requesting camera permission");
                let responder = PermissionResponder::new(self.responder_tx.clone());
                self.provider.request_permission(responder);
            }
            Phase::Scanning | Phase::Paused => {
                self.provider.resize(geometry.surface());
            }
            Phase::AwaitingPermission => {
                debug!(view_id = self.view_id, "Permission pending, geometry updated");
            }
            Phase::Unavailable(reason) => {
                debug!(view_id = self.view_id, ?reason, "Scanning unavailable, geometry recorded");
            }
        }
    }

    /// Start the session from the geometry in force when the answer arrives,
    /// so a `setDimensions` received while the prompt was open wins.
    fn on_permission(&mut self, granted: bool) {
        if self.lifecycle.phase() != Phase::AwaitingPermission {
            warn!(view_id = self.view_id, "Ignoring unexpected permission answer");
            return;
        }

        if !granted {
            self.lifecycle
                .advance(Phase::Unavailable(Unavailable::PermissionDenied));
            self.notifier.show_unavailable(&self.notice);
            return;
        }

        let sink = DetectionSink::new(self.view_id, self.events.clone());
        match self
            .provider
            .start_session(self.geometry.surface(), self.geometry.scan_rect(), sink)
        {
            Ok(()) => {
                self.lifecycle.advance(Phase::Scanning);
                info!(view_id = self.view_id, "✅ Scanning started");
            }
            Err(e) => {
                self.lifecycle.advance(Phase::Unavailable(Unavailable::StartFailed));
                error!(view_id = self.view_id, "Unable to start scanning: {}", e);
            }
        }
    }

    fn flip_camera(&mut self) {
        if self.lifecycle.phase().has_session() && self.provider.has_multiple_cameras() {
            self.provider.switch_camera();
        }
    }

    fn toggle_flash(&mut self) {
        if self.lifecycle.phase().has_session() && self.provider.has_torch() {
            self.provider.toggle_torch();
        }
    }

    /// Freeze capture; the provider is only told to freeze if it is still capturing
    fn pause_camera(&mut self) {
        if self.lifecycle.advance(Phase::Paused) && self.provider.is_capturing() {
            self.provider.freeze();
        }
    }

    /// Unfreeze capture unless the provider is already capturing again
    fn resume_camera(&mut self) {
        if self.lifecycle.phase() == Phase::Paused
            && self.lifecycle.advance(Phase::Scanning)
            && !self.provider.is_capturing()
        {
            self.provider.unfreeze();
        }
    }

    fn teardown(&mut self) {
        if self.lifecycle.phase().has_session() {
            self.provider.stop_session();
        }
        info!(view_id = self.view_id, "Scan bridge stopped");
    }
}

/// Host-side handle to a running bridge
#[derive(Debug, Clone)]
pub struct BridgeHandle {
    view_id: u64,
    channel: Arc<str>,
    tx: UnboundedSender<BridgeMessage>,
}

impl BridgeHandle {
    pub fn view_id(&self) -> u64 {
        self.view_id
    }

    /// Name of the channel this bridge serves
    pub fn channel_name(&self) -> &str {
        &self.channel
    }

    /// Send a call without waiting for its reply
    pub fn send(&self, call: MethodCall) -> BridgeResult<()> {
        self.post(BridgeMessage::Call { call, reply: None })
    }

    /// Send a call and wait until the bridge has handled it
    pub async fn call(&self, call: MethodCall) -> BridgeResult<Reply> {
        let (reply, rx) = oneshot::channel();
        self.post(BridgeMessage::Call {
            call,
            reply: Some(reply),
        })?;
        rx.await.map_err(|_| BridgeError::ChannelClosed)
    }

    /// Current lifecycle state, observed after all earlier messages
    pub async fn state(&self) -> BridgeResult<BridgeState> {
        let (reply, rx) = oneshot::channel();
        self.post(BridgeMessage::State(reply))?;
        rx.await.map_err(|_| BridgeError::ChannelClosed)
    }

    /// Geometry from the most recent `setDimensions`
    pub async fn geometry(&self) -> BridgeResult<ViewGeometry> {
        let (reply, rx) = oneshot::channel();
        self.post(BridgeMessage::Geometry(reply))?;
        rx.await.map_err(|_| BridgeError::ChannelClosed)
    }

    /// Stop the bridge and release the provider session
    pub fn close(&self) -> BridgeResult<()> {
        self.post(BridgeMessage::Close)
    }

    fn post(&self, message: BridgeMessage) -> BridgeResult<()> {
        self.tx.send(message).map_err(|_| BridgeError::ChannelClosed)
    }
}
