//! In-process capability provider
//!
//! Stands in for a native scanning library: a capture thread pulls injected
//! frames off a channel and pushes them into the session's detection sink
//! while capture is not frozen. Camera count, torch support, the permission
//! answer and start failures are configurable, and every call the bridge
//! makes is recorded for inspection.

use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam_channel::{select, unbounded, Receiver, Sender};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use super::{CapabilityProvider, Detection, DetectionSink, PermissionResponder};
use crate::error::ProviderError;
use crate::geometry::{PreviewSurface, ScanRect};

/// How the simulated user answers the camera permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermissionMode {
    /// Answer "yes" immediately
    #[default]
    Grant,
    /// Answer "no" immediately
    Deny,
    /// Hold the prompt open until [`SimulatedController::resolve_permission`]
    Defer,
}

/// Simulated device capabilities
#[derive(Debug, Clone)]
pub struct SimulatedOptions {
    pub cameras: usize,
    pub torch: bool,
    pub permission: PermissionMode,
    /// Error returned from `start_session`, if any
    pub start_failure: Option<ProviderError>,
}

impl Default for SimulatedOptions {
    fn default() -> Self {
        Self {
            cameras: 2,
            torch: true,
            permission: PermissionMode::Grant,
            start_failure: None,
        }
    }
}

/// Provider operations, in the order the bridge issued them
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderCall {
    RequestPermission,
    StartSession {
        surface: PreviewSurface,
        scan_rect: Option<ScanRect>,
    },
    Resize(PreviewSurface),
    SwitchCamera,
    ToggleTorch,
    Freeze,
    Unfreeze,
    StopSession,
}

#[derive(Debug, Default)]
struct SimState {
    session_active: bool,
    capturing: bool,
    surface: Option<PreviewSurface>,
    scan_rect: Option<ScanRect>,
    active_camera: usize,
    torch_on: bool,
    sink: Option<DetectionSink>,
    pending_permission: Option<PermissionResponder>,
    calls: Vec<ProviderCall>,
}

/// Capability provider backed by a capture thread fed from a frame queue
pub struct SimulatedProvider {
    options: SimulatedOptions,
    state: Arc<Mutex<SimState>>,
    frames_tx: Sender<Vec<Detection>>,
    frames_rx: Receiver<Vec<Detection>>,
    stop_tx: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl SimulatedProvider {
    pub fn new(options: SimulatedOptions) -> Self {
        let (frames_tx, frames_rx) = unbounded();
        Self {
            options,
            state: Arc::new(Mutex::new(SimState::default())),
            frames_tx,
            frames_rx,
            stop_tx: None,
            worker: None,
        }
    }

    /// Handle for injecting frames and inspecting provider state
    pub fn controller(&self) -> SimulatedController {
        SimulatedController {
            state: Arc::clone(&self.state),
            frames: self.frames_tx.clone(),
        }
    }

    fn record(&self, call: ProviderCall) {
        self.state.lock().calls.push(call);
    }

    fn spawn_capture_thread(&mut self) {
        let (stop_tx, stop_rx) = unbounded::<()>();
        let frames = self.frames_rx.clone();
        let state = Arc::clone(&self.state);

        let worker = std::thread::Builder::new()
            .name("qrview-capture".to_string())
            .spawn(move || capture_loop(frames, stop_rx, state));

        match worker {
            Ok(handle) => {
                self.stop_tx = Some(stop_tx);
                self.worker = Some(handle);
            }
            Err(e) => warn!("Failed to spawn capture thread: {}", e),
        }
    }
}

impl Default for SimulatedProvider {
    fn default() -> Self {
        Self::new(SimulatedOptions::default())
    }
}

fn capture_loop(
    frames: Receiver<Vec<Detection>>,
    stop: Receiver<()>,
    state: Arc<Mutex<SimState>>,
) {
    debug!("Capture thread started");
    loop {
        select! {
            recv(frames) -> frame => {
                let Ok(frame) = frame else { break };
                // Clone the sink out so delivery runs without the state lock
                let sink = {
                    let state = state.lock();
                    if state.capturing { state.sink.clone() } else { None }
                };
                match sink {
                    Some(sink) => {
                        sink.deliver(frame);
                    }
                    None => debug!("Capture frozen, frame discarded"),
                }
            }
            recv(stop) -> _ => break,
        }
    }
    debug!("Capture thread stopped");
}

impl CapabilityProvider for SimulatedProvider {
    fn request_permission(&mut self, responder: PermissionResponder) {
        self.record(ProviderCall::RequestPermission);
        match self.options.permission {
            PermissionMode::Grant => responder.resolve(true),
            PermissionMode::Deny => responder.resolve(false),
            PermissionMode::Defer => self.state.lock().pending_permission = Some(responder),
        }
    }

    fn start_session(
        &mut self,
        surface: PreviewSurface,
        scan_rect: Option<ScanRect>,
        sink: DetectionSink,
    ) -> Result<(), ProviderError> {
        self.record(ProviderCall::StartSession { surface, scan_rect });
        if let Some(failure) = self.options.start_failure.clone() {
            return Err(failure);
        }

        {
            let mut state = self.state.lock();
            state.session_active = true;
            state.capturing = true;
            state.surface = Some(surface);
            state.scan_rect = scan_rect;
            state.sink = Some(sink);
        }
        self.spawn_capture_thread();
        info!(width = surface.width, height = surface.height, "Simulated capture started");
        Ok(())
    }

    fn resize(&mut self, surface: PreviewSurface) {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::Resize(surface));
        state.surface = Some(surface);
    }

    fn has_multiple_cameras(&self) -> bool {
        self.options.cameras > 1
    }

    fn switch_camera(&mut self) {
        let cameras = self.options.cameras.max(1);
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::SwitchCamera);
        state.active_camera = (state.active_camera + 1) % cameras;
    }

    fn has_torch(&self) -> bool {
        self.options.torch
    }

    fn toggle_torch(&mut self) {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::ToggleTorch);
        state.torch_on = !state.torch_on;
    }

    fn is_capturing(&self) -> bool {
        self.state.lock().capturing
    }

    fn freeze(&mut self) {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::Freeze);
        state.capturing = false;
    }

    fn unfreeze(&mut self) {
        let mut state = self.state.lock();
        state.calls.push(ProviderCall::Unfreeze);
        state.capturing = state.session_active;
    }

    fn stop_session(&mut self) {
        {
            let mut state = self.state.lock();
            state.calls.push(ProviderCall::StopSession);
            state.session_active = false;
            state.capturing = false;
            state.sink = None;
        }
        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Capture thread panicked");
            }
        }
    }
}

impl Drop for SimulatedProvider {
    fn drop(&mut self) {
        if let Some(stop) = self.stop_tx.take() {
            let _ = stop.send(());
        }
    }
}

/// Test and demo handle onto a [`SimulatedProvider`]
#[derive(Clone)]
pub struct SimulatedController {
    state: Arc<Mutex<SimState>>,
    frames: Sender<Vec<Detection>>,
}

impl SimulatedController {
    /// Queue a decoded frame for the capture thread
    ///
    /// Returns `false` when no capture is running and the frame was discarded.
    pub fn emit_frame(&self, frame: Vec<Detection>) -> bool {
        if !self.state.lock().capturing {
            return false;
        }
        self.frames.send(frame).is_ok()
    }

    /// Answer a deferred permission prompt; `false` if none is open
    pub fn resolve_permission(&self, granted: bool) -> bool {
        let responder = self.state.lock().pending_permission.take();
        match responder {
            Some(responder) => {
                responder.resolve(granted);
                true
            }
            None => false,
        }
    }

    /// Stop capture behind the bridge's back, as a device interruption would
    pub fn interrupt_capture(&self) {
        self.state.lock().capturing = false;
    }

    pub fn permission_pending(&self) -> bool {
        self.state.lock().pending_permission.is_some()
    }

    pub fn calls(&self) -> Vec<ProviderCall> {
        self.state.lock().calls.clone()
    }

    /// Number of recorded calls matching `predicate`
    pub fn count_calls(&self, predicate: impl Fn(&ProviderCall) -> bool) -> usize {
        self.state.lock().calls.iter().filter(|call| predicate(call)).count()
    }

    pub fn session_active(&self) -> bool {
        self.state.lock().session_active
    }

    pub fn is_capturing(&self) -> bool {
        self.state.lock().capturing
    }

    pub fn surface(&self) -> Option<PreviewSurface> {
        self.state.lock().surface
    }

    pub fn scan_rect(&self) -> Option<ScanRect> {
        self.state.lock().scan_rect
    }

    pub fn active_camera(&self) -> usize {
        self.state.lock().active_camera
    }

    pub fn torch_on(&self) -> bool {
        self.state.lock().torch_on
    }
}
