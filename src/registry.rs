//! View Registry
//!
//! Hands out view ids, names each view's channel, and keeps a handle to every
//! live bridge so the host can reach or dispose of it by id.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::bridge::{BridgeHandle, ScanBridge, SpawnedBridge};
use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::notice::UserNotifier;
use crate::provider::CapabilityProvider;

/// Creates bridges and tracks them by view id
pub struct ViewRegistry {
    config: BridgeConfig,
    notifier: Arc<dyn UserNotifier>,
    next_id: AtomicU64,
    views: Mutex<HashMap<u64, BridgeHandle>>,
}

impl ViewRegistry {
    pub fn new(config: BridgeConfig, notifier: Arc<dyn UserNotifier>) -> Self {
        Self {
            config,
            notifier,
            next_id: AtomicU64::new(0),
            views: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Spawn a bridge for a new view backed by `provider`
    pub fn create_view<P: CapabilityProvider>(&self, provider: P) -> SpawnedBridge {
        let view_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let spawned = ScanBridge::spawn(view_id, provider, Arc::clone(&self.notifier), &self.config);
        debug!(view_id, channel = spawned.handle.channel_name(), "Registered scan view");
        self.views.lock().insert(view_id, spawned.handle.clone());
        spawned
    }

    pub fn get(&self, view_id: u64) -> Option<BridgeHandle> {
        self.views.lock().get(&view_id).cloned()
    }

    /// Number of views not yet disposed
    pub fn len(&self) -> usize {
        self.views.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.lock().is_empty()
    }

    /// Close a view's bridge and forget it; `Ok(false)` if the id is unknown
    pub fn dispose(&self, view_id: u64) -> BridgeResult<bool> {
        let Some(handle) = self.views.lock().remove(&view_id) else {
            return Ok(false);
        };
        handle.close()?;
        debug!(view_id, "Disposed scan view");
        Ok(true)
    }
}
