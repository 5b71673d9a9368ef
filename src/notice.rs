//! User-facing notices
//!
//! When camera access is refused the user is told directly; the host is
//! never sent an event for it.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Text of the "scanning unavailable" notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnavailableNotice {
    pub title: String,
    pub message: String,
}

impl Default for UnavailableNotice {
    fn default() -> Self {
        Self {
            title: "Scanning Unavailable".to_string(),
            message: "This app does not have permission to access the camera".to_string(),
        }
    }
}

/// Presents informational notices to the user
pub trait UserNotifier: Send + Sync {
    fn show_unavailable(&self, notice: &UnavailableNotice);
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl UserNotifier for LogNotifier {
    fn show_unavailable(&self, notice: &UnavailableNotice) {
        warn!("⚠️  {}: {}", notice.title, notice.message);
    }
}
