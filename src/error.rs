use thiserror::Error;

/// Errors surfaced by the scan bridge and its host-facing handle
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The bridge task has shut down and no longer accepts messages
    #[error("Bridge channel closed")]
    ChannelClosed,

    /// A known method was called with arguments of the wrong shape
    #[error("Invalid arguments for {method}: {reason}")]
    InvalidArguments { method: String, reason: String },

    /// A message could not be encoded for the host
    #[error("Failed to encode host message: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Failures reported by a capability provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// Capture hardware is held by someone else
    #[error("Capture device busy: {0}")]
    Busy(String),
}

/// Errors raised while loading bridge configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;
