//! Error types for btautopin.

/// Top-level error type for the crate.
///
/// Pairing and control failures never surface here; the handler turns them
/// into a [`PairingOutcome`](crate::pairing::PairingOutcome).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pairing receiver stopped before the input was drained")]
    ReceiverStopped,

    #[error("Pairing receiver task failed: {0}")]
    ReceiverTask(#[from] tokio::task::JoinError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors raised while deciding how to answer a pairing request.
///
/// Neither variant ever leaves the handler: both turn into
/// [`PairingOutcome::Ignored`](crate::pairing::PairingOutcome::Ignored).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingError {
    #[error("Invalid pairing event: {reason}")]
    InvalidEvent { reason: String },

    #[error("Unsupported or unknown pairing variant: {code}")]
    UnsupportedVariant { code: i32 },
}

/// Failures reported by the platform pairing API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ControlError {
    #[error("Permission denied for {device_id}: BLUETOOTH_PRIVILEGED is required")]
    PermissionDenied { device_id: String },

    #[error("Device {device_id} unavailable: {reason}")]
    DeviceUnavailable { device_id: String, reason: String },
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
