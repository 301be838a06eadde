//! Automatic pairing-response policy.
//!
//! [`PairingPolicyHandler`] answers one pairing request at a time: it picks
//! an action from the [`PairingPolicyConfig`], performs it through the
//! injected [`PairingControl`], and reports a [`PairingOutcome`]. Failures
//! are logged and folded into the outcome; nothing is re-raised to the
//! event source.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use super::control::PairingControl;
use super::device_class::DeviceClass;
use super::event::PairingEvent;
use super::variant::PairingAction;
use crate::config::PairingPolicyConfig;
use crate::error::{ControlError, PairingError};

/// Why a pairing action failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    PermissionDenied,
    DeviceUnavailable,
}

impl From<&ControlError> for FailureReason {
    fn from(err: &ControlError) -> Self {
        match err {
            ControlError::PermissionDenied { .. } => Self::PermissionDenied,
            ControlError::DeviceUnavailable { .. } => Self::DeviceUnavailable,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PermissionDenied => write!(f, "permission denied"),
            Self::DeviceUnavailable => write!(f, "device unavailable"),
        }
    }
}

/// Result of handling exactly one pairing event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum PairingOutcome {
    PinInjected,
    ConfirmedWithoutPin,
    Ignored,
    Failed(FailureReason),
}

impl PairingOutcome {
    /// Stable integer code handed back across the JNI boundary.
    pub fn code(&self) -> i32 {
        match self {
            Self::PinInjected => 0,
            Self::ConfirmedWithoutPin => 1,
            Self::Ignored => 2,
            Self::Failed(FailureReason::PermissionDenied) => 3,
            Self::Failed(FailureReason::DeviceUnavailable) => 4,
        }
    }
}

/// Choose the action for an event. Pure and total over every variant.
///
/// Returns [`PairingError::InvalidEvent`] when the device id is blank and
/// [`PairingError::UnsupportedVariant`] when the variant has no mapping.
pub fn decide(
    event: &PairingEvent,
    config: &PairingPolicyConfig,
) -> Result<PairingAction, PairingError> {
    if !event.has_device_id() {
        return Err(PairingError::InvalidEvent {
            reason: "pairing request received with no device".to_string(),
        });
    }

    let variant = event.variant();
    config
        .action_for(variant)
        .ok_or(PairingError::UnsupportedVariant {
            code: variant.code(),
        })
}

/// Answers pairing requests with the configured policy.
pub struct PairingPolicyHandler<C> {
    control: C,
    config: Arc<PairingPolicyConfig>,
}

impl<C: PairingControl> PairingPolicyHandler<C> {
    pub fn new(control: C, config: Arc<PairingPolicyConfig>) -> Self {
        Self { control, config }
    }

    /// Handle one event to completion. Never fails; see [`PairingOutcome`].
    pub fn handle(&self, event: &PairingEvent) -> PairingOutcome {
        let device = event.remote_device_id();
        let variant = event.variant();

        let action = match decide(event, &self.config) {
            Ok(action) => action,
            Err(err @ PairingError::InvalidEvent { .. }) => {
                tracing::error!(error = %err, "Dropping pairing request");
                return PairingOutcome::Ignored;
            }
            Err(err @ PairingError::UnsupportedVariant { .. }) => {
                tracing::warn!(device, error = %err, "Ignoring pairing request");
                return PairingOutcome::Ignored;
            }
        };

        tracing::info!(device, %variant, %action, "Pairing request received");

        let result = match action {
            PairingAction::SupplyPin => {
                self.log_device_class(event);
                self.inject_pin(device)
            }
            PairingAction::ConfirmWithoutPin => {
                self.log_device_class(event);
                self.confirm(device)
            }
            PairingAction::Ignore => return PairingOutcome::Ignored,
        };

        match result {
            Ok(outcome) => {
                tracing::info!(device, ?outcome, "Pairing handling completed");
                outcome
            }
            Err(err) => {
                match &err {
                    ControlError::PermissionDenied { .. } => {
                        tracing::error!(device, error = %err, "Missing BLUETOOTH_PRIVILEGED permission")
                    }
                    ControlError::DeviceUnavailable { .. } => {
                        tracing::error!(device, error = %err, "Pairing action failed")
                    }
                }
                PairingOutcome::Failed(FailureReason::from(&err))
            }
        }
    }

    fn inject_pin(&self, device: &str) -> Result<PairingOutcome, ControlError> {
        tracing::debug!(device, "Injecting PIN");
        self.control.set_pin(device, self.config.pin_bytes())?;
        Ok(PairingOutcome::PinInjected)
    }

    fn confirm(&self, device: &str) -> Result<PairingOutcome, ControlError> {
        tracing::debug!(device, "Confirming pairing without PIN");
        self.control.confirm_pairing(device)?;
        Ok(PairingOutcome::ConfirmedWithoutPin)
    }

    fn log_device_class(&self, event: &PairingEvent) {
        let class = event.device_class_hint().or_else(|| {
            self.control
                .device_class(event.remote_device_id())
                .map(DeviceClass::from_raw)
        });

        match class {
            Some(class) => tracing::info!(
                device = event.remote_device_id(),
                major = %class.major(),
                raw = class.raw(),
                "Bluetooth major device class"
            ),
            None => tracing::info!(
                device = event.remote_device_id(),
                "Bluetooth class: unknown"
            ),
        }
    }
}
