//! Headless Bluetooth pairing.
//!
//! Answers pairing requests without a pairing dialog: legacy PIN requests get
//! the configured PIN, passkey and consent requests are confirmed, and
//! everything else is left alone. The policy lives in
//! [`PairingPolicyHandler`](handler::PairingPolicyHandler); the platform API
//! it drives is the [`PairingControl`](control::PairingControl) trait.

pub mod control;
pub mod device_class;
mod event;
pub mod handler;
mod variant;

pub use control::{DryRunControl, PairingControl};
pub use device_class::{DeviceClass, MajorDeviceClass};
pub use event::PairingEvent;
pub use handler::{FailureReason, PairingOutcome, PairingPolicyHandler, decide};
pub use variant::{
    PAIRING_VARIANT_CONSENT, PAIRING_VARIANT_ERROR, PAIRING_VARIANT_PASSKEY_CONFIRMATION,
    PAIRING_VARIANT_PIN, PAIRING_VARIANT_PIN_16_DIGITS, PairingAction, PairingVariant,
};
