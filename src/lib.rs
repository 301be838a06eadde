//! Headless Bluetooth pairing responder.
//!
//! Intended for automotive and embedded Android builds with no SystemUI
//! pairing dialog. Pairing requests are answered automatically: legacy PIN
//! requests receive a fixed PIN, passkey and consent requests are confirmed.
//!
//! Answering pairing requests requires the `BLUETOOTH_PRIVILEGED` permission,
//! which is only granted to platform-signed privileged system code. Without
//! it every action ends in [`PairingOutcome::Failed`].

pub mod cli;
pub mod config;
pub mod error;
pub mod pairing;
pub mod platform;
pub mod receiver;
pub mod telemetry;

pub use config::{DEFAULT_PIN, PairingPolicyConfig};
pub use error::{ConfigError, ControlError, Error, PairingError, Result};
pub use pairing::{
    PairingAction, PairingControl, PairingEvent, PairingOutcome, PairingPolicyHandler,
    PairingVariant,
};
pub use receiver::{PairingBroadcast, PairingReceiver, ReceiverSummary, spawn_receiver};
