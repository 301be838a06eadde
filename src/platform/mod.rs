//! Platform bindings for [`PairingControl`](crate::pairing::PairingControl).
//!
//! Only Android has a binding; host builds use
//! [`DryRunControl`](crate::pairing::DryRunControl) or a test double.

// JNI bindings - only compile on Android targets
#[cfg(target_os = "android")]
pub mod android;
