//! The platform pairing API the handler drives.

use crate::error::ControlError;

/// Platform Bluetooth pairing API.
///
/// Implementations are expected to return quickly; the handler calls them
/// synchronously and never retries.
pub trait PairingControl {
    /// Supply the legacy PIN for a pending pairing.
    fn set_pin(&self, device_id: &str, pin: &[u8]) -> Result<(), ControlError>;

    /// Accept a passkey or consent pairing without a PIN.
    fn confirm_pairing(&self, device_id: &str) -> Result<(), ControlError>;

    /// Best-effort Class of Device lookup. Diagnostics only.
    fn device_class(&self, device_id: &str) -> Option<u32>;
}

impl<T: PairingControl + ?Sized> PairingControl for &T {
    fn set_pin(&self, device_id: &str, pin: &[u8]) -> Result<(), ControlError> {
        (**self).set_pin(device_id, pin)
    }

    fn confirm_pairing(&self, device_id: &str) -> Result<(), ControlError> {
        (**self).confirm_pairing(device_id)
    }

    fn device_class(&self, device_id: &str) -> Option<u32> {
        (**self).device_class(device_id)
    }
}

/// Control that only logs what it would have done.
///
/// Backs the replay harness on hosts without a Bluetooth stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunControl;

impl PairingControl for DryRunControl {
    fn set_pin(&self, device_id: &str, pin: &[u8]) -> Result<(), ControlError> {
        tracing::info!(
            device = device_id,
            pin_len = pin.len(),
            "[dry-run] setPin"
        );
        Ok(())
    }

    fn confirm_pairing(&self, device_id: &str) -> Result<(), ControlError> {
        tracing::info!(device = device_id, "[dry-run] setPairingConfirmation(true)");
        Ok(())
    }

    fn device_class(&self, _device_id: &str) -> Option<u32> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dry_run_control_always_succeeds() {
        let control = DryRunControl;
        assert!(control.set_pin("AA:BB:CC:DD:EE:FF", b"0000").is_ok());
        assert!(control.confirm_pairing("AA:BB:CC:DD:EE:FF").is_ok());
        assert!(control.device_class("AA:BB:CC:DD:EE:FF").is_none());
    }

    #[test]
    fn test_reference_forwards_to_control() {
        fn confirm_via<C: PairingControl>(control: C) -> Result<(), ControlError> {
            control.confirm_pairing("AA:BB:CC:DD:EE:FF")
        }

        let control = DryRunControl;
        assert!(confirm_via(&control).is_ok());
    }
}
