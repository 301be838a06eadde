//! Incoming pairing request.

use serde::Serialize;

use super::device_class::DeviceClass;
use super::variant::PairingVariant;

/// A single pairing request, built fresh for every broadcast.
///
/// Fields are private so an event cannot change after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairingEvent {
    remote_device_id: String,
    variant: PairingVariant,
    device_class_hint: Option<u32>,
}

impl PairingEvent {
    pub fn new(remote_device_id: impl Into<String>, variant: impl Into<PairingVariant>) -> Self {
        Self {
            remote_device_id: remote_device_id.into(),
            variant: variant.into(),
            device_class_hint: None,
        }
    }

    /// Attach the Class of Device carried alongside the request, if any.
    pub fn with_device_class(mut self, device_class: u32) -> Self {
        self.device_class_hint = Some(device_class);
        self
    }

    /// Opaque hardware address of the remote device.
    pub fn remote_device_id(&self) -> &str {
        &self.remote_device_id
    }

    pub fn variant(&self) -> PairingVariant {
        self.variant
    }

    pub fn device_class_hint(&self) -> Option<DeviceClass> {
        self.device_class_hint.map(DeviceClass::from_raw)
    }

    pub fn has_device_id(&self) -> bool {
        !self.remote_device_id.trim().is_empty()
    }
}
