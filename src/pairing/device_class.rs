//! Bluetooth Class of Device decoding, used for diagnostic logging only.

use std::fmt;

/// Mask Android's `BluetoothClass.getMajorDeviceClass()` applies.
const MAJOR_MASK: u32 = 0x1F00;

/// Raw 24-bit Class of Device as reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeviceClass(u32);

impl DeviceClass {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw & 0x00FF_FFFF)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Major class bits in place (`cod & 0x1F00`), matching the platform API.
    pub fn major_bits(&self) -> u32 {
        self.0 & MAJOR_MASK
    }

    pub fn major(&self) -> MajorDeviceClass {
        MajorDeviceClass::from_bits(self.major_bits())
    }
}

/// Major device classes from the Bluetooth assigned numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MajorDeviceClass {
    Miscellaneous,
    Computer,
    Phone,
    Networking,
    AudioVideo,
    Peripheral,
    Imaging,
    Wearable,
    Toy,
    Health,
    Uncategorized,
    Reserved(u32),
}

impl MajorDeviceClass {
    fn from_bits(bits: u32) -> Self {
        match bits >> 8 {
            0x00 => Self::Miscellaneous,
            0x01 => Self::Computer,
            0x02 => Self::Phone,
            0x03 => Self::Networking,
            0x04 => Self::AudioVideo,
            0x05 => Self::Peripheral,
            0x06 => Self::Imaging,
            0x07 => Self::Wearable,
            0x08 => Self::Toy,
            0x09 => Self::Health,
            0x1F => Self::Uncategorized,
            other => Self::Reserved(other),
        }
    }
}

impl fmt::Display for MajorDeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Miscellaneous => write!(f, "Miscellaneous"),
            Self::Computer => write!(f, "Computer"),
            Self::Phone => write!(f, "Phone"),
            Self::Networking => write!(f, "LAN/Network"),
            Self::AudioVideo => write!(f, "Audio/Video"),
            Self::Peripheral => write!(f, "Peripheral"),
            Self::Imaging => write!(f, "Imaging"),
            Self::Wearable => write!(f, "Wearable"),
            Self::Toy => write!(f, "Toy"),
            Self::Health => write!(f, "Health"),
            Self::Uncategorized => write!(f, "Uncategorized"),
            Self::Reserved(code) => write!(f, "Reserved({code:#04x})"),
        }
    }
}
