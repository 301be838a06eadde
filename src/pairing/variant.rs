//! Pairing variants and the actions the policy can take for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `BluetoothDevice.PAIRING_VARIANT_PIN`
pub const PAIRING_VARIANT_PIN: i32 = 0;
/// `BluetoothDevice.PAIRING_VARIANT_PASSKEY_CONFIRMATION`
pub const PAIRING_VARIANT_PASSKEY_CONFIRMATION: i32 = 2;
/// Hidden in the public SDK but present at runtime.
pub const PAIRING_VARIANT_CONSENT: i32 = 3;
/// Hidden in the public SDK but present at runtime.
///
/// Code 4 is `PAIRING_VARIANT_DISPLAY_PASSKEY` and is left unanswered on purpose.
pub const PAIRING_VARIANT_PIN_16_DIGITS: i32 = 7;
/// `BluetoothDevice.ERROR`, delivered when the variant extra is missing.
pub const PAIRING_VARIANT_ERROR: i32 = i32::MIN;

/// Which pairing sub-protocol the remote device is negotiating.
///
/// Serialized as the platform code, so every value goes through
/// [`PairingVariant::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum PairingVariant {
    /// Legacy PIN entry (up to 16 bytes).
    Pin,
    /// Legacy PIN entry that requires a 16 digit PIN.
    Pin16Digits,
    /// Numeric comparison; the user would normally confirm a passkey.
    PasskeyConfirmation,
    /// Just-works consent.
    Consent,
    /// Anything else, including the missing-extra sentinel.
    Unknown(i32),
}

impl PairingVariant {
    /// The variants the policy knows how to answer.
    pub const RECOGNIZED: [PairingVariant; 4] = [
        PairingVariant::Pin,
        PairingVariant::Pin16Digits,
        PairingVariant::PasskeyConfirmation,
        PairingVariant::Consent,
    ];

    /// Map a platform variant code onto the enum. Total over `i32`.
    pub fn from_code(code: i32) -> Self {
        match code {
            PAIRING_VARIANT_PIN => Self::Pin,
            PAIRING_VARIANT_PIN_16_DIGITS => Self::Pin16Digits,
            PAIRING_VARIANT_PASSKEY_CONFIRMATION => Self::PasskeyConfirmation,
            PAIRING_VARIANT_CONSENT => Self::Consent,
            other => Self::Unknown(other),
        }
    }

    /// The platform code for this variant.
    pub fn code(&self) -> i32 {
        match self {
            Self::Pin => PAIRING_VARIANT_PIN,
            Self::Pin16Digits => PAIRING_VARIANT_PIN_16_DIGITS,
            Self::PasskeyConfirmation => PAIRING_VARIANT_PASSKEY_CONFIRMATION,
            Self::Consent => PAIRING_VARIANT_CONSENT,
            Self::Unknown(code) => *code,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl From<i32> for PairingVariant {
    fn from(code: i32) -> Self {
        Self::from_code(code)
    }
}

impl From<PairingVariant> for i32 {
    fn from(variant: PairingVariant) -> Self {
        variant.code()
    }
}

impl fmt::Display for PairingVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin => write!(f, "PIN"),
            Self::Pin16Digits => write!(f, "PIN_16_DIGITS"),
            Self::PasskeyConfirmation => write!(f, "PASSKEY_CONFIRMATION"),
            Self::Consent => write!(f, "CONSENT"),
            Self::Unknown(code) => write!(f, "UNKNOWN({code})"),
        }
    }
}

/// Response the policy performs for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingAction {
    /// Supply the configured PIN.
    SupplyPin,
    /// Accept the pairing without a PIN.
    ConfirmWithoutPin,
    /// Do nothing.
    Ignore,
}

impl fmt::Display for PairingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SupplyPin => write!(f, "supply PIN"),
            Self::ConfirmWithoutPin => write!(f, "confirm without PIN"),
            Self::Ignore => write!(f, "ignore"),
        }
    }
}
