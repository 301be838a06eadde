//! Pairing policy configuration.
//!
//! The policy is built once and shared read-only by every event. The PIN is
//! a compile-time constant; [`PairingPolicyConfig::with_default_pin`] is the
//! hook for OEM builds that need a different legacy PIN.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;
use crate::pairing::{PairingAction, PairingVariant};

/// Default legacy PIN used by many automotive head units.
pub const DEFAULT_PIN: &str = "0000";

/// Longest legacy PIN the Bluetooth spec allows, in bytes.
pub const MAX_PIN_BYTES: usize = 16;

static SHARED: OnceLock<Arc<PairingPolicyConfig>> = OnceLock::new();

/// Read-only policy shared by every pairing event.
#[derive(Clone)]
pub struct PairingPolicyConfig {
    default_pin: SecretString,
    actions: HashMap<PairingVariant, PairingAction>,
}

impl PairingPolicyConfig {
    /// The process-wide default policy, built on first use.
    pub fn shared() -> Arc<Self> {
        Arc::clone(SHARED.get_or_init(|| Arc::new(Self::default())))
    }

    /// Replace the PIN supplied for legacy PIN requests.
    ///
    /// The PIN must be 1 to 16 bytes once encoded as UTF-8.
    pub fn with_default_pin(mut self, pin: impl Into<String>) -> Result<Self, ConfigError> {
        let pin = pin.into();
        validate_pin(&pin)?;
        self.default_pin = SecretString::from(pin);
        Ok(self)
    }

    /// Override the action taken for a recognized variant.
    pub fn with_action(
        mut self,
        variant: PairingVariant,
        action: PairingAction,
    ) -> Result<Self, ConfigError> {
        if !variant.is_recognized() {
            return Err(ConfigError::InvalidValue {
                key: "actions".to_string(),
                message: format!("{variant} cannot be mapped to an action"),
            });
        }
        self.actions.insert(variant, action);
        Ok(self)
    }

    /// Action for a variant, or `None` when the variant is not recognized.
    pub fn action_for(&self, variant: PairingVariant) -> Option<PairingAction> {
        self.actions.get(&variant).copied()
    }

    /// PIN encoded as raw UTF-8 bytes, ready for `setPin`.
    pub fn pin_bytes(&self) -> &[u8] {
        self.default_pin.expose_secret().as_bytes()
    }

    /// Variant to action mapping in platform code order.
    pub fn policy_table(&self) -> Vec<(PairingVariant, PairingAction)> {
        let mut table: Vec<_> = self.actions.iter().map(|(v, a)| (*v, *a)).collect();
        table.sort_by_key(|(variant, _)| variant.code());
        table
    }
}

impl Default for PairingPolicyConfig {
    fn default() -> Self {
        let actions = HashMap::from([
            (PairingVariant::Pin, PairingAction::SupplyPin),
            (PairingVariant::Pin16Digits, PairingAction::SupplyPin),
            (
                PairingVariant::PasskeyConfirmation,
                PairingAction::ConfirmWithoutPin,
            ),
            (PairingVariant::Consent, PairingAction::ConfirmWithoutPin),
        ]);

        Self {
            default_pin: SecretString::from(DEFAULT_PIN.to_string()),
            actions,
        }
    }
}

impl fmt::Debug for PairingPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PairingPolicyConfig")
            .field("default_pin", &"[REDACTED]")
            .field("actions", &self.policy_table())
            .finish()
    }
}

fn validate_pin(pin: &str) -> Result<(), ConfigError> {
    if pin.is_empty() || pin.len() > MAX_PIN_BYTES {
        return Err(ConfigError::InvalidValue {
            key: "default_pin".to_string(),
            message: format!(
                "PIN must be 1 to {MAX_PIN_BYTES} bytes, got {}",
                pin.len()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let config = PairingPolicyConfig::default();
        assert_eq!(config.pin_bytes(), b"0000");
        assert_eq!(
            config.action_for(PairingVariant::Pin),
            Some(PairingAction::SupplyPin)
        );
        assert_eq!(
            config.action_for(PairingVariant::Pin16Digits),
            Some(PairingAction::SupplyPin)
        );
        assert_eq!(
            config.action_for(PairingVariant::PasskeyConfirmation),
            Some(PairingAction::ConfirmWithoutPin)
        );
        assert_eq!(
            config.action_for(PairingVariant::Consent),
            Some(PairingAction::ConfirmWithoutPin)
        );
        assert_eq!(config.action_for(PairingVariant::Unknown(1)), None);
    }

    #[test]
    fn test_with_default_pin() {
        let config = PairingPolicyConfig::default()
            .with_default_pin("1234")
            .unwrap();
        assert_eq!(config.pin_bytes(), b"1234");
    }

    #[test]
    fn test_pin_length_bounds() {
        assert!(PairingPolicyConfig::default().with_default_pin("").is_err());
        assert!(
            PairingPolicyConfig::default()
                .with_default_pin("1234567890123456")
                .is_ok()
        );
        let err = PairingPolicyConfig::default()
            .with_default_pin("12345678901234567")
            .unwrap_err();
        assert!(err.to_string().contains("default_pin"));
    }

    #[test]
    fn test_pin_length_counts_utf8_bytes() {
        // Eight two-byte characters fit, nine do not.
        assert!(
            PairingPolicyConfig::default()
                .with_default_pin("éééééééé")
                .is_ok()
        );
        assert!(
            PairingPolicyConfig::default()
                .with_default_pin("ééééééééé")
                .is_err()
        );
    }

    #[test]
    fn test_with_action_rejects_unknown_variant() {
        let err = PairingPolicyConfig::default()
            .with_action(PairingVariant::Unknown(5), PairingAction::SupplyPin)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_with_action_overrides_mapping() {
        let config = PairingPolicyConfig::default()
            .with_action(PairingVariant::Consent, PairingAction::Ignore)
            .unwrap();
        assert_eq!(
            config.action_for(PairingVariant::Consent),
            Some(PairingAction::Ignore)
        );
    }

    #[test]
    fn test_policy_table_is_sorted_by_code() {
        let codes: Vec<i32> = PairingPolicyConfig::default()
            .policy_table()
            .iter()
            .map(|(variant, _)| variant.code())
            .collect();
        assert_eq!(codes, vec![0, 2, 3, 7]);
    }

    #[test]
    fn test_shared_policy_is_built_once() {
        let first = PairingPolicyConfig::shared();
        let second = PairingPolicyConfig::shared();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.pin_bytes(), b"0000");
    }

    #[test]
    fn test_debug_redacts_pin() {
        let config = PairingPolicyConfig::default()
            .with_default_pin("8642")
            .unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("8642"));
    }
}
