//! Inbound pairing-request broadcasts.
//!
//! The platform delivers pairing requests as broadcasts carrying the remote
//! device, the pairing variant, and optionally its Class of Device. This
//! module filters them by action, turns them into [`PairingEvent`]s, and
//! feeds the handler one at a time.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::pairing::{
    PAIRING_VARIANT_ERROR, PairingControl, PairingEvent, PairingOutcome, PairingPolicyHandler,
};

/// `BluetoothDevice.ACTION_PAIRING_REQUEST`
pub const ACTION_PAIRING_REQUEST: &str = "android.bluetooth.device.action.PAIRING_REQUEST";

/// A broadcast as delivered by the platform, extras and all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingBroadcast {
    pub action: String,
    /// Hardware address of the remote device, if the extra was present.
    #[serde(default)]
    pub device: Option<String>,
    /// Raw pairing variant code, if the extra was present.
    #[serde(default)]
    pub variant: Option<i32>,
    #[serde(default)]
    pub device_class: Option<u32>,
}

impl PairingBroadcast {
    /// A pairing-request broadcast for `device` with the given variant code.
    pub fn pairing_request(device: impl Into<String>, variant: i32) -> Self {
        Self {
            action: ACTION_PAIRING_REQUEST.to_string(),
            device: Some(device.into()),
            variant: Some(variant),
            device_class: None,
        }
    }

    /// Build the event for this broadcast, or `None` if it is not a pairing
    /// request.
    ///
    /// A missing device becomes an empty id and a missing variant becomes
    /// the `ERROR` sentinel, so the handler sees and reports both.
    pub fn to_event(&self) -> Option<PairingEvent> {
        if self.action != ACTION_PAIRING_REQUEST {
            return None;
        }

        let event = PairingEvent::new(
            self.device.clone().unwrap_or_default(),
            self.variant.unwrap_or(PAIRING_VARIANT_ERROR),
        );
        Some(match self.device_class {
            Some(class) => event.with_device_class(class),
            None => event,
        })
    }
}

/// Outcome counts for one receiver run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceiverSummary {
    pub pin_injected: u64,
    pub confirmed_without_pin: u64,
    pub ignored: u64,
    pub failed: u64,
    /// Broadcasts with a different action.
    pub skipped: u64,
}

impl ReceiverSummary {
    pub fn record(&mut self, outcome: Option<PairingOutcome>) {
        match outcome {
            Some(PairingOutcome::PinInjected) => self.pin_injected += 1,
            Some(PairingOutcome::ConfirmedWithoutPin) => self.confirmed_without_pin += 1,
            Some(PairingOutcome::Ignored) => self.ignored += 1,
            Some(PairingOutcome::Failed(_)) => self.failed += 1,
            None => self.skipped += 1,
        }
    }

    /// Number of pairing requests handled (skipped broadcasts excluded).
    pub fn handled(&self) -> u64 {
        self.pin_injected + self.confirmed_without_pin + self.ignored + self.failed
    }
}

/// Subscribes the pairing handler to pairing-request broadcasts.
pub struct PairingReceiver<C> {
    handler: PairingPolicyHandler<C>,
}

impl<C: PairingControl> PairingReceiver<C> {
    pub fn new(handler: PairingPolicyHandler<C>) -> Self {
        Self { handler }
    }

    /// Handle a single broadcast. Returns `None` when the action is not
    /// [`ACTION_PAIRING_REQUEST`].
    pub fn on_receive(&self, broadcast: &PairingBroadcast) -> Option<PairingOutcome> {
        let Some(event) = broadcast.to_event() else {
            tracing::trace!(action = %broadcast.action, "Skipping unrelated broadcast");
            return None;
        };
        Some(self.handler.handle(&event))
    }

    /// Drain broadcasts until every sender is dropped.
    ///
    /// Each broadcast is handled to completion before the next is received.
    pub async fn run(self, mut rx: mpsc::Receiver<PairingBroadcast>) -> ReceiverSummary {
        tracing::info!("Pairing receiver started");

        let mut summary = ReceiverSummary::default();
        while let Some(broadcast) = rx.recv().await {
            summary.record(self.on_receive(&broadcast));
        }

        tracing::info!(
            handled = summary.handled(),
            failed = summary.failed,
            "Pairing broadcast channel closed, stopping receiver"
        );
        summary
    }
}

/// Spawn a background task running [`PairingReceiver::run`].
///
/// The task ends once all senders for `rx` are dropped and yields the
/// summary of everything it handled.
pub fn spawn_receiver<C>(
    receiver: PairingReceiver<C>,
    rx: mpsc::Receiver<PairingBroadcast>,
) -> JoinHandle<ReceiverSummary>
where
    C: PairingControl + Send + Sync + 'static,
{
    tokio::spawn(receiver.run(rx))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::PairingPolicyConfig;
    use crate::pairing::{DryRunControl, PairingVariant};

    fn receiver() -> PairingReceiver<DryRunControl> {
        PairingReceiver::new(PairingPolicyHandler::new(
            DryRunControl,
            Arc::new(PairingPolicyConfig::default()),
        ))
    }

    #[test]
    fn test_to_event_ignores_other_actions() {
        let broadcast = PairingBroadcast {
            action: "android.bluetooth.device.action.BOND_STATE_CHANGED".to_string(),
            device: Some("AA:BB:CC:DD:EE:FF".to_string()),
            variant: Some(0),
            device_class: None,
        };
        assert!(broadcast.to_event().is_none());
    }

    #[test]
    fn test_to_event_fills_missing_extras() {
        let broadcast = PairingBroadcast {
            action: ACTION_PAIRING_REQUEST.to_string(),
            device: None,
            variant: None,
            device_class: None,
        };
        let event = broadcast.to_event().unwrap();
        assert_eq!(event.remote_device_id(), "");
        assert_eq!(event.variant(), PairingVariant::Unknown(i32::MIN));
    }

    #[test]
    fn test_to_event_carries_device_class() {
        let mut broadcast = PairingBroadcast::pairing_request("AA:BB:CC:DD:EE:FF", 2);
        broadcast.device_class = Some(0x0404);
        let event = broadcast.to_event().unwrap();
        assert_eq!(event.variant(), PairingVariant::PasskeyConfirmation);
        assert_eq!(event.device_class_hint().map(|c| c.raw()), Some(0x0404));
    }

    #[test]
    fn test_broadcast_deserializes_camel_case() {
        let broadcast: PairingBroadcast = serde_json::from_str(
            r#"{"action":"android.bluetooth.device.action.PAIRING_REQUEST","device":"AA:BB:CC:DD:EE:FF","variant":3,"deviceClass":512}"#,
        )
        .unwrap();
        assert_eq!(broadcast.device_class, Some(512));
        assert_eq!(broadcast.variant, Some(3));
    }

    #[test]
    fn test_on_receive() {
        let receiver = receiver();
        assert_eq!(
            receiver.on_receive(&PairingBroadcast::pairing_request("AA:BB:CC:DD:EE:FF", 0)),
            Some(PairingOutcome::PinInjected)
        );
        let unrelated = PairingBroadcast {
            action: "android.intent.action.BOOT_COMPLETED".to_string(),
            device: None,
            variant: None,
            device_class: None,
        };
        assert_eq!(receiver.on_receive(&unrelated), None);
    }

    #[tokio::test]
    async fn test_run_counts_outcomes_until_closed() {
        let (tx, rx) = mpsc::channel(8);
        let handle = spawn_receiver(receiver(), rx);

        tx.send(PairingBroadcast::pairing_request("AA:BB:CC:DD:EE:01", 0))
            .await
            .unwrap();
        tx.send(PairingBroadcast::pairing_request("AA:BB:CC:DD:EE:02", 3))
            .await
            .unwrap();
        tx.send(PairingBroadcast::pairing_request("AA:BB:CC:DD:EE:03", 1))
            .await
            .unwrap();
        tx.send(PairingBroadcast {
            action: "android.intent.action.SCREEN_ON".to_string(),
            device: None,
            variant: None,
            device_class: None,
        })
        .await
        .unwrap();
        drop(tx);

        let summary = handle.await.unwrap();
        assert_eq!(
            summary,
            ReceiverSummary {
                pin_injected: 1,
                confirmed_without_pin: 1,
                ignored: 1,
                failed: 0,
                skipped: 1,
            }
        );
        assert_eq!(summary.handled(), 3);
    }
}
