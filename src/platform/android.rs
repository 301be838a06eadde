//! JNI binding onto `android.bluetooth.BluetoothDevice`.
//!
//! The Java receiver forwards `ACTION_PAIRING_REQUEST` to
//! `PairingReceiver.nativeOnPairingRequest(device, variant, deviceClass)` and
//! gets an outcome code back. The app must be a platform-signed priv-app
//! holding `BLUETOOTH_PRIVILEGED`; otherwise every call fails with
//! `SecurityException`, reported here as `PermissionDenied`.

use std::cell::RefCell;

use jni::JNIEnv;
use jni::objects::{JClass, JObject, JString, JValue};
use jni::sys::jint;

use crate::config::PairingPolicyConfig;
use crate::error::ControlError;
use crate::pairing::{PairingControl, PairingEvent, PairingPolicyHandler};
use crate::telemetry::init_logcat;

const SECURITY_EXCEPTION: &str = "java/lang/SecurityException";

/// [`PairingControl`] backed by a live `BluetoothDevice` reference.
pub struct AndroidPairingControl<'local> {
    env: RefCell<JNIEnv<'local>>,
    device: JObject<'local>,
}

impl<'local> AndroidPairingControl<'local> {
    pub fn new(env: JNIEnv<'local>, device: JObject<'local>) -> Self {
        Self {
            env: RefCell::new(env),
            device,
        }
    }

    /// Turn a boolean platform call into a control result, clearing any
    /// pending Java exception on the way.
    fn check(
        env: &mut JNIEnv<'local>,
        device_id: &str,
        method: &str,
        result: jni::errors::Result<bool>,
    ) -> Result<(), ControlError> {
        match result {
            Ok(true) => Ok(()),
            Ok(false) => Err(ControlError::DeviceUnavailable {
                device_id: device_id.to_string(),
                reason: format!("{method} was rejected by the Bluetooth stack"),
            }),
            Err(err) => {
                if take_exception_is_security(env) {
                    return Err(ControlError::PermissionDenied {
                        device_id: device_id.to_string(),
                    });
                }
                Err(ControlError::DeviceUnavailable {
                    device_id: device_id.to_string(),
                    reason: format!("{method} failed: {err}"),
                })
            }
        }
    }
}

impl PairingControl for AndroidPairingControl<'_> {
    fn set_pin(&self, device_id: &str, pin: &[u8]) -> Result<(), ControlError> {
        let mut env = self.env.borrow_mut();
        let result = (|| {
            let pin_array = JObject::from(env.byte_array_from_slice(pin)?);
            env.call_method(&self.device, "setPin", "([B)Z", &[JValue::Object(&pin_array)])?
                .z()
        })();
        Self::check(&mut env, device_id, "setPin", result)
    }

    fn confirm_pairing(&self, device_id: &str) -> Result<(), ControlError> {
        let mut env = self.env.borrow_mut();
        let result = env
            .call_method(
                &self.device,
                "setPairingConfirmation",
                "(Z)Z",
                &[JValue::Bool(1)],
            )
            .and_then(|value| value.z());
        Self::check(&mut env, device_id, "setPairingConfirmation", result)
    }

    fn device_class(&self, _device_id: &str) -> Option<u32> {
        let mut env = self.env.borrow_mut();
        let result = (|| -> jni::errors::Result<Option<i32>> {
            let class = env
                .call_method(
                    &self.device,
                    "getBluetoothClass",
                    "()Landroid/bluetooth/BluetoothClass;",
                    &[],
                )?
                .l()?;
            if class.is_null() {
                return Ok(None);
            }
            Ok(Some(env.call_method(&class, "getDeviceClass", "()I", &[])?.i()?))
        })();

        match result {
            Ok(class) => class.map(|c| c as u32),
            Err(_) => {
                take_exception_is_security(&mut env);
                None
            }
        }
    }
}

/// Clear any pending exception, reporting whether it was a `SecurityException`.
fn take_exception_is_security(env: &mut JNIEnv<'_>) -> bool {
    if !env.exception_check().unwrap_or(false) {
        return false;
    }
    let throwable = env.exception_occurred();
    let _ = env.exception_clear();
    match throwable {
        Ok(throwable) => env
            .is_instance_of(&throwable, SECURITY_EXCEPTION)
            .unwrap_or(false),
        Err(_) => false,
    }
}

fn device_address(env: &mut JNIEnv<'_>, device: &JObject<'_>) -> Option<String> {
    if device.is_null() {
        return None;
    }
    let address = env
        .call_method(device, "getAddress", "()Ljava/lang/String;", &[])
        .and_then(|value| value.l());
    match address {
        Ok(obj) if !obj.is_null() => {
            let address = JString::from(obj);
            env.get_string(&address).ok().map(String::from)
        }
        Ok(_) => None,
        Err(_) => {
            take_exception_is_security(env);
            None
        }
    }
}

/// Entry point for `PairingReceiver.nativeOnPairingRequest`.
///
/// `device_class` is negative when the Java side has no class to report.
/// Returns [`PairingOutcome::code`](crate::pairing::PairingOutcome::code)
/// and never throws.
#[unsafe(no_mangle)]
pub extern "system" fn Java_com_btautopin_PairingReceiver_nativeOnPairingRequest<'local>(
    mut env: JNIEnv<'local>,
    _class: JClass<'local>,
    device: JObject<'local>,
    variant: jint,
    device_class: jint,
) -> jint {
    init_logcat();

    let address = device_address(&mut env, &device).unwrap_or_default();
    let mut event = PairingEvent::new(address, variant);
    if device_class >= 0 {
        event = event.with_device_class(device_class as u32);
    }

    let control = AndroidPairingControl::new(env, device);
    let handler = PairingPolicyHandler::new(control, PairingPolicyConfig::shared());
    handler.handle(&event).code()
}
