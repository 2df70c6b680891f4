//! C ABI surface
//!
//! Entry points exported from the shared library for the native host. Every
//! export catches panics so nothing unwinds across the boundary, and reports
//! failures as [`BridgeStatus`] codes. Declarations live in
//! `include/engine_bridge.h`.

use super::channel::MessageChannel;
use super::registry::{Delivery, MessageReceiver, ReceiverRegistry};
use crate::config::BridgeConfig;
use crate::core::{BridgeError, BridgeResult, BridgeStatus};
use std::ffi::{c_char, c_void, CStr, CString};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// Host callback: `void (*)(void *context, const char *message)`.
///
/// `message` is a NUL-terminated UTF-8 string valid only for the duration
/// of the call.
pub type ReceiveCallback = unsafe extern "C" fn(context: *mut c_void, message: *const c_char);

/// Adapts a C callback plus opaque context to [`MessageReceiver`].
///
/// A message containing an interior NUL byte cannot be passed as a C string.
/// It is logged and skipped without reaching the callback, but the registry
/// has already handed it over, so the send is still reported as
/// [`Delivery::Delivered`] (`BRIDGE_OK`).
pub struct CallbackReceiver {
    callback: ReceiveCallback,
    context: *mut c_void,
}

// SAFETY: CallbackReceiver::new requires the callback and context to be
// usable from any thread.
unsafe impl Send for CallbackReceiver {}
unsafe impl Sync for CallbackReceiver {}

impl CallbackReceiver {
    /// # Safety
    ///
    /// `callback` must remain callable and `context` valid until the receiver
    /// is replaced or cleared, and both must tolerate concurrent calls from
    /// arbitrary threads.
    pub unsafe fn new(callback: ReceiveCallback, context: *mut c_void) -> Self {
        Self { callback, context }
    }
}

impl MessageReceiver for CallbackReceiver {
    fn receive(&self, message: &str) {
        match CString::new(message) {
            // SAFETY: upheld by the contract of CallbackReceiver::new
            Ok(c_message) => unsafe { (self.callback)(self.context, c_message.as_ptr()) },
            Err(e) => {
                let err = BridgeError::InteriorNul(e.nul_position());
                tracing::warn!(target: "bridge::ffi", "Message cannot cross the C boundary: {}", err);
            }
        }
    }
}

impl From<Delivery> for BridgeStatus {
    fn from(delivery: Delivery) -> Self {
        match delivery {
            Delivery::Delivered => BridgeStatus::Ok,
            Delivery::Buffered => BridgeStatus::Buffered,
            Delivery::Dropped => BridgeStatus::Dropped,
        }
    }
}

/// Run `f`, converting a panic into [`BridgeStatus::Panicked`]
fn guard<F>(entry: &'static str, f: F) -> BridgeStatus
where
    F: FnOnce() -> BridgeStatus,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            tracing::error!(target: "bridge::ffi", entry, "Panic caught at the C boundary");
            BridgeStatus::Panicked
        }
    }
}

fn report(entry: &'static str, err: BridgeError) -> BridgeStatus {
    tracing::warn!(target: "bridge::ffi", entry, "{}", err);
    err.status()
}

/// # Safety
///
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn read_str<'a>(ptr: *const c_char, what: &'static str) -> BridgeResult<&'a str> {
    if ptr.is_null() {
        return Err(BridgeError::NullPointer(what));
    }
    Ok(CStr::from_ptr(ptr).to_str()?)
}

/// Load configuration, create the global registry and install logging.
///
/// A null `config_path` searches the default locations. Returns
/// `Rejected` when the global registry already exists.
///
/// # Safety
///
/// `config_path` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bridge_initialize(config_path: *const c_char) -> BridgeStatus {
    guard("bridge_initialize", || {
        let config = if config_path.is_null() {
            BridgeConfig::load_or_default()
        } else {
            let loaded = read_str(config_path, "config_path").and_then(|path| {
                BridgeConfig::from_toml_file(path).map_err(BridgeError::from)
            });
            match loaded {
                Ok(config) => config,
                Err(e) => return report("bridge_initialize", e),
            }
        };

        match super::initialize(config) {
            Ok(_) => BridgeStatus::Ok,
            Err(e) => report("bridge_initialize", e),
        }
    })
}

/// Register the host receiver. A null `callback` unregisters.
///
/// # Safety
///
/// See [`CallbackReceiver::new`].
#[no_mangle]
pub unsafe extern "C" fn bridge_register_receiver(
    callback: Option<ReceiveCallback>,
    context: *mut c_void,
) -> BridgeStatus {
    guard("bridge_register_receiver", || {
        let registry = ReceiverRegistry::global();
        match callback {
            Some(callback) => {
                registry.set(Arc::new(CallbackReceiver::new(callback, context)));
            }
            None => {
                registry.clear();
            }
        }
        BridgeStatus::Ok
    })
}

#[no_mangle]
pub extern "C" fn bridge_unregister_receiver() {
    guard("bridge_unregister_receiver", || {
        ReceiverRegistry::global().clear();
        BridgeStatus::Ok
    });
}

#[no_mangle]
pub extern "C" fn bridge_is_registered() -> bool {
    ReceiverRegistry::global().is_registered()
}

/// Send a raw message from the engine to the host receiver.
///
/// # Safety
///
/// `message` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bridge_send_message(message: *const c_char) -> BridgeStatus {
    guard("bridge_send_message", || match read_str(message, "message") {
        Ok(message) => ReceiverRegistry::global().deliver(message).into(),
        Err(e) => report("bridge_send_message", e),
    })
}

/// Post a JSON message from the host to the engine's inbound listeners.
///
/// # Safety
///
/// `message` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bridge_post_inbound(message: *const c_char) -> BridgeStatus {
    guard("bridge_post_inbound", || {
        let result = read_str(message, "message")
            .and_then(|json| MessageChannel::global().on_message_received(json));
        match result {
            Ok(_) => BridgeStatus::Ok,
            Err(e) => report("bridge_post_inbound", e),
        }
    })
}

#[no_mangle]
pub extern "C" fn bridge_announce_initialized() -> BridgeStatus {
    guard("bridge_announce_initialized", || {
        match MessageChannel::global().announce_initialized() {
            Ok(delivery) => delivery.into(),
            Err(e) => report("bridge_announce_initialized", e),
        }
    })
}
