use engine_bridge::bindings::ffi::{
    bridge_announce_initialized, bridge_is_registered, bridge_post_inbound,
    bridge_register_receiver, bridge_send_message, bridge_unregister_receiver,
};
use engine_bridge::bindings::{CameraView, InboundMessage, MessageChannel};
use engine_bridge::BridgeStatus;
use proptest::prelude::*;
use std::ffi::{c_char, c_void, CStr, CString};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;

static SERIAL: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    let guard = SERIAL.lock().unwrap_or_else(PoisonError::into_inner);
    bridge_unregister_receiver();
    guard
}

type Sink = Mutex<Vec<String>>;

unsafe extern "C" fn record(context: *mut c_void, message: *const c_char) {
    let sink = &*(context as *const Sink);
    let text = CStr::from_ptr(message).to_str().unwrap().to_owned();
    sink.lock().unwrap().push(text);
}

/// Registers a recording callback; the sink must outlive the registration
fn register(sink: &Arc<Sink>) {
    let status =
        unsafe { bridge_register_receiver(Some(record), Arc::as_ptr(sink) as *mut c_void) };
    assert_eq!(status, BridgeStatus::Ok);
}

fn send(message: &str) -> BridgeStatus {
    let message = CString::new(message).unwrap();
    unsafe { bridge_send_message(message.as_ptr()) }
}

#[test]
fn test_callback_receives_message() {
    let _guard = serial();
    let sink = Arc::new(Sink::default());
    register(&sink);
    assert!(bridge_is_registered());

    assert_eq!(send("hello"), BridgeStatus::Ok);
    assert_eq!(*sink.lock().unwrap(), vec!["hello"]);

    bridge_unregister_receiver();
    assert!(!bridge_is_registered());
}

#[test]
fn test_null_callback_unregisters() {
    let _guard = serial();
    let sink = Arc::new(Sink::default());
    register(&sink);

    let status = unsafe { bridge_register_receiver(None, std::ptr::null_mut()) };
    assert_eq!(status, BridgeStatus::Ok);
    assert!(!bridge_is_registered());

    assert_eq!(send("dropped"), BridgeStatus::Dropped);
    assert!(sink.lock().unwrap().is_empty());
}

#[test]
fn test_null_message_is_rejected() {
    let _guard = serial();
    let status = unsafe { bridge_send_message(std::ptr::null()) };
    assert_eq!(status, BridgeStatus::NullPointer);
    let status = unsafe { bridge_post_inbound(std::ptr::null()) };
    assert_eq!(status, BridgeStatus::NullPointer);
}

#[test]
fn test_announce_initialized_reaches_callback() {
    let _guard = serial();
    let sink = Arc::new(Sink::default());
    register(&sink);

    assert_eq!(bridge_announce_initialized(), BridgeStatus::Ok);
    assert_eq!(
        *sink.lock().unwrap(),
        vec![r#"{"messageType":"Initialized"}"#]
    );
    bridge_unregister_receiver();
}

#[test]
fn test_post_inbound_dispatches_to_listeners() {
    let _guard = serial();
    let views = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&views);
    let id = MessageChannel::global().subscribe(move |message| {
        if let InboundMessage::CameraViewChanged(changed) = message {
            sink.lock().unwrap().push(changed.view);
        }
    });

    let json = CString::new(r#"{"messageType":"CameraViewChanged","view":"simulation"}"#).unwrap();
    assert_eq!(unsafe { bridge_post_inbound(json.as_ptr()) }, BridgeStatus::Ok);

    let bad = CString::new(r#"{"messageType":"CameraViewChanged","view":"night"}"#).unwrap();
    assert_eq!(unsafe { bridge_post_inbound(bad.as_ptr()) }, BridgeStatus::Decode);

    assert_eq!(*views.lock().unwrap(), vec![CameraView::Simulation]);
    MessageChannel::global().unsubscribe(id);
}

#[test]
fn test_concurrent_sends_through_c_abi() {
    let _guard = serial();
    const SENDERS: usize = 16;
    const PER_SENDER: usize = 50;

    let sink = Arc::new(Sink::default());
    register(&sink);

    let handles: Vec<_> = (0..SENDERS)
        .map(|s| {
            thread::spawn(move || {
                for i in 0..PER_SENDER {
                    assert_eq!(send(&format!("{s}:{i}")), BridgeStatus::Ok);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    bridge_unregister_receiver();

    let mut received = sink.lock().unwrap().clone();
    assert_eq!(received.len(), SENDERS * PER_SENDER);
    received.sort();
    received.dedup();
    assert_eq!(received.len(), SENDERS * PER_SENDER);
}

proptest! {
    #[test]
    fn prop_c_payload_round_trip(payload in "[^\\x00]*") {
        let _guard = serial();
        let sink = Arc::new(Sink::default());
        register(&sink);

        prop_assert_eq!(send(&payload), BridgeStatus::Ok);
        bridge_unregister_receiver();
        prop_assert_eq!(sink.lock().unwrap().clone(), vec![payload]);
    }
}
