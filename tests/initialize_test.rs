// 全局注册表只能配置一次，单独放在一个测试进程中
use engine_bridge::bindings::ffi::{bridge_initialize, bridge_register_receiver, bridge_send_message};
use engine_bridge::bindings::ReceiverRegistry;
use engine_bridge::config::{BridgeConfig, LoggingConfig, PendingConfig, PendingPolicy};
use engine_bridge::core::init_logging;
use engine_bridge::BridgeStatus;
use std::ffi::{c_char, c_void, CStr, CString};
use std::sync::Mutex;

unsafe extern "C" fn record(context: *mut c_void, message: *const c_char) {
    let sink = &*(context as *const Mutex<Vec<String>>);
    let text = CStr::from_ptr(message).to_string_lossy().into_owned();
    sink.lock().unwrap().push(text);
}

#[test]
fn test_initialize_with_buffer_policy_replays_on_registration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bridge.toml");

    let mut config = BridgeConfig::default();
    config.pending = PendingConfig::buffered(2);
    config.logging.log_to_console = false;
    config.save_toml(&path).unwrap();

    let c_path = CString::new(path.to_str().unwrap()).unwrap();
    assert_eq!(unsafe { bridge_initialize(c_path.as_ptr()) }, BridgeStatus::Ok);
    assert_eq!(
        ReceiverRegistry::global().config().policy,
        PendingPolicy::Buffer
    );

    for message in ["early-1", "early-2", "early-3"] {
        let message = CString::new(message).unwrap();
        assert_eq!(
            unsafe { bridge_send_message(message.as_ptr()) },
            BridgeStatus::Buffered
        );
    }

    // 'static so the context outlives the registration
    let sink: &'static Mutex<Vec<String>> = Box::leak(Box::new(Mutex::new(Vec::new())));
    let status = unsafe {
        bridge_register_receiver(Some(record), sink as *const _ as *mut c_void)
    };
    assert_eq!(status, BridgeStatus::Ok);
    assert_eq!(*sink.lock().unwrap(), vec!["early-2", "early-3"]);

    // 第二次初始化被拒绝，且不安装日志订阅器
    let mut loud = BridgeConfig::default();
    loud.logging.log_to_console = true;
    let loud_path = dir.path().join("loud.toml");
    loud.save_toml(&loud_path).unwrap();
    let c_loud_path = CString::new(loud_path.to_str().unwrap()).unwrap();
    assert_eq!(
        unsafe { bridge_initialize(c_loud_path.as_ptr()) },
        BridgeStatus::Rejected
    );
    assert!(init_logging(&LoggingConfig::default()));

    let stats = ReceiverRegistry::global().stats();
    assert_eq!(stats.buffered, 3);
    assert_eq!(stats.dropped, 1);
    assert_eq!(stats.replayed, 2);
}
