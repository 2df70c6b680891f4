//! 统一错误处理模块
//!
//! 提供桥接层范围内的统一错误类型定义
//!
//! ## 错误类型分层
//!
//! - **配置错误** (`config::ConfigError`): 配置文件读取、解析与验证
//! - **桥接错误** (`BridgeError`): 跨边界调用、消息编解码和注册表状态
//!
//! 跨越C ABI时，`BridgeError` 会被折叠为 [`BridgeStatus`] 状态码。

use crate::config::ConfigError;
use thiserror::Error;

/// 桥接层核心错误类型
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Null pointer passed as {0}")]
    NullPointer(&'static str),

    #[error("Message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Message contains an interior NUL byte at offset {0}")]
    InteriorNul(usize),

    #[error("Failed to encode outbound message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to decode inbound message: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Global {0} is already initialized")]
    AlreadyInitialized(&'static str),
}

impl BridgeError {
    /// 对应的C ABI状态码
    pub fn status(&self) -> BridgeStatus {
        match self {
            BridgeError::NullPointer(_) => BridgeStatus::NullPointer,
            BridgeError::InvalidUtf8(_) | BridgeError::InteriorNul(_) => BridgeStatus::InvalidUtf8,
            BridgeError::Encode(_) => BridgeStatus::Encode,
            BridgeError::Decode { .. } => BridgeStatus::Decode,
            BridgeError::Config(_) | BridgeError::AlreadyInitialized(_) => BridgeStatus::Rejected,
        }
    }
}

/// 跨C ABI返回的状态码
///
/// 非负值表示调用已被接受，负值表示调用被拒绝。
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeStatus {
    Ok = 0,
    Buffered = 1,
    Dropped = 2,
    NullPointer = -1,
    InvalidUtf8 = -2,
    Decode = -3,
    Encode = -4,
    Panicked = -5,
    Rejected = -6,
}

impl BridgeStatus {
    pub fn is_accepted(self) -> bool {
        (self as i32) >= 0
    }
}

/// 桥接结果类型别名
pub type BridgeResult<T> = Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::ValidationError("capacity must be positive".to_string());
        let bridge_err: BridgeError = config_err.into();
        assert!(matches!(bridge_err, BridgeError::Config(_)));
        assert_eq!(bridge_err.status(), BridgeStatus::Rejected);
    }

    #[test]
    fn test_error_display() {
        let err = BridgeError::NullPointer("message");
        assert_eq!(err.to_string(), "Null pointer passed as message");
    }

    #[test]
    fn test_decode_error_keeps_raw_payload() {
        let raw = "{not json".to_string();
        let source = serde_json::from_str::<serde_json::Value>(&raw).unwrap_err();
        let err = BridgeError::Decode {
            source,
            raw: raw.clone(),
        };
        assert_eq!(err.status(), BridgeStatus::Decode);
        match err {
            BridgeError::Decode { raw: kept, .. } => assert_eq!(kept, raw),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_status_acceptance() {
        assert!(BridgeStatus::Ok.is_accepted());
        assert!(BridgeStatus::Dropped.is_accepted());
        assert!(!BridgeStatus::Panicked.is_accepted());
        assert_eq!(BridgeStatus::Decode as i32, -3);
    }
}
