//! 未送达消息配置模块
//!
//! 决定在宿主尚未注册接收器时，发往宿主的消息如何处理。

use super::{ConfigError, ConfigResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 缓冲容量上限
pub const MAX_PENDING_CAPACITY: usize = 65_536;

/// 未注册接收器时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingPolicy {
    /// 丢弃消息（默认）
    Drop,
    /// 缓冲消息，注册后按顺序重放
    Buffer,
}

impl FromStr for PendingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(PendingPolicy::Drop),
            "buffer" => Ok(PendingPolicy::Buffer),
            other => Err(ConfigError::ParseError(format!(
                "unknown pending policy '{}', expected 'drop' or 'buffer'",
                other
            ))),
        }
    }
}

/// 未送达消息配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingConfig {
    /// 处理策略
    pub policy: PendingPolicy,
    /// 缓冲容量（仅在 `Buffer` 策略下生效），溢出时丢弃最旧的消息
    pub capacity: usize,
}

impl_default!(PendingConfig {
    policy: PendingPolicy::Drop,
    capacity: 64,
});

impl PendingConfig {
    /// 缓冲策略的便捷构造
    pub fn buffered(capacity: usize) -> Self {
        Self {
            policy: PendingPolicy::Buffer,
            capacity,
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.policy == PendingPolicy::Buffer
            && !(1..=MAX_PENDING_CAPACITY).contains(&self.capacity)
        {
            return Err(ConfigError::ValidationError(format!(
                "pending capacity must be within 1..={}, got {}",
                MAX_PENDING_CAPACITY, self.capacity
            )));
        }
        Ok(())
    }
}
