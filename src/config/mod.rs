//! 统一配置系统
//!
//! 提供TOML/JSON配置文件、环境变量和运行时动态调整
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::{impl_default, impl_default_and_new};

pub mod pending;

pub use pending::{PendingConfig, PendingPolicy, MAX_PENDING_CAPACITY};

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    /// 文件读取错误
    #[error("Config file error: {0}")]
    FileError(#[from] std::io::Error),
    /// 解析错误
    #[error("Config parse error: {0}")]
    ParseError(String),
    /// 验证错误
    #[error("Config validation error: {0}")]
    ValidationError(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// 桥接层主配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// 未送达消息配置
    #[serde(default)]
    pub pending: PendingConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl_default_and_new!(BridgeConfig {
    pending: PendingConfig::default(),
    logging: LoggingConfig::default(),
});

impl BridgeConfig {
    /// 从TOML文件加载配置
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_toml_str(&content)
    }

    /// 从TOML字符串解析配置
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 从JSON文件加载配置
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(ConfigError::FileError)?;
        Self::from_json_str(&content)
    }

    /// 从JSON字符串解析配置
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// 保存为TOML文件
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 保存为JSON文件
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        fs::write(path, content).map_err(ConfigError::FileError)
    }

    /// 从环境变量覆盖配置
    ///
    /// - `BRIDGE_PENDING_POLICY`: `drop` / `buffer`
    /// - `BRIDGE_PENDING_CAPACITY`: 缓冲容量
    /// - `BRIDGE_LOG_LEVEL`: `trace` / `debug` / `info` / `warn` / `error`
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    /// 使用自定义查找函数覆盖配置，无法解析的值会被忽略并记录警告
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("BRIDGE_PENDING_POLICY") {
            match val.parse() {
                Ok(policy) => self.pending.policy = policy,
                Err(e) => tracing::warn!(target: "bridge::config", "Ignoring BRIDGE_PENDING_POLICY: {}", e),
            }
        }
        if let Some(val) = lookup("BRIDGE_PENDING_CAPACITY") {
            match val.trim().parse() {
                Ok(capacity) => self.pending.capacity = capacity,
                Err(e) => tracing::warn!(target: "bridge::config", "Ignoring BRIDGE_PENDING_CAPACITY: {}", e),
            }
        }
        if let Some(val) = lookup("BRIDGE_LOG_LEVEL") {
            match val.parse() {
                Ok(level) => self.logging.level = level,
                Err(e) => tracing::warn!(target: "bridge::config", "Ignoring BRIDGE_LOG_LEVEL: {}", e),
            }
        }
    }

    /// 验证配置
    pub fn validate(&self) -> ConfigResult<()> {
        self.pending.validate()
    }

    /// 自动查找并加载配置文件
    ///
    /// 按以下顺序查找：
    /// 1. ./bridge.toml
    /// 2. ./bridge.json
    /// 3. ~/.config/engine_bridge/bridge.toml
    /// 4. 使用默认配置
    pub fn load_or_default() -> Self {
        if let Ok(config) = Self::from_toml_file("bridge.toml") {
            tracing::info!(target: "bridge::config", "Loaded config from bridge.toml");
            return config;
        }

        if let Ok(config) = Self::from_json_file("bridge.json") {
            tracing::info!(target: "bridge::config", "Loaded config from bridge.json");
            return config;
        }

        if let Some(home) = env::var_os("HOME") {
            let config_path = PathBuf::from(home)
                .join(".config")
                .join("engine_bridge")
                .join("bridge.toml");

            if let Ok(config) = Self::from_toml_file(&config_path) {
                tracing::info!(target: "bridge::config", "Loaded config from {:?}", config_path);
                return config;
            }
        }

        tracing::debug!(target: "bridge::config", "Using default configuration");
        Self::default()
    }
}

/// 日志配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: LogLevel,

    /// 是否安装控制台订阅器
    pub log_to_console: bool,
}

impl_default!(LoggingConfig {
    level: LogLevel::Info,
    log_to_console: true,
});

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// 跟踪
    Trace,
    /// 调试
    Debug,
    /// 信息
    Info,
    /// 警告
    Warn,
    /// 错误
    Error,
}

impl LogLevel {
    /// EnvFilter指令形式
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::ParseError(format!("unknown log level '{}'", other))),
        }
    }
}
