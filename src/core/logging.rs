//! 日志初始化
//!
//! 宿主应用通常自带日志系统，因此桥接层只在配置要求时安装订阅器。

use crate::config::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// 初始化日志系统
///
/// `RUST_LOG` 环境变量优先，否则使用配置中的日志级别。
/// 已有全局订阅器时静默跳过，返回是否由本次调用完成安装。
pub fn init_logging(config: &LoggingConfig) -> bool {
    if !config.log_to_console {
        return false;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_directive()));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(target: "bridge", level = ?config.level, "Logging initialized");
    }
    installed
}
