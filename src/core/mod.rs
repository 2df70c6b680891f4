//! 核心模块
//!
//! 包含桥接层的基础设施：
//! - `error` - 错误类型与C ABI状态码
//! - `logging` - tracing日志初始化
//! - `macros` - 配置默认值宏

pub mod error;
pub mod logging;
#[macro_use]
pub mod macros;

// 重新导出错误类型
pub use error::{BridgeError, BridgeResult, BridgeStatus};
pub use logging::init_logging;
