//! 日志初始化
//!
//! 使用 tracing + tracing-subscriber，默认级别 info，
//! 可通过 RUST_LOG 环境变量覆盖。

use tracing_subscriber::EnvFilter;

/// 初始化全局日志订阅器
///
/// 重复调用是安全的，后续调用会被忽略（方便在测试里使用）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
