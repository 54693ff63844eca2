//! 日志初始化
//!
//! 安装全局 `tracing` 订阅器（`EnvFilter`，缺省 `info`），并通过 `tracing-log`
//! 把 `log` crate 的记录转发到同一个订阅器。
//!
//! 过滤规则取自 `RUST_LOG`，例如：
//!
//! ```bash
//! RUST_LOG=hwsim_driver=debug hwsim-cli run scenario.toml
//! ```

use std::error::Error;
use tracing_subscriber::EnvFilter;

/// 缺省过滤规则
pub const DEFAULT_FILTER: &str = "info";

/// 日志初始化错误
pub type LoggingError = Box<dyn Error + Send + Sync + 'static>;

/// 由 `RUST_LOG`（缺省 [`DEFAULT_FILTER`]）构造过滤器
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// 安装全局订阅器
///
/// # 错误
///
/// 全局订阅器或 `log` 记录器已被安装时返回错误。
pub fn try_init_logging() -> Result<(), LoggingError> {
    try_init_logging_with(env_filter())
}

/// 使用指定过滤器安装全局订阅器
pub fn try_init_logging_with(filter: EnvFilter) -> Result<(), LoggingError> {
    tracing_log::LogTracer::init_with_filter(log::LevelFilter::Trace)?;
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// 安装全局订阅器，已安装时静默忽略
pub fn init_logging() {
    if let Err(e) = try_init_logging() {
        tracing::debug!("Logging already initialized: {}", e);
    }
}
