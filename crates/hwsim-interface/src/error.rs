//! 资源注册错误类型定义

use thiserror::Error;

/// 资源构造/注册错误
///
/// 工厂通过匹配变体区分两类失败：
/// - [`ResourceError::AlreadyExists`]：同一 (关节, 接口) 已注册，可忽略
/// - 其他变体：致命错误，整个硬件层初始化失败
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// 同名句柄已存在于该接口组
    #[error("Resource '{name}' is already registered in {interface}")]
    AlreadyExists {
        name: String,
        interface: &'static str,
    },

    /// 仿真模型中找不到关节
    #[error("Joint '{joint}' not found in simulation model")]
    JointNotFound { joint: String },

    /// 其他构造失败
    #[error("Resource construction failed: {0}")]
    Fatal(String),
}

impl ResourceError {
    /// 是否为可忽略的重复注册
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}
