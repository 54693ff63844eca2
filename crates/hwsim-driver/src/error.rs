//! 驱动层错误类型定义

use hwsim_interface::ResourceError;
use std::path::PathBuf;
use thiserror::Error;

/// 硬件层初始化错误
///
/// 任何变体都意味着初始化整体失败，硬件层不可用。
/// 本层不做重试，恢复手段只有由调用方重新初始化。
#[derive(Error, Debug)]
pub enum InitError {
    /// 关节资源构造失败（重复注册不会出现在这里）
    #[error("Could not add resource '{joint}' to hardware interface '{interface}': {source}")]
    Resource {
        joint: String,
        interface: &'static str,
        #[source]
        source: ResourceError,
    },

    /// 力矩传感器挂载的关节不存在
    #[error("Could not find joint '{joint}' to which force-torque sensor '{sensor}' is attached")]
    SensorJointNotFound { sensor: String, joint: String },

    /// IMU 数据源不存在
    #[error("Could not find IMU source '{source_name}' for sensor '{sensor}'")]
    ImuSourceNotFound { sensor: String, source_name: String },

    /// 参数错误
    #[error(transparent)]
    Param(#[from] ParamError),
}

/// 参数读取错误
#[derive(Error, Debug)]
pub enum ParamError {
    /// 必需参数缺失
    #[error("Missing required parameter '{key}'")]
    Missing { key: String },

    /// 参数类型不符
    #[error("Parameter '{key}' has wrong type (expected {expected})")]
    WrongType { key: String, expected: &'static str },

    /// TOML 解析失败
    #[error("Invalid parameter file: {0}")]
    Toml(#[from] toml::de::Error),

    /// 读取参数文件失败
    #[error("Failed to read parameter file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 模式切换错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// 关节模式切换被配置禁用
    #[error("Joint mode switching is disabled")]
    Disabled,

    /// 请求的 (关节, 接口) 没有对应的可写资源
    #[error("No writable resource for joint '{joint}' in interface '{interface}'")]
    UnknownResource { joint: String, interface: String },

    /// 同一次切换要求一个关节同时处于两种命令模式
    #[error("Joint '{joint}' claimed in more than one command mode")]
    JointModeConflict { joint: String },
}
