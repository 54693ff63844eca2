//! # hwsim-interface
//!
//! 仿真机器人硬件层的接口定义（无仿真后端依赖）
//!
//! ## 模块
//!
//! - `transmission`: 传动/关节描述、接口类型词表（`ResourceKind`）
//! - `buffer`: 无锁标量缓冲区（`AtomicF64`、`JointData`）
//! - `handle`: 关节句柄与传感器句柄（力矩传感器、IMU）
//! - `registry`: 按名称注册句柄的接口组（`HandleRegistry`、`HardwareInterfaces`）
//! - `error`: 资源注册错误
//!
//! ## 数据流
//!
//! ```text
//! 仿真后端 (hwsim-driver)
//!     ↓ read: 写入 JointData 状态 / 传感器快照
//! Handle (此 crate)
//!     ↓ 控制器读取状态、写入命令
//! 仿真后端
//!     ↓ write: 读取 JointData 命令
//! ```

pub mod buffer;
pub mod error;
pub mod handle;
pub mod registry;
pub mod transmission;

// 重新导出常用类型
pub use buffer::{AtomicF64, JointData};
pub use error::ResourceError;
pub use handle::{
    ForceTorqueSensorHandle, ImuSample, ImuSensorHandle, JointHandle, JointStateHandle,
    WrenchSample,
};
pub use registry::{HandleRegistry, HardwareInterfaces, NamedHandle};
pub use transmission::{JointInfo, JointLimits, ResourceKind, TransmissionInfo};
