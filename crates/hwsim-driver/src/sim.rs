//! 仿真后端抽象
//!
//! 物理仿真本身不在本层职责内。硬件层只通过以下 trait 按名称查询关节和传感器，
//! 后端可以是 Gazebo 绑定、MuJoCo 绑定，或测试用的 [`MemorySim`](crate::MemorySim)。
//!
//! # 实时约束
//!
//! `SimJoint` / `SimImu` 的方法在 `read`/`write` 周期内调用，实现不得阻塞
//! （禁止 I/O、长时间持锁）。getter 不得修改仿真状态。

use std::sync::Arc;

/// 关节约束力采样（body2 侧）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JointWrench {
    pub force: [f64; 3],
    pub torque: [f64; 3],
}

/// 仿真关节句柄
pub trait SimJoint: Send + Sync {
    fn position(&self) -> f64;
    fn velocity(&self) -> f64;
    fn effort(&self) -> f64;

    /// 位置命令
    fn set_position(&self, position: f64);
    /// 速度命令
    fn set_velocity(&self, velocity: f64);
    /// 力/力矩命令
    fn set_effort(&self, effort: f64);

    /// 关节约束力/力矩（用于模拟力矩传感器）
    fn force_torque(&self) -> JointWrench;
}

/// 仿真惯性传感器句柄
pub trait SimImu: Send + Sync {
    /// 姿态四元数 `[x, y, z, w]`
    fn orientation(&self) -> [f64; 4];
    fn angular_velocity(&self) -> [f64; 3];
    fn linear_acceleration(&self) -> [f64; 3];
}

/// 仿真上下文：按名称解析关节和传感器
///
/// 返回的句柄生命周期需覆盖硬件层的生命周期（通过 `Arc` 保证）。
pub trait SimContext {
    /// 查找关节，不存在返回 `None`
    fn joint(&self, name: &str) -> Option<Arc<dyn SimJoint>>;

    /// 查找惯性传感器，不存在返回 `None`
    fn imu(&self, name: &str) -> Option<Arc<dyn SimImu>>;
}
