//! 关节句柄与传感器句柄
//!
//! 句柄是控制器访问硬件缓冲区的唯一入口，克隆成本为一次 `Arc` 计数。
//!
//! - 关节：`JointData` 中的原子标量，控制器可直接写命令
//! - 传感器：`ArcSwap` 快照，只在硬件层 `read` 周期内整体替换，
//!   控制器读取到的永远是完整的一帧数据

use crate::buffer::JointData;
use crate::error::ResourceError;
use crate::transmission::ResourceKind;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// 只读关节状态句柄
#[derive(Debug, Clone)]
pub struct JointStateHandle {
    name: String,
    data: Arc<JointData>,
}

impl JointStateHandle {
    pub fn new(name: impl Into<String>, data: Arc<JointData>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> f64 {
        self.data.position.load()
    }

    pub fn velocity(&self) -> f64 {
        self.data.velocity.load()
    }

    pub fn effort(&self) -> f64 {
        self.data.effort.load()
    }

    /// 底层缓冲区（用于判断两个句柄是否指向同一关节）
    pub fn data(&self) -> &Arc<JointData> {
        &self.data
    }
}

/// 可写关节句柄（状态 + 一个命令槽）
///
/// 命令槽由 `kind` 决定：位置/速度/力矩句柄写入各自独立的命令字段。
#[derive(Debug, Clone)]
pub struct JointHandle {
    state: JointStateHandle,
    kind: ResourceKind,
}

impl JointHandle {
    /// 创建命令句柄
    ///
    /// # 错误
    ///
    /// `kind` 为 `JointState` 时返回 [`ResourceError::Fatal`]（只读变体没有命令槽）。
    pub fn new(state: JointStateHandle, kind: ResourceKind) -> Result<Self, ResourceError> {
        if !kind.is_writable() {
            return Err(ResourceError::Fatal(format!(
                "Command handle for '{}' requires a writable resource kind, got {:?}",
                state.name(),
                kind
            )));
        }
        Ok(Self { state, kind })
    }

    pub fn name(&self) -> &str {
        self.state.name()
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn position(&self) -> f64 {
        self.state.position()
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity()
    }

    pub fn effort(&self) -> f64 {
        self.state.effort()
    }

    /// 写入命令（下一次 `write` 周期生效）
    pub fn set_command(&self, value: f64) {
        if let Some(slot) = self.state.data.command(self.kind) {
            slot.store(value);
        }
    }

    /// 当前命令值
    pub fn command(&self) -> f64 {
        self.state
            .data
            .command(self.kind)
            .map(|slot| slot.load())
            .unwrap_or_default()
    }

    pub fn state(&self) -> &JointStateHandle {
        &self.state
    }
}

/// 力/力矩采样（body2 坐标系，对应关节约束力）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WrenchSample {
    /// 力 `[x, y, z]`（N）
    pub force: [f64; 3],
    /// 力矩 `[x, y, z]`（N·m）
    pub torque: [f64; 3],
}

/// IMU 采样
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImuSample {
    /// 姿态四元数 `[x, y, z, w]`
    pub orientation: [f64; 4],
    /// 角速度 `[x, y, z]`（rad/s）
    pub angular_velocity: [f64; 3],
    /// 线加速度 `[x, y, z]`（m/s²）
    pub linear_acceleration: [f64; 3],
}

impl Default for ImuSample {
    /// 单位四元数，零角速度，零加速度
    fn default() -> Self {
        Self {
            orientation: [0.0, 0.0, 0.0, 1.0],
            angular_velocity: [0.0; 3],
            linear_acceleration: [0.0; 3],
        }
    }
}

/// 力矩传感器句柄
#[derive(Debug, Clone)]
pub struct ForceTorqueSensorHandle {
    name: String,
    frame_id: String,
    data: Arc<ArcSwap<WrenchSample>>,
}

impl ForceTorqueSensorHandle {
    pub fn new(
        name: impl Into<String>,
        frame_id: impl Into<String>,
        data: Arc<ArcSwap<WrenchSample>>,
    ) -> Self {
        Self {
            name: name.into(),
            frame_id: frame_id.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// 最近一次 `read` 的完整快照（无锁）
    pub fn sample(&self) -> WrenchSample {
        **self.data.load()
    }

    pub fn force(&self) -> [f64; 3] {
        self.data.load().force
    }

    pub fn torque(&self) -> [f64; 3] {
        self.data.load().torque
    }
}

/// IMU 句柄
#[derive(Debug, Clone)]
pub struct ImuSensorHandle {
    name: String,
    frame_id: String,
    data: Arc<ArcSwap<ImuSample>>,
}

impl ImuSensorHandle {
    pub fn new(
        name: impl Into<String>,
        frame_id: impl Into<String>,
        data: Arc<ArcSwap<ImuSample>>,
    ) -> Self {
        Self {
            name: name.into(),
            frame_id: frame_id.into(),
            data,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    pub fn sample(&self) -> ImuSample {
        **self.data.load()
    }

    pub fn orientation(&self) -> [f64; 4] {
        self.data.load().orientation
    }

    pub fn angular_velocity(&self) -> [f64; 3] {
        self.data.load().angular_velocity
    }

    pub fn linear_acceleration(&self) -> [f64; 3] {
        self.data.load().linear_acceleration
    }
}
