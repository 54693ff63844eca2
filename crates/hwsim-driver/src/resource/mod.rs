//! 关节资源
//!
//! 一个资源 = 一个关节在一个能力变体下的读写单元。变体集合是封闭的：
//!
//! | 变体 | 接口组 | `write` 行为 | 急停时 |
//! |------|--------|--------------|--------|
//! | [`JointStateResource`] | 关节状态 | 无 | 无 |
//! | [`PositionJoint`] | 位置 | 位置命令（限位饱和） | 保持急停触发时刻的位置 |
//! | [`VelocityJoint`] | 速度 | 速度命令（限位饱和） | 零速度 |
//! | [`EffortJoint`] | 力矩 | 力矩命令（限位饱和） | 零力矩 |
//!
//! 所有变体的 `read` 都把仿真关节的位置/速度/力矩拷贝到共享状态缓冲区。
//! 同一关节的多个变体共享一份 [`JointData`]。

mod effort;
mod joint_state;
mod position;
mod velocity;

pub use effort::EffortJoint;
pub use joint_state::JointStateResource;
pub use position::PositionJoint;
pub use velocity::VelocityJoint;

use crate::sim::{SimContext, SimJoint};
use hwsim_interface::{
    HardwareInterfaces, JointData, JointInfo, JointLimits, JointStateHandle, ResourceError,
    ResourceKind,
};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// 资源初始化上下文
///
/// 持有仿真上下文引用、正在构建的接口组，以及按关节名共享的缓冲区。
/// 初始化成功后通过 [`ResourceContext::into_interfaces`] 取出接口组。
pub struct ResourceContext<'a> {
    sim: &'a dyn SimContext,
    interfaces: HardwareInterfaces,
    joint_data: BTreeMap<String, Arc<JointData>>,
}

impl<'a> ResourceContext<'a> {
    pub fn new(sim: &'a dyn SimContext) -> Self {
        Self {
            sim,
            interfaces: HardwareInterfaces::new(),
            joint_data: BTreeMap::new(),
        }
    }

    pub fn sim(&self) -> &'a dyn SimContext {
        self.sim
    }

    pub fn interfaces(&self) -> &HardwareInterfaces {
        &self.interfaces
    }

    pub fn interfaces_mut(&mut self) -> &mut HardwareInterfaces {
        &mut self.interfaces
    }

    pub fn into_interfaces(self) -> HardwareInterfaces {
        self.interfaces
    }

    /// 关节共享缓冲区（不存在时创建）
    fn joint_data(&mut self, joint: &str) -> Arc<JointData> {
        self.joint_data.entry(joint.to_string()).or_default().clone()
    }
}

/// 资源与仿真关节的绑定
#[derive(Clone)]
pub(crate) struct JointBinding {
    name: String,
    joint: Arc<dyn SimJoint>,
    data: Arc<JointData>,
    limits: JointLimits,
}

impl JointBinding {
    /// 检查重复并绑定仿真关节
    ///
    /// # 错误
    ///
    /// - `AlreadyExists`：该关节在 `kind` 接口组中已有句柄
    /// - `JointNotFound`：仿真模型中没有该关节
    fn bind(
        joint: &JointInfo,
        kind: ResourceKind,
        ctx: &mut ResourceContext<'_>,
    ) -> Result<Self, ResourceError> {
        if ctx.interfaces.has_resource(&joint.name, kind) {
            return Err(ResourceError::AlreadyExists {
                name: joint.name.clone(),
                interface: kind.interface_name(),
            });
        }
        let sim_joint = ctx
            .sim
            .joint(&joint.name)
            .ok_or_else(|| ResourceError::JointNotFound {
                joint: joint.name.clone(),
            })?;
        joint.limits.validate().map_err(|err| match err {
            ResourceError::Fatal(msg) => {
                ResourceError::Fatal(format!("Joint '{}': {}", joint.name, msg))
            },
            other => other,
        })?;
        Ok(Self {
            name: joint.name.clone(),
            joint: sim_joint,
            data: ctx.joint_data(&joint.name),
            limits: joint.limits,
        })
    }

    fn state_handle(&self) -> JointStateHandle {
        JointStateHandle::new(self.name.clone(), self.data.clone())
    }

    /// 拷贝仿真状态到共享缓冲区（不修改仿真）
    #[inline]
    fn read_state(&self) {
        self.data.set_state(
            self.joint.position(),
            self.joint.velocity(),
            self.joint.effort(),
        );
    }

    pub(crate) fn data(&self) -> &Arc<JointData> {
        &self.data
    }
}

impl fmt::Debug for JointBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JointBinding")
            .field("name", &self.name)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// 关节资源（封闭变体集合）
#[derive(Debug)]
pub enum Resource {
    JointState(JointStateResource),
    Position(PositionJoint),
    Velocity(VelocityJoint),
    Effort(EffortJoint),
}

impl Resource {
    /// 构造 `kind` 变体并绑定到 `joint`
    ///
    /// 成功时句柄已注册到对应接口组。
    pub fn init(
        kind: ResourceKind,
        joint: &JointInfo,
        ctx: &mut ResourceContext<'_>,
    ) -> Result<Self, ResourceError> {
        Ok(match kind {
            ResourceKind::JointState => Self::JointState(JointStateResource::init(joint, ctx)?),
            ResourceKind::PositionJoint => Self::Position(PositionJoint::init(joint, ctx)?),
            ResourceKind::VelocityJoint => Self::Velocity(VelocityJoint::init(joint, ctx)?),
            ResourceKind::EffortJoint => Self::Effort(EffortJoint::init(joint, ctx)?),
        })
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::JointState(_) => ResourceKind::JointState,
            Self::Position(_) => ResourceKind::PositionJoint,
            Self::Velocity(_) => ResourceKind::VelocityJoint,
            Self::Effort(_) => ResourceKind::EffortJoint,
        }
    }

    pub fn joint_name(&self) -> &str {
        &self.binding().name
    }

    pub fn is_writable(&self) -> bool {
        self.kind().is_writable()
    }

    /// 仿真状态 → 状态缓冲区
    pub fn read(&self, time: Duration, period: Duration, e_stop_active: bool) {
        match self {
            Self::JointState(r) => r.read(time, period, e_stop_active),
            Self::Position(r) => r.read(time, period, e_stop_active),
            Self::Velocity(r) => r.read(time, period, e_stop_active),
            Self::Effort(r) => r.read(time, period, e_stop_active),
        }
    }

    /// 命令缓冲区 → 仿真（急停时下发安全值）
    pub fn write(&self, time: Duration, period: Duration, e_stop_active: bool) {
        match self {
            Self::JointState(r) => r.write(time, period, e_stop_active),
            Self::Position(r) => r.write(time, period, e_stop_active),
            Self::Velocity(r) => r.write(time, period, e_stop_active),
            Self::Effort(r) => r.write(time, period, e_stop_active),
        }
    }

    fn binding(&self) -> &JointBinding {
        match self {
            Self::JointState(r) => &r.binding,
            Self::Position(r) => &r.binding,
            Self::Velocity(r) => &r.binding,
            Self::Effort(r) => &r.binding,
        }
    }

    /// 共享缓冲区
    pub fn data(&self) -> &Arc<JointData> {
        self.binding().data()
    }
}

/// 变体单元测试共用的夹具
#[cfg(test)]
pub(crate) mod test_util {
    use crate::memory::{MemoryJoint, MemorySim};
    use std::sync::Arc;

    pub(crate) fn sim_with(joint: &str) -> (MemorySim, Arc<MemoryJoint>) {
        let mut sim = MemorySim::new();
        let handle = sim.add_joint(joint);
        (sim, handle)
    }
}
