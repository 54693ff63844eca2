//! 接口组：按名称注册句柄
//!
//! 每个接口组（关节状态、位置、速度、力矩、力矩传感器、IMU）
//! 保存一组同类型句柄，名称在组内唯一。重复注册返回
//! [`ResourceError::AlreadyExists`]，由调用方决定是否忽略。

use crate::error::ResourceError;
use crate::handle::{
    ForceTorqueSensorHandle, ImuSensorHandle, JointHandle, JointStateHandle,
};
use crate::transmission::{
    FORCE_TORQUE_SENSOR_INTERFACE, IMU_SENSOR_INTERFACE, ResourceKind,
};

/// 具名句柄
pub trait NamedHandle: Clone {
    fn handle_name(&self) -> &str;
}

impl NamedHandle for JointStateHandle {
    fn handle_name(&self) -> &str {
        self.name()
    }
}

impl NamedHandle for JointHandle {
    fn handle_name(&self) -> &str {
        self.name()
    }
}

impl NamedHandle for ForceTorqueSensorHandle {
    fn handle_name(&self) -> &str {
        self.name()
    }
}

impl NamedHandle for ImuSensorHandle {
    fn handle_name(&self) -> &str {
        self.name()
    }
}

/// 单个接口组
///
/// 保留注册顺序；组规模很小（关节数量级），线性查找即可。
#[derive(Debug, Clone)]
pub struct HandleRegistry<H> {
    interface: &'static str,
    handles: Vec<H>,
}

impl<H: NamedHandle> HandleRegistry<H> {
    pub fn new(interface: &'static str) -> Self {
        Self {
            interface,
            handles: Vec::new(),
        }
    }

    /// 接口组全限定名
    pub fn interface(&self) -> &'static str {
        self.interface
    }

    /// 注册句柄
    ///
    /// # 错误
    ///
    /// 同名句柄已存在时返回 `AlreadyExists`，原句柄保持不变。
    pub fn register_handle(&mut self, handle: H) -> Result<(), ResourceError> {
        if self.contains(handle.handle_name()) {
            return Err(ResourceError::AlreadyExists {
                name: handle.handle_name().to_string(),
                interface: self.interface,
            });
        }
        self.handles.push(handle);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handles.iter().any(|h| h.handle_name() == name)
    }

    /// 按名称获取句柄（克隆）
    pub fn get_handle(&self, name: &str) -> Option<H> {
        self.handles.iter().find(|h| h.handle_name() == name).cloned()
    }

    /// 已注册名称（注册顺序）
    pub fn names(&self) -> Vec<&str> {
        self.handles.iter().map(|h| h.handle_name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &H> {
        self.handles.iter()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

/// 硬件层对外暴露的全部接口组
#[derive(Debug, Clone)]
pub struct HardwareInterfaces {
    pub joint_state: HandleRegistry<JointStateHandle>,
    pub position: HandleRegistry<JointHandle>,
    pub velocity: HandleRegistry<JointHandle>,
    pub effort: HandleRegistry<JointHandle>,
    pub force_torque: HandleRegistry<ForceTorqueSensorHandle>,
    pub imu: HandleRegistry<ImuSensorHandle>,
}

impl HardwareInterfaces {
    /// 创建六个空接口组
    pub fn new() -> Self {
        Self {
            joint_state: HandleRegistry::new(ResourceKind::JointState.interface_name()),
            position: HandleRegistry::new(ResourceKind::PositionJoint.interface_name()),
            velocity: HandleRegistry::new(ResourceKind::VelocityJoint.interface_name()),
            effort: HandleRegistry::new(ResourceKind::EffortJoint.interface_name()),
            force_torque: HandleRegistry::new(FORCE_TORQUE_SENSOR_INTERFACE),
            imu: HandleRegistry::new(IMU_SENSOR_INTERFACE),
        }
    }

    /// 命令接口组（`JointState` 返回 `None`）
    pub fn command_group(&self, kind: ResourceKind) -> Option<&HandleRegistry<JointHandle>> {
        match kind {
            ResourceKind::JointState => None,
            ResourceKind::PositionJoint => Some(&self.position),
            ResourceKind::VelocityJoint => Some(&self.velocity),
            ResourceKind::EffortJoint => Some(&self.effort),
        }
    }

    pub fn command_group_mut(
        &mut self,
        kind: ResourceKind,
    ) -> Option<&mut HandleRegistry<JointHandle>> {
        match kind {
            ResourceKind::JointState => None,
            ResourceKind::PositionJoint => Some(&mut self.position),
            ResourceKind::VelocityJoint => Some(&mut self.velocity),
            ResourceKind::EffortJoint => Some(&mut self.effort),
        }
    }

    /// 某关节在某变体接口组中是否已有句柄
    pub fn has_resource(&self, joint: &str, kind: ResourceKind) -> bool {
        match self.command_group(kind) {
            Some(group) => group.contains(joint),
            None => self.joint_state.contains(joint),
        }
    }

    /// 全部接口组名称
    pub fn interface_names(&self) -> [&'static str; 6] {
        [
            self.joint_state.interface(),
            self.position.interface(),
            self.velocity.interface(),
            self.effort.interface(),
            self.force_torque.interface(),
            self.imu.interface(),
        ]
    }
}

impl Default for HardwareInterfaces {
    fn default() -> Self {
        Self::new()
    }
}
