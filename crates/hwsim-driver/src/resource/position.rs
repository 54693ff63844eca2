//! 位置命令资源

use super::{JointBinding, ResourceContext};
use hwsim_interface::{AtomicF64, JointHandle, JointInfo, ResourceError, ResourceKind};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

/// 位置命令资源
///
/// 急停期间保持急停触发时刻读到的位置，而不是每个周期重新采样，
/// 避免关节在重力作用下逐步下垂。急停解除后恢复下发命令缓冲区。
#[derive(Debug)]
pub struct PositionJoint {
    pub(super) binding: JointBinding,
    hold_position: AtomicF64,
    holding: AtomicBool,
}

impl PositionJoint {
    /// 绑定关节并注册到位置接口组
    pub fn init(joint: &JointInfo, ctx: &mut ResourceContext<'_>) -> Result<Self, ResourceError> {
        let binding = JointBinding::bind(joint, ResourceKind::PositionJoint, ctx)?;
        let handle = JointHandle::new(binding.state_handle(), ResourceKind::PositionJoint)?;
        ctx.interfaces.position.register_handle(handle)?;
        Ok(Self {
            binding,
            hold_position: AtomicF64::default(),
            holding: AtomicBool::new(false),
        })
    }

    /// 读取状态；急停未激活时解除保持锁存
    ///
    /// `read` 对所有资源每周期调用，与是否为活动写入者无关。
    pub fn read(&self, _time: Duration, _period: Duration, e_stop_active: bool) {
        if !e_stop_active {
            self.holding.store(false, Ordering::Release);
        }
        self.binding.read_state();
    }

    pub fn write(&self, _time: Duration, _period: Duration, e_stop_active: bool) {
        let binding = &self.binding;
        if e_stop_active {
            if !self.holding.swap(true, Ordering::AcqRel) {
                let hold = binding.data.position.load();
                self.hold_position.store(hold);
                debug!("Joint '{}' holding position {} (e-stop)", binding.name, hold);
            }
            binding.joint.set_position(self.hold_position.load());
        } else {
            self.holding.store(false, Ordering::Release);
            let command = binding.data.position_command.load();
            binding
                .joint
                .set_position(binding.limits.clamp_position(command));
        }
    }
}
