//! 速度命令资源

use super::{JointBinding, ResourceContext};
use hwsim_interface::{JointHandle, JointInfo, ResourceError, ResourceKind};
use std::time::Duration;

/// 速度命令资源，急停时下发零速度
#[derive(Debug)]
pub struct VelocityJoint {
    pub(super) binding: JointBinding,
}

impl VelocityJoint {
    pub fn init(joint: &JointInfo, ctx: &mut ResourceContext<'_>) -> Result<Self, ResourceError> {
        let binding = JointBinding::bind(joint, ResourceKind::VelocityJoint, ctx)?;
        let handle = JointHandle::new(binding.state_handle(), ResourceKind::VelocityJoint)?;
        ctx.interfaces.velocity.register_handle(handle)?;
        Ok(Self { binding })
    }

    pub fn read(&self, _time: Duration, _period: Duration, _e_stop_active: bool) {
        self.binding.read_state();
    }

    pub fn write(&self, _time: Duration, _period: Duration, e_stop_active: bool) {
        let binding = &self.binding;
        let velocity = if e_stop_active {
            0.0
        } else {
            binding
                .limits
                .clamp_velocity(binding.data.velocity_command.load())
        };
        binding.joint.set_velocity(velocity);
    }
}
