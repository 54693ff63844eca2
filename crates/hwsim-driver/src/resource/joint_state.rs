//! 只读关节状态资源

use super::{JointBinding, ResourceContext};
use hwsim_interface::{JointInfo, ResourceError, ResourceKind};
use std::time::Duration;

/// 关节状态资源：只发布位置/速度/力矩，不接受命令
#[derive(Debug)]
pub struct JointStateResource {
    pub(super) binding: JointBinding,
}

impl JointStateResource {
    /// 绑定关节并注册到关节状态接口组
    pub fn init(joint: &JointInfo, ctx: &mut ResourceContext<'_>) -> Result<Self, ResourceError> {
        let binding = JointBinding::bind(joint, ResourceKind::JointState, ctx)?;
        ctx.interfaces
            .joint_state
            .register_handle(binding.state_handle())?;
        Ok(Self { binding })
    }

    pub fn read(&self, _time: Duration, _period: Duration, _e_stop_active: bool) {
        self.binding.read_state();
    }

    /// 只读资源，不下发任何命令
    pub fn write(&self, _time: Duration, _period: Duration, _e_stop_active: bool) {}
}
