//! 力/力矩命令资源

use super::{JointBinding, ResourceContext};
use hwsim_interface::{JointHandle, JointInfo, ResourceError, ResourceKind};
use std::time::Duration;

/// 力矩命令资源，急停时下发零力矩
#[derive(Debug)]
pub struct EffortJoint {
    pub(super) binding: JointBinding,
}

impl EffortJoint {
    pub fn init(joint: &JointInfo, ctx: &mut ResourceContext<'_>) -> Result<Self, ResourceError> {
        let binding = JointBinding::bind(joint, ResourceKind::EffortJoint, ctx)?;
        let handle = JointHandle::new(binding.state_handle(), ResourceKind::EffortJoint)?;
        ctx.interfaces.effort.register_handle(handle)?;
        Ok(Self { binding })
    }

    pub fn read(&self, _time: Duration, _period: Duration, _e_stop_active: bool) {
        self.binding.read_state();
    }

    pub fn write(&self, _time: Duration, _period: Duration, e_stop_active: bool) {
        let binding = &self.binding;
        let effort = if e_stop_active {
            0.0
        } else {
            binding
                .limits
                .clamp_effort(binding.data.effort_command.load())
        };
        binding.joint.set_effort(effort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::test_util::sim_with;
    use hwsim_interface::JointLimits;

    const PERIOD: Duration = Duration::from_millis(1);

    #[test]
    fn test_write_and_e_stop() {
        let (sim, joint) = sim_with("elbow");
        let mut ctx = ResourceContext::new(&sim);
        let info = JointInfo::new("elbow", ["effort"]).with_limits(JointLimits {
            max_effort: Some(20.0),
            ..Default::default()
        });
        let res = EffortJoint::init(&info, &mut ctx).unwrap();
        let handle = ctx.interfaces().effort.get_handle("elbow").unwrap();

        handle.set_command(12.5);
        res.write(Duration::ZERO, PERIOD, false);
        assert_eq!(joint.commanded_effort(), Some(12.5));

        handle.set_command(50.0);
        res.write(Duration::ZERO, PERIOD, false);
        assert_eq!(joint.commanded_effort(), Some(20.0));

        res.write(Duration::ZERO, PERIOD, true);
        assert_eq!(joint.commanded_effort(), Some(0.0));
    }

    #[test]
    fn test_read_updates_handle_state() {
        let (sim, joint) = sim_with("elbow");
        let mut ctx = ResourceContext::new(&sim);
        let res = EffortJoint::init(&JointInfo::new("elbow", ["effort"]), &mut ctx).unwrap();
        joint.set_state(1.0, 0.5, -3.0);

        res.read(Duration::ZERO, PERIOD, false);

        let handle = ctx.interfaces().effort.get_handle("elbow").unwrap();
        assert_eq!(handle.position(), 1.0);
        assert_eq!(handle.effort(), -3.0);
    }
}
