//! 活动写入集合与关节模式切换
//!
//! 活动写入集合是可写资源的子集，`write` 周期只对集合内的资源下发命令。
//!
//! # 初始集合
//!
//! - 模式切换启用：每个关节一个写入者，取该关节第一个声明的可写变体
//! - 模式切换禁用：全部可写资源，之后不再变化
//!
//! # 切换规则
//!
//! 1. 移除停止控制器声明的资源
//! 2. 对每个启动控制器声明的资源：移除同一关节上其他模式的写入者，再加入该资源
//!
//! 同一次切换中，启动的控制器对同一关节声明两种不同模式视为冲突。
//! 只读接口（关节状态、传感器）的声明不影响写入集合。

use crate::error::SwitchError;
use crate::resource::Resource;
use hwsim_interface::ResourceKind;
use parking_lot::{Mutex, MutexGuard};
use smallvec::SmallVec;
use std::collections::BTreeSet;

/// 写入者索引列表（指向资源列表）
///
/// 栈上预留 16 个位置，常见机器人关节数量下 `write` 周期无堆分配。
pub type WriterSet = SmallVec<[usize; 16]>;

/// 控制器在某个接口上声明的资源
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InterfaceResources {
    /// 接口类型（简写或全限定名）
    pub hardware_interface: String,
    /// 关节名集合
    pub resources: BTreeSet<String>,
}

impl InterfaceResources {
    pub fn new<I, S>(hardware_interface: impl Into<String>, resources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hardware_interface: hardware_interface.into(),
            resources: resources.into_iter().map(Into::into).collect(),
        }
    }
}

/// 控制器描述（只包含模式切换需要的信息）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ControllerInfo {
    pub name: String,
    pub claimed_resources: Vec<InterfaceResources>,
}

impl ControllerInfo {
    pub fn new(name: impl Into<String>, claimed_resources: Vec<InterfaceResources>) -> Self {
        Self {
            name: name.into(),
            claimed_resources,
        }
    }
}

/// 受互斥锁保护的活动写入集合
///
/// `write` 周期和所有变更操作持有同一把锁。
#[derive(Debug, Default)]
pub(crate) struct ActiveWriters {
    inner: Mutex<WriterSet>,
}

impl ActiveWriters {
    pub(crate) fn new(initial: WriterSet) -> Self {
        Self {
            inner: Mutex::new(initial),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, WriterSet> {
        self.inner.lock()
    }
}

/// 计算初始写入集合
pub(crate) fn initial_writers(resources: &[Resource], mode_switch_enabled: bool) -> WriterSet {
    let mut writers = WriterSet::new();
    for (idx, resource) in resources.iter().enumerate() {
        if !resource.is_writable() {
            continue;
        }
        let joint_taken = writers
            .iter()
            .any(|&other| resources[other].joint_name() == resource.joint_name());
        if mode_switch_enabled && joint_taken {
            continue;
        }
        writers.push(idx);
    }
    writers
}

/// 查找 (关节, 变体) 对应的可写资源索引
pub(crate) fn find_writer(
    resources: &[Resource],
    joint: &str,
    kind: ResourceKind,
) -> Option<usize> {
    if !kind.is_writable() {
        return None;
    }
    resources
        .iter()
        .position(|r| r.kind() == kind && r.joint_name() == joint)
}

/// 把控制器声明解析为资源索引
fn resolve_claims(
    resources: &[Resource],
    controllers: &[ControllerInfo],
) -> Result<Vec<usize>, SwitchError> {
    let mut indices = Vec::new();
    for controller in controllers {
        for claim in &controller.claimed_resources {
            let kind = match ResourceKind::from_interface_type(&claim.hardware_interface) {
                Some(kind) if kind.is_writable() => kind,
                _ => continue,
            };
            for joint in &claim.resources {
                let idx = find_writer(resources, joint, kind).ok_or_else(|| {
                    SwitchError::UnknownResource {
                        joint: joint.clone(),
                        interface: claim.hardware_interface.clone(),
                    }
                })?;
                if !indices.contains(&idx) {
                    indices.push(idx);
                }
            }
        }
    }
    Ok(indices)
}

/// 计算切换后的写入集合（不修改 `current`）
pub(crate) fn plan_switch(
    resources: &[Resource],
    current: &[usize],
    start: &[ControllerInfo],
    stop: &[ControllerInfo],
) -> Result<WriterSet, SwitchError> {
    let stopped = resolve_claims(resources, stop)?;
    let started = resolve_claims(resources, start)?;

    for (i, &a) in started.iter().enumerate() {
        let joint = resources[a].joint_name();
        if started[i + 1..]
            .iter()
            .any(|&b| resources[b].joint_name() == joint)
        {
            return Err(SwitchError::JointModeConflict {
                joint: joint.to_string(),
            });
        }
    }

    let mut next: WriterSet = current
        .iter()
        .copied()
        .filter(|idx| !stopped.contains(idx))
        .collect();
    for &idx in &started {
        let joint = resources[idx].joint_name();
        next.retain(|other| resources[*other].joint_name() != joint);
        next.push(idx);
    }
    next.sort_unstable();
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::build_resources;
    use crate::memory::MemorySim;
    use crate::resource::ResourceContext;
    use hwsim_interface::{JointInfo, TransmissionInfo};

    /// j1: position + velocity, j2: effort + state, j3: state
    fn resources() -> Vec<Resource> {
        let sim = MemorySim::new()
            .with_joint("j1")
            .with_joint("j2")
            .with_joint("j3");
        let mut ctx = ResourceContext::new(&sim);
        let trs = vec![TransmissionInfo::new(
            "tr",
            vec![
                JointInfo::new("j1", ["position", "velocity"]),
                JointInfo::new("j2", ["effort", "state"]),
                JointInfo::new("j3", ["state"]),
            ],
        )];
        build_resources(&trs, &mut ctx).unwrap()
    }

    fn labels(resources: &[Resource], set: &[usize]) -> Vec<(String, ResourceKind)> {
        set.iter()
            .map(|&i| (resources[i].joint_name().to_string(), resources[i].kind()))
            .collect()
    }

    fn controller(iface: &str, joints: &[&str]) -> ControllerInfo {
        ControllerInfo::new(
            "ctrl",
            vec![InterfaceResources::new(iface, joints.iter().copied())],
        )
    }

    #[test]
    fn test_initial_writers_mode_switch_enabled() {
        let res = resources();
        let set = initial_writers(&res, true);
        assert_eq!(
            labels(&res, &set),
            vec![
                ("j1".to_string(), ResourceKind::PositionJoint),
                ("j2".to_string(), ResourceKind::EffortJoint),
            ]
        );
    }

    #[test]
    fn test_initial_writers_mode_switch_disabled() {
        let res = resources();
        let set = initial_writers(&res, false);
        assert_eq!(set.len(), 3);
        assert!(set.iter().all(|&i| res[i].is_writable()));
    }

    #[test]
    fn test_switch_joint_mode() {
        let res = resources();
        let current = initial_writers(&res, true);

        let next = plan_switch(
            &res,
            &current,
            &[controller("velocity", &["j1"])],
            &[controller("position", &["j1"])],
        )
        .unwrap();
        assert_eq!(
            labels(&res, &next),
            vec![
                ("j1".to_string(), ResourceKind::VelocityJoint),
                ("j2".to_string(), ResourceKind::EffortJoint),
            ]
        );
    }

    #[test]
    fn test_start_replaces_other_mode_without_stop() {
        let res = resources();
        let current = initial_writers(&res, true);
        let next = plan_switch(&res, &current, &[controller("velocity", &["j1"])], &[]).unwrap();
        assert_eq!(next.len(), 2);
        assert!(
            labels(&res, &next).contains(&("j1".to_string(), ResourceKind::VelocityJoint))
        );
    }

    #[test]
    fn test_stop_only_removes_writer() {
        let res = resources();
        let current = initial_writers(&res, true);
        let next = plan_switch(
            &res,
            &current,
            &[],
            &[controller("hardware_interface/EffortJointInterface", &["j2"])],
        )
        .unwrap();
        assert_eq!(
            labels(&res, &next),
            vec![("j1".to_string(), ResourceKind::PositionJoint)]
        );
    }

    #[test]
    fn test_unknown_resource() {
        let res = resources();
        let current = initial_writers(&res, true);
        let err = plan_switch(&res, &current, &[controller("effort", &["j1"])], &[]).unwrap_err();
        assert_eq!(
            err,
            SwitchError::UnknownResource {
                joint: "j1".to_string(),
                interface: "effort".to_string(),
            }
        );
    }

    #[test]
    fn test_conflicting_start_claims() {
        let res = resources();
        let current = initial_writers(&res, true);
        let start = [
            controller("position", &["j1"]),
            controller("velocity", &["j1"]),
        ];
        let err = plan_switch(&res, &current, &start, &[]).unwrap_err();
        assert_eq!(
            err,
            SwitchError::JointModeConflict {
                joint: "j1".to_string()
            }
        );
    }

    #[test]
    fn test_read_only_claims_ignored() {
        let res = resources();
        let current = initial_writers(&res, true);
        let start = [ControllerInfo::new(
            "state_publisher",
            vec![
                InterfaceResources::new("state", ["j1", "j2", "j3"]),
                InterfaceResources::new("hardware_interface/ImuSensorInterface", ["base_imu"]),
            ],
        )];
        let next = plan_switch(&res, &current, &start, &[]).unwrap();
        assert_eq!(next, current);
    }

    #[test]
    fn test_find_writer() {
        let res = resources();
        assert!(find_writer(&res, "j1", ResourceKind::VelocityJoint).is_some());
        assert!(find_writer(&res, "j3", ResourceKind::JointState).is_none());
        assert!(find_writer(&res, "j9", ResourceKind::PositionJoint).is_none());
    }
}
