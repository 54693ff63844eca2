//! 资源工厂
//!
//! 遍历传动描述，为每个 (关节, 声明的接口类型) 构造资源：
//!
//! 1. 接口类型字符串查表映射到 [`ResourceKind`]，未知类型跳过
//! 2. 调用 [`Resource::init`]
//!    - `AlreadyExists`：同一关节已在该接口组注册（多个传动声明了同一接口），忽略
//!    - 其他错误：整个硬件层初始化失败
//! 3. 成功的资源按声明顺序追加到结果列表

use crate::error::InitError;
use crate::resource::{Resource, ResourceContext};
use hwsim_interface::{ResourceKind, TransmissionInfo};
use tracing::{debug, error};

/// 按传动描述构造全部关节资源
///
/// # 错误
///
/// 任何非重复注册的构造失败都会立即中止并返回 [`InitError::Resource`]。
pub fn build_resources(
    transmissions: &[TransmissionInfo],
    ctx: &mut ResourceContext<'_>,
) -> Result<Vec<Resource>, InitError> {
    let mut resources = Vec::new();

    for transmission in transmissions {
        for joint in &transmission.joints {
            for iface_type in &joint.hardware_interfaces {
                let Some(kind) = ResourceKind::from_interface_type(iface_type) else {
                    debug!(
                        "Ignoring unknown hardware interface '{}' declared for joint '{}'",
                        iface_type, joint.name
                    );
                    continue;
                };

                match Resource::init(kind, joint, ctx) {
                    Ok(resource) => {
                        debug!(
                            "Registered joint '{}' in hardware interface '{}'",
                            joint.name, kind
                        );
                        resources.push(resource);
                    },
                    Err(e) if e.is_already_exists() => {
                        debug!(
                            "Joint '{}' already registered in '{}' (transmission '{}')",
                            joint.name, kind, transmission.name
                        );
                    },
                    Err(e) => {
                        error!(
                            "Could not add resource '{}' to hardware interface '{}': {}",
                            joint.name, kind, e
                        );
                        return Err(InitError::Resource {
                            joint: joint.name.clone(),
                            interface: kind.interface_name(),
                            source: e,
                        });
                    },
                }
            }
        }
    }

    Ok(resources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySim;
    use hwsim_interface::{JointInfo, ResourceError};
    use proptest::prelude::*;

    fn transmission(joints: Vec<JointInfo>) -> TransmissionInfo {
        TransmissionInfo::new("tr", joints)
    }

    #[test]
    fn test_builds_in_declaration_order() {
        let sim = MemorySim::new().with_joint("j1").with_joint("j2");
        let mut ctx = ResourceContext::new(&sim);
        let trs = vec![transmission(vec![
            JointInfo::new("j2", ["velocity", "state"]),
            JointInfo::new("j1", ["hardware_interface/EffortJointInterface"]),
        ])];

        let resources = build_resources(&trs, &mut ctx).unwrap();
        let order: Vec<_> = resources
            .iter()
            .map(|r| (r.joint_name().to_string(), r.kind()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("j2".to_string(), ResourceKind::VelocityJoint),
                ("j2".to_string(), ResourceKind::JointState),
                ("j1".to_string(), ResourceKind::EffortJoint),
            ]
        );
    }

    #[test]
    fn test_duplicate_declarations_yield_one_resource() {
        let sim = MemorySim::new().with_joint("j1");
        let mut ctx = ResourceContext::new(&sim);
        // 两个传动都声明 j1 的位置接口，且同一关节内也重复声明
        let trs = vec![
            transmission(vec![JointInfo::new("j1", ["position", "position"])]),
            TransmissionInfo::new(
                "tr2",
                vec![JointInfo::new(
                    "j1",
                    ["hardware_interface/PositionJointInterface"],
                )],
            ),
        ];

        let resources = build_resources(&trs, &mut ctx).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(ctx.interfaces().position.len(), 1);
    }

    #[test]
    fn test_missing_joint_aborts() {
        let sim = MemorySim::new().with_joint("j1");
        let mut ctx = ResourceContext::new(&sim);
        let trs = vec![transmission(vec![
            JointInfo::new("j1", ["position"]),
            JointInfo::new("ghost", ["effort"]),
            JointInfo::new("j1", ["state"]),
        ])];

        let err = build_resources(&trs, &mut ctx).unwrap_err();
        match err {
            InitError::Resource {
                joint,
                interface,
                source,
            } => {
                assert_eq!(joint, "ghost");
                assert_eq!(interface, "hardware_interface/EffortJointInterface");
                assert!(matches!(source, ResourceError::JointNotFound { .. }));
            },
            other => panic!("Expected Resource error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_only_joint_is_skipped() {
        let sim = MemorySim::new();
        let mut ctx = ResourceContext::new(&sim);
        // 未知接口类型在查表阶段被跳过，不会去仿真中查找关节
        let trs = vec![transmission(vec![JointInfo::new("ghost", ["torque_sensor"])])];
        let resources = build_resources(&trs, &mut ctx).unwrap();
        assert!(resources.is_empty());
    }

    proptest! {
        /// 未知接口类型字符串不产生资源，也不影响其他合法声明
        #[test]
        fn prop_unknown_interface_types_are_ignored(
            unknown in proptest::collection::vec("[a-z_/]{1,24}", 0..6)
        ) {
            let unknown: Vec<String> = unknown
                .into_iter()
                .filter(|s| ResourceKind::from_interface_type(s).is_none())
                .collect();

            let sim = MemorySim::new().with_joint("j1");
            let mut ctx = ResourceContext::new(&sim);
            let mut declared = unknown.clone();
            declared.push("position".to_string());
            let trs = vec![
                transmission(vec![JointInfo::new("j1", declared)]),
                transmission(vec![JointInfo::new("absent", unknown)]),
            ];

            let resources = build_resources(&trs, &mut ctx).unwrap();
            prop_assert_eq!(resources.len(), 1);
            prop_assert_eq!(resources[0].kind(), ResourceKind::PositionJoint);
        }
    }
}
