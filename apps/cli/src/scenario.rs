//! 场景文件
//!
//! 一个 TOML 文件描述一次仿真运行：传动声明、仿真初始状态、硬件层参数和命令目标。
//!
//! ```toml
//! robot_namespace = "arm"
//!
//! [[transmissions]]
//! name = "shoulder_trans"
//! [[transmissions.joints]]
//! name = "shoulder"
//! hardware_interfaces = ["position", "state"]
//! limits = { min_position = -1.57, max_position = 1.57 }
//!
//! [sim]
//! imus = ["imu_sensor"]
//! [[sim.joints]]
//! name = "shoulder"
//! position = 0.1
//!
//! [params.imu.base_imu]
//! frame = "base_link"
//!
//! [[commands]]
//! joint = "shoulder"
//! interface = "position"
//! value = 0.5
//! ```

use anyhow::{Context, Result, bail};
use hwsim_driver::{MemorySim, RobotHwSim, TomlParams};
use hwsim_interface::{ResourceKind, TransmissionInfo};
use serde::Deserialize;
use std::fs;
use std::path::Path;

fn default_namespace() -> String {
    "robot".to_string()
}

/// 仿真运行场景
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// 机器人命名空间
    #[serde(default = "default_namespace")]
    pub robot_namespace: String,

    /// 传动声明
    #[serde(default)]
    pub transmissions: Vec<TransmissionInfo>,

    /// 仿真初始状态
    #[serde(default)]
    pub sim: SimSetup,

    /// 硬件层参数（原样交给 [`TomlParams`]）
    #[serde(default)]
    pub params: toml::Table,

    /// 启动时写入命令缓冲区的目标
    #[serde(default)]
    pub commands: Vec<CommandTarget>,
}

/// 仿真初始状态
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimSetup {
    #[serde(default)]
    pub joints: Vec<SimJointSetup>,

    /// IMU 数据源名称
    #[serde(default)]
    pub imus: Vec<String>,
}

/// 仿真关节初始状态
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimJointSetup {
    pub name: String,
    #[serde(default)]
    pub position: f64,
    #[serde(default)]
    pub velocity: f64,
    #[serde(default)]
    pub effort: f64,
}

/// 命令目标
#[derive(Debug, Clone, Deserialize)]
pub struct CommandTarget {
    pub joint: String,
    /// 接口类型（简写或全限定名）
    pub interface: String,
    pub value: f64,
}

impl Scenario {
    /// 加载场景文件
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid scenario file {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 构造内存仿真
    pub fn build_sim(&self) -> MemorySim {
        let mut sim = MemorySim::new();
        for joint in &self.sim.joints {
            sim.add_joint(joint.name.as_str())
                .set_state(joint.position, joint.velocity, joint.effort);
        }
        for imu in &self.sim.imus {
            sim.add_imu(imu.as_str());
        }
        sim
    }

    pub fn params(&self) -> TomlParams {
        TomlParams::new(self.params.clone())
    }

    /// 初始化硬件层
    pub fn init_hardware(&self, sim: &MemorySim) -> Result<RobotHwSim> {
        RobotHwSim::init(&self.robot_namespace, &self.params(), sim, &self.transmissions)
            .with_context(|| {
                format!(
                    "Failed to initialize hardware for robot '{}'",
                    self.robot_namespace
                )
            })
    }

    /// 把命令目标写入命令缓冲区
    ///
    /// 模式切换启用时，同时把目标接口设为该关节的活动写入者。
    pub fn apply_commands(&self, hw: &RobotHwSim) -> Result<()> {
        for target in &self.commands {
            let Some(kind) = ResourceKind::from_interface_type(&target.interface) else {
                bail!(
                    "Unknown interface '{}' for joint '{}'",
                    target.interface,
                    target.joint
                );
            };
            let handle = hw
                .interfaces()
                .command_group(kind)
                .and_then(|group| group.get_handle(&target.joint))
                .with_context(|| {
                    format!(
                        "Joint '{}' has no writable '{}' resource",
                        target.joint, target.interface
                    )
                })?;
            handle.set_command(target.value);

            if hw.mode_switch_enabled() && !hw.is_writer_active(&target.joint, kind) {
                hw.set_writer_active(&target.joint, kind, true)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    const DEMO: &str = include_str!("../scenarios/two_joint_arm.toml");

    #[test]
    fn test_parse_demo_scenario() {
        let scenario = Scenario::parse(DEMO).unwrap();
        assert_eq!(scenario.robot_namespace, "two_joint_arm");
        assert_eq!(scenario.transmissions.len(), 2);
        assert_eq!(scenario.sim.joints.len(), 2);
        assert!(!scenario.commands.is_empty());
    }

    #[test]
    fn test_demo_scenario_initializes() {
        let scenario = Scenario::parse(DEMO).unwrap();
        let sim = scenario.build_sim();
        let hw = scenario.init_hardware(&sim).unwrap();
        scenario.apply_commands(&hw).unwrap();
        assert_eq!(hw.interfaces().force_torque.len(), 1);
        assert_eq!(hw.interfaces().imu.len(), 1);
    }

    #[test]
    fn test_defaults() {
        let scenario = Scenario::parse("").unwrap();
        assert_eq!(scenario.robot_namespace, "robot");
        assert!(scenario.transmissions.is_empty());
        assert!(scenario.params.is_empty());
    }

    #[test]
    fn test_command_activates_writer() {
        let scenario = Scenario::parse(
            r#"
[[transmissions]]
name = "tr"
[[transmissions.joints]]
name = "j1"
hardware_interfaces = ["position", "velocity"]

[[sim.joints]]
name = "j1"

[[commands]]
joint = "j1"
interface = "velocity"
value = 0.3
"#,
        )
        .unwrap();
        let sim = scenario.build_sim();
        let hw = scenario.init_hardware(&sim).unwrap();
        scenario.apply_commands(&hw).unwrap();

        assert!(hw.is_writer_active("j1", ResourceKind::VelocityJoint));
        hw.write(Duration::ZERO, Duration::from_millis(10));
        assert_eq!(sim.joint_handle("j1").unwrap().commanded_velocity(), Some(0.3));
    }

    #[test]
    fn test_unknown_command_interface() {
        let scenario = Scenario::parse(
            "[[commands]]\njoint = \"j1\"\ninterface = \"torque\"\nvalue = 1.0\n",
        )
        .unwrap();
        let sim = scenario.build_sim();
        let hw = scenario.init_hardware(&sim).unwrap();
        assert!(scenario.apply_commands(&hw).is_err());
    }

    #[test]
    fn test_init_failure_has_context() {
        let scenario = Scenario::parse(
            "[[transmissions]]\nname = \"tr\"\n[[transmissions.joints]]\nname = \"ghost\"\nhardware_interfaces = [\"effort\"]\n",
        )
        .unwrap();
        let sim = scenario.build_sim();
        let err = scenario.init_hardware(&sim).unwrap_err();
        assert!(format!("{:#}", err).contains("ghost"));
    }

    #[test]
    fn test_nan_limit_fails_init() {
        let scenario = Scenario::parse(
            r#"
[[transmissions]]
name = "tr"
[[transmissions.joints]]
name = "j1"
hardware_interfaces = ["velocity"]
limits = { max_velocity = nan }

[[sim.joints]]
name = "j1"
"#,
        )
        .unwrap();
        let sim = scenario.build_sim();
        let err = scenario.init_hardware(&sim).unwrap_err();
        assert!(format!("{:#}", err).contains("max_velocity"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DEMO.as_bytes()).unwrap();
        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.robot_namespace, "two_joint_arm");

        assert!(Scenario::load(Path::new("/nonexistent/scenario.toml")).is_err());
    }
}
