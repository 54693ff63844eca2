//! 内存仿真后端
//!
//! 无物理引擎依赖的 [`SimContext`] 实现：
//! - 测试中注入关节状态 / 传感器数据，并检查硬件层下发的命令
//! - CLI 中配合 [`MemorySim::step`] 做一阶积分，演示完整的读写周期
//!
//! 关节动力学非常粗糙（单位惯量、无阻尼），只用于演示和测试。

use crate::sim::{JointWrench, SimContext, SimImu, SimJoint};
use hwsim_interface::ImuSample;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// 最近一次下发到关节的命令
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum JointCommand {
    Position(f64),
    Velocity(f64),
    Effort(f64),
}

#[derive(Debug, Clone, Copy, Default)]
struct JointSimState {
    position: f64,
    velocity: f64,
    effort: f64,
    wrench: JointWrench,
    last_command: Option<JointCommand>,
}

/// 内存关节
#[derive(Debug, Default)]
pub struct MemoryJoint {
    state: Mutex<JointSimState>,
    commands: AtomicU64,
}

impl MemoryJoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注入关节状态
    pub fn set_state(&self, position: f64, velocity: f64, effort: f64) {
        let mut state = self.state.lock();
        state.position = position;
        state.velocity = velocity;
        state.effort = effort;
    }

    /// 注入约束力
    pub fn set_wrench(&self, wrench: JointWrench) {
        self.state.lock().wrench = wrench;
    }

    pub fn last_command(&self) -> Option<JointCommand> {
        self.state.lock().last_command
    }

    /// 最近一次位置命令（最近一次命令不是位置命令时返回 `None`）
    pub fn commanded_position(&self) -> Option<f64> {
        match self.last_command() {
            Some(JointCommand::Position(v)) => Some(v),
            _ => None,
        }
    }

    pub fn commanded_velocity(&self) -> Option<f64> {
        match self.last_command() {
            Some(JointCommand::Velocity(v)) => Some(v),
            _ => None,
        }
    }

    pub fn commanded_effort(&self) -> Option<f64> {
        match self.last_command() {
            Some(JointCommand::Effort(v)) => Some(v),
            _ => None,
        }
    }

    /// 累计收到的命令次数
    pub fn command_count(&self) -> u64 {
        self.commands.load(Ordering::Relaxed)
    }

    /// 按最近一次命令积分一步
    pub fn step(&self, dt: Duration) {
        let dt = dt.as_secs_f64();
        if dt <= 0.0 {
            return;
        }
        let mut state = self.state.lock();
        match state.last_command {
            Some(JointCommand::Position(target)) => {
                state.velocity = (target - state.position) / dt;
                state.position = target;
            },
            Some(JointCommand::Velocity(velocity)) => {
                state.velocity = velocity;
                state.position += velocity * dt;
            },
            Some(JointCommand::Effort(effort)) => {
                state.effort = effort;
                state.velocity += effort * dt;
                state.position += state.velocity * dt;
            },
            None => {},
        }
    }

    fn command(&self, command: JointCommand) {
        self.state.lock().last_command = Some(command);
        self.commands.fetch_add(1, Ordering::Relaxed);
    }
}

impl SimJoint for MemoryJoint {
    fn position(&self) -> f64 {
        self.state.lock().position
    }

    fn velocity(&self) -> f64 {
        self.state.lock().velocity
    }

    fn effort(&self) -> f64 {
        self.state.lock().effort
    }

    fn set_position(&self, position: f64) {
        self.command(JointCommand::Position(position));
    }

    fn set_velocity(&self, velocity: f64) {
        self.command(JointCommand::Velocity(velocity));
    }

    fn set_effort(&self, effort: f64) {
        self.command(JointCommand::Effort(effort));
    }

    fn force_torque(&self) -> JointWrench {
        self.state.lock().wrench
    }
}

/// 内存 IMU
#[derive(Debug, Default)]
pub struct MemoryImu {
    sample: Mutex<ImuSample>,
}

impl MemoryImu {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注入 IMU 数据
    pub fn set_sample(&self, sample: ImuSample) {
        *self.sample.lock() = sample;
    }
}

impl SimImu for MemoryImu {
    fn orientation(&self) -> [f64; 4] {
        self.sample.lock().orientation
    }

    fn angular_velocity(&self) -> [f64; 3] {
        self.sample.lock().angular_velocity
    }

    fn linear_acceleration(&self) -> [f64; 3] {
        self.sample.lock().linear_acceleration
    }
}

/// 内存仿真上下文
#[derive(Debug, Default)]
pub struct MemorySim {
    joints: BTreeMap<String, Arc<MemoryJoint>>,
    imus: BTreeMap<String, Arc<MemoryImu>>,
}

impl MemorySim {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加关节（链式）
    pub fn with_joint(mut self, name: impl Into<String>) -> Self {
        self.add_joint(name);
        self
    }

    /// 添加 IMU（链式）
    pub fn with_imu(mut self, name: impl Into<String>) -> Self {
        self.add_imu(name);
        self
    }

    /// 添加关节并返回其句柄；同名关节已存在时返回已有句柄
    pub fn add_joint(&mut self, name: impl Into<String>) -> Arc<MemoryJoint> {
        self.joints.entry(name.into()).or_default().clone()
    }

    pub fn add_imu(&mut self, name: impl Into<String>) -> Arc<MemoryImu> {
        self.imus.entry(name.into()).or_default().clone()
    }

    pub fn joint_handle(&self, name: &str) -> Option<Arc<MemoryJoint>> {
        self.joints.get(name).cloned()
    }

    pub fn imu_handle(&self, name: &str) -> Option<Arc<MemoryImu>> {
        self.imus.get(name).cloned()
    }

    pub fn joint_names(&self) -> impl Iterator<Item = &str> {
        self.joints.keys().map(String::as_str)
    }

    /// 所有关节积分一步
    pub fn step(&self, dt: Duration) {
        for joint in self.joints.values() {
            joint.step(dt);
        }
    }
}

impl SimContext for MemorySim {
    fn joint(&self, name: &str) -> Option<Arc<dyn SimJoint>> {
        self.joints
            .get(name)
            .map(|joint| joint.clone() as Arc<dyn SimJoint>)
    }

    fn imu(&self, name: &str) -> Option<Arc<dyn SimImu>> {
        self.imus.get(name).map(|imu| imu.clone() as Arc<dyn SimImu>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let sim = MemorySim::new().with_joint("j1").with_imu("imu_sensor");
        assert!(sim.joint("j1").is_some());
        assert!(sim.joint("j2").is_none());
        assert!(sim.imu("imu_sensor").is_some());
        assert!(sim.imu("other").is_none());
    }

    #[test]
    fn test_add_joint_is_idempotent() {
        let mut sim = MemorySim::new();
        let a = sim.add_joint("j1");
        let b = sim.add_joint("j1");
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(sim.joint_names().count(), 1);
    }

    #[test]
    fn test_getters_do_not_command() {
        let joint = MemoryJoint::new();
        joint.set_state(1.0, 2.0, 3.0);
        assert_eq!(joint.position(), 1.0);
        assert_eq!(joint.velocity(), 2.0);
        assert_eq!(joint.effort(), 3.0);
        assert_eq!(joint.command_count(), 0);
        assert_eq!(joint.last_command(), None);
    }

    #[test]
    fn test_commands_recorded() {
        let joint = MemoryJoint::new();
        joint.set_velocity(0.5);
        assert_eq!(joint.commanded_velocity(), Some(0.5));
        assert_eq!(joint.commanded_position(), None);
        joint.set_effort(-1.0);
        assert_eq!(joint.commanded_effort(), Some(-1.0));
        assert_eq!(joint.command_count(), 2);
    }

    #[test]
    fn test_step_integrates() {
        let joint = MemoryJoint::new();
        joint.set_velocity(2.0);
        joint.step(Duration::from_millis(500));
        assert!((joint.position() - 1.0).abs() < 1e-12);

        joint.set_position(3.0);
        joint.step(Duration::from_secs(1));
        assert_eq!(joint.position(), 3.0);
        assert!((joint.velocity() - 2.0).abs() < 1e-12);

        // dt = 0 不改变状态
        joint.set_velocity(100.0);
        joint.step(Duration::ZERO);
        assert_eq!(joint.position(), 3.0);
    }
}
