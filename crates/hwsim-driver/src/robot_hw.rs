//! 仿真硬件门面
//!
//! [`RobotHwSim`] 拥有全部关节资源、传感器定义、急停标志和活动写入集合。
//!
//! # 周期
//!
//! - `read`：所有资源读取仿真状态，然后刷新所有传感器定义；不加锁
//! - `write`：持有写入集合锁，只对集合内的资源下发命令
//!
//! 模式切换与 `write` 持有同一把锁，可以在另一个线程中调用。

use crate::error::{InitError, SwitchError};
use crate::factory::build_resources;
use crate::metrics::HwMetrics;
use crate::params::ParamSource;
use crate::resource::{Resource, ResourceContext};
use crate::sensor::{ForceTorqueSensorDefinition, ImuSensorDefinition};
use crate::sensor_parser::{parse_force_torque_sensors, parse_imu_sensors};
use crate::sim::SimContext;
use crate::switch::{
    ActiveWriters, ControllerInfo, WriterSet, find_writer, initial_writers, plan_switch,
};
use hwsim_interface::transmission::{FORCE_TORQUE_SENSOR_INTERFACE, IMU_SENSOR_INTERFACE};
use hwsim_interface::{HardwareInterfaces, ResourceKind, TransmissionInfo};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// 关节模式切换开关的参数键（缺省为启用）
pub const MODE_SWITCH_PARAM: &str = "gazebo_ros_control/enable_joint_mode_switching";

/// 仿真机器人硬件层
///
/// 只能通过 [`RobotHwSim::init`] 构造，初始化失败时不存在半初始化的实例。
/// `Send + Sync`，可以放进 `Arc` 在控制线程和切换线程之间共享。
///
/// # 示例
///
/// ```rust
/// use hwsim_driver::{MemorySim, RobotHwSim, TomlParams};
/// use hwsim_interface::{JointInfo, TransmissionInfo};
/// use std::time::Duration;
///
/// let sim = MemorySim::new().with_joint("j1");
/// let trs = vec![TransmissionInfo::new("tr", vec![JointInfo::new("j1", ["velocity"])])];
/// let hw = RobotHwSim::init("robot", &TomlParams::default(), &sim, &trs).unwrap();
///
/// hw.set_emergency_stop(true);
/// hw.write(Duration::ZERO, Duration::from_millis(1));
/// assert_eq!(sim.joint_handle("j1").unwrap().commanded_velocity(), Some(0.0));
/// ```
pub struct RobotHwSim {
    robot_namespace: String,
    interfaces: HardwareInterfaces,
    resources: Vec<Resource>,
    ft_sensors: Vec<ForceTorqueSensorDefinition>,
    imu_sensors: Vec<ImuSensorDefinition>,
    e_stop: AtomicBool,
    mode_switch_enabled: bool,
    active: ActiveWriters,
    metrics: HwMetrics,
}

impl RobotHwSim {
    /// 初始化硬件层
    ///
    /// 依次构造关节资源、解析传感器、注册传感器句柄、读取模式切换开关，
    /// 最后计算初始活动写入集合。
    ///
    /// # 错误
    ///
    /// 任何一步失败都返回 [`InitError`]，已构造的部分全部丢弃。
    pub fn init(
        robot_namespace: &str,
        params: &dyn ParamSource,
        sim: &dyn SimContext,
        transmissions: &[TransmissionInfo],
    ) -> Result<Self, InitError> {
        info!("Loading simulated hardware for robot '{}'", robot_namespace);

        let mut ctx = ResourceContext::new(sim);
        let resources = build_resources(transmissions, &mut ctx)?;
        let mut interfaces = ctx.into_interfaces();

        let ft_sensors = parse_force_torque_sensors(params, sim)?;
        for sensor in &ft_sensors {
            interfaces
                .force_torque
                .register_handle(sensor.handle())
                .map_err(|source| InitError::Resource {
                    joint: sensor.sensor_name.clone(),
                    interface: FORCE_TORQUE_SENSOR_INTERFACE,
                    source,
                })?;
        }

        let imu_sensors = parse_imu_sensors(params, sim)?;
        for sensor in &imu_sensors {
            interfaces
                .imu
                .register_handle(sensor.handle())
                .map_err(|source| InitError::Resource {
                    joint: sensor.sensor_name.clone(),
                    interface: IMU_SENSOR_INTERFACE,
                    source,
                })?;
        }

        let mode_switch_enabled = params.get_bool(MODE_SWITCH_PARAM)?.unwrap_or(true);
        if mode_switch_enabled {
            info!("Joint mode switching is enabled");
        } else {
            info!("Joint mode switching is disabled");
        }

        let active = initial_writers(&resources, mode_switch_enabled);
        info!(
            "Robot '{}' ready: {} resources ({} active writers), {} force-torque sensors, {} imu sensors",
            robot_namespace,
            resources.len(),
            active.len(),
            ft_sensors.len(),
            imu_sensors.len()
        );

        Ok(Self {
            robot_namespace: robot_namespace.to_string(),
            interfaces,
            resources,
            ft_sensors,
            imu_sensors,
            e_stop: AtomicBool::new(false),
            mode_switch_enabled,
            active: ActiveWriters::new(active),
            metrics: HwMetrics::new(),
        })
    }

    /// 仿真 → 缓冲区
    ///
    /// 每个资源、每个传感器定义各刷新一次；不修改仿真。
    pub fn read(&self, time: Duration, period: Duration) {
        let e_stop = self.e_stop.load(Ordering::Acquire);
        for resource in &self.resources {
            resource.read(time, period, e_stop);
        }
        for sensor in &self.ft_sensors {
            sensor.update();
        }
        for sensor in &self.imu_sensors {
            sensor.update();
        }
        self.metrics.read_cycles.fetch_add(1, Ordering::Relaxed);
    }

    /// 缓冲区 → 仿真
    ///
    /// 只有活动写入集合内的资源下发命令；急停时下发安全值。
    pub fn write(&self, time: Duration, period: Duration) {
        let e_stop = self.e_stop.load(Ordering::Acquire);
        let writers = self.active.lock();
        for &idx in writers.iter() {
            self.resources[idx].write(time, period, e_stop);
        }
        let applied = writers.len() as u64;
        drop(writers);

        self.metrics.write_cycles.fetch_add(1, Ordering::Relaxed);
        if e_stop {
            self.metrics.estop_writes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.metrics
                .commands_applied
                .fetch_add(applied, Ordering::Relaxed);
        }
    }

    /// 设置急停标志（下一次 `write` 生效）
    pub fn set_emergency_stop(&self, active: bool) {
        let was_active = self.e_stop.swap(active, Ordering::AcqRel);
        if active && !was_active {
            warn!("Emergency stop engaged on robot '{}'", self.robot_namespace);
        } else if !active && was_active {
            info!("Emergency stop released on robot '{}'", self.robot_namespace);
        }
    }

    pub fn emergency_stop_active(&self) -> bool {
        self.e_stop.load(Ordering::Acquire)
    }

    /// 检查一次控制器切换是否可行（不修改写入集合）
    ///
    /// 模式切换禁用时总是成功。
    ///
    /// # 错误
    ///
    /// - [`SwitchError::UnknownResource`]：声明的 (关节, 接口) 没有可写资源
    /// - [`SwitchError::JointModeConflict`]：启动的控制器对同一关节声明了两种模式
    pub fn prepare_switch(
        &self,
        start: &[ControllerInfo],
        stop: &[ControllerInfo],
    ) -> Result<(), SwitchError> {
        if !self.mode_switch_enabled {
            return Ok(());
        }
        let writers = self.active.lock();
        plan_switch(&self.resources, &writers, start, stop).map(|_| ())
    }

    /// 执行控制器切换：先移除停止的声明，再加入启动的声明
    ///
    /// 模式切换禁用时为空操作。失败时写入集合保持不变。
    pub fn do_switch(
        &self,
        start: &[ControllerInfo],
        stop: &[ControllerInfo],
    ) -> Result<(), SwitchError> {
        if !self.mode_switch_enabled {
            debug!("Joint mode switching disabled, ignoring controller switch");
            return Ok(());
        }

        let mut writers = self.active.lock();
        match plan_switch(&self.resources, &writers, start, stop) {
            Ok(next) => {
                *writers = next;
                drop(writers);
                self.metrics.mode_switches.fetch_add(1, Ordering::Relaxed);
                info!(
                    "Switched controllers (start: {:?}, stop: {:?})",
                    controller_names(start),
                    controller_names(stop)
                );
                Ok(())
            },
            Err(e) => {
                drop(writers);
                self.metrics
                    .rejected_switches
                    .fetch_add(1, Ordering::Relaxed);
                warn!("Rejected controller switch: {}", e);
                Err(e)
            },
        }
    }

    /// 直接启用或停用某个 (关节, 变体) 写入者
    ///
    /// 启用时会替换同一关节上其他模式的写入者。
    ///
    /// # 错误
    ///
    /// - [`SwitchError::Disabled`]：模式切换被配置禁用
    /// - [`SwitchError::UnknownResource`]：没有对应的可写资源
    pub fn set_writer_active(
        &self,
        joint: &str,
        kind: ResourceKind,
        active: bool,
    ) -> Result<(), SwitchError> {
        if !self.mode_switch_enabled {
            return Err(SwitchError::Disabled);
        }
        let idx = find_writer(&self.resources, joint, kind).ok_or_else(|| {
            SwitchError::UnknownResource {
                joint: joint.to_string(),
                interface: kind.interface_name().to_string(),
            }
        })?;

        let mut writers = self.active.lock();
        if active {
            writers.retain(|other| self.resources[*other].joint_name() != joint);
            writers.push(idx);
            writers.sort_unstable();
        } else {
            writers.retain(|other| *other != idx);
        }
        debug!(
            "Writer '{}' in '{}' is now {}",
            joint,
            kind,
            if active { "active" } else { "inactive" }
        );
        Ok(())
    }

    /// 当前活动写入者 (关节名, 变体)，按资源声明顺序
    pub fn active_writers(&self) -> Vec<(String, ResourceKind)> {
        let writers = self.active.lock();
        writers
            .iter()
            .map(|&idx| {
                let resource = &self.resources[idx];
                (resource.joint_name().to_string(), resource.kind())
            })
            .collect()
    }

    /// 某个 (关节, 变体) 是否在活动写入集合中
    pub fn is_writer_active(&self, joint: &str, kind: ResourceKind) -> bool {
        match find_writer(&self.resources, joint, kind) {
            Some(idx) => self.active.lock().contains(&idx),
            None => false,
        }
    }

    /// 已注册的六个接口组
    pub fn interfaces(&self) -> &HardwareInterfaces {
        &self.interfaces
    }

    /// 全部关节资源（声明顺序）
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn force_torque_sensors(&self) -> &[ForceTorqueSensorDefinition] {
        &self.ft_sensors
    }

    pub fn imu_sensors(&self) -> &[ImuSensorDefinition] {
        &self.imu_sensors
    }

    pub fn metrics(&self) -> &HwMetrics {
        &self.metrics
    }

    pub fn mode_switch_enabled(&self) -> bool {
        self.mode_switch_enabled
    }

    pub fn robot_namespace(&self) -> &str {
        &self.robot_namespace
    }
}

fn controller_names(controllers: &[ControllerInfo]) -> Vec<&str> {
    controllers.iter().map(|c| c.name.as_str()).collect()
}

impl fmt::Debug for RobotHwSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let writers: WriterSet = self.active.lock().clone();
        f.debug_struct("RobotHwSim")
            .field("robot_namespace", &self.robot_namespace)
            .field("resources", &self.resources.len())
            .field("ft_sensors", &self.ft_sensors)
            .field("imu_sensors", &self.imu_sensors)
            .field("e_stop", &self.emergency_stop_active())
            .field("mode_switch_enabled", &self.mode_switch_enabled)
            .field("active_writers", &writers)
            .finish_non_exhaustive()
    }
}
