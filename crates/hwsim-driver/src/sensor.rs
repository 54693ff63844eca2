//! 传感器定义
//!
//! 传感器定义把逻辑传感器（名称 + 坐标系）绑定到仿真数据源，并持有最新一帧数据。
//! 数据只在硬件层 `read` 周期内通过 [`ArcSwap::store`] 整体替换；
//! 控制器通过句柄读取快照，两次 `read` 之间数据保持不变。

use crate::sim::{SimImu, SimJoint};
use arc_swap::ArcSwap;
use hwsim_interface::{
    ForceTorqueSensorHandle, ImuSample, ImuSensorHandle, WrenchSample,
};
use std::fmt;
use std::sync::Arc;

/// 力矩传感器定义
///
/// 数据来自挂载关节的约束力（body2 侧）。
pub struct ForceTorqueSensorDefinition {
    pub sensor_name: String,
    pub sensor_joint_name: String,
    pub sensor_frame: String,
    joint: Arc<dyn SimJoint>,
    data: Arc<ArcSwap<WrenchSample>>,
}

impl ForceTorqueSensorDefinition {
    pub fn new(
        sensor_name: impl Into<String>,
        sensor_joint_name: impl Into<String>,
        sensor_frame: impl Into<String>,
        joint: Arc<dyn SimJoint>,
    ) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            sensor_joint_name: sensor_joint_name.into(),
            sensor_frame: sensor_frame.into(),
            joint,
            data: Arc::new(ArcSwap::from_pointee(WrenchSample::default())),
        }
    }

    /// 从挂载关节采样（仅在 `read` 周期调用）
    pub fn update(&self) {
        let wrench = self.joint.force_torque();
        self.data.store(Arc::new(WrenchSample {
            force: wrench.force,
            torque: wrench.torque,
        }));
    }

    pub fn force(&self) -> [f64; 3] {
        self.data.load().force
    }

    pub fn torque(&self) -> [f64; 3] {
        self.data.load().torque
    }

    /// 指向本定义缓冲区的句柄
    pub fn handle(&self) -> ForceTorqueSensorHandle {
        ForceTorqueSensorHandle::new(
            self.sensor_name.clone(),
            self.sensor_frame.clone(),
            self.data.clone(),
        )
    }
}

impl fmt::Debug for ForceTorqueSensorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ForceTorqueSensorDefinition")
            .field("sensor_name", &self.sensor_name)
            .field("sensor_joint_name", &self.sensor_joint_name)
            .field("sensor_frame", &self.sensor_frame)
            .field("data", &**self.data.load())
            .finish_non_exhaustive()
    }
}

/// IMU 定义
pub struct ImuSensorDefinition {
    pub sensor_name: String,
    pub sensor_frame: String,
    imu: Arc<dyn SimImu>,
    data: Arc<ArcSwap<ImuSample>>,
}

impl ImuSensorDefinition {
    pub fn new(
        sensor_name: impl Into<String>,
        sensor_frame: impl Into<String>,
        imu: Arc<dyn SimImu>,
    ) -> Self {
        Self {
            sensor_name: sensor_name.into(),
            sensor_frame: sensor_frame.into(),
            imu,
            data: Arc::new(ArcSwap::from_pointee(ImuSample::default())),
        }
    }

    /// 从 IMU 数据源采样（仅在 `read` 周期调用）
    pub fn update(&self) {
        self.data.store(Arc::new(ImuSample {
            orientation: self.imu.orientation(),
            angular_velocity: self.imu.angular_velocity(),
            linear_acceleration: self.imu.linear_acceleration(),
        }));
    }

    pub fn sample(&self) -> ImuSample {
        **self.data.load()
    }

    pub fn handle(&self) -> ImuSensorHandle {
        ImuSensorHandle::new(
            self.sensor_name.clone(),
            self.sensor_frame.clone(),
            self.data.clone(),
        )
    }
}

impl fmt::Debug for ImuSensorDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImuSensorDefinition")
            .field("sensor_name", &self.sensor_name)
            .field("sensor_frame", &self.sensor_frame)
            .field("data", &**self.data.load())
            .finish_non_exhaustive()
    }
}
