//! 传感器配置解析
//!
//! - 力矩传感器：命名空间 `force_torque`，每个 id 读取 `frame` 和 `sensor_joint`，
//!   在仿真中解析挂载关节
//! - IMU：命名空间 `imu`，每个 id 读取 `frame`，解析固定的仿真 IMU
//!   [`BASE_IMU_SENSOR`]
//!
//! 任一传感器解析失败即整体失败；命名空间不存在时该类传感器为零个。
//!
//! # 单 IMU 限制
//!
//! 所有 IMU 定义都绑定到同一个仿真数据源 `imu_sensor`（机器人只有一个基座 IMU）。
//! 声明多个 IMU 时它们读到完全相同的数据。

use crate::error::InitError;
use crate::params::{ParamSource, fetch_string};
use crate::sensor::{ForceTorqueSensorDefinition, ImuSensorDefinition};
use crate::sim::SimContext;
use tracing::{error, info};

/// 力矩传感器参数命名空间
pub const FORCE_TORQUE_NAMESPACE: &str = "force_torque";
/// IMU 参数命名空间
pub const IMU_NAMESPACE: &str = "imu";
/// 所有 IMU 定义共用的仿真传感器名称
pub const BASE_IMU_SENSOR: &str = "imu_sensor";

/// 解析力矩传感器
///
/// # 错误
///
/// - [`InitError::Param`]：缺少 `frame` 或 `sensor_joint`
/// - [`InitError::SensorJointNotFound`]：挂载关节不在仿真中
pub fn parse_force_torque_sensors(
    params: &dyn ParamSource,
    sim: &dyn SimContext,
) -> Result<Vec<ForceTorqueSensorDefinition>, InitError> {
    let mut definitions = Vec::new();

    for sensor_name in params.ids(FORCE_TORQUE_NAMESPACE) {
        let prefix = format!("{}/{}", FORCE_TORQUE_NAMESPACE, sensor_name);
        let sensor_frame = fetch_string(params, &format!("{}/frame", prefix))?;
        let sensor_joint = fetch_string(params, &format!("{}/sensor_joint", prefix))?;

        let Some(joint) = sim.joint(&sensor_joint) else {
            error!(
                "Could not find joint '{}' to which a force-torque sensor is attached.",
                sensor_joint
            );
            return Err(InitError::SensorJointNotFound {
                sensor: sensor_name,
                joint: sensor_joint,
            });
        };

        info!(
            "Parsed force-torque sensor: {} in frame: {}",
            sensor_name, sensor_frame
        );
        definitions.push(ForceTorqueSensorDefinition::new(
            sensor_name,
            sensor_joint,
            sensor_frame,
            joint,
        ));
    }

    Ok(definitions)
}

/// 解析 IMU
///
/// # 错误
///
/// - [`InitError::Param`]：缺少 `frame`
/// - [`InitError::ImuSourceNotFound`]：仿真中没有 [`BASE_IMU_SENSOR`]
pub fn parse_imu_sensors(
    params: &dyn ParamSource,
    sim: &dyn SimContext,
) -> Result<Vec<ImuSensorDefinition>, InitError> {
    let mut definitions = Vec::new();

    for sensor_name in params.ids(IMU_NAMESPACE) {
        let sensor_frame = fetch_string(params, &format!("{}/{}/frame", IMU_NAMESPACE, sensor_name))?;

        let Some(imu) = sim.imu(BASE_IMU_SENSOR) else {
            error!("Could not find base IMU sensor '{}'.", BASE_IMU_SENSOR);
            return Err(InitError::ImuSourceNotFound {
                sensor: sensor_name,
                source_name: BASE_IMU_SENSOR.to_string(),
            });
        };

        info!("Parsed imu sensor: {} in frame: {}", sensor_name, sensor_frame);
        definitions.push(ImuSensorDefinition::new(sensor_name, sensor_frame, imu));
    }

    Ok(definitions)
}
