//! 仿真硬件驱动层
//!
//! 本模块把传动/传感器描述绑定到仿真后端，提供：
//! - 资源工厂：按 (关节, 接口类型) 构造关节资源，重复注册幂等
//! - 传感器解析：力矩传感器、IMU
//! - 硬件门面 [`RobotHwSim`]：`read`/`write` 周期、急停、关节模式切换
//! - 内存仿真后端 [`MemorySim`]：测试和 CLI 使用
//!
//! # 周期模型
//!
//! 外部调度器以固定周期依次调用 `read(time, period)` 和 `write(time, period)`。
//! 模式切换可以在另一个（非实时）线程中进行，与 `write` 通过同一把锁互斥。
//!
//! ```rust
//! use hwsim_driver::{MemorySim, RobotHwSim, TomlParams};
//! use hwsim_interface::{JointInfo, TransmissionInfo};
//! use std::time::Duration;
//!
//! let sim = MemorySim::new().with_joint("j1");
//! let transmissions = vec![TransmissionInfo::new(
//!     "tr1",
//!     vec![JointInfo::new("j1", ["position"])],
//! )];
//! let params = TomlParams::default();
//!
//! let hw = RobotHwSim::init("robot", &params, &sim, &transmissions).unwrap();
//! let period = Duration::from_millis(1);
//! hw.read(Duration::ZERO, period);
//! hw.interfaces().position.get_handle("j1").unwrap().set_command(0.5);
//! hw.write(Duration::ZERO, period);
//! assert_eq!(sim.joint_handle("j1").unwrap().commanded_position(), Some(0.5));
//! ```

mod error;
pub mod factory;
pub mod memory;
pub mod metrics;
pub mod params;
pub mod resource;
mod robot_hw;
pub mod sensor;
pub mod sensor_parser;
pub mod sim;
pub mod switch;

pub use error::{InitError, ParamError, SwitchError};
pub use memory::{MemoryImu, MemoryJoint, MemorySim};
pub use metrics::{HwMetrics, MetricsSnapshot};
pub use params::{ParamSource, TomlParams};
pub use resource::Resource;
pub use robot_hw::{MODE_SWITCH_PARAM, RobotHwSim};
pub use sensor::{ForceTorqueSensorDefinition, ImuSensorDefinition};
pub use sim::{JointWrench, SimContext, SimImu, SimJoint};
pub use switch::{ControllerInfo, InterfaceResources};
