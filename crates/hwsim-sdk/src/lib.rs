//! hwsim SDK - 仿真机器人硬件层
//!
//! 把传动描述和传感器参数绑定到仿真后端，为控制器提供关节/传感器句柄，
//! 并以固定周期在仿真与缓冲区之间同步状态和命令。
//!
//! # 架构设计
//!
//! - **接口层** (`interface`): 句柄、接口组、接口类型词表，无仿真依赖
//! - **驱动层** (`driver`): 资源工厂、传感器解析、硬件门面 `RobotHwSim`
//! - **日志** (`logging`): tracing 订阅器初始化
//!
//! # 快速开始
//!
//! ```rust
//! use hwsim_sdk::prelude::*;
//! use std::time::Duration;
//!
//! let sim = MemorySim::new().with_joint("j1");
//! let trs = vec![TransmissionInfo::new("tr", vec![JointInfo::new("j1", ["effort"])])];
//! let hw = RobotHwSim::init("robot", &TomlParams::default(), &sim, &trs).unwrap();
//!
//! hw.read(Duration::ZERO, Duration::from_millis(1));
//! hw.interfaces().effort.get_handle("j1").unwrap().set_command(2.0);
//! hw.write(Duration::ZERO, Duration::from_millis(1));
//! ```

pub use hwsim_driver as driver;
pub use hwsim_interface as interface;

pub mod logging;
pub mod prelude;

// 常用类型
pub use hwsim_driver::{InitError, ParamError, RobotHwSim, SwitchError};
pub use hwsim_interface::{ResourceError, ResourceKind};
