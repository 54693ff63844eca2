//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use hwsim_sdk::prelude::*;
//! ```

// 硬件门面
pub use hwsim_driver::RobotHwSim;
pub use hwsim_driver::{ControllerInfo, InterfaceResources};

// 仿真后端与参数
pub use hwsim_driver::{MemorySim, ParamSource, SimContext, SimImu, SimJoint, TomlParams};

// 描述与句柄
pub use hwsim_interface::{
    ForceTorqueSensorHandle, ImuSensorHandle, JointHandle, JointInfo, JointLimits,
    JointStateHandle, ResourceKind, TransmissionInfo,
};

// 错误类型
pub use hwsim_driver::{InitError, ParamError, SwitchError};
pub use hwsim_interface::ResourceError;
