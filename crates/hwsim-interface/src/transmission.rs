//! 传动描述与接口类型词表
//!
//! 描述解析（URDF 等）不在本层职责内，这里只定义解析结果的数据结构。

use crate::error::ResourceError;

/// 关节能力变体（封闭集合）
///
/// 每个变体对应一个接口组，工厂通过 [`ResourceKind::from_interface_type`]
/// 将声明的接口类型字符串映射到变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// 只读关节状态
    JointState,
    /// 位置命令
    PositionJoint,
    /// 速度命令
    VelocityJoint,
    /// 力/力矩命令
    EffortJoint,
}

/// 接口类型字符串 → 变体 查找表
///
/// 同时接受简写（`position`）和全限定名
/// （`hardware_interface/PositionJointInterface`）。
/// 表外字符串被忽略（向前兼容）。
const INTERFACE_TABLE: [(&str, ResourceKind); 8] = [
    ("state", ResourceKind::JointState),
    ("position", ResourceKind::PositionJoint),
    ("velocity", ResourceKind::VelocityJoint),
    ("effort", ResourceKind::EffortJoint),
    (JOINT_STATE_INTERFACE, ResourceKind::JointState),
    (POSITION_JOINT_INTERFACE, ResourceKind::PositionJoint),
    (VELOCITY_JOINT_INTERFACE, ResourceKind::VelocityJoint),
    (EFFORT_JOINT_INTERFACE, ResourceKind::EffortJoint),
];

pub const JOINT_STATE_INTERFACE: &str = "hardware_interface/JointStateInterface";
pub const POSITION_JOINT_INTERFACE: &str = "hardware_interface/PositionJointInterface";
pub const VELOCITY_JOINT_INTERFACE: &str = "hardware_interface/VelocityJointInterface";
pub const EFFORT_JOINT_INTERFACE: &str = "hardware_interface/EffortJointInterface";
pub const FORCE_TORQUE_SENSOR_INTERFACE: &str = "hardware_interface/ForceTorqueSensorInterface";
pub const IMU_SENSOR_INTERFACE: &str = "hardware_interface/ImuSensorInterface";

impl ResourceKind {
    /// 全部变体（声明顺序）
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::JointState,
        ResourceKind::PositionJoint,
        ResourceKind::VelocityJoint,
        ResourceKind::EffortJoint,
    ];

    /// 从接口类型字符串查表
    ///
    /// 未知字符串返回 `None`。
    pub fn from_interface_type(iface_type: &str) -> Option<Self> {
        INTERFACE_TABLE
            .iter()
            .find(|(name, _)| *name == iface_type)
            .map(|(_, kind)| *kind)
    }

    /// 该变体所属接口组的全限定名
    pub const fn interface_name(self) -> &'static str {
        match self {
            ResourceKind::JointState => JOINT_STATE_INTERFACE,
            ResourceKind::PositionJoint => POSITION_JOINT_INTERFACE,
            ResourceKind::VelocityJoint => VELOCITY_JOINT_INTERFACE,
            ResourceKind::EffortJoint => EFFORT_JOINT_INTERFACE,
        }
    }

    /// 是否接受命令（可进入活动写入集合）
    pub const fn is_writable(self) -> bool {
        !matches!(self, ResourceKind::JointState)
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.interface_name())
    }
}

/// 关节限位
///
/// 缺省字段表示该方向无限制。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct JointLimits {
    /// 位置下限（rad 或 m）
    pub min_position: Option<f64>,
    /// 位置上限（rad 或 m）
    pub max_position: Option<f64>,
    /// 最大速度绝对值
    pub max_velocity: Option<f64>,
    /// 最大力/力矩绝对值
    pub max_effort: Option<f64>,
}

impl JointLimits {
    /// 校验限位
    ///
    /// # 错误
    ///
    /// 任一限位为 NaN/无穷，或 `min_position > max_position` 时返回
    /// [`ResourceError::Fatal`]。
    pub fn validate(&self) -> Result<(), ResourceError> {
        let fields = [
            ("min_position", self.min_position),
            ("max_position", self.max_position),
            ("max_velocity", self.max_velocity),
            ("max_effort", self.max_effort),
        ];
        for (field, value) in fields {
            if let Some(value) = value.filter(|v| !v.is_finite()) {
                return Err(ResourceError::Fatal(format!(
                    "Joint limit {} must be finite, got {}",
                    field, value
                )));
            }
        }
        match (self.min_position, self.max_position) {
            (Some(min), Some(max)) if min > max => Err(ResourceError::Fatal(format!(
                "Joint limit min_position {} exceeds max_position {}",
                min, max
            ))),
            _ => Ok(()),
        }
    }

    /// 位置命令饱和
    pub fn clamp_position(&self, value: f64) -> f64 {
        let value = match self.min_position {
            Some(min) => value.max(min),
            None => value,
        };
        match self.max_position {
            Some(max) => value.min(max),
            None => value,
        }
    }

    /// 速度命令饱和（对称）
    pub fn clamp_velocity(&self, value: f64) -> f64 {
        clamp_symmetric(value, self.max_velocity)
    }

    /// 力矩命令饱和（对称）
    pub fn clamp_effort(&self, value: f64) -> f64 {
        clamp_symmetric(value, self.max_effort)
    }
}

fn clamp_symmetric(value: f64, limit: Option<f64>) -> f64 {
    match limit {
        // max/min 遇到 NaN 返回另一侧，不会 panic
        Some(limit) => value.max(-limit.abs()).min(limit.abs()),
        None => value,
    }
}

/// 单个关节的描述
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointInfo {
    /// 关节名称
    pub name: String,
    /// 声明的硬件接口类型（有序）
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardware_interfaces: Vec<String>,
    /// 关节限位（可选）
    #[cfg_attr(feature = "serde", serde(default))]
    pub limits: JointLimits,
}

impl JointInfo {
    /// 创建无限位的关节描述
    pub fn new<I, S>(name: impl Into<String>, hardware_interfaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            hardware_interfaces: hardware_interfaces.into_iter().map(Into::into).collect(),
            limits: JointLimits::default(),
        }
    }

    /// 设置限位
    pub fn with_limits(mut self, limits: JointLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// 传动描述：一组关节
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransmissionInfo {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub joints: Vec<JointInfo>,
}

impl TransmissionInfo {
    pub fn new(name: impl Into<String>, joints: Vec<JointInfo>) -> Self {
        Self {
            name: name.into(),
            joints,
        }
    }
}
