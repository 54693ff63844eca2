//! 参数源
//!
//! 硬件层只需要三种查询：枚举某命名空间下的传感器 id、读取字符串、读取布尔值。
//! 键使用 `/` 分隔的路径，例如 `force_torque/ft0/sensor_joint`。
//!
//! [`TomlParams`] 以 TOML 表实现该接口：
//!
//! ```toml
//! [gazebo_ros_control]
//! enable_joint_mode_switching = false
//!
//! [force_torque.wrist_ft]
//! frame = "wrist_ft_link"
//! sensor_joint = "wrist_ft_joint"
//!
//! [imu.base_imu]
//! frame = "base_link"
//! ```

use crate::error::ParamError;
use std::fs;
use std::path::Path;

/// 参数源接口
pub trait ParamSource {
    /// 命名空间下的子键（传感器 id）；命名空间不存在时返回空
    fn ids(&self, namespace: &str) -> Vec<String>;

    /// 读取字符串；不存在返回 `Ok(None)`，类型不符返回错误
    fn get_string(&self, key: &str) -> Result<Option<String>, ParamError>;

    /// 读取布尔值；不存在返回 `Ok(None)`，类型不符返回错误
    fn get_bool(&self, key: &str) -> Result<Option<bool>, ParamError>;
}

/// 读取必需的字符串参数
pub fn fetch_string(params: &dyn ParamSource, key: &str) -> Result<String, ParamError> {
    params
        .get_string(key)?
        .ok_or_else(|| ParamError::Missing {
            key: key.to_string(),
        })
}

/// 基于 TOML 表的参数源
#[derive(Debug, Clone, Default)]
pub struct TomlParams {
    root: toml::Table,
}

impl TomlParams {
    pub fn new(root: toml::Table) -> Self {
        Self { root }
    }

    /// 从 TOML 文本解析
    pub fn parse(text: &str) -> Result<Self, ParamError> {
        let root: toml::Table = toml::from_str(text)?;
        Ok(Self { root })
    }

    /// 从文件加载
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParamError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ParamError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn root(&self) -> &toml::Table {
        &self.root
    }

    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        let mut segments = key.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        let mut value = self.root.get(first)?;
        for segment in segments {
            value = value.as_table()?.get(segment)?;
        }
        Some(value)
    }
}

impl ParamSource for TomlParams {
    fn ids(&self, namespace: &str) -> Vec<String> {
        match self.lookup(namespace).and_then(toml::Value::as_table) {
            Some(table) => table
                .iter()
                .filter(|(_, value)| value.is_table())
                .map(|(id, _)| id.clone())
                .collect(),
            None => Vec::new(),
        }
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, ParamError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(toml::Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(ParamError::WrongType {
                key: key.to_string(),
                expected: "string",
            }),
        }
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, ParamError> {
        match self.lookup(key) {
            None => Ok(None),
            Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
            Some(_) => Err(ParamError::WrongType {
                key: key.to_string(),
                expected: "bool",
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[gazebo_ros_control]
enable_joint_mode_switching = false

[force_torque.wrist_ft]
frame = "wrist_ft_link"
sensor_joint = "wrist_joint"

[force_torque.ankle_ft]
frame = "ankle_ft_link"
sensor_joint = "ankle_joint"

[imu.base_imu]
frame = 42
"#;

    #[test]
    fn test_ids() {
        let params = TomlParams::parse(SAMPLE).unwrap();
        let mut ids = params.ids("force_torque");
        ids.sort();
        assert_eq!(ids, vec!["ankle_ft", "wrist_ft"]);
        assert_eq!(params.ids("imu"), vec!["base_imu"]);
        assert!(params.ids("missing").is_empty());
        // 非表节点没有子 id
        assert!(params.ids("gazebo_ros_control/enable_joint_mode_switching").is_empty());
    }

    #[test]
    fn test_get_values() {
        let params = TomlParams::parse(SAMPLE).unwrap();
        assert_eq!(
            params.get_string("force_torque/wrist_ft/sensor_joint").unwrap(),
            Some("wrist_joint".to_string())
        );
        assert_eq!(
            params
                .get_bool("gazebo_ros_control/enable_joint_mode_switching")
                .unwrap(),
            Some(false)
        );
        assert_eq!(params.get_string("force_torque/nope/frame").unwrap(), None);
    }

    #[test]
    fn test_wrong_type() {
        let params = TomlParams::parse(SAMPLE).unwrap();
        let err = params.get_string("imu/base_imu/frame").unwrap_err();
        assert!(matches!(err, ParamError::WrongType { expected: "string", .. }));

        let err = params.get_bool("force_torque/wrist_ft/frame").unwrap_err();
        assert!(matches!(err, ParamError::WrongType { expected: "bool", .. }));
    }

    #[test]
    fn test_fetch_string_missing() {
        let params = TomlParams::default();
        let err = fetch_string(&params, "force_torque/ft0/frame").unwrap_err();
        match err {
            ParamError::Missing { key } => assert_eq!(key, "force_torque/ft0/frame"),
            other => panic!("Expected Missing, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            TomlParams::parse("[unterminated"),
            Err(ParamError::Toml(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        let params = TomlParams::from_path(file.path()).unwrap();
        assert_eq!(params.ids("imu").len(), 1);

        let err = TomlParams::from_path("/nonexistent/hwsim/params.toml").unwrap_err();
        assert!(matches!(err, ParamError::Io { .. }));
    }
}
