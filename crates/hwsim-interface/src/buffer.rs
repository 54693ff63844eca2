//! 无锁标量缓冲区
//!
//! 关节的状态与命令缓冲区由资源（Resource）和控制器共享：
//! - 资源在 `read` 中写状态、在 `write` 中读命令
//! - 控制器通过句柄读状态、写命令
//!
//! 两端都只做单标量的原子读写，不需要锁。

use crate::transmission::ResourceKind;
use std::sync::atomic::{AtomicU64, Ordering};

/// 原子 f64（按位存储在 `AtomicU64` 中）
#[derive(Debug, Default)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    /// 创建新的原子 f64
    pub const fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

impl Clone for AtomicF64 {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

/// 单个关节的共享缓冲区
///
/// 同一关节的所有资源变体共享一份 `JointData`：状态字段只有一份，
/// 命令字段按变体分开（位置/速度/力矩命令互不覆盖）。
#[derive(Debug, Default)]
pub struct JointData {
    /// 实际位置
    pub position: AtomicF64,
    /// 实际速度
    pub velocity: AtomicF64,
    /// 实际力/力矩
    pub effort: AtomicF64,
    /// 位置命令
    pub position_command: AtomicF64,
    /// 速度命令
    pub velocity_command: AtomicF64,
    /// 力/力矩命令
    pub effort_command: AtomicF64,
}

impl JointData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指定变体的命令槽
    ///
    /// `JointState` 没有命令，返回 `None`。
    pub fn command(&self, kind: ResourceKind) -> Option<&AtomicF64> {
        match kind {
            ResourceKind::JointState => None,
            ResourceKind::PositionJoint => Some(&self.position_command),
            ResourceKind::VelocityJoint => Some(&self.velocity_command),
            ResourceKind::EffortJoint => Some(&self.effort_command),
        }
    }

    /// 一次性写入状态（由资源的 `read` 调用）
    #[inline]
    pub fn set_state(&self, position: f64, velocity: f64, effort: f64) {
        self.position.store(position);
        self.velocity.store(velocity);
        self.effort.store(effort);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_atomic_f64_roundtrip_special_values() {
        let value = AtomicF64::new(0.0);
        for v in [1.5, -0.0, f64::MAX, f64::MIN_POSITIVE, f64::INFINITY] {
            value.store(v);
            assert_eq!(value.load().to_bits(), v.to_bits());
        }
        value.store(f64::NAN);
        assert!(value.load().is_nan());
    }

    #[test]
    fn test_atomic_f64_default_is_zero() {
        assert_eq!(AtomicF64::default().load(), 0.0);
    }

    #[test]
    fn test_command_slots_are_distinct() {
        let data = JointData::new();
        data.command(ResourceKind::PositionJoint).unwrap().store(1.0);
        data.command(ResourceKind::VelocityJoint).unwrap().store(2.0);
        data.command(ResourceKind::EffortJoint).unwrap().store(3.0);

        assert!(data.command(ResourceKind::JointState).is_none());
        assert_eq!(data.position_command.load(), 1.0);
        assert_eq!(data.velocity_command.load(), 2.0);
        assert_eq!(data.effort_command.load(), 3.0);
    }

    #[test]
    fn test_shared_across_threads() {
        let data = Arc::new(JointData::new());
        let writer = {
            let data = data.clone();
            thread::spawn(move || {
                for i in 0..1000 {
                    data.set_state(i as f64, 0.0, 0.0);
                }
            })
        };
        writer.join().unwrap();
        assert_eq!(data.position.load(), 999.0);
    }
}
