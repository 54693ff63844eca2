//! 硬件层周期指标
//!
//! 原子计数器，`read`/`write` 周期内更新，任意线程可读取快照，无锁竞争。

use std::sync::atomic::{AtomicU64, Ordering};

/// 硬件层实时指标
///
/// # 使用示例
///
/// ```rust
/// use hwsim_driver::HwMetrics;
/// use std::sync::atomic::Ordering;
///
/// let metrics = HwMetrics::new();
/// metrics.read_cycles.fetch_add(1, Ordering::Relaxed);
///
/// let snapshot = metrics.snapshot();
/// assert_eq!(snapshot.read_cycles, 1);
/// ```
#[derive(Debug, Default)]
pub struct HwMetrics {
    /// `read` 周期总数
    pub read_cycles: AtomicU64,

    /// `write` 周期总数
    pub write_cycles: AtomicU64,

    /// 下发到仿真的命令次数（每个活动写入者每周期一次）
    pub commands_applied: AtomicU64,

    /// 急停状态下执行的 `write` 周期数
    pub estop_writes: AtomicU64,

    /// 成功的模式切换次数
    pub mode_switches: AtomicU64,

    /// 被拒绝的模式切换次数
    pub rejected_switches: AtomicU64,
}

impl HwMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取指标快照
    ///
    /// 使用 `Ordering::Relaxed`；不同计数器之间可能有微小的时间差。
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            read_cycles: self.read_cycles.load(Ordering::Relaxed),
            write_cycles: self.write_cycles.load(Ordering::Relaxed),
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            estop_writes: self.estop_writes.load(Ordering::Relaxed),
            mode_switches: self.mode_switches.load(Ordering::Relaxed),
            rejected_switches: self.rejected_switches.load(Ordering::Relaxed),
        }
    }

    /// 重置所有计数器
    pub fn reset(&self) {
        self.read_cycles.store(0, Ordering::Relaxed);
        self.write_cycles.store(0, Ordering::Relaxed);
        self.commands_applied.store(0, Ordering::Relaxed);
        self.estop_writes.store(0, Ordering::Relaxed);
        self.mode_switches.store(0, Ordering::Relaxed);
        self.rejected_switches.store(0, Ordering::Relaxed);
    }
}

/// 指标快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub read_cycles: u64,
    pub write_cycles: u64,
    pub commands_applied: u64,
    pub estop_writes: u64,
    pub mode_switches: u64,
    pub rejected_switches: u64,
}

impl MetricsSnapshot {
    /// 急停周期占全部 `write` 周期的百分比
    ///
    /// `write_cycles` 为 0 时返回 0.0。
    pub fn estop_rate(&self) -> f64 {
        if self.write_cycles == 0 {
            return 0.0;
        }
        (self.estop_writes as f64 / self.write_cycles as f64) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_metrics_default() {
        let snapshot = HwMetrics::new().snapshot();
        assert_eq!(snapshot, MetricsSnapshot::default());
    }

    #[test]
    fn test_metrics_reset() {
        let metrics = HwMetrics::new();
        metrics.write_cycles.fetch_add(4, Ordering::Relaxed);
        metrics.estop_writes.fetch_add(1, Ordering::Relaxed);
        assert_eq!(metrics.snapshot().estop_rate(), 25.0);

        metrics.reset();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
        assert_eq!(metrics.snapshot().estop_rate(), 0.0);
    }

    #[test]
    fn test_metrics_concurrent_increment() {
        let metrics = Arc::new(HwMetrics::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let metrics = metrics.clone();
                thread::spawn(move || {
                    for _ in 0..1000 {
                        metrics.commands_applied.fetch_add(1, Ordering::Relaxed);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(metrics.snapshot().commands_applied, 4000);
    }
}
