//! run 命令
//!
//! 以固定频率驱动 read → write → 仿真积分，结束时打印指标和关节状态

use anyhow::{Context, Result, bail};
use clap::Args;
use hwsim_driver::{MemorySim, RobotHwSim};
use spin_sleep::SpinSleeper;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::scenario::Scenario;

/// 仿真运行命令参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 场景文件路径
    pub scenario: PathBuf,

    /// 运行周期数
    #[arg(short, long, default_value_t = 1000)]
    pub cycles: u64,

    /// 周期频率（Hz）
    #[arg(short, long, default_value_t = 100.0)]
    pub rate: f64,

    /// 在第 N 个周期触发急停
    #[arg(long)]
    pub estop_at: Option<u64>,

    /// 在第 N 个周期解除急停
    #[arg(long)]
    pub estop_release_at: Option<u64>,

    /// 不休眠，尽快运行（仿真时间仍按频率推进）
    #[arg(long)]
    pub no_sleep: bool,
}

/// 周期循环配置
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub cycles: u64,
    pub period: Duration,
    pub estop_at: Option<u64>,
    pub estop_release_at: Option<u64>,
    pub sleep: bool,
}

impl RunCommand {
    fn loop_config(&self) -> Result<LoopConfig> {
        if !(self.rate > 0.0 && self.rate.is_finite()) {
            bail!("Invalid rate: {} (must be > 0)", self.rate);
        }
        let period = Duration::try_from_secs_f64(1.0 / self.rate)
            .ok()
            .filter(|period| !period.is_zero())
            .with_context(|| format!("Invalid rate: {} (period out of range)", self.rate))?;
        if self.rate > 10000.0 {
            warn!("Very high cycle rate: {} Hz", self.rate);
        }
        Ok(LoopConfig {
            cycles: self.cycles,
            period,
            estop_at: self.estop_at,
            estop_release_at: self.estop_release_at,
            sleep: !self.no_sleep,
        })
    }

    pub fn execute(&self) -> Result<()> {
        let config = self.loop_config()?;
        let scenario = Scenario::load(&self.scenario)?;
        let sim = scenario.build_sim();
        let hw = scenario.init_hardware(&sim)?;
        scenario.apply_commands(&hw)?;

        let running = Arc::new(AtomicBool::new(true));
        let flag = running.clone();
        ctrlc::set_handler(move || {
            flag.store(false, Ordering::SeqCst);
        })
        .context("Failed to set Ctrl-C handler")?;

        let executed = run_cycles(&hw, &sim, &config, &running);
        print_summary(&hw, &sim, executed);
        Ok(())
    }
}

/// 运行周期循环，返回实际执行的周期数
pub fn run_cycles(
    hw: &RobotHwSim,
    sim: &MemorySim,
    config: &LoopConfig,
    running: &AtomicBool,
) -> u64 {
    let sleeper = SpinSleeper::default();
    let start = Instant::now();
    let mut cycle = 0;

    info!(
        "Running {} cycles at {:.1} Hz",
        config.cycles,
        1.0 / config.period.as_secs_f64()
    );

    while cycle < config.cycles && running.load(Ordering::SeqCst) {
        if config.estop_at == Some(cycle) {
            hw.set_emergency_stop(true);
        }
        if config.estop_release_at == Some(cycle) {
            hw.set_emergency_stop(false);
        }

        let sim_time = tick_time(config.period, cycle);
        hw.read(sim_time, config.period);
        hw.write(sim_time, config.period);
        sim.step(config.period);
        cycle += 1;

        if config.sleep {
            let next_tick = tick_time(config.period, cycle);
            let elapsed = start.elapsed();
            if next_tick > elapsed {
                sleeper.sleep(next_tick - elapsed);
            }
        }
    }

    if cycle < config.cycles {
        warn!("Interrupted after {} of {} cycles", cycle, config.cycles);
    }
    cycle
}

/// 第 `cycle` 个周期的起始时间，溢出时饱和
fn tick_time(period: Duration, cycle: u64) -> Duration {
    let nanos = period.as_nanos().saturating_mul(u128::from(cycle));
    let secs = u64::try_from(nanos / 1_000_000_000).unwrap_or(u64::MAX);
    Duration::new(secs, (nanos % 1_000_000_000) as u32)
}

fn print_summary(hw: &RobotHwSim, sim: &MemorySim, executed: u64) {
    let snapshot = hw.metrics().snapshot();
    println!();
    println!("Cycles executed: {}", executed);
    println!("  read cycles:      {}", snapshot.read_cycles);
    println!("  write cycles:     {}", snapshot.write_cycles);
    println!("  commands applied: {}", snapshot.commands_applied);
    println!(
        "  e-stop writes:    {} ({:.1}%)",
        snapshot.estop_writes,
        snapshot.estop_rate()
    );

    println!("Joint states:");
    for handle in hw.interfaces().joint_state.iter() {
        println!(
            "  {:<16} pos={:+.4} vel={:+.4} eff={:+.4}",
            handle.name(),
            handle.position(),
            handle.velocity(),
            handle.effort()
        );
    }
    for name in sim.joint_names() {
        if let Some(joint) = sim.joint_handle(name) {
            println!("  {:<16} last command: {:?}", name, joint.last_command());
        }
    }
}
