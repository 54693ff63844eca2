//! check 命令
//!
//! 加载场景并初始化硬件层，打印接口组和活动写入者，不运行周期

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::scenario::Scenario;

/// 场景检查命令参数
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// 场景文件路径
    pub scenario: PathBuf,
}

impl CheckCommand {
    pub fn execute(&self) -> Result<()> {
        let scenario = Scenario::load(&self.scenario)?;
        let sim = scenario.build_sim();
        let hw = scenario.init_hardware(&sim)?;

        println!("Robot: {}", hw.robot_namespace());
        let ifaces = hw.interfaces();
        println!("  {:<48} {:?}", ifaces.joint_state.interface(), ifaces.joint_state.names());
        println!("  {:<48} {:?}", ifaces.position.interface(), ifaces.position.names());
        println!("  {:<48} {:?}", ifaces.velocity.interface(), ifaces.velocity.names());
        println!("  {:<48} {:?}", ifaces.effort.interface(), ifaces.effort.names());
        println!("  {:<48} {:?}", ifaces.force_torque.interface(), ifaces.force_torque.names());
        println!("  {:<48} {:?}", ifaces.imu.interface(), ifaces.imu.names());

        println!(
            "Joint mode switching: {}",
            if hw.mode_switch_enabled() { "enabled" } else { "disabled" }
        );
        for (joint, kind) in hw.active_writers() {
            println!("  active writer: {} ({})", joint, kind);
        }
        Ok(())
    }
}
