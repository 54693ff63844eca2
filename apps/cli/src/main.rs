//! # hwsim CLI
//!
//! 仿真硬件层命令行工具：从场景文件构造内存仿真和硬件层，并以固定频率运行读写周期。
//!
//! ```bash
//! # 检查场景（初始化硬件层并打印接口组）
//! hwsim-cli check apps/cli/scenarios/two_joint_arm.toml
//!
//! # 以 200 Hz 运行 500 个周期，第 300 个周期触发急停
//! hwsim-cli run apps/cli/scenarios/two_joint_arm.toml --cycles 500 --rate 200 --estop-at 300
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod scenario;

use commands::{CheckCommand, RunCommand};

/// hwsim CLI - 仿真硬件层命令行工具
#[derive(Parser, Debug)]
#[command(name = "hwsim-cli")]
#[command(about = "Command-line driver for the simulated robot hardware layer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 初始化硬件层并打印接口组
    Check {
        #[command(flatten)]
        args: CheckCommand,
    },

    /// 运行读写周期
    Run {
        #[command(flatten)]
        args: RunCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志
    let filter = hwsim_sdk::logging::env_filter().add_directive("hwsim_cli=info".parse()?);
    hwsim_sdk::logging::try_init_logging_with(filter)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { args } => args.execute(),
        Commands::Run { args } => args.execute(),
    }
}
