//! limbik-cli：姿态求解器的命令行入口
//!
//! 没有原生求解器库的环境下跑在模拟后端上，用于验证关节表、
//! 约束配置与求解编排，不驱动任何硬件。

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use limbik_sdk::chain::RobotDescriptor;
use limbik_sdk::RobotRegistry;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "limbik-cli", version, about = "Pose solver CLI for robot limbs")]
struct Cli {
    /// 机器人型号（内置：pepper）
    #[arg(long, global = true, default_value = "pepper")]
    robot: String,

    /// 追加的机器人关节表（TOML 文件，可重复）
    #[arg(long, global = true, value_name = "FILE")]
    robot_table: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 单次逆解查询
    Solve(commands::solve::SolveArgs),
    /// 圆轨迹演示：末端沿选定平面画圆
    Circle(commands::circle::CircleArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut registry = RobotRegistry::with_builtin();
    for path in &cli.robot_table {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading robot table {}", path.display()))?;
        let descriptor = RobotDescriptor::from_toml_str(&text)
            .with_context(|| format!("parsing robot table {}", path.display()))?;
        registry.register(descriptor);
    }

    match cli.command {
        Commands::Solve(args) => commands::solve::run(&registry, &cli.robot, args),
        Commands::Circle(args) => commands::circle::run(&registry, &cli.robot, args),
    }
}
