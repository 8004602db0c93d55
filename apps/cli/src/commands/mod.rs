//! CLI 子命令

pub mod circle;
pub mod solve;

use anyhow::Result;
use clap::ValueEnum;
use limbik_sdk::{ChainSide, MockSolver, PoseSolver, RobotRegistry, SolverHandle};

/// 命令行上的侧别选择
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SideArg {
    Left,
    Right,
}

impl From<SideArg> for ChainSide {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::Left => ChainSide::Left,
            SideArg::Right => ChainSide::Right,
        }
    }
}

/// `Joint=value` 形式的锁定条目
pub fn parse_blocked(entry: &str) -> Result<(String, f64), String> {
    let (joint, value) = entry
        .split_once('=')
        .ok_or_else(|| format!("expected Joint=value, got '{entry}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("invalid angle in '{entry}'"))?;
    Ok((joint.trim().to_string(), value))
}

/// 按注册表中的关节表建一个模拟后端求解器
///
/// 模拟后端的两侧自由度取自关节表本身，所以任何 5-8 自由度的
/// 自定义机器人都能直接演示。
pub fn build_solver(
    registry: &RobotRegistry,
    robot: &str,
) -> Result<PoseSolver<MockSolver>> {
    let descriptor = registry.get(robot)?;
    let left_dof = descriptor.table(ChainSide::Left).joints.len();
    let right_dof = descriptor.table(ChainSide::Right).joints.len();
    let handle = SolverHandle::new(MockSolver::new(left_dof, right_dof));
    Ok(PoseSolver::new(registry, robot, handle)?)
}

/// 按关节名排序打印一份姿态
pub fn print_posture(posture: &std::collections::HashMap<String, f64>) {
    let mut names: Vec<_> = posture.keys().collect();
    names.sort();
    for joint in names {
        println!("  {joint:>16}: {:+.4} rad", posture[joint]);
    }
}
