//! `solve` 子命令：单次逆解查询

use super::{build_solver, parse_blocked, print_posture, SideArg};
use anyhow::Result;
use clap::Args;
use limbik_sdk::{CartesianTarget, RobotRegistry};
use std::collections::HashMap;

#[derive(Args)]
pub struct SolveArgs {
    /// 末端侧别
    #[arg(long, value_enum, default_value = "left")]
    side: SideArg,

    /// 目标 x（米）；缺省则该轴不约束
    #[arg(long)]
    x: Option<f64>,
    /// 目标 y（米）
    #[arg(long)]
    y: Option<f64>,
    /// 目标 z（米）
    #[arg(long)]
    z: Option<f64>,

    /// 目标 yaw（弧度）
    #[arg(long)]
    yaw: Option<f64>,
    /// 目标 pitch（弧度）
    #[arg(long)]
    pitch: Option<f64>,
    /// 目标 roll（弧度）
    #[arg(long)]
    roll: Option<f64>,

    /// 本次求解锁定的关节，形如 KneePitch=0.0，可重复
    #[arg(long = "block", value_parser = parse_blocked)]
    blocked: Vec<(String, f64)>,
}

pub fn run(registry: &RobotRegistry, robot: &str, args: SolveArgs) -> Result<()> {
    let mut solver = build_solver(registry, robot)?;
    let side = args.side.into();

    let target = CartesianTarget::new(
        [args.x, args.y, args.z],
        [args.yaw, args.pitch, args.roll],
    );
    let blocked: HashMap<String, f64> = args.blocked.into_iter().collect();

    let outcome = solver.get_posture(side, target, Some(&blocked))?;
    println!(
        "success = {}, score = {:.6}",
        outcome.success, outcome.score
    );
    print_posture(&outcome.posture);

    // 用正解核对实际到达的位姿
    let pose = solver.forward_kinematics(side, &outcome.posture)?;
    println!(
        "reached: xyz = {:.3?}, ypr = {:.3?}",
        pose.position, pose.orientation
    );
    Ok(())
}
