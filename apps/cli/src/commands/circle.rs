//! `circle` 子命令：末端沿选定平面画圆
//!
//! 以参考姿态的末端位置为圆心，逐步求解圆周上的目标点并经执行器
//! 接缝下发（这里是只记日志的执行器）。Ctrl-C 或到达时长即退出。

use super::{build_solver, parse_blocked, SideArg};
use anyhow::Result;
use clap::{Args, ValueEnum};
use limbik_sdk::{Actuator, CartesianTarget, RobotRegistry, TracingActuator};
use nalgebra::Vector3;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

/// 圆所在的平面
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Plane {
    Xy,
    Yz,
    Xz,
}

impl Plane {
    /// 平面的两个单位基向量
    fn basis(self) -> (Vector3<f64>, Vector3<f64>) {
        match self {
            Plane::Xy => (Vector3::x(), Vector3::y()),
            Plane::Yz => (Vector3::y(), Vector3::z()),
            Plane::Xz => (Vector3::x(), Vector3::z()),
        }
    }
}

#[derive(Args)]
pub struct CircleArgs {
    /// 末端侧别
    #[arg(long, value_enum, default_value = "left")]
    side: SideArg,

    /// 圆所在平面
    #[arg(long, value_enum, default_value = "xy")]
    plane: Plane,

    /// 圆半径（米）。太大的半径会超出可达空间
    #[arg(long, default_value_t = 0.06)]
    amplitude: f64,

    /// 运行时长（秒）
    #[arg(long, default_value_t = 15.0)]
    duration: f64,

    /// 每步的相位增量（弧度）
    #[arg(long, default_value_t = 0.06)]
    increment: f64,

    /// 每步之间的间隔（毫秒）
    #[arg(long, default_value_t = 50)]
    period_ms: u64,

    /// 锁定的关节，形如 KneePitch=0.0，可重复
    #[arg(long = "block", value_parser = parse_blocked)]
    blocked: Vec<(String, f64)>,

    /// 固定末端 yaw（弧度）；缺省则姿态不约束
    #[arg(long)]
    yaw: Option<f64>,
}

pub fn run(registry: &RobotRegistry, robot: &str, args: CircleArgs) -> Result<()> {
    let mut solver = build_solver(registry, robot)?;
    let side = args.side.into();
    let blocked: HashMap<String, f64> = args.blocked.iter().cloned().collect();

    // 圆心：参考姿态的末端位置
    let reference = solver.get_reference_posture(side);
    let pose = solver.forward_kinematics(side, &reference)?;
    let center = Vector3::from_column_slice(&pose.position);
    let (u, v) = args.plane.basis();

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let mut actuator = TracingActuator::new();
    let period = Duration::from_millis(args.period_ms);
    let started = Instant::now();
    let mut phase = 0.0f64;

    while running.load(Ordering::SeqCst) && started.elapsed().as_secs_f64() < args.duration {
        phase += args.increment;
        let point = center + (u * phase.cos() + v * phase.sin()) * args.amplitude;
        let target = CartesianTarget::new(
            [Some(point.x), Some(point.y), Some(point.z)],
            [args.yaw, None, None],
        );

        let outcome = solver.get_posture(side, target, Some(&blocked))?;
        if outcome.success {
            actuator.apply(&outcome.posture, period)?;
        } else {
            warn!(score = outcome.score, "target on circle unreachable, skipping step");
        }

        let reached = solver.forward_kinematics(side, &outcome.posture)?;
        println!(
            "phase {phase:6.2}  target {:+.3?}  reached {:+.3?}  score {:.6}",
            [point.x, point.y, point.z],
            reached.position,
            outcome.score
        );

        spin_sleep::sleep(period);
    }

    println!("applied {} postures", actuator.applied());
    Ok(())
}
