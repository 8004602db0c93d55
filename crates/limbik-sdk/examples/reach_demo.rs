//! 高层求解演示：把左手末端移到参考位姿附近的一点
//!
//! 在模拟后端上运行，不需要原生求解器库：
//!
//! ```bash
//! cargo run -p limbik-sdk --example reach_demo
//! ```

use limbik_sdk::{
    Actuator, CartesianTarget, ChainSide, MockSolver, PoseSolver, RobotRegistry, SolverHandle,
    TracingActuator,
};
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let registry = RobotRegistry::with_builtin();
    let handle = SolverHandle::new(MockSolver::new(8, 8));
    let mut solver =
        PoseSolver::new(&registry, "pepper", handle).expect("pepper tables should build");

    let side = ChainSide::Left;

    // 参考姿态（限位中点）对应的末端位姿
    let reference = solver.get_reference_posture(side);
    let pose = solver
        .forward_kinematics(side, &reference)
        .expect("reference posture covers the chain");
    println!(
        "reference pose: xyz = {:.3?}, ypr = {:.3?}",
        pose.position, pose.orientation
    );

    // 目标：x 方向挪 4 cm，姿态完全放开，膝关节锁在 0
    let target = CartesianTarget::position_only([
        Some(pose.position[0] + 0.04),
        Some(pose.position[1]),
        Some(pose.position[2]),
    ]);
    let mut blocked = std::collections::HashMap::new();
    blocked.insert("KneePitch".to_string(), 0.0);

    let outcome = solver
        .get_posture(side, target, Some(&blocked))
        .expect("well-formed request");
    println!("success = {}, score = {:.6}", outcome.success, outcome.score);

    let mut names: Vec<_> = outcome.posture.keys().collect();
    names.sort();
    for joint in names {
        println!("  {joint:>16}: {:+.4} rad", outcome.posture[joint]);
    }

    // 解出的姿态经执行器接缝下发（这里只记日志）
    let mut actuator = TracingActuator::new();
    actuator
        .apply(&outcome.posture, Duration::from_secs(1))
        .expect("tracing actuator cannot fail");
}
