//! 最小化优先级场景测试
//!
//! 七关节机器人，J1..J6 优先级 1，J7 优先级 2。一维目标能由高
//! 优先级关节独立达成时，低优先级关节应当偏离参考姿态最少；
//! 同时，下发给求解器的优先级序列必须与配置逐索引一致。

use limbik_sdk::backend::MockCall;
use limbik_sdk::chain::{JointTable, RobotDescriptor};
use limbik_sdk::{
    CartesianTarget, ChainSide, JointLimits, MockSolver, PoseSolver, RobotRegistry, SolverHandle,
};
use std::collections::HashMap;

fn pepperlike_registry() -> RobotRegistry {
    let joints: Vec<String> = (1..=7).map(|i| format!("J{i}")).collect();
    let limits: HashMap<String, JointLimits> = joints
        .iter()
        .map(|j| (j.clone(), JointLimits::new(-1.0, 1.0)))
        .collect();
    let mut priority: HashMap<String, i32> = joints.iter().map(|j| (j.clone(), 1)).collect();
    priority.insert("J7".to_string(), 2);

    let table = JointTable {
        joints,
        limits,
        priority,
    };
    let mut registry = RobotRegistry::new();
    registry.register(RobotDescriptor::new("pepperlike", table.clone(), table));
    registry
}

fn pepperlike_solver() -> (PoseSolver<MockSolver>, SolverHandle<MockSolver>) {
    let registry = pepperlike_registry();
    let handle = SolverHandle::new(MockSolver::new(7, 7));
    let solver = PoseSolver::new(&registry, "pepperlike", handle.clone()).unwrap();
    (solver, handle)
}

#[test]
fn test_lowest_priority_joint_deviates_least() {
    let (mut solver, _handle) = pepperlike_solver();
    let side = ChainSide::Left;
    let reference = solver.get_reference_posture(side);
    // 对称限位：参考姿态是全零中点
    for value in reference.values() {
        assert_eq!(*value, 0.0);
    }

    let target = CartesianTarget::position_only([Some(0.05), None, None]);
    let outcome = solver.get_posture(side, target, None).unwrap();
    assert!(outcome.success);
    assert!(outcome.score <= 1e-6, "score = {}", outcome.score);

    let deviation =
        |joint: &str| (outcome.posture[joint] - reference[joint]).abs();
    let lowest = deviation("J7");
    for joint in ["J1", "J2", "J3", "J4", "J5", "J6"] {
        assert!(
            lowest <= deviation(joint) + 1e-12,
            "J7 (priority 2) moved more than {joint}"
        );
    }
    // 目标可由优先级 1 的关节独立达成：J7 根本不该动
    assert_eq!(outcome.posture["J7"], 0.0);
}

#[test]
fn test_priority_sequence_matches_configuration() {
    let (mut solver, handle) = pepperlike_solver();
    let target = CartesianTarget::position_only([Some(0.05), None, None]);
    solver.get_posture(ChainSide::Left, target, None).unwrap();

    let pushed: Vec<(i32, i32)> = handle
        .lock()
        .take_calls()
        .into_iter()
        .filter_map(|call| match call {
            MockCall::SetPriority { index, priority } => Some((index, priority)),
            _ => None,
        })
        .collect();
    assert_eq!(
        pushed,
        vec![(0, 1), (1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 2)]
    );
}

#[test]
fn test_priorities_repushed_on_every_solve() {
    let (mut solver, handle) = pepperlike_solver();
    let target = CartesianTarget::position_only([Some(0.01), None, None]);

    solver.get_posture(ChainSide::Left, target, None).unwrap();
    handle.lock().take_calls();

    // 第二次求解（另一侧）也必须重新下发全量逐索引状态
    solver.get_posture(ChainSide::Right, target, None).unwrap();
    let repushed = handle
        .lock()
        .take_calls()
        .iter()
        .filter(|call| matches!(call, MockCall::SetPriority { .. }))
        .count();
    assert_eq!(repushed, 7);
}
