//! 纯 Rust 模拟后端
//!
//! 在没有原生 `limb_kinematics` 库的环境（CI、示例、单元测试）里
//! 顶替真实后端。两部分组成：
//!
//! 1. **状态与调用日志**：逐索引限位/优先级、掩码，与原生一样按
//!    索引全局存放、跨侧别复用；每次 setter/求解调用都记入
//!    [`MockCall`] 日志，契约测试据此断言下发序列。
//! 2. **参考运动学**：一个线性玩具模型上的坐标下降最小化器，
//!    保持原生求解器可观察的行为——从种子姿态出发、先夹进限位、
//!    高优先级关节先动、掩码为假的轴完全不进误差项、收敛阈值内
//!    返回成功标志与残差分数。
//!
//! 模型本身不代表任何真实机器人，只保证正逆解自洽，足以支撑
//! 往返一致性与约束语义的测试。

use crate::{BackendError, SolverBackend};
use nalgebra::Vector6;
use std::collections::BTreeMap;

/// 每个关节对位置轴的线性增益
const POSITION_GAIN: f64 = 0.1;

/// 末尾三个关节对姿态轴的线性增益
const ORIENTATION_GAIN: f64 = 0.5;

/// 收敛判定阈值：残差分数低于该值视为成功
const TARGET_SCORE: f64 = 1e-6;

/// 坐标下降的最大遍历轮数
const MAX_PASSES: usize = 500;

/// 模拟后端收到的一次调用
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    /// `set_joint_limit(index, min, max)`
    SetJointLimit { index: i32, min: f32, max: f32 },
    /// `set_priority(index, priority)`
    SetPriority { index: i32, priority: i32 },
    /// `set_mask(..)`
    SetMask([bool; 6]),
    /// 一次逆解调用
    Solve { is_left: bool, dof: usize },
    /// 一次正解调用
    ForwardKinematics { is_left: bool },
}

/// 模拟求解器后端
///
/// # Example
///
/// ```rust
/// use limbik_ffi::{MockSolver, SolverBackend};
///
/// let mut solver = MockSolver::new(8, 8);
/// assert_eq!(solver.joint_count(true), 8);
/// ```
#[derive(Debug)]
pub struct MockSolver {
    left_dof: usize,
    right_dof: usize,
    /// 逐索引限位，跨侧别共享（忠实于原生的全局状态模型）
    limits: BTreeMap<i32, (f32, f32)>,
    /// 逐索引优先级，跨侧别共享
    priority: BTreeMap<i32, i32>,
    mask: [bool; 6],
    calls: Vec<MockCall>,
}

impl MockSolver {
    /// 创建模拟后端，左右两侧各自的自由度数
    pub fn new(left_dof: usize, right_dof: usize) -> Self {
        MockSolver {
            left_dof,
            right_dof,
            limits: BTreeMap::new(),
            priority: BTreeMap::new(),
            // 原生实现把掩码初始化为全约束
            mask: [true; 6],
            calls: Vec::new(),
        }
    }

    /// 迄今记录的调用
    pub fn calls(&self) -> &[MockCall] {
        &self.calls
    }

    /// 取走并清空调用日志
    pub fn take_calls(&mut self) -> Vec<MockCall> {
        std::mem::take(&mut self.calls)
    }

    /// 关节 `joint` 对六个笛卡尔轴的影响列
    ///
    /// 位置轴按索引轮转分配（增益 [`POSITION_GAIN`]），末尾三个
    /// 关节依次驱动 yaw/pitch/roll（增益 [`ORIENTATION_GAIN`]）。
    fn influence(dof: usize, joint: usize) -> Vector6<f64> {
        let mut column = Vector6::zeros();
        column[joint % 3] = POSITION_GAIN;
        let orientation_base = dof - 3;
        if joint >= orientation_base {
            column[3 + (joint - orientation_base)] = ORIENTATION_GAIN;
        }
        column
    }

    fn pose_of(dof: usize, joints: &[f64]) -> Vector6<f64> {
        let mut pose = Vector6::zeros();
        for (i, &q) in joints.iter().enumerate() {
            pose += Self::influence(dof, i) * q;
        }
        pose
    }

    fn bounds_for(&self, index: usize) -> (f64, f64) {
        self.limits
            .get(&(index as i32))
            .map(|&(min, max)| (min as f64, max as f64))
            .unwrap_or((f64::NEG_INFINITY, f64::INFINITY))
    }

    fn priority_for(&self, index: usize) -> i32 {
        self.priority.get(&(index as i32)).copied().unwrap_or(1)
    }
}

impl Default for MockSolver {
    /// 默认两侧均为 8 自由度（Pepper 形态）
    fn default() -> Self {
        MockSolver::new(8, 8)
    }
}

impl SolverBackend for MockSolver {
    fn joint_count(&mut self, is_left: bool) -> i32 {
        if is_left {
            self.left_dof as i32
        } else {
            self.right_dof as i32
        }
    }

    fn set_joint_limit(&mut self, index: i32, min: f32, max: f32) {
        self.calls.push(MockCall::SetJointLimit { index, min, max });
        self.limits.insert(index, (min, max));
    }

    fn set_priority(&mut self, index: i32, priority: i32) {
        self.calls.push(MockCall::SetPriority { index, priority });
        self.priority.insert(index, priority);
    }

    fn set_mask(&mut self, mask: [bool; 6]) {
        self.calls.push(MockCall::SetMask(mask));
        self.mask = mask;
    }

    fn solve(
        &mut self,
        is_left: bool,
        target: [f32; 6],
        joints: &mut [f32],
        score: &mut f32,
    ) -> Result<bool, BackendError> {
        let dof = joints.len();
        if !(5..=8).contains(&dof) {
            return Err(BackendError::UnsupportedDofCount { count: dof });
        }
        self.calls.push(MockCall::Solve { is_left, dof });

        let bounds: Vec<(f64, f64)> = (0..dof).map(|i| self.bounds_for(i)).collect();
        let priorities: Vec<i32> = (0..dof).map(|i| self.priority_for(i)).collect();

        // 种子姿态先投影进限位区间：锁定关节（min == max）由此被钉死
        let mut q: Vec<f64> = joints
            .iter()
            .zip(&bounds)
            .map(|(&v, &(lo, hi))| (v as f64).clamp(lo, hi))
            .collect();

        // 掩码为假的轴整个从误差项里剔除
        let masked = |mut v: Vector6<f64>| -> Vector6<f64> {
            for (axis, &active) in self.mask.iter().enumerate() {
                if !active {
                    v[axis] = 0.0;
                }
            }
            v
        };

        let columns: Vec<Vector6<f64>> =
            (0..dof).map(|i| masked(Self::influence(dof, i))).collect();
        let target_vec = Vector6::from_iterator(target.iter().map(|&v| v as f64));
        let mut residual = masked(Self::pose_of(dof, &q) - target_vec);
        let mut error = residual.norm_squared();

        // 优先级组从高到低逐步放开：当前组收敛停滞且目标未达时
        // 才允许下一组关节参与
        let mut levels: Vec<i32> = priorities.clone();
        levels.sort_unstable();
        levels.dedup();
        let mut active_level = levels[0];

        let mut passes = 0;
        while error.sqrt() > TARGET_SCORE && passes < MAX_PASSES {
            passes += 1;
            let before = error;
            for i in 0..dof {
                if priorities[i] > active_level {
                    continue;
                }
                let column = &columns[i];
                let denom = column.norm_squared();
                if denom < 1e-12 {
                    continue;
                }
                let step = -residual.dot(column) / denom;
                let (lo, hi) = bounds[i];
                let moved = (q[i] + step).clamp(lo, hi) - q[i];
                if moved != 0.0 {
                    q[i] += moved;
                    residual += column * moved;
                    error = residual.norm_squared();
                }
            }
            if before - error <= 1e-15 {
                match levels.iter().copied().find(|&l| l > active_level) {
                    Some(next) => active_level = next,
                    None => break,
                }
            }
        }

        for (out, &value) in joints.iter_mut().zip(&q) {
            *out = value as f32;
        }
        let final_score = error.sqrt();
        *score = final_score as f32;
        Ok(final_score <= TARGET_SCORE)
    }

    fn forward_kinematics(
        &mut self,
        is_left: bool,
        joints: &[f64],
        position: &mut [f64; 3],
        orientation: &mut [f64; 3],
    ) -> bool {
        self.calls.push(MockCall::ForwardKinematics { is_left });
        let dof = joints.len();
        if !(5..=8).contains(&dof) {
            return false;
        }
        let pose = Self::pose_of(dof, joints);
        for axis in 0..3 {
            position[axis] = pose[axis];
            orientation[axis] = pose[3 + axis];
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 下发 dof 个一致限位与优先级
    fn push_uniform_state(solver: &mut MockSolver, dof: usize, min: f32, max: f32) {
        for i in 0..dof {
            solver.set_joint_limit(i as i32, min, max);
            solver.set_priority(i as i32, 1);
        }
    }

    #[test]
    fn test_joint_count_per_side() {
        let mut solver = MockSolver::new(8, 5);
        assert_eq!(solver.joint_count(true), 8);
        assert_eq!(solver.joint_count(false), 5);
    }

    #[test]
    fn test_call_journal_records_setters_in_order() {
        let mut solver = MockSolver::new(5, 5);
        solver.set_joint_limit(0, -1.0, 1.0);
        solver.set_priority(0, 2);
        solver.set_mask([true, false, true, false, false, false]);

        let calls = solver.take_calls();
        assert_eq!(
            calls,
            vec![
                MockCall::SetJointLimit {
                    index: 0,
                    min: -1.0,
                    max: 1.0
                },
                MockCall::SetPriority {
                    index: 0,
                    priority: 2
                },
                MockCall::SetMask([true, false, true, false, false, false]),
            ]
        );
        assert!(solver.calls().is_empty());
    }

    #[test]
    fn test_unsupported_dof_is_an_error() {
        let mut solver = MockSolver::new(4, 4);
        let mut joints = [0.0f32; 4];
        let mut score = 0.0f32;
        let err = solver
            .solve(true, [0.0; 6], &mut joints, &mut score)
            .unwrap_err();
        assert_eq!(err, BackendError::UnsupportedDofCount { count: 4 });
    }

    #[test]
    fn test_solve_reaches_position_target() {
        let mut solver = MockSolver::new(5, 5);
        push_uniform_state(&mut solver, 5, -1.0, 1.0);
        solver.set_mask([true, true, true, false, false, false]);

        let mut joints = [0.0f32; 5];
        let mut score = 0.0f32;
        let success = solver
            .solve(true, [0.05, -0.03, 0.08, 0.0, 0.0, 0.0], &mut joints, &mut score)
            .unwrap();
        assert!(success, "score = {score}");

        // 正解必须复现目标位置
        let q: Vec<f64> = joints.iter().map(|&v| v as f64).collect();
        let mut position = [0.0; 3];
        let mut orientation = [0.0; 3];
        assert!(solver.forward_kinematics(true, &q, &mut position, &mut orientation));
        assert!((position[0] - 0.05).abs() < 1e-5);
        assert!((position[1] + 0.03).abs() < 1e-5);
        assert!((position[2] - 0.08).abs() < 1e-5);
    }

    #[test]
    fn test_pinned_joint_stays_pinned() {
        let mut solver = MockSolver::new(5, 5);
        push_uniform_state(&mut solver, 5, -1.0, 1.0);
        // 索引 2 锁定在 0.4：退化区间
        solver.set_joint_limit(2, 0.4, 0.4);
        solver.set_mask([true, true, true, false, false, false]);

        let mut joints = [0.0f32; 5];
        let mut score = 0.0f32;
        solver
            .solve(true, [0.02, 0.0, -0.04, 0.0, 0.0, 0.0], &mut joints, &mut score)
            .unwrap();
        assert_eq!(joints[2], 0.4f32);
    }

    #[test]
    fn test_infeasible_target_reports_failure() {
        let mut solver = MockSolver::new(5, 5);
        // 限位极窄，目标远在可达范围之外
        push_uniform_state(&mut solver, 5, -0.01, 0.01);
        solver.set_mask([true, false, false, false, false, false]);

        let mut joints = [0.0f32; 5];
        let mut score = 0.0f32;
        let success = solver
            .solve(true, [10.0, 0.0, 0.0, 0.0, 0.0, 0.0], &mut joints, &mut score)
            .unwrap();
        assert!(!success);
        assert!(score > 0.0);
    }

    #[test]
    fn test_masked_axis_does_not_contribute_to_score() {
        let make = || {
            let mut solver = MockSolver::new(5, 5);
            push_uniform_state(&mut solver, 5, -1.0, 1.0);
            solver.set_mask([true, false, true, false, false, false]);
            solver
        };

        // 被掩码忽略的 y 轴占位值不同，分数与解必须完全一致
        let run = |y_placeholder: f32| {
            let mut solver = make();
            let mut joints = [0.0f32; 5];
            let mut score = 0.0f32;
            let success = solver
                .solve(
                    true,
                    [0.05, y_placeholder, 0.02, 0.0, 0.0, 0.0],
                    &mut joints,
                    &mut score,
                )
                .unwrap();
            (success, score, joints)
        };

        let (ok_a, score_a, joints_a) = run(0.0);
        let (ok_b, score_b, joints_b) = run(123.0);
        assert_eq!(ok_a, ok_b);
        assert_eq!(score_a, score_b);
        assert_eq!(joints_a, joints_b);
    }

    #[test]
    fn test_lower_priority_joint_moves_less() {
        let mut solver = MockSolver::new(7, 7);
        for i in 0..7 {
            solver.set_joint_limit(i, -1.0, 1.0);
            solver.set_priority(i, if i == 6 { 2 } else { 1 });
        }
        solver.set_mask([true, false, false, false, false, false]);

        // x 轴由索引 0、3、6 驱动；目标可由优先级 1 的关节独立达成
        let mut joints = [0.0f32; 7];
        let mut score = 0.0f32;
        let success = solver
            .solve(true, [0.05, 0.0, 0.0, 0.0, 0.0, 0.0], &mut joints, &mut score)
            .unwrap();
        assert!(success);
        assert_eq!(joints[6], 0.0f32, "lowest-priority joint should not move");
    }

    #[test]
    fn test_forward_kinematics_rejects_bad_dof() {
        let mut solver = MockSolver::default();
        let mut position = [0.0; 3];
        let mut orientation = [0.0; 3];
        assert!(!solver.forward_kinematics(true, &[0.0; 3], &mut position, &mut orientation));
    }
}
