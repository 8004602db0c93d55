//! 姿态求解门面
//!
//! [`PoseSolver`] 是公共操作面：正解查询、可逐轴缺省的逆解查询、
//! 参考姿态管理、关节临时锁定。一个实例对应一个机器人，独占
//! 持有左右两条运动链；所有实例共享同一个后端句柄，由句柄完成
//! 求解的串行化。

use crate::SdkError;
use limbik_chain::{
    CartesianTarget, ChainConfig, ChainSide, JointLimits, RobotRegistry,
};
use limbik_ffi::SolverBackend;
use limbik_solver::{BlockGuard, ForwardPose, SolverBridge, SolverHandle};
use std::collections::HashMap;
use tracing::{debug, warn};

/// 一次逆解的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// 求解器自身的收敛/有效标志，SDK 不做二次解释
    pub success: bool,
    /// 收敛残差，越小越好；量纲由求解器定义
    pub score: f64,
    /// 有名关节姿态，键集等于链的关节集。失败时内容可能无意义
    pub posture: HashMap<String, f64>,
}

/// 单个机器人的姿态求解器
///
/// # 状态归属
///
/// 左右两条 [`ChainConfig`] 为本实例独占，互相独立；后端句柄被
/// 全部实例共享（原生逐索引状态是进程全局的），每次求解在句柄
/// 的锁内完成完整序列。
#[derive(Debug)]
pub struct PoseSolver<B: SolverBackend> {
    robot: String,
    left: ChainConfig,
    right: ChainConfig,
    bridge: SolverBridge<B>,
}

impl<B: SolverBackend> PoseSolver<B> {
    /// 从注册表解析机器人并构造求解器
    ///
    /// 构造时即把两侧关节表的自由度与原生链报告的数量对账，
    /// 不一致立即失败——这类资源故障绝不能等到第一次求解才暴露。
    ///
    /// # Errors
    /// - `SdkError::Config`: 机器人未注册，或关节表非法
    /// - `SdkError::JointCountMismatch`: 关节表与原生链自由度不一致
    pub fn new(
        registry: &RobotRegistry,
        robot: &str,
        handle: SolverHandle<B>,
    ) -> Result<Self, SdkError> {
        let descriptor = registry.get(robot)?;
        let left = descriptor.table(ChainSide::Left).build_chain(ChainSide::Left)?;
        let right = descriptor
            .table(ChainSide::Right)
            .build_chain(ChainSide::Right)?;

        {
            let mut backend = handle.lock();
            for chain in [&left, &right] {
                let actual = backend.joint_count(chain.side().is_left());
                if actual != chain.dof() as i32 {
                    return Err(SdkError::JointCountMismatch {
                        robot: robot.to_string(),
                        side: chain.side(),
                        expected: chain.dof(),
                        actual,
                    });
                }
            }
        }
        debug!(robot, left_dof = left.dof(), right_dof = right.dof(), "pose solver ready");

        Ok(PoseSolver {
            robot: robot.to_string(),
            left,
            right,
            bridge: SolverBridge::new(handle),
        })
    }

    /// 机器人型号名
    pub fn robot(&self) -> &str {
        &self.robot
    }

    fn chain(&self, side: ChainSide) -> &ChainConfig {
        match side {
            ChainSide::Left => &self.left,
            ChainSide::Right => &self.right,
        }
    }

    fn chain_mut(&mut self, side: ChainSide) -> &mut ChainConfig {
        match side {
            ChainSide::Left => &mut self.left,
            ChainSide::Right => &mut self.right,
        }
    }

    /// 正解：姿态 → 末端位置与 yaw/pitch/roll
    ///
    /// `posture` 必须覆盖该侧链的每个关节；多余的键被忽略。
    pub fn forward_kinematics(
        &self,
        side: ChainSide,
        posture: &HashMap<String, f64>,
    ) -> Result<ForwardPose, SdkError> {
        Ok(self.bridge.forward(self.chain(side), posture)?)
    }

    /// 逆解：笛卡尔目标 → 有名关节姿态
    ///
    /// 严格按固定次序执行：应用锁定 → 推导掩码并下发全量逐索引
    /// 状态 → 求解 → 解除锁定 → 命名结果。锁定的解除由 RAII 守卫
    /// 保证，**任何**退出路径（含配置错误与后端错误）都不会把
    /// 锁定泄漏给后续调用。
    ///
    /// 求解器不收敛不是错误：返回 `success = false` 的结果，
    /// 由调用方决定是否放宽约束重试。
    ///
    /// # 参数
    /// - `target`: 逐轴可缺省的笛卡尔目标
    /// - `blocked`: 本次求解期间锁定的关节及其角度；锁定值是否在
    ///   静态限位内由调用方负责（越界时求解器会收到不可行的退化
    ///   区间并自行报告失败）
    ///
    /// # Errors
    /// - `SdkError::Config`: 锁定表引用链外关节
    /// - `SdkError::Solve`: 编排层故障
    pub fn get_posture(
        &mut self,
        side: ChainSide,
        target: CartesianTarget,
        blocked: Option<&HashMap<String, f64>>,
    ) -> Result<SolveOutcome, SdkError> {
        let bridge = self.bridge.clone();
        let chain = self.chain_mut(side);

        let no_blocking = HashMap::new();
        let guard = BlockGuard::apply(chain, blocked.unwrap_or(&no_blocking))?;
        let raw = bridge.inverse(guard.chain(), &target)?;
        let outcome = SolveOutcome {
            success: raw.success,
            score: raw.score,
            posture: raw.named(guard.chain()),
        };
        drop(guard);

        if !outcome.success {
            warn!(side = %side, score = outcome.score, "inverse solve did not converge");
        }
        Ok(outcome)
    }

    /// 该侧的关节名与静态限位（防御性拷贝）
    pub fn get_params(&self, side: ChainSide) -> (Vec<String>, HashMap<String, JointLimits>) {
        let chain = self.chain(side);
        (chain.joints().to_vec(), chain.limits_table())
    }

    /// 合并该侧的参考姿态（最小化起点）
    ///
    /// 非严格合并：链外的键被静默忽略，调用方可以直接喂整机姿态。
    /// 更新在后续求解间持续生效，直到下次更新。
    pub fn set_reference_posture(&mut self, side: ChainSide, posture: &HashMap<String, f64>) {
        self.chain_mut(side).update_reference(posture);
    }

    /// 该侧当前生效的参考姿态（防御性拷贝）
    ///
    /// 未显式设置的关节取限位中点。
    pub fn get_reference_posture(&self, side: ChainSide) -> HashMap<String, f64> {
        self.chain(side).reference_posture()
    }
}
