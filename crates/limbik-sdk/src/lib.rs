//! # Limbik SDK
//!
//! 让调用方用一句"把左手移到这个位姿"的方式指挥机器人肢体：
//! 高层接口收有名关节字典与可部分缺省的笛卡尔目标，底下由
//! 运动链配置层与求解桥翻译成原生逆解器的定长数值调用。
//!
//! ## 分层
//!
//! - [`chain`]（`limbik-chain`）：链配置、机器人关节表、笛卡尔目标
//! - [`backend`]（`limbik-ffi`）：原生求解器后端抽象与模拟后端
//! - [`bridge`]（`limbik-solver`）：数值打包、逐索引状态下发、锁定守卫
//! - [`solver`]：本 crate 的门面 [`PoseSolver`]
//! - [`actuator`]：解出姿态的下发接缝（插值执行由外部实现）
//!
//! # Example
//!
//! ```rust
//! use limbik_sdk::{CartesianTarget, ChainSide, MockSolver, PoseSolver, RobotRegistry, SolverHandle};
//!
//! let registry = RobotRegistry::with_builtin();
//! let handle = SolverHandle::new(MockSolver::new(8, 8));
//! let mut solver = PoseSolver::new(&registry, "pepper", handle).unwrap();
//!
//! // 只约束 x：其余轴交给求解器自由支配
//! let target = CartesianTarget::position_only([Some(0.05), None, None]);
//! let outcome = solver.get_posture(ChainSide::Left, target, None).unwrap();
//! assert!(outcome.success);
//! ```

pub mod actuator;
pub mod solver;

// 分层 crates 的统一再导出
pub use limbik_chain as chain;
pub use limbik_ffi as backend;
pub use limbik_solver as bridge;

// 常用类型
pub use actuator::{Actuator, ActuatorError, TracingActuator};
pub use limbik_chain::{
    CartesianTarget, ChainSide, ConfigError, JointLimits, RobotDescriptor, RobotRegistry,
};
pub use limbik_ffi::{MockSolver, SolverBackend};
pub use limbik_solver::{ForwardPose, SolveError, SolverHandle};
pub use solver::{PoseSolver, SolveOutcome};

use thiserror::Error;

/// SDK 层错误类型
///
/// 求解器不收敛不在此列：那以 [`SolveOutcome::success`] 为
/// `false` 的正常返回值出现。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SdkError {
    /// 配置类故障（未知机器人/关节等）
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 编排层故障
    #[error("Solve error: {0}")]
    Solve(#[from] SolveError),

    /// 关节表与原生链的自由度不一致
    ///
    /// 在任何求解发生之前、构造求解器时即检出。
    #[error(
        "Joint table for {robot}/{side} has {expected} joints but the native chain reports {actual}"
    )]
    JointCountMismatch {
        robot: String,
        side: ChainSide,
        expected: usize,
        actual: i32,
    },
}
