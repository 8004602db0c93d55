//! # Limbik Solver
//!
//! 求解编排层：把一条运动链配置和一次求解请求翻译成原生求解器
//! 期望的那组定长数值调用，再把原始输出还原回有名关节姿态。
//!
//! ## 模块
//!
//! - `handle`: [`SolverHandle`]，共享后端的唯一持有与串行化点
//! - `bridge`: [`SolverBridge`]，正/逆解的数值打包与逐索引状态下发
//! - `guard`: [`BlockGuard`]，关节锁定的 RAII 清理
//!
//! ## 失败的两种形态
//!
//! 配置与资源类故障走 `Err`（立即中止，不返回部分姿态）；求解器
//! 不收敛走 `Ok` 里的 `success = false`（高频控制回路用分支处理，
//! 不用异常处理）。

pub mod bridge;
pub mod guard;
pub mod handle;

pub use bridge::{ForwardPose, RawSolve, SolverBridge};
pub use guard::BlockGuard;
pub use handle::SolverHandle;

use limbik_chain::ConfigError;
use limbik_ffi::BackendError;
use thiserror::Error;

/// 编排层错误类型
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// 配置类故障（未知关节、缺失姿态条目等）
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 后端资源类故障（自由度没有对应入口等）
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),
}
