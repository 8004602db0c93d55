//! # Limbik FFI
//!
//! 原生求解器后端抽象层
//!
//! 原生库按自由度数（5-8）各编译一个定参数逆解入口，外加一组
//! 逐关节索引的状态设置调用（限位、优先级、掩码）。本 crate 把
//! 这套调用约定收敛成一个类型化的 [`SolverBackend`] trait：
//!
//! - `native` 模块（`native` feature）：与 `limb_kinematics` 原生库
//!   链接的真实后端，每个入口一条定长签名，没有裸指针穿透上层；
//! - [`mock::MockSolver`]：纯 Rust 后端，行为与原生约定一致
//!   （逐索引状态、掩码语义、参考姿态种子），供无原生库环境下的
//!   测试与演示使用。
//!
//! # 状态模型
//!
//! 原生求解器的逐关节状态按**索引**存放，进程内全局，不区分
//! 机器人或左右侧。两个并发求解会互相覆盖对方的索引状态，因此
//! 上层（`limbik-solver`）必须把共享同一后端实例的所有求解串行化。

pub mod mock;

#[cfg(feature = "native")]
pub mod native;

pub use mock::{MockCall, MockSolver};

#[cfg(feature = "native")]
pub use native::NativeSolver;

use thiserror::Error;

/// 后端层错误类型
///
/// 只覆盖资源类故障。求解不收敛不是错误：原生入口以返回值报告
/// 成功标志，这里原样透传。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// 自由度数没有对应的原生入口（特化范围 5-8）
    #[error("Unsupported joint count: {count} (native entry points cover 5-8)")]
    UnsupportedDofCount { count: usize },
}

/// 原生求解器调用约定的类型化映射
///
/// 方法与原生入口一一对应；`solve` 的入出缓冲即原生调用的
/// in/out 关节参数：进入时是最小化的种子（参考姿态），成功返回
/// 后被覆写为解出的关节角——结果姿态没有独立通道。
///
/// # 调用纪律
///
/// 每次求解前必须重新下发**每个**关节索引的限位与优先级，再设置
/// 掩码，最后调用 `solve`。逐索引状态跨侧别复用，跳过"没变化"的
/// 关节是错误的。
pub trait SolverBackend: Send {
    /// 指定侧别的原生链自由度数
    fn joint_count(&mut self, is_left: bool) -> i32;

    /// 设置关节索引的限位
    fn set_joint_limit(&mut self, index: i32, min: f32, max: f32);

    /// 设置关节索引的最小化优先级（越小越优先）
    fn set_priority(&mut self, index: i32, priority: i32);

    /// 设置逐轴掩码：`false` 表示忽略该轴的误差项（不是"目标为零"）
    fn set_mask(&mut self, mask: [bool; 6]);

    /// 逆解
    ///
    /// # 参数
    /// - `target`: 定长目标向量 (x, y, z, yaw, pitch, roll)，被掩码
    ///   忽略的轴填占位符
    /// - `joints`: in/out 缓冲，进入为种子姿态，返回为解出姿态
    /// - `score`: out，收敛残差，越小越好，量纲由求解器定义
    ///
    /// # 返回
    /// 求解器自身的收敛/有效标志。
    ///
    /// # Errors
    /// - `UnsupportedDofCount`: `joints.len()` 不在 5-8
    fn solve(
        &mut self,
        is_left: bool,
        target: [f32; 6],
        joints: &mut [f32],
        score: &mut f32,
    ) -> Result<bool, BackendError>;

    /// 正解：关节姿态 → 末端位置与 yaw/pitch/roll
    ///
    /// 返回原生调用自身的成功标志；几何上"不合理"的输入不在这里
    /// 拦截，那是求解器的职权。
    fn forward_kinematics(
        &mut self,
        is_left: bool,
        joints: &[f64],
        position: &mut [f64; 3],
        orientation: &mut [f64; 3],
    ) -> bool;
}
