//! # Limbik Chain
//!
//! 运动链配置层（无求解器依赖）
//!
//! ## 模块
//!
//! - `chain`: 单侧运动链配置（关节顺序、限位、最小化优先级、参考姿态、临时锁定）
//! - `target`: 笛卡尔目标与逐轴掩码
//! - `registry`: 机器人关节表与进程级注册表
//!
//! ## 分层
//!
//! 本 crate 只描述"求解一次需要哪些约束"，不触碰原生求解器。
//! 数值打包和逐索引下发由 `limbik-solver` 完成。

pub mod chain;
pub mod registry;
pub mod target;

// 重新导出常用类型
pub use chain::{ChainConfig, ChainSide, JointLimits, MAX_JOINTS, MIN_JOINTS};
pub use registry::{JointTable, RobotDescriptor, RobotRegistry};
pub use target::CartesianTarget;

use thiserror::Error;

/// 配置层错误类型
///
/// 对应配置类故障（未知机器人/关节、非法限位、自由度越界）。
/// 这类错误立即中止调用，绝不以"部分姿态"返回（求解失败
/// 本身不是错误，见 `limbik-solver`）。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 注册表中不存在该机器人
    #[error("Unknown robot: {robot}")]
    UnknownRobot { robot: String },

    /// 引用了不属于该运动链的关节
    #[error("Unknown joint: {joint}")]
    UnknownJoint { joint: String },

    /// 姿态缺少链内关节的取值
    #[error("Posture is missing joint: {joint}")]
    MissingJoint { joint: String },

    /// 关节表缺少限位条目
    #[error("Joint {joint} has no limit entry")]
    MissingLimits { joint: String },

    /// 限位区间非法（min > max）
    #[error("Invalid limits for joint {joint}: min {min} > max {max}")]
    InvalidLimits { joint: String, min: f64, max: f64 },

    /// 最小化优先级非法（必须为正整数）
    #[error("Invalid minimization priority for joint {joint}: {priority}")]
    InvalidPriority { joint: String, priority: i32 },

    /// 自由度数量超出原生求解器的特化范围
    #[error("Unsupported joint count: {count} (supported: 5-8)")]
    UnsupportedJointCount { count: usize },

    /// 关节表文件解析失败
    #[error("Robot table parse error: {0}")]
    Parse(String),
}
