//! 机器人关节表与注册表
//!
//! 每个机器人型号一张静态关节表：左右两侧的有序关节名、默认限位、
//! 可选的默认最小化优先级。注册表在进程启动时构建一次，之后以
//! 只读引用传给每个姿态求解器实例——显式对象，没有隐式全局查找。
//!
//! 关节表可以在代码里构建（内置 `pepper` 描述），也可以从 TOML
//! 文件解析：
//!
//! ```toml
//! name = "myrobot"
//!
//! [sides.left]
//! joints = ["J1", "J2", "J3", "J4", "J5"]
//!
//! [sides.left.limits]
//! J1 = { min = -1.0, max = 1.0 }
//! # ...
//!
//! [sides.left.priority]
//! J1 = 2
//! ```

use crate::chain::{ChainConfig, ChainSide, JointLimits};
use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

/// 单侧的静态关节表
#[derive(Debug, Clone, Deserialize)]
pub struct JointTable {
    /// 有序关节名
    pub joints: Vec<String>,
    /// 每关节默认限位
    pub limits: HashMap<String, JointLimits>,
    /// 默认最小化优先级（可部分给出）
    #[serde(default)]
    pub priority: HashMap<String, i32>,
}

impl JointTable {
    /// 据此表构建一条运动链配置（构造时校验全部不变量）
    pub fn build_chain(&self, side: ChainSide) -> Result<ChainConfig, ConfigError> {
        ChainConfig::new(
            side,
            self.joints.clone(),
            self.limits.clone(),
            self.priority.clone(),
            HashMap::new(),
        )
    }
}

/// 一个机器人型号的完整描述：左右两侧各一张关节表
#[derive(Debug, Clone, Deserialize)]
pub struct RobotDescriptor {
    /// 机器人型号名，注册表的键
    pub name: String,
    sides: Sides,
}

#[derive(Debug, Clone, Deserialize)]
struct Sides {
    left: JointTable,
    right: JointTable,
}

impl RobotDescriptor {
    /// 在代码中构建描述
    pub fn new(name: impl Into<String>, left: JointTable, right: JointTable) -> Self {
        RobotDescriptor {
            name: name.into(),
            sides: Sides { left, right },
        }
    }

    /// 从 TOML 文本解析描述
    ///
    /// # Errors
    /// - `ConfigError::Parse`: 文本不是合法的关节表
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 指定侧别的关节表
    pub fn table(&self, side: ChainSide) -> &JointTable {
        match side {
            ChainSide::Left => &self.sides.left,
            ChainSide::Right => &self.sides.right,
        }
    }
}

/// 进程级注册表：机器人型号名 → 关节表描述
///
/// 注册表只保存不可变的静态数据。每个姿态求解器实例在构造时
/// 解析一次自己的机器人条目，并独占持有据此构建的两条运动链，
/// 两侧之间、实例之间都不共享可变状态。
#[derive(Debug, Default)]
pub struct RobotRegistry {
    robots: HashMap<String, RobotDescriptor>,
}

impl RobotRegistry {
    /// 创建空注册表
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建带内置机器人描述的注册表
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(descriptors::pepper());
        registry
    }

    /// 注册一个机器人描述（同名覆盖）
    pub fn register(&mut self, descriptor: RobotDescriptor) {
        self.robots.insert(descriptor.name.clone(), descriptor);
    }

    /// 查找机器人描述
    ///
    /// # Errors
    /// - `ConfigError::UnknownRobot`: 未注册的型号
    pub fn get(&self, robot: &str) -> Result<&RobotDescriptor, ConfigError> {
        self.robots
            .get(robot)
            .ok_or_else(|| ConfigError::UnknownRobot {
                robot: robot.to_string(),
            })
    }

    /// 已注册的型号名
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.robots.keys().map(|s| s.as_str())
    }
}

/// 内置机器人描述
pub mod descriptors {
    use super::*;

    /// Softbank Pepper：膝/髋与单臂组成的 8 自由度链
    ///
    /// 限位取自 Pepper 官方文档。膝和髋的优先级为 2（其余为 1）：
    /// 能不用下肢就不用，只有手臂够不到目标时才动用。
    pub fn pepper() -> RobotDescriptor {
        // 膝和髋同属左右两条链；臂关节带 L/R 前缀
        let axial = ["KneePitch", "HipPitch", "HipRoll"];
        let arm = [
            "ShoulderPitch",
            "ShoulderRoll",
            "ElbowYaw",
            "ElbowRoll",
            "WristYaw",
        ];

        let arm_limits = |prefix: &str, shoulder_roll: JointLimits, elbow_roll: JointLimits| {
            let mut limits = HashMap::new();
            limits.insert("KneePitch".to_string(), JointLimits::new(-1.0385, 1.0385));
            limits.insert("HipPitch".to_string(), JointLimits::new(-0.5149, 0.5149));
            limits.insert("HipRoll".to_string(), JointLimits::new(-0.5149, 0.5149));
            limits.insert(
                format!("{prefix}ShoulderPitch"),
                JointLimits::new(-2.0857, 2.0857),
            );
            limits.insert(format!("{prefix}ShoulderRoll"), shoulder_roll);
            limits.insert(format!("{prefix}ElbowYaw"), JointLimits::new(-2.0857, 2.0857));
            limits.insert(format!("{prefix}ElbowRoll"), elbow_roll);
            limits.insert(format!("{prefix}WristYaw"), JointLimits::new(-1.8239, 1.8239));
            limits
        };

        let side_table = |prefix: &str, shoulder_roll: JointLimits, elbow_roll: JointLimits| {
            let joints: Vec<String> = axial
                .iter()
                .map(|j| j.to_string())
                .chain(arm.iter().map(|j| format!("{prefix}{j}")))
                .collect();
            let mut priority: HashMap<String, i32> =
                joints.iter().map(|j| (j.clone(), 1)).collect();
            for joint in &axial {
                priority.insert(joint.to_string(), 2);
            }
            JointTable {
                joints,
                limits: arm_limits(prefix, shoulder_roll, elbow_roll),
                priority,
            }
        };

        RobotDescriptor::new(
            "pepper",
            side_table(
                "L",
                JointLimits::new(0.0087, 1.562),
                JointLimits::new(-1.562, -0.0087),
            ),
            side_table(
                "R",
                JointLimits::new(-1.562, -0.0087),
                JointLimits::new(0.0087, 1.562),
            ),
        )
    }
}
