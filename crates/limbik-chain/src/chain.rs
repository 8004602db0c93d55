//! 单侧运动链配置
//!
//! 一条运动链对应一个 {机器人, 左/右侧} 组合。配置在注册表初始化时
//! 构建一次，进程生命周期内存活；可变的只有两层覆盖：
//!
//! - `reference`: 参考姿态，求解的最小化起点，调用方可随时更新；
//! - `blocked`: 临时锁定的关节，仅在单次求解期间存在，求解结束
//!   （无论成败）必须清空。
//!
//! # 顺序即协议
//!
//! `joints` 的顺序定义了与原生求解器交换的数值向量布局，必须与
//! 对应自由度数的原生入口的编译期约定一致。所有逐索引下发
//! （限位、优先级）都按这个顺序进行。

use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// 原生求解器特化的最小自由度数
pub const MIN_JOINTS: usize = 5;

/// 原生求解器特化的最大自由度数
pub const MAX_JOINTS: usize = 8;

/// 运动链侧别（左/右末端执行器）
///
/// 原生求解器的全部入口都以 `is_left_side: bool` 区分两侧，
/// `is_left()` 提供该标志。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainSide {
    Left,
    Right,
}

impl ChainSide {
    /// 原生调用使用的侧别标志
    pub fn is_left(self) -> bool {
        matches!(self, ChainSide::Left)
    }
}

impl fmt::Display for ChainSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainSide::Left => write!(f, "left"),
            ChainSide::Right => write!(f, "right"),
        }
    }
}

/// 关节角度限位（弧度），`min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    /// 下限（弧度）
    pub min: f64,
    /// 上限（弧度）
    pub max: f64,
}

impl JointLimits {
    /// 创建新的限位区间
    pub const fn new(min: f64, max: f64) -> Self {
        JointLimits { min, max }
    }

    /// 锁定关节时的退化区间（min == max）
    pub const fn pinned(value: f64) -> Self {
        JointLimits {
            min: value,
            max: value,
        }
    }

    /// 区间中点，未显式设置参考姿态时的默认值
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// 值是否落在区间内（含端点）
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for JointLimits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.4}, {:.4}]", self.min, self.max)
    }
}

/// 单侧运动链配置
///
/// # 不变量
///
/// - 关节数在 [`MIN_JOINTS`] 与 [`MAX_JOINTS`] 之间（构造时校验）；
/// - `limits` 覆盖每一个关节；`priority`、`reference`、`blocked`
///   的键都是链内关节；
/// - 两侧配置互相独立，不共享可变状态。
///
/// # 优先级默认规则
///
/// 显式优先级表未覆盖的关节，统一取 `max(显式优先级) + 1`
/// （即最低优先级）。这是有意文档化的默认解析规则，而不是
/// 查表失败的副作用。
#[derive(Debug, Clone)]
pub struct ChainConfig {
    side: ChainSide,
    joints: Vec<String>,
    limits: HashMap<String, JointLimits>,
    priority: HashMap<String, i32>,
    reference: HashMap<String, f64>,
    blocked: HashMap<String, f64>,
}

impl ChainConfig {
    /// 构建并校验一条运动链配置
    ///
    /// # 参数
    /// - `joints`: 有序关节名列表，顺序即数值向量布局
    /// - `limits`: 每关节限位，必须覆盖全部关节
    /// - `priority`: 显式最小化优先级（可部分给出，正整数，越小越优先）
    /// - `reference`: 显式参考姿态（可部分给出；未覆盖的关节回退到限位中点）
    ///
    /// # Errors
    /// - `UnsupportedJointCount`: 关节数不在 5-8
    /// - `MissingLimits` / `InvalidLimits`: 限位缺失或 min > max
    /// - `UnknownJoint`: limits/priority/reference 引用了链外关节
    /// - `InvalidPriority`: 显式优先级不是正整数
    pub fn new(
        side: ChainSide,
        joints: Vec<String>,
        limits: HashMap<String, JointLimits>,
        priority: HashMap<String, i32>,
        reference: HashMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        let count = joints.len();
        if !(MIN_JOINTS..=MAX_JOINTS).contains(&count) {
            return Err(ConfigError::UnsupportedJointCount { count });
        }

        let is_member = |joint: &String| joints.contains(joint);

        for joint in &joints {
            match limits.get(joint) {
                None => {
                    return Err(ConfigError::MissingLimits {
                        joint: joint.clone(),
                    });
                }
                Some(l) if l.min > l.max => {
                    return Err(ConfigError::InvalidLimits {
                        joint: joint.clone(),
                        min: l.min,
                        max: l.max,
                    });
                }
                Some(_) => {}
            }
        }
        if let Some(joint) = limits.keys().find(|&j| !is_member(j)) {
            return Err(ConfigError::UnknownJoint {
                joint: joint.clone(),
            });
        }

        for (joint, p) in &priority {
            if !is_member(joint) {
                return Err(ConfigError::UnknownJoint {
                    joint: joint.clone(),
                });
            }
            if *p < 1 {
                return Err(ConfigError::InvalidPriority {
                    joint: joint.clone(),
                    priority: *p,
                });
            }
        }
        if let Some(joint) = reference.keys().find(|&j| !is_member(j)) {
            return Err(ConfigError::UnknownJoint {
                joint: joint.clone(),
            });
        }

        // 默认优先级：max(显式) + 1，无显式条目时全部为 1
        let lowest = priority.values().copied().max().unwrap_or(0) + 1;
        let priority = joints
            .iter()
            .map(|joint| {
                let p = priority.get(joint).copied().unwrap_or(lowest);
                (joint.clone(), p)
            })
            .collect();

        Ok(ChainConfig {
            side,
            joints,
            limits,
            priority,
            reference,
            blocked: HashMap::new(),
        })
    }

    /// 链的侧别
    pub fn side(&self) -> ChainSide {
        self.side
    }

    /// 自由度数量
    pub fn dof(&self) -> usize {
        self.joints.len()
    }

    /// 有序关节名
    pub fn joints(&self) -> &[String] {
        &self.joints
    }

    /// 关节是否属于该链
    pub fn contains(&self, joint: &str) -> bool {
        self.limits.contains_key(joint)
    }

    /// 关节的生效限位
    ///
    /// 被锁定的关节返回退化区间 `(v, v)`，否则返回静态表中的限位。
    pub fn limits_for(&self, joint: &str) -> Result<JointLimits, ConfigError> {
        if let Some(&value) = self.blocked.get(joint) {
            return Ok(JointLimits::pinned(value));
        }
        self.limits
            .get(joint)
            .copied()
            .ok_or_else(|| ConfigError::UnknownJoint {
                joint: joint.to_string(),
            })
    }

    /// 关节的最小化优先级（越小越优先）
    pub fn priority_for(&self, joint: &str) -> Result<i32, ConfigError> {
        self.priority
            .get(joint)
            .copied()
            .ok_or_else(|| ConfigError::UnknownJoint {
                joint: joint.to_string(),
            })
    }

    /// 关节的生效参考值：显式条目优先，否则取限位中点
    pub fn reference_for(&self, joint: &str) -> Result<f64, ConfigError> {
        if let Some(&value) = self.reference.get(joint) {
            return Ok(value);
        }
        Ok(self.limits_for(joint)?.midpoint())
    }

    /// 完整的生效参考姿态（防御性拷贝）
    pub fn reference_posture(&self) -> HashMap<String, f64> {
        self.joints
            .iter()
            .map(|joint| {
                let value = self
                    .reference
                    .get(joint)
                    .copied()
                    .unwrap_or_else(|| self.limits[joint].midpoint());
                (joint.clone(), value)
            })
            .collect()
    }

    /// 合并部分参考姿态
    ///
    /// 只合并链内关节；未知键被静默忽略。这是有意的非严格合并
    /// 策略（调用方可以把整机姿态喂给单侧链），不是缺陷。
    pub fn update_reference(&mut self, partial: &HashMap<String, f64>) {
        for (joint, &value) in partial {
            if self.contains(joint) {
                self.reference.insert(joint.clone(), value);
            }
        }
    }

    /// 锁定一组关节到固定角度
    ///
    /// 锁定期间关节的生效限位坍缩为 `(v, v)`。锁定值是否落在静态
    /// 限位内由调用方负责：越界时原生求解器会收到一个不可行的
    /// 退化区间，并以自身的失败标志报告。
    ///
    /// 全部键先校验再写入，出错时不留下部分锁定。
    ///
    /// # Errors
    /// - `UnknownJoint`: 存在链外关节
    pub fn block(&mut self, joints_to_values: &HashMap<String, f64>) -> Result<(), ConfigError> {
        if let Some(joint) = joints_to_values.keys().find(|&j| !self.contains(j)) {
            return Err(ConfigError::UnknownJoint {
                joint: joint.clone(),
            });
        }
        for (joint, &value) in joints_to_values {
            self.blocked.insert(joint.clone(), value);
        }
        Ok(())
    }

    /// 无条件清空全部锁定
    ///
    /// 每次求解结束后必须恰好调用一次（含失败路径），否则锁定
    /// 会泄漏到后续无关的调用。`limbik-solver::BlockGuard` 把这条
    /// 规则变成 RAII。
    pub fn unblock(&mut self) {
        self.blocked.clear();
    }

    /// 当前被锁定的关节
    pub fn blocked(&self) -> &HashMap<String, f64> {
        &self.blocked
    }

    /// 静态限位表（防御性拷贝，不含锁定覆盖）
    pub fn limits_table(&self) -> HashMap<String, JointLimits> {
        self.limits.clone()
    }
}
