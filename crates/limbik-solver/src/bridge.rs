//! 求解桥：数值打包与逐索引状态下发
//!
//! 原生求解器不认识关节名，只认识索引与定长向量。桥的职责是
//! 纯粹的翻译：
//!
//! - 正解：有名姿态 → 链序 f64 缓冲 → 原生调用 → 位置/姿态三元组
//! - 逆解：链的生效约束（含锁定坍缩）→ 逐索引下发 → 掩码 →
//!   参考姿态种子的 in/out 缓冲 → 原生求解 → 原始关节向量
//!
//! 逐索引下发在**每次**求解前全量重做：原生状态按索引全局存放、
//! 跨侧别复用，"这个关节没变所以跳过"在这里是正确性错误，
//! 不是优化。

use crate::handle::SolverHandle;
use crate::SolveError;
use limbik_chain::{CartesianTarget, ChainConfig, ConfigError};
use limbik_ffi::SolverBackend;
use std::collections::HashMap;
use tracing::{debug, trace};

/// 正解结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForwardPose {
    /// 原生调用的成功标志
    pub success: bool,
    /// 末端位置 (x, y, z)
    pub position: [f64; 3],
    /// 末端姿态 (yaw, pitch, roll)
    pub orientation: [f64; 3],
}

/// 逆解的原始输出：尚未命名的链序关节向量
#[derive(Debug, Clone, PartialEq)]
pub struct RawSolve {
    /// 求解器自身的收敛标志，这里不做二次解释
    pub success: bool,
    /// 收敛残差，越小越好；量纲由求解器定义
    pub score: f64,
    /// 链序关节角。失败时内容可能无意义，是否使用由调用方决定
    pub joints: Vec<f64>,
}

impl RawSolve {
    /// 按链序把关节向量还原成有名姿态
    pub fn named(&self, chain: &ChainConfig) -> HashMap<String, f64> {
        chain
            .joints()
            .iter()
            .cloned()
            .zip(self.joints.iter().copied())
            .collect()
    }
}

/// 链配置与后端之间的求解桥
#[derive(Debug)]
pub struct SolverBridge<B> {
    handle: SolverHandle<B>,
}

impl<B> Clone for SolverBridge<B> {
    fn clone(&self) -> Self {
        SolverBridge {
            handle: self.handle.clone(),
        }
    }
}

impl<B: SolverBackend> SolverBridge<B> {
    /// 在共享后端句柄上建桥
    pub fn new(handle: SolverHandle<B>) -> Self {
        SolverBridge { handle }
    }

    /// 共享后端句柄
    pub fn handle(&self) -> &SolverHandle<B> {
        &self.handle
    }

    /// 正解
    ///
    /// `posture` 必须覆盖链内每一个关节；多余的键被忽略（与参考
    /// 姿态的非严格合并策略一致）。
    ///
    /// # Errors
    /// - `ConfigError::MissingJoint`: 姿态缺少链内关节
    pub fn forward(
        &self,
        chain: &ChainConfig,
        posture: &HashMap<String, f64>,
    ) -> Result<ForwardPose, SolveError> {
        let mut buffer = Vec::with_capacity(chain.dof());
        for joint in chain.joints() {
            let value = posture
                .get(joint)
                .copied()
                .ok_or_else(|| ConfigError::MissingJoint {
                    joint: joint.clone(),
                })?;
            buffer.push(value);
        }

        let mut position = [0.0; 3];
        let mut orientation = [0.0; 3];
        let success = self.handle.lock().forward_kinematics(
            chain.side().is_left(),
            &buffer,
            &mut position,
            &mut orientation,
        );
        trace!(side = %chain.side(), success, "forward kinematics");
        Ok(ForwardPose {
            success,
            position,
            orientation,
        })
    }

    /// 逆解
    ///
    /// 在后端锁内完成完整序列：逐索引下发生效限位与优先级、设置
    /// 掩码、以参考姿态为种子调用对应自由度的求解入口。种子缓冲
    /// 被求解器覆写后即为结果姿态——没有独立的结果通道。
    pub fn inverse(
        &self,
        chain: &ChainConfig,
        target: &CartesianTarget,
    ) -> Result<RawSolve, SolveError> {
        let mask = target.mask();
        let packed = target.packed();

        let mut seed = Vec::with_capacity(chain.dof());
        for joint in chain.joints() {
            seed.push(chain.reference_for(joint)? as f32);
        }

        let mut backend = self.handle.lock();
        for (index, joint) in chain.joints().iter().enumerate() {
            let limits = chain.limits_for(joint)?;
            backend.set_joint_limit(index as i32, limits.min as f32, limits.max as f32);
            backend.set_priority(index as i32, chain.priority_for(joint)?);
        }
        backend.set_mask(mask);

        trace!(side = %chain.side(), dof = chain.dof(), ?mask, "dispatching inverse solve");
        let mut score = 0.0f32;
        let success = backend.solve(chain.side().is_left(), packed, &mut seed, &mut score)?;
        debug!(side = %chain.side(), success, score, "inverse solve finished");

        Ok(RawSolve {
            success,
            score: score as f64,
            joints: seed.into_iter().map(f64::from).collect(),
        })
    }
}
