//! 笛卡尔目标与逐轴掩码
//!
//! 目标的六个标量（x, y, z, yaw, pitch, roll）各自可缺省：`None`
//! 表示"该轴不约束"。掩码向量与目标向量分离存在的全部意义在于：
//! 原生求解器必须把 `mask[i] = false` 理解为"忽略该轴的误差项"，
//! 而不是"目标为零"——缺省轴打包时填入的 `0.0` 只是占位符。

/// 一次求解的笛卡尔目标（短暂对象，每次 `get_posture` 调用一个）
///
/// # Example
///
/// ```rust
/// use limbik_chain::CartesianTarget;
///
/// // 只约束 x 和 z，姿态完全放开
/// let target = CartesianTarget::position_only([Some(0.1), None, Some(0.2)]);
/// assert_eq!(target.mask(), [true, false, true, false, false, false]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartesianTarget {
    /// 目标位置 (x, y, z)，`None` 表示不约束该轴
    pub position: [Option<f64>; 3],
    /// 目标姿态 (yaw, pitch, roll)，`None` 表示不约束该轴
    pub orientation: [Option<f64>; 3],
}

impl CartesianTarget {
    /// 创建新的笛卡尔目标
    pub const fn new(position: [Option<f64>; 3], orientation: [Option<f64>; 3]) -> Self {
        CartesianTarget {
            position,
            orientation,
        }
    }

    /// 只约束位置的目标
    pub const fn position_only(position: [Option<f64>; 3]) -> Self {
        CartesianTarget {
            position,
            orientation: [None, None, None],
        }
    }

    /// 推导逐轴掩码：`mask[i] = 第 i 个目标标量存在`
    ///
    /// 每次调用现算，绝不缓存。
    pub fn mask(&self) -> [bool; 6] {
        let mut mask = [false; 6];
        for (i, axis) in self
            .position
            .iter()
            .chain(self.orientation.iter())
            .enumerate()
        {
            mask[i] = axis.is_some();
        }
        mask
    }

    /// 打包成原生调用的定长目标向量
    ///
    /// 缺省轴填入 `0.0` 占位符，配合掩码一起下发。
    pub fn packed(&self) -> [f32; 6] {
        let mut packed = [0.0f32; 6];
        for (i, axis) in self
            .position
            .iter()
            .chain(self.orientation.iter())
            .enumerate()
        {
            packed[i] = axis.unwrap_or(0.0) as f32;
        }
        packed
    }
}
