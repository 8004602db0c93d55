//! 原生 `limb_kinematics` 后端
//!
//! 每个自由度数一条定参数的逆解入口（`solve_5` 到 `solve_8`），
//! 关节参数是 in/out 的 `float` 指针：进入时为种子姿态，成功返回
//! 后被求解器覆写为解。本模块把这些入口声明成定长签名，入出
//! 缓冲在 trait 层是编译期定长的可变引用，裸指针不出本文件。
//!
//! # 链接
//!
//! `native` feature 开启时按 `limb_kinematics` 链接。库缺失在链接期
//! 暴露；关节表与原生链的自由度不匹配由上层在任何求解发生之前
//! 通过 [`SolverBackend::joint_count`] 检出。

use crate::{BackendError, SolverBackend};

mod raw {
    use std::ffi::c_int;

    #[link(name = "limb_kinematics")]
    unsafe extern "C" {
        pub fn get_joint_count(is_left_side: bool) -> c_int;

        pub fn set_joint_limit(index: c_int, min: f32, max: f32);

        pub fn set_priority(index: c_int, priority: c_int);

        pub fn set_mask(px: bool, py: bool, pz: bool, pyaw: bool, ppitch: bool, proll: bool);

        pub fn solve_5(
            is_left_side: bool,
            x: f32,
            y: f32,
            z: f32,
            yaw: f32,
            pitch: f32,
            roll: f32,
            joint_0: *mut f32,
            joint_1: *mut f32,
            joint_2: *mut f32,
            joint_3: *mut f32,
            joint_4: *mut f32,
            score: *mut f32,
        ) -> bool;

        pub fn solve_6(
            is_left_side: bool,
            x: f32,
            y: f32,
            z: f32,
            yaw: f32,
            pitch: f32,
            roll: f32,
            joint_0: *mut f32,
            joint_1: *mut f32,
            joint_2: *mut f32,
            joint_3: *mut f32,
            joint_4: *mut f32,
            joint_5: *mut f32,
            score: *mut f32,
        ) -> bool;

        pub fn solve_7(
            is_left_side: bool,
            x: f32,
            y: f32,
            z: f32,
            yaw: f32,
            pitch: f32,
            roll: f32,
            joint_0: *mut f32,
            joint_1: *mut f32,
            joint_2: *mut f32,
            joint_3: *mut f32,
            joint_4: *mut f32,
            joint_5: *mut f32,
            joint_6: *mut f32,
            score: *mut f32,
        ) -> bool;

        pub fn solve_8(
            is_left_side: bool,
            x: f32,
            y: f32,
            z: f32,
            yaw: f32,
            pitch: f32,
            roll: f32,
            joint_0: *mut f32,
            joint_1: *mut f32,
            joint_2: *mut f32,
            joint_3: *mut f32,
            joint_4: *mut f32,
            joint_5: *mut f32,
            joint_6: *mut f32,
            joint_7: *mut f32,
            score: *mut f32,
        ) -> bool;

        pub fn forward_kinematics(
            is_left_side: bool,
            joints: *const f64,
            x: *mut f64,
            y: *mut f64,
            z: *mut f64,
            yaw: *mut f64,
            pitch: *mut f64,
            roll: *mut f64,
        ) -> bool;
    }
}

/// 原生求解器后端
///
/// 零尺寸句柄：状态全部在原生库一侧。正因为那份逐索引状态是
/// 进程全局的，共享它的求解必须在上层串行化（见 `limbik-solver`
/// 的 `SolverHandle`）。
#[derive(Debug, Default)]
pub struct NativeSolver;

impl NativeSolver {
    /// 创建原生后端句柄
    pub fn new() -> Self {
        NativeSolver
    }
}

impl SolverBackend for NativeSolver {
    fn joint_count(&mut self, is_left: bool) -> i32 {
        unsafe { raw::get_joint_count(is_left) }
    }

    fn set_joint_limit(&mut self, index: i32, min: f32, max: f32) {
        unsafe { raw::set_joint_limit(index, min, max) }
    }

    fn set_priority(&mut self, index: i32, priority: i32) {
        unsafe { raw::set_priority(index, priority) }
    }

    fn set_mask(&mut self, mask: [bool; 6]) {
        let [px, py, pz, pyaw, ppitch, proll] = mask;
        unsafe { raw::set_mask(px, py, pz, pyaw, ppitch, proll) }
    }

    fn solve(
        &mut self,
        is_left: bool,
        target: [f32; 6],
        joints: &mut [f32],
        score: &mut f32,
    ) -> Result<bool, BackendError> {
        let [x, y, z, yaw, pitch, roll] = target;
        // 自由度数 → 对应的定参数入口；范围外不是可恢复的运行期
        // 状况，但仍以错误返回，避免任何指针被裁剪
        let success = unsafe {
            match joints {
                [j0, j1, j2, j3, j4] => {
                    raw::solve_5(is_left, x, y, z, yaw, pitch, roll, j0, j1, j2, j3, j4, score)
                }
                [j0, j1, j2, j3, j4, j5] => raw::solve_6(
                    is_left, x, y, z, yaw, pitch, roll, j0, j1, j2, j3, j4, j5, score,
                ),
                [j0, j1, j2, j3, j4, j5, j6] => raw::solve_7(
                    is_left, x, y, z, yaw, pitch, roll, j0, j1, j2, j3, j4, j5, j6, score,
                ),
                [j0, j1, j2, j3, j4, j5, j6, j7] => raw::solve_8(
                    is_left, x, y, z, yaw, pitch, roll, j0, j1, j2, j3, j4, j5, j6, j7, score,
                ),
                other => {
                    return Err(BackendError::UnsupportedDofCount { count: other.len() });
                }
            }
        };
        Ok(success)
    }

    fn forward_kinematics(
        &mut self,
        is_left: bool,
        joints: &[f64],
        position: &mut [f64; 3],
        orientation: &mut [f64; 3],
    ) -> bool {
        let [x, y, z] = position;
        let [yaw, pitch, roll] = orientation;
        unsafe { raw::forward_kinematics(is_left, joints.as_ptr(), x, y, z, yaw, pitch, roll) }
    }
}
