//! 共享求解器句柄
//!
//! 原生求解器的逐关节索引状态是进程全局的，按索引而不是按
//! 机器人/侧别存放：两个并发求解——哪怕目标是不同机器人的不同
//! 侧——会互相覆盖对方刚下发的限位与优先级。这不是"调用方自觉
//! 串行"能托付的纪律，所以后端被建模成单一归属资源：所有运动链
//! 共享同一个 [`SolverHandle`]，每次求解在锁内完成完整的
//! "下发状态 → 设掩码 → 求解"序列。

use limbik_ffi::SolverBackend;
use parking_lot::{Mutex, MutexGuard};
use std::sync::Arc;

/// 共享后端的唯一串行化点
///
/// 克隆句柄共享同一个后端实例。锁的粒度是一整次求解序列，
/// 不是单个原生调用——逐索引状态在序列中途被别人改写就全错了。
///
/// # Example
///
/// ```rust
/// use limbik_ffi::{MockSolver, SolverBackend};
/// use limbik_solver::SolverHandle;
///
/// let handle = SolverHandle::new(MockSolver::new(8, 8));
/// let dof = handle.lock().joint_count(true);
/// assert_eq!(dof, 8);
/// ```
#[derive(Debug)]
pub struct SolverHandle<B> {
    inner: Arc<Mutex<B>>,
}

impl<B: SolverBackend> SolverHandle<B> {
    /// 接管一个后端实例
    pub fn new(backend: B) -> Self {
        SolverHandle {
            inner: Arc::new(Mutex::new(backend)),
        }
    }

    /// 独占后端，直到守卫释放
    pub fn lock(&self) -> MutexGuard<'_, B> {
        self.inner.lock()
    }
}

impl<B> Clone for SolverHandle<B> {
    fn clone(&self) -> Self {
        SolverHandle {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limbik_ffi::MockSolver;

    #[test]
    fn test_clones_share_one_backend() {
        let handle = SolverHandle::new(MockSolver::new(6, 6));
        let other = handle.clone();

        handle.lock().set_priority(0, 3);
        // 同一后端：另一份句柄能看到刚才的调用
        assert_eq!(other.lock().calls().len(), 1);
    }

    #[test]
    fn test_handle_serializes_across_threads() {
        let handle = SolverHandle::new(MockSolver::new(8, 8));
        let mut workers = Vec::new();
        for t in 0..4 {
            let handle = handle.clone();
            workers.push(std::thread::spawn(move || {
                for i in 0..16 {
                    let mut backend = handle.lock();
                    backend.set_priority(i % 8, t);
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(handle.lock().calls().len(), 64);
    }
}
