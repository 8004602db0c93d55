//! 关节锁定的 RAII 守卫
//!
//! `blocked` 只允许在单次求解的生命周期内非空：求解结束后残留的
//! 锁定会静默污染后续所有无关调用。把 `unblock` 挂在 `Drop` 上，
//! 无论求解正常返回、提前 `?` 退出还是 panic 展开，锁定都被清空。

use limbik_chain::{ChainConfig, ConfigError};
use std::collections::HashMap;

/// 作用域内的关节锁定
///
/// 构造时把 `blocked` 写入链配置，析构时无条件清空。求解路径上
/// 对链的只读访问经由 [`chain()`](BlockGuard::chain)，保证锁定
/// 期间没有旁路的可变引用。
pub struct BlockGuard<'a> {
    chain: &'a mut ChainConfig,
}

impl<'a> BlockGuard<'a> {
    /// 应用锁定并建立守卫
    ///
    /// 锁定表为空时同样建立守卫（析构清空操作是幂等的）。
    ///
    /// # Errors
    /// - `ConfigError::UnknownJoint`: 锁定表引用链外关节；此时链
    ///   保持原状，不会留下部分锁定
    pub fn apply(
        chain: &'a mut ChainConfig,
        blocked: &HashMap<String, f64>,
    ) -> Result<Self, ConfigError> {
        chain.block(blocked)?;
        Ok(BlockGuard { chain })
    }

    /// 锁定生效期间的链配置视图
    pub fn chain(&self) -> &ChainConfig {
        self.chain
    }
}

impl Drop for BlockGuard<'_> {
    fn drop(&mut self) {
        self.chain.unblock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use limbik_chain::{ChainSide, JointLimits};

    fn chain() -> ChainConfig {
        let names = ["J1", "J2", "J3", "J4", "J5"];
        ChainConfig::new(
            ChainSide::Left,
            names.iter().map(|s| s.to_string()).collect(),
            names
                .iter()
                .map(|s| (s.to_string(), JointLimits::new(-1.0, 1.0)))
                .collect(),
            HashMap::new(),
            HashMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_guard_unblocks_on_drop() {
        let mut chain = chain();
        let mut blocked = HashMap::new();
        blocked.insert("J2".to_string(), 0.3);
        {
            let guard = BlockGuard::apply(&mut chain, &blocked).unwrap();
            assert_eq!(
                guard.chain().limits_for("J2").unwrap(),
                JointLimits::pinned(0.3)
            );
        }
        assert!(chain.blocked().is_empty());
    }

    #[test]
    fn test_guard_unblocks_on_panic() {
        let mut chain = chain();
        let mut blocked = HashMap::new();
        blocked.insert("J1".to_string(), -0.5);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _guard = BlockGuard::apply(&mut chain, &blocked).unwrap();
            panic!("solver blew up mid-solve");
        }));
        assert!(result.is_err());
        assert!(chain.blocked().is_empty());
    }

    #[test]
    fn test_failed_apply_leaves_chain_untouched() {
        let mut chain = chain();
        let mut blocked = HashMap::new();
        blocked.insert("J1".to_string(), 0.1);
        blocked.insert("Phantom".to_string(), 0.2);
        assert!(BlockGuard::apply(&mut chain, &blocked).is_err());
        assert!(chain.blocked().is_empty());
    }

    #[test]
    fn test_empty_block_table_is_fine() {
        let mut chain = chain();
        let guard = BlockGuard::apply(&mut chain, &HashMap::new()).unwrap();
        assert!(guard.chain().blocked().is_empty());
    }
}
