//! 姿态下发接缝
//!
//! 求解核心从不为了求解去驱动硬件；解出的姿态要不要执行、怎么
//! 插值执行，是外部执行器的事。这里只定义接缝：一个姿态字典加
//! 一个期望时长。真实实现（NaoQi、CAN 总线、仿真器）由集成方
//! 提供。

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// 执行器错误
#[derive(Error, Debug, Clone)]
#[error("Actuator error: {message}")]
pub struct ActuatorError {
    pub message: String,
}

impl ActuatorError {
    pub fn new(message: impl Into<String>) -> Self {
        ActuatorError {
            message: message.into(),
        }
    }
}

/// 把解出的姿态交给硬件执行的接缝
pub trait Actuator {
    /// 在 `duration` 内插值运动到目标姿态
    fn apply(
        &mut self,
        posture: &HashMap<String, f64>,
        duration: Duration,
    ) -> Result<(), ActuatorError>;
}

/// 只记日志的执行器
///
/// 没有硬件的环境（演示、测试）用它占住接缝；每次下发记一条
/// 日志并累计次数。
#[derive(Debug, Default)]
pub struct TracingActuator {
    applied: usize,
}

impl TracingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 迄今下发的姿态数
    pub fn applied(&self) -> usize {
        self.applied
    }
}

impl Actuator for TracingActuator {
    fn apply(
        &mut self,
        posture: &HashMap<String, f64>,
        duration: Duration,
    ) -> Result<(), ActuatorError> {
        self.applied += 1;
        info!(
            joints = posture.len(),
            duration_ms = duration.as_millis() as u64,
            "applying posture"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_actuator_counts_applies() {
        let mut actuator = TracingActuator::new();
        let mut posture = HashMap::new();
        posture.insert("J1".to_string(), 0.1);

        actuator.apply(&posture, Duration::from_secs(1)).unwrap();
        actuator.apply(&posture, Duration::from_secs(1)).unwrap();
        assert_eq!(actuator.applied(), 2);
    }
}
