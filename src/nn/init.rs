/*
 * @Author       : 老董
 * @Date         : 2026-10-11
 * @Description  : 参数初始化策略
 */

use crate::nn::GraphError;
use crate::tensor::Tensor;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// 参数初始化策略
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Init {
    /// 全零
    Zeros,
    /// 常数初始化
    Constant(f32),
    /// [min, max]闭区间上的均匀分布，要求`min <= max`且两端有限
    Uniform { min: f32, max: f32 },
    /// 正态分布，要求`std >= 0`且有限
    Normal { mean: f32, std: f32 },
}

impl Init {
    /// 检查分布参数是否合法
    pub fn check(&self) -> Result<(), GraphError> {
        match *self {
            Self::Zeros => Ok(()),
            Self::Constant(v) if v.is_finite() => Ok(()),
            Self::Uniform { min, max } if min.is_finite() && max.is_finite() && min <= max => {
                Ok(())
            }
            Self::Normal { mean, std } if mean.is_finite() && std.is_finite() && std >= 0. => Ok(()),
            _ => Err(GraphError::InvalidOperation(format!("非法的初始化参数：{self:?}"))),
        }
    }

    /// 生成初始化后的 Tensor（使用全局 RNG）
    ///
    /// 未经`check`的非法参数（如`min > max`的均匀分布）会导致 panic
    pub fn generate(&self, shape: &[usize]) -> Tensor {
        self.generate_by(shape, &mut rand::thread_rng())
    }

    /// 生成初始化后的 Tensor（使用指定的 RNG，便于复现）
    pub fn generate_with_rng(&self, shape: &[usize], rng: &mut StdRng) -> Tensor {
        self.generate_by(shape, rng)
    }

    fn generate_by<R: rand::Rng + ?Sized>(&self, shape: &[usize], rng: &mut R) -> Tensor {
        match *self {
            Self::Zeros => Tensor::zeros(shape),
            Self::Constant(v) => Tensor::filled(v, shape),
            Self::Uniform { min, max } => Tensor::new_uniform(min, max, shape, rng),
            Self::Normal { mean, std } => Tensor::new_normal(mean, std, shape, rng),
        }
    }
}
