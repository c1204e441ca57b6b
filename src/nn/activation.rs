/*
 * @Author       : 老董
 * @Date         : 2026-10-10
 * @Description  : 激活函数表：选择器 -> （函数，导数）对。
 *                 导数同时接收输入 x 和已缓存的输出 y，以便像 tanh 这样直接复用前向结果
 */

use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};

/// 支持的逐元素激活函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Activation {
    /// f(x) = x
    #[default]
    Identity,
    /// f(x) = tanh(x)，f' = 1 - y²
    Tanh,
    /// f(x) = 1 / (1 + e^(-x))，f' = y(1 - y)
    Sigmoid,
    /// f(x) = max(0, x)，f' = 1（x > 0）否则 0
    ReLU,
    /// f(x) = x / (1 + |x|)，f' = 1 / (1 + |x|)²
    Softsign,
}

impl Activation {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Identity => "Identity",
            Self::Tanh => "Tanh",
            Self::Sigmoid => "Sigmoid",
            Self::ReLU => "ReLU",
            Self::Softsign => "Softsign",
        }
    }

    pub(crate) const fn snake_name(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Tanh => "tanh",
            Self::Sigmoid => "sigmoid",
            Self::ReLU => "relu",
            Self::Softsign => "softsign",
        }
    }

    pub fn forward(self, x: f32) -> f32 {
        match self {
            Self::Identity => x,
            Self::Tanh => x.tanh(),
            Self::Sigmoid => 1.0 / (1.0 + (-x).exp()),
            Self::ReLU => x.max(0.0),
            Self::Softsign => x / (1.0 + x.abs()),
        }
    }

    /// 在输入为`x`、输出为`y = forward(x)`处的导数
    pub fn derivative(self, x: f32, y: f32) -> f32 {
        match self {
            Self::Identity => 1.0,
            Self::Tanh => 1.0 - y * y,
            Self::Sigmoid => y * (1.0 - y),
            Self::ReLU => {
                if x > 0.0 {
                    1.0
                } else {
                    0.0
                }
            }
            Self::Softsign => {
                let denom = 1.0 + x.abs();
                1.0 / (denom * denom)
            }
        }
    }

    pub fn apply(self, input: &Tensor) -> Tensor {
        input.map(|x| self.forward(x))
    }

    /// 逐元素求导数，`output`须为`apply(input)`的结果
    pub fn apply_derivative(self, input: &Tensor, output: &Tensor) -> Tensor {
        input.zip_map(output, |x, y| self.derivative(x, y))
    }
}
