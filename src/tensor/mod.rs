/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : 二维稠密张量（矩阵）。计算图中所有节点的值与梯度都以此类型存储
 */

use ndarray::Array2;
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

use crate::errors::TensorError;

mod ops {
    pub mod add;
    pub mod mul;
    pub mod sub;
}

mod index;
mod property;


/// 定义张量的结构体。本库中的张量固定为2阶（即`行 × 列`的矩阵），数据按行优先存放；
/// 标量用形状为`[1, 1]`的张量表示。
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Array2<f32>,
}

impl Tensor {
    /// 按行优先顺序，由`data`创建一个形状为`shape`（必须是`[行, 列]`）的张量。
    /// 注：`data`的长度必须和`shape`中所有元素的乘积相等，否则会panic。
    pub fn new(data: &[f32], shape: &[usize]) -> Self {
        Self::try_new(data, shape).unwrap_or_else(|e| panic!("{}", e))
    }

    /// `new`的不会panic的版本
    pub fn try_new(data: &[f32], shape: &[usize]) -> Result<Self, TensorError> {
        let (rows, cols) = Self::matrix_dims(shape)?;
        if data.len() != rows * cols {
            return Err(TensorError::DataLengthMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            });
        }
        let data = Array2::from_shape_vec((rows, cols), data.to_vec()).map_err(|_| {
            TensorError::DataLengthMismatch {
                data_len: data.len(),
                shape: shape.to_vec(),
            }
        })?;
        Ok(Self { data })
    }

    /// 创建一个形状为`[1, 1]`的标量张量
    pub fn scalar(value: f32) -> Self {
        Self {
            data: Array2::from_elem((1, 1), value),
        }
    }

    pub fn zeros(shape: &[usize]) -> Self {
        Self::filled(0., shape)
    }

    pub fn ones(shape: &[usize]) -> Self {
        Self::filled(1., shape)
    }

    /// 创建一个所有元素都为`value`的张量
    pub fn filled(value: f32, shape: &[usize]) -> Self {
        let (rows, cols) = Self::matrix_dims(shape).unwrap_or_else(|e| panic!("{}", e));
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// 创建一个随机张量，其值在[min, max]的闭区间
    pub fn new_uniform<R: Rng + ?Sized>(min: f32, max: f32, shape: &[usize], rng: &mut R) -> Self {
        let dist = Uniform::from(min..=max);
        let data = (0..shape.iter().product::<usize>())
            .map(|_| dist.sample(rng))
            .collect::<Vec<_>>();
        Self::new(&data, shape)
    }

    /// 创建一个服从正态分布的随机张量（Box-Muller变换）
    pub fn new_normal<R: Rng + ?Sized>(mean: f32, std_dev: f32, shape: &[usize], rng: &mut R) -> Self {
        let data_len = shape.iter().product::<usize>();
        let mut data = Vec::with_capacity(data_len);

        while data.len() < data_len {
            let u1: f32 = rng.r#gen();
            let u2: f32 = rng.r#gen();
            let r = (-2.0 * u1.ln()).sqrt();
            let theta = 2.0 * std::f32::consts::PI * u2;
            let z0 = mean + std_dev * r * theta.cos();
            let z1 = mean + std_dev * r * theta.sin();

            if z0.is_finite() {
                data.push(z0);
            }
            if data.len() < data_len && z1.is_finite() {
                data.push(z1);
            }
        }

        Self::new(&data, shape)
    }
}

// 私有方法
impl Tensor {
    fn matrix_dims(shape: &[usize]) -> Result<(usize, usize), TensorError> {
        match shape {
            [rows, cols] => Ok((*rows, *cols)),
            _ => Err(TensorError::NotMatrix(shape.to_vec())),
        }
    }

    fn from_array(data: Array2<f32>) -> Self {
        Self { data }
    }
}
