/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : 张量的属性方法，以及少量不改变形状的逐元素变换
 */

use super::Tensor;
use crate::errors::TensorError;
use approx::AbsDiffEq;
use ndarray::Zip;

impl Tensor {
    /// 形状固定为`[行, 列]`
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// 计算张量中所有元素的数量
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 判断两个张量的形状是否严格一致
    pub fn is_same_shape(&self, other: &Self) -> bool {
        self.shape() == other.shape()
    }

    /// 判断张量是否为标量（形状为`[1, 1]`）
    pub fn is_scalar(&self) -> bool {
        self.size() == 1
    }

    /// 转化为纯数（number）。若为标量，则返回Some(number)，否则返回None
    pub fn number(&self) -> Option<f32> {
        if self.is_scalar() {
            Some(self.data[[0, 0]])
        } else {
            None
        }
    }

    /// 按行优先顺序返回所有元素的拷贝
    pub fn data(&self) -> Vec<f32> {
        self.data.iter().copied().collect()
    }

    /// 按行优先顺序整体覆写张量的值，形状不变
    pub fn set_data(&mut self, data: &[f32]) -> Result<(), TensorError> {
        if data.len() != self.size() {
            return Err(TensorError::DataLengthMismatch {
                data_len: data.len(),
                shape: self.shape().to_vec(),
            });
        }
        for (dst, src) in self.data.iter_mut().zip(data) {
            *dst = *src;
        }
        Ok(())
    }

    /// 所有元素之和
    pub fn sum(&self) -> f32 {
        self.data.sum()
    }

    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> Self {
        Self::from_array(self.data.mapv(f))
    }

    /// 两个同形张量逐元素组合，形状不一致则panic
    pub fn zip_map<F: Fn(f32, f32) -> f32>(&self, other: &Self, f: F) -> Self {
        assert!(
            self.is_same_shape(other),
            "zip_map要求两个张量形状一致：{:?}与{:?}",
            self.shape(),
            other.shape()
        );
        Self::from_array(
            Zip::from(&self.data)
                .and(&other.data)
                .map_collect(|&a, &b| f(a, b)),
        )
    }

    pub fn tanh(&self) -> Self {
        self.map(f32::tanh)
    }
}

impl AbsDiffEq for Tensor {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.is_same_shape(other)
            && self
                .data
                .iter()
                .zip(other.data.iter())
                .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
