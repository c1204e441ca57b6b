use super::Tensor;
use crate::errors::TensorError;
use std::ops::{Index, IndexMut};

impl Tensor {
    /// 按`(行, 列)`读取元素
    pub fn get(&self, row: usize, col: usize) -> Result<f32, TensorError> {
        self.data
            .get((row, col))
            .copied()
            .ok_or_else(|| self.index_error(row, col))
    }

    /// 按`(行, 列)`写入元素
    pub fn set(&mut self, row: usize, col: usize, value: f32) -> Result<(), TensorError> {
        if let Some(elem) = self.data.get_mut((row, col)) {
            *elem = value;
            return Ok(());
        }
        Err(self.index_error(row, col))
    }

    fn index_error(&self, row: usize, col: usize) -> TensorError {
        TensorError::IndexOutOfRange {
            row,
            col,
            shape: self.shape().to_vec(),
        }
    }
}

// 越界时由ndarray直接panic
impl Index<[usize; 2]> for Tensor {
    type Output = f32;

    fn index(&self, index: [usize; 2]) -> &f32 {
        &self.data[index]
    }
}

impl IndexMut<[usize; 2]> for Tensor {
    fn index_mut(&mut self, index: [usize; 2]) -> &mut f32 {
        &mut self.data[index]
    }
}
