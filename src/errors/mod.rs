use thiserror::Error;
mod ops;
pub use self::ops::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum TensorError {
    // 张量二元运算
    #[error(
        "形状不一致，故无法{operator}：第一个张量的形状为{tensor1_shape:?}，第二个张量的形状为{tensor2_shape:?}"
    )]
    OperatorError {
        operator: Operator,
        tensor1_shape: Vec<usize>,
        tensor2_shape: Vec<usize>,
    },

    #[error("张量必须是2阶（矩阵），但给定的形状为{0:?}")]
    NotMatrix(Vec<usize>),
    #[error("数据长度{data_len}与形状{shape:?}所需的元素个数不一致")]
    DataLengthMismatch { data_len: usize, shape: Vec<usize> },
    #[error("索引[{row}, {col}]超出了形状为{shape:?}的张量范围")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        shape: Vec<usize>,
    },
}
