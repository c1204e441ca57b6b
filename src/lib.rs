//! # Conv Autograd
//!
//! `conv_autograd`是一个反向模式自动微分（reverse-mode autodiff）的计算图引擎，
//! 以及构建在其上的算子集合（尤其是多通道二维卷积层）。
//!
//! 计算图以“仅追加”的节点数组（arena）实现：节点的创建顺序即是合法的拓扑顺序，
//! 反向传播只需按创建顺序的逆序遍历一次，且梯度总是“累加”而非“覆盖”。
//!

pub mod errors;
pub mod nn;
pub mod tensor;
pub mod utils;
