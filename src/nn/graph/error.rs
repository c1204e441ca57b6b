/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : Graph 模块的错误类型
 */

use crate::nn::NodeId;
use thiserror::Error;

/// Graph 操作错误类型
///
/// 所有错误都是前置条件被违反（建图时同步报出），不存在可重试的错误；
/// 返回错误时计算图不会被部分修改。
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// 操作数的形状不符合算子的形状约定（如卷积核大于输入）
    #[error("形状不匹配：预期{expected:?}，实际为{got:?}。{message}")]
    ShapeMismatch {
        expected: Vec<usize>,
        got: Vec<usize>,
        message: String,
    },
    /// 给定的节点引用不属于当前计算图（编程错误）
    #[error("节点{0}不属于当前计算图")]
    InvalidOperandReference(NodeId),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("{0}")]
    DuplicateNodeName(String),
    /// 层配置（JSON）解析/导出失败
    #[error("配置错误：{0}")]
    Config(String),
}
