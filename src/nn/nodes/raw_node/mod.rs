/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : 节点类型（封闭的枚举）以及每种节点的前向/反向规则。
 *                 分派由 enum_dispatch 生成的 match 完成，而非虚函数。
 */

mod ops;
mod variable;

pub(in crate::nn) use ops::*;
pub(in crate::nn) use variable::Variable;

use crate::nn::{Activation, GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone)]
pub(in crate::nn) enum NodeType {
    Variable(Variable),
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓算子↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    CrossCorrelate2d(CrossCorrelate2d),
    BroadcastAddScalar(BroadcastAddScalar),
    ElementwiseSum(ElementwiseSum),
    Activation(ElementwiseActivation),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑算子↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

#[enum_dispatch(NodeType)]
pub(in crate::nn) trait TraitNode {
    /// 节点类型名，如"CrossCorrelate2d"、"Tanh"
    fn type_name(&self) -> &'static str;

    /// 自动命名时使用的前缀，如"tanh"会生成"tanh_1"、"tanh_2"...
    fn name_prefix(&self) -> &'static str;

    /// 校验父节点的个数与形状，并返回本节点值的形状。
    /// 只在建图时调用，且先于任何计算，故出错时计算图不会被修改
    fn infer_shape(&self, parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError>;

    /// 根据父节点的值计算本节点的值（父节点的形状已经由`infer_shape`校验过）
    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError>;

    /// 给定本节点累积的上游梯度，按父节点顺序返回对每个父节点的梯度贡献。
    /// 返回的梯度由Graph“累加”到父节点上，这里不做任何累加
    fn calc_grads_to_parents(
        &self,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError>;

    fn descriptor(&self) -> NodeTypeDescriptor;
}

/// 算子种类（含算子自身的参数），用于`Graph::apply_operator`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    /// 单通道二维互相关（“valid”模式，步长1，无填充）：[输入, 卷积核]
    CrossCorrelate2d,
    /// 张量加上一个标量偏置：[输入, 偏置]
    BroadcastAddScalar,
    /// 任意个同形张量逐元素求和
    ElementwiseSum,
    /// 逐元素激活函数
    Activation(Activation),
}

impl From<OperatorKind> for NodeType {
    fn from(kind: OperatorKind) -> Self {
        match kind {
            OperatorKind::CrossCorrelate2d => CrossCorrelate2d.into(),
            OperatorKind::BroadcastAddScalar => BroadcastAddScalar.into(),
            OperatorKind::ElementwiseSum => ElementwiseSum.into(),
            OperatorKind::Activation(activation) => ElementwiseActivation::new(activation).into(),
        }
    }
}

/// 校验父节点个数，供各算子在`infer_shape`中使用
pub(in crate::nn::nodes) fn check_parents_count(
    type_name: &str,
    parents_shapes: &[&[usize]],
    expected: usize,
    description: &str,
) -> Result<(), GraphError> {
    if parents_shapes.len() != expected {
        return Err(GraphError::InvalidOperation(format!(
            "{type_name}节点需要{expected}个父节点：{description}，实际为{}个",
            parents_shapes.len()
        )));
    }
    Ok(())
}
