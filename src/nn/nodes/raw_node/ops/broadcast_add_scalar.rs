/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : BroadcastAddScalar 节点 - 将一个标量偏置加到输入的每个元素上
 *
 * 数学：Y[i, j] = X[i, j] + b
 * 梯度：dX = dY，db = Σ dY
 */

use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(in crate::nn) struct BroadcastAddScalar;

impl TraitNode for BroadcastAddScalar {
    fn type_name(&self) -> &'static str {
        "BroadcastAddScalar"
    }

    fn name_prefix(&self) -> &'static str {
        "broadcast_add_scalar"
    }

    fn infer_shape(&self, parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError> {
        check_parents_count(self.type_name(), parents_shapes, 2, "[输入, 偏置]")?;

        let bias_shape = parents_shapes[1];
        if bias_shape != [1, 1] {
            return Err(GraphError::ShapeMismatch {
                expected: vec![1, 1],
                got: bias_shape.to_vec(),
                message: "BroadcastAddScalar的偏置必须是标量".to_string(),
            });
        }
        Ok(parents_shapes[0].to_vec())
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let bias = parents[1].number().ok_or_else(|| {
            GraphError::InvalidOperation(format!(
                "BroadcastAddScalar的偏置必须是标量，实际形状为{:?}",
                parents[1].shape()
            ))
        })?;
        Ok(parents[0] + bias)
    }

    fn calc_grads_to_parents(
        &self,
        _parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![
            upstream_grad.clone(),
            Tensor::scalar(upstream_grad.sum()),
        ])
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::BroadcastAddScalar
    }
}
