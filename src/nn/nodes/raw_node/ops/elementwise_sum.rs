use crate::nn::nodes::raw_node::TraitNode;
use crate::nn::{GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;

/// 任意个（至少1个）同形张量的逐元素求和。
/// 反向时每个父节点都原样得到上游梯度（扇出）
#[derive(Debug, Clone)]
pub(in crate::nn) struct ElementwiseSum;

impl TraitNode for ElementwiseSum {
    fn type_name(&self) -> &'static str {
        "ElementwiseSum"
    }

    fn name_prefix(&self) -> &'static str {
        "elementwise_sum"
    }

    fn infer_shape(&self, parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError> {
        let Some(first) = parents_shapes.first() else {
            return Err(GraphError::InvalidOperation(
                "ElementwiseSum节点至少需要1个父节点".to_string(),
            ));
        };

        for shape in parents_shapes.iter().skip(1) {
            if shape != first {
                return Err(GraphError::ShapeMismatch {
                    expected: first.to_vec(),
                    got: shape.to_vec(),
                    message: "ElementwiseSum节点的所有父节点形状必须相同".to_string(),
                });
            }
        }
        Ok(first.to_vec())
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let (first, rest) = parents.split_first().ok_or_else(|| {
            GraphError::InvalidOperation("ElementwiseSum节点至少需要1个父节点".to_string())
        })?;
        let mut sum = (*first).clone();
        for parent in rest {
            sum += *parent;
        }
        Ok(sum)
    }

    fn calc_grads_to_parents(
        &self,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError> {
        Ok(vec![upstream_grad.clone(); parents.len()])
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::ElementwiseSum
    }
}
