use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{Activation, GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;

/// 逐元素激活函数节点
///
/// forward: Y = f(X)
/// backward: dX = dY ⊙ f'(X, Y)，其中导数可复用已缓存的输出（如 tanh 的 1 - Y²）
#[derive(Debug, Clone)]
pub(in crate::nn) struct ElementwiseActivation {
    activation: Activation,
}

impl ElementwiseActivation {
    pub(in crate::nn) const fn new(activation: Activation) -> Self {
        Self { activation }
    }
}

impl TraitNode for ElementwiseActivation {
    fn type_name(&self) -> &'static str {
        self.activation.name()
    }

    fn name_prefix(&self) -> &'static str {
        self.activation.snake_name()
    }

    fn infer_shape(&self, parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError> {
        check_parents_count(self.type_name(), parents_shapes, 1, "[输入]")?;
        Ok(parents_shapes[0].to_vec())
    }

    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Ok(self.activation.apply(parents[0]))
    }

    fn calc_grads_to_parents(
        &self,
        parents: &[&Tensor],
        value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError> {
        let local_grad = self.activation.apply_derivative(parents[0], value);
        Ok(vec![upstream_grad * &local_grad])
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::Activation {
            activation: self.activation,
        }
    }
}
