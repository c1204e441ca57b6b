use super::TraitNode;
use crate::nn::{GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;

/// 叶子节点。其值在创建时由调用方给定，之后不再被计算图修改。
/// 由层绑定进来的可训练参数会被标记为`is_parameter`，其余（如输入）则不会
#[derive(Debug, Clone)]
pub(in crate::nn) struct Variable {
    is_parameter: bool,
}

impl Variable {
    pub(in crate::nn) const fn input() -> Self {
        Self {
            is_parameter: false,
        }
    }

    pub(in crate::nn) const fn parameter() -> Self {
        Self { is_parameter: true }
    }
}

impl TraitNode for Variable {
    fn type_name(&self) -> &'static str {
        if self.is_parameter {
            "Parameter"
        } else {
            "Variable"
        }
    }

    fn name_prefix(&self) -> &'static str {
        if self.is_parameter {
            "parameter"
        } else {
            "variable"
        }
    }

    fn infer_shape(&self, _parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError> {
        Err(GraphError::InvalidOperation(
            "Variable节点没有父节点，其值只能在创建时指定".to_string(),
        ))
    }

    fn calc_value_by_parents(&self, _parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        Err(GraphError::InvalidOperation(
            "Variable节点没有父节点，其值只能在创建时指定".to_string(),
        ))
    }

    fn calc_grads_to_parents(
        &self,
        _parents: &[&Tensor],
        _value: &Tensor,
        _upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError> {
        Ok(Vec::new())
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        if self.is_parameter {
            NodeTypeDescriptor::Parameter
        } else {
            NodeTypeDescriptor::Variable
        }
    }
}
