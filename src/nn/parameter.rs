/*
 * @Author       : 老董
 * @Date         : 2026-10-11
 * @Description  : 可训练参数：值 + 梯度累加器，由层持有并跨越多个计算图存在
 */

use super::{Graph, GraphError, NodeId};
use crate::tensor::Tensor;

/// 可训练参数
///
/// 每次前向时，参数的值被**拷贝**进当次的计算图成为一个参数节点
/// （见`bind`）；反向传播后，由所属层把该节点的梯度累加回本参数的`grad`。
/// 之后修改参数的值不会影响已经建好的节点。
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Tensor,
    grad: Option<Tensor>,
}

impl Parameter {
    pub fn new(name: &str, value: Tensor) -> Self {
        Self {
            name: name.to_string(),
            value,
            grad: None,
        }
    }

    pub fn zeros(name: &str, shape: &[usize]) -> Self {
        Self::new(name, Tensor::zeros(shape))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn value(&self) -> &Tensor {
        &self.value
    }

    /// 直接修改参数的值（形状不应被改变）
    pub fn value_mut(&mut self) -> &mut Tensor {
        &mut self.value
    }

    /// 整体替换参数的值，形状必须与原值一致
    pub fn set_value(&mut self, value: Tensor) -> Result<(), GraphError> {
        if !self.value.is_same_shape(&value) {
            return Err(GraphError::ShapeMismatch {
                expected: self.value.shape().to_vec(),
                got: value.shape().to_vec(),
                message: format!("参数{}的新值必须与原值形状一致", self.name),
            });
        }
        self.value = value;
        Ok(())
    }

    /// 从未累积过梯度时返回`None`
    pub const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub fn zero_grad(&mut self) {
        self.grad = None;
    }

    /// 将`grad`累加到本参数的梯度上
    pub fn accumulate_grad(&mut self, grad: &Tensor) -> Result<(), GraphError> {
        if !self.value.is_same_shape(grad) {
            return Err(GraphError::ShapeMismatch {
                expected: self.value.shape().to_vec(),
                got: grad.shape().to_vec(),
                message: format!("参数{}的梯度形状必须与其值一致", self.name),
            });
        }
        match &mut self.grad {
            Some(existing_grad) => *existing_grad += grad,
            None => self.grad = Some(grad.clone()),
        }
        Ok(())
    }

    /// 将参数当前的值作为参数节点（需要梯度的叶子）放入`graph`。
    /// 节点名称为参数名，若图中已有同名节点则自动命名
    pub fn bind(&self, graph: &mut Graph) -> Result<NodeId, GraphError> {
        match graph.new_parameter(self.value.clone(), Some(&self.name)) {
            Err(GraphError::DuplicateNodeName(_)) => graph.new_parameter(self.value.clone(), None),
            result => result,
        }
    }
}
