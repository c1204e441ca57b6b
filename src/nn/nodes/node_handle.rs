use super::raw_node::{NodeType, TraitNode};
use crate::nn::{GraphError, GraphId};
use crate::tensor::Tensor;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 节点引用：所属计算图的id + 节点在图中的创建序号。
/// 只在创建它的那个计算图中有效，用于其它计算图会得到`InvalidOperandReference`错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    graph_id: GraphId,
    index: usize,
}

impl NodeId {
    pub(in crate::nn) const fn new(graph_id: GraphId, index: usize) -> Self {
        Self { graph_id, index }
    }

    pub const fn graph_id(&self) -> GraphId {
        self.graph_id
    }

    /// 节点的创建序号（从0开始），同时也是其在拓扑序中的位置
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@图{}", self.index, self.graph_id)
    }
}

/// 计算图中的一个节点：节点类型 + 父节点引用 + 缓存的值 + 梯度累加器。
/// 父节点只是按id的非拥有引用，所有节点都由Graph独占
#[derive(Debug, Clone)]
pub(in crate::nn) struct NodeHandle {
    id: NodeId,
    name: String,
    raw_node: NodeType,
    parents: Vec<NodeId>,
    /// 建图时即计算好（eager），此后不再改变
    value: Tensor,
    /// 首次收到梯度时才分配
    grad: Option<Tensor>,
    requires_grad: bool,
}

impl NodeHandle {
    pub(in crate::nn) fn new(
        id: NodeId,
        name: String,
        raw_node: NodeType,
        parents: Vec<NodeId>,
        value: Tensor,
        requires_grad: bool,
    ) -> Self {
        Self {
            id,
            name,
            raw_node,
            parents,
            value,
            grad: None,
            requires_grad,
        }
    }

    pub(in crate::nn) const fn id(&self) -> NodeId {
        self.id
    }

    pub(in crate::nn) fn name(&self) -> &str {
        &self.name
    }

    pub(in crate::nn) const fn node_type(&self) -> &NodeType {
        &self.raw_node
    }

    pub(in crate::nn) fn parents(&self) -> &[NodeId] {
        &self.parents
    }

    pub(in crate::nn) const fn value(&self) -> &Tensor {
        &self.value
    }

    pub(in crate::nn) const fn grad(&self) -> Option<&Tensor> {
        self.grad.as_ref()
    }

    pub(in crate::nn) const fn requires_grad(&self) -> bool {
        self.requires_grad
    }

    pub(in crate::nn) const fn is_leaf(&self) -> bool {
        matches!(self.raw_node, NodeType::Variable(_))
    }

    /// 将`grad`累加（而非覆盖）到本节点的梯度上
    pub(in crate::nn) fn accumulate_grad(&mut self, grad: &Tensor) -> Result<(), GraphError> {
        if !self.value.is_same_shape(grad) {
            return Err(GraphError::ShapeMismatch {
                expected: self.value.shape().to_vec(),
                got: grad.shape().to_vec(),
                message: format!("{self}的梯度形状必须与其值的形状一致"),
            });
        }
        match &mut self.grad {
            Some(existing_grad) => *existing_grad += grad,
            None => self.grad = Some(grad.clone()),
        }
        Ok(())
    }

    pub(in crate::nn) fn clear_grad(&mut self) {
        self.grad = None;
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "节点[id={}, name={}, type={}]",
            self.id.index(),
            self.name,
            self.raw_node.type_name()
        )
    }
}
