/*
 * @Author       : 老董
 * @Date         : 2026-10-10
 * @Description  : Graph 核心操作：创建、访问器、建图。
 *                 算子节点在创建时即计算并缓存其值（eager），没有惰性求值
 */

use super::{Graph, GraphError, GraphId, next_graph_id};
use crate::nn::nodes::{NodeHandle, NodeType, OperatorKind, TraitNode};
use crate::nn::nodes::raw_node::Variable;
use crate::nn::{Activation, NodeId};
use crate::tensor::Tensor;
use std::collections::HashSet;

impl Graph {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            id: next_graph_id(),
            name: name.to_string(),
            nodes: Vec::new(),
            node_names: HashSet::new(),
        }
    }

    // ========== 基础访问器 ==========

    pub const fn id(&self) -> GraphId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// 按创建顺序返回所有节点
    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.iter().map(NodeHandle::id).collect()
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        if id.graph_id() != self.id {
            return Err(GraphError::InvalidOperandReference(id));
        }
        self.nodes
            .get(id.index())
            .ok_or(GraphError::InvalidOperandReference(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        if id.graph_id() != self.id {
            return Err(GraphError::InvalidOperandReference(id));
        }
        self.nodes
            .get_mut(id.index())
            .ok_or(GraphError::InvalidOperandReference(id))
    }

    pub fn node_name(&self, id: NodeId) -> Result<&str, GraphError> {
        Ok(self.get_node(id)?.name())
    }

    pub fn parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        Ok(self.get_node(id)?.parents().to_vec())
    }

    /// 获取节点已缓存的值。重复读取返回的是同一份缓存，不会重新计算
    pub fn value(&self, id: NodeId) -> Result<&Tensor, GraphError> {
        Ok(self.get_node(id)?.value())
    }

    /// 获取节点累积的梯度；从未收到过梯度的节点返回`None`
    pub fn grad(&self, id: NodeId) -> Result<Option<&Tensor>, GraphError> {
        Ok(self.get_node(id)?.grad())
    }

    pub fn requires_grad(&self, id: NodeId) -> Result<bool, GraphError> {
        Ok(self.get_node(id)?.requires_grad())
    }

    // ========== 建图 ==========

    /// 创建一个叶子节点（Variable）
    ///
    /// # 参数
    /// - `value`: 节点的值，此后不会被计算图修改
    /// - `requires_grad`: 是否追踪（累积）该节点的梯度
    /// - `name`: 节点名称，`None`则自动生成形如"variable_1"的名称
    pub fn new_variable(
        &mut self,
        value: Tensor,
        requires_grad: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.new_leaf(Variable::input(), value, requires_grad, name)
    }

    /// 创建一个可训练参数节点：需要梯度的叶子节点，且在`describe`中计入参数量。
    /// 自动生成的名称形如"parameter_1"
    pub fn new_parameter(&mut self, value: Tensor, name: Option<&str>) -> Result<NodeId, GraphError> {
        self.new_leaf(Variable::parameter(), value, true, name)
    }

    /// 对`operands`应用算子，立即计算并缓存其值，返回新节点的引用
    ///
    /// 先校验所有操作数引用与形状，任何错误都在修改计算图之前返回
    pub fn apply_operator(
        &mut self,
        kind: OperatorKind,
        operands: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let raw_node: NodeType = kind.into();

        // 1. 校验
        // 1.1 父节点引用须属于本图
        let parents = operands
            .iter()
            .map(|&id| self.get_node(id))
            .collect::<Result<Vec<_>, _>>()?;
        // 1.2 父节点个数、形状须符合算子的约定
        let parents_shapes: Vec<&[usize]> = parents.iter().map(|p| p.value().shape()).collect();
        let expected_shape = raw_node.infer_shape(&parents_shapes)?;
        // 1.3 名称
        let name = self.generate_valid_new_node_name(name, raw_node.name_prefix())?;

        // 2. 前向计算
        let parents_values: Vec<&Tensor> = parents.iter().map(|p| p.value()).collect();
        let value = raw_node.calc_value_by_parents(&parents_values)?;
        if value.shape() != expected_shape.as_slice() {
            return Err(GraphError::ShapeMismatch {
                expected: expected_shape,
                got: value.shape().to_vec(),
                message: format!(
                    "{}节点的计算结果与推断形状不一致。不该触及本错误，否则说明crate代码有问题",
                    raw_node.type_name()
                ),
            });
        }
        let requires_grad = parents.iter().any(|p| p.requires_grad());

        // 3. 追加节点
        Ok(self.push_node(name, raw_node, operands.to_vec(), value, requires_grad))
    }

    /// 互相关（“valid”卷积）：`input`为[H, W]，`kernel`为[kH, kW]
    pub fn cross_correlate2d(
        &mut self,
        input: NodeId,
        kernel: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.apply_operator(OperatorKind::CrossCorrelate2d, &[input, kernel], name)
    }

    /// `input`的每个元素加上标量`bias`（形状为[1, 1]）
    pub fn broadcast_add_scalar(
        &mut self,
        input: NodeId,
        bias: NodeId,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.apply_operator(OperatorKind::BroadcastAddScalar, &[input, bias], name)
    }

    pub fn elementwise_sum(
        &mut self,
        operands: &[NodeId],
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.apply_operator(OperatorKind::ElementwiseSum, operands, name)
    }

    pub fn activation(
        &mut self,
        input: NodeId,
        activation: Activation,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        self.apply_operator(OperatorKind::Activation(activation), &[input], name)
    }

    // ========== 内部辅助 ==========

    fn new_leaf(
        &mut self,
        variable: Variable,
        value: Tensor,
        requires_grad: bool,
        name: Option<&str>,
    ) -> Result<NodeId, GraphError> {
        let raw_node: NodeType = variable.into();
        let name = self.generate_valid_new_node_name(name, raw_node.name_prefix())?;
        Ok(self.push_node(name, raw_node, Vec::new(), value, requires_grad))
    }

    fn push_node(
        &mut self,
        name: String,
        raw_node: NodeType,
        parents: Vec<NodeId>,
        value: Tensor,
        requires_grad: bool,
    ) -> NodeId {
        let id = NodeId::new(self.id, self.nodes.len());
        let node = NodeHandle::new(id, name.clone(), raw_node, parents, value, requires_grad);
        log::debug!("图{}中创建了{}", self.name, node);
        self.nodes.push(node);
        self.node_names.insert(name);
        id
    }

    fn check_duplicate_node_name(&self, name: &str) -> Result<(), GraphError> {
        if self.node_names.contains(name) {
            return Err(GraphError::DuplicateNodeName(format!(
                "节点{}在图{}中重复",
                name,
                self.name()
            )));
        }
        Ok(())
    }

    fn generate_valid_new_node_name(
        &self,
        base_name: Option<&str>,
        node_type: &str,
    ) -> Result<String, GraphError> {
        if let Some(base_name) = base_name.filter(|n| !n.is_empty()) {
            self.check_duplicate_node_name(base_name)?;
            return Ok(base_name.to_string());
        }

        let mut counter = 1;
        loop {
            let name = format!("{node_type}_{counter}");
            if !self.node_names.contains(&name) {
                return Ok(name);
            }
            counter += 1;
        }
    }
}
