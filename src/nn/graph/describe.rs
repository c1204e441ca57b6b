/*
 * @Author       : 老董
 * @Date         : 2026-10-11
 * @Description  : Graph describe/summary 相关方法
 */

use super::Graph;
use crate::nn::descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
use crate::nn::nodes::{NodeHandle, TraitNode};

impl Graph {
    /// 导出图的描述符（用于序列化、调试）
    ///
    /// # 示例
    /// ```ignore
    /// let descriptor = graph.describe();
    /// println!("{}", descriptor.to_json()?);
    /// ```
    pub fn describe(&self) -> GraphDescriptor {
        let mut descriptor = GraphDescriptor::new(&self.name);
        for node in &self.nodes {
            descriptor.add_node(Self::node_descriptor(node));
        }
        descriptor
    }

    /// 返回图摘要的 Markdown 表格
    pub fn summary_markdown(&self) -> String {
        let desc = self.describe();
        let mut output = format!("# 计算图摘要: {}\n\n", desc.name);
        output.push_str("| 节点名称 | 类型 | 输出形状 | 需要梯度 | 父节点 |\n");
        output.push_str("|----------|------|----------|----------|--------|\n");

        for node in &desc.nodes {
            let parent_names = node
                .parents
                .iter()
                .filter_map(|&i| desc.nodes.get(i).map(|p| p.name.as_str()))
                .collect::<Vec<_>>();
            let parent_str = if parent_names.is_empty() {
                "-".to_string()
            } else {
                parent_names.join(", ")
            };
            output.push_str(&format!(
                "| {} | {} | {:?} | {} | {} |\n",
                node.name,
                Self::descriptor_type_name(&node.node_type),
                node.output_shape,
                if node.requires_grad { "是" } else { "否" },
                parent_str
            ));
        }

        output.push_str(&format!("\n**参数量**: {}\n", desc.total_params()));
        output
    }

    fn node_descriptor(node: &NodeHandle) -> NodeDescriptor {
        NodeDescriptor {
            id: node.id().index(),
            name: node.name().to_string(),
            node_type: node.node_type().descriptor(),
            output_shape: node.value().shape().to_vec(),
            parents: node.parents().iter().map(|p| p.index()).collect(),
            requires_grad: node.requires_grad(),
        }
    }

    fn descriptor_type_name(node_type: &NodeTypeDescriptor) -> &'static str {
        match node_type {
            NodeTypeDescriptor::Variable => "Variable",
            NodeTypeDescriptor::Parameter => "Parameter",
            NodeTypeDescriptor::CrossCorrelate2d => "CrossCorrelate2d",
            NodeTypeDescriptor::BroadcastAddScalar => "BroadcastAddScalar",
            NodeTypeDescriptor::ElementwiseSum => "ElementwiseSum",
            NodeTypeDescriptor::Activation { activation } => activation.name(),
        }
    }
}
