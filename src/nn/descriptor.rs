/*
 * @Author       : 老董
 * @Date         : 2026-10-10
 * @Description  : 图描述符（Graph Descriptor）
 *                 计算图拓扑的可序列化快照，用于调试输出
 */

use crate::nn::Activation;
use serde::{Deserialize, Serialize};

/// 图的可序列化描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDescriptor {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 图名称
    pub name: String,
    /// 所有节点描述（按创建顺序，即拓扑序）
    pub nodes: Vec<NodeDescriptor>,
}

/// 节点描述
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDescriptor {
    /// 节点的创建序号
    pub id: usize,
    pub name: String,
    pub node_type: NodeTypeDescriptor,
    pub output_shape: Vec<usize>,
    /// 父节点的创建序号列表（定义拓扑）
    pub parents: Vec<usize>,
    pub requires_grad: bool,
}

/// 节点类型描述（包含类型特定参数）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeTypeDescriptor {
    Variable,
    /// 由层绑定进图的可训练参数
    Parameter,
    CrossCorrelate2d,
    BroadcastAddScalar,
    ElementwiseSum,
    Activation { activation: Activation },
}

impl GraphDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            nodes: Vec::new(),
        }
    }

    pub fn add_node(&mut self, node: NodeDescriptor) {
        self.nodes.push(node);
    }

    /// 参数节点的元素总数。需要梯度的普通输入不计入
    pub fn total_params(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n.node_type, NodeTypeDescriptor::Parameter))
            .map(|n| n.output_shape.iter().product::<usize>())
            .sum()
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
