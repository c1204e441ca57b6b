/*
 * @Author       : 老董
 * @Date         : 2026-10-10
 * @Description  : Graph 模块：计算图的核心实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、访问器、建图（前向在建图时即时完成）
 * - backward.rs: 梯度播种 + 反向传播
 * - describe.rs: describe/summary
 */

mod backward;
mod core;
mod describe;
mod error;

pub use error::GraphError;

use crate::nn::nodes::NodeHandle;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// 计算图的唯一标识
pub type GraphId = u64;

static GRAPH_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

fn next_graph_id() -> GraphId {
    GRAPH_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// 一次计算所用的计算图
///
/// 节点只追加、不删除：节点的创建顺序（即`nodes`中的下标）同时也是合法的拓扑序，
/// 因为每个算子的父节点都必须先于它存在。整个图随`Graph`一同释放。
///
/// 单个`Graph`不可在多线程间同时做前向/反向，所有修改都经由`&mut self`完成。
pub struct Graph {
    id: GraphId,
    name: String,
    nodes: Vec<NodeHandle>,
    node_names: HashSet<String>,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
