/*
 * @Author       : 老董
 * @Date         : 2026-10-11
 * @Description  : Graph 反向传播：梯度播种 + 按创建逆序的一次性遍历
 */

use super::{Graph, GraphError};
use crate::nn::NodeId;
use crate::nn::nodes::TraitNode;
use crate::tensor::Tensor;

impl Graph {
    /// 给节点播种梯度（累加到其已有梯度上，而非覆盖）。
    /// 对同一节点多次播种等价于播种它们的和
    pub fn seed_grad(&mut self, node: NodeId, grad: &Tensor) -> Result<(), GraphError> {
        self.get_node_mut(node)?.accumulate_grad(grad)
    }

    /// 从`node`开始反向传播：先以`grad`（为`None`时用与节点同形的全1张量）播种，
    /// 再执行`backward_all`
    pub fn backward(&mut self, node: NodeId, grad: Option<&Tensor>) -> Result<(), GraphError> {
        match grad {
            Some(grad) => self.seed_grad(node, grad)?,
            None => {
                let ones = Tensor::ones(self.value(node)?.shape());
                self.seed_grad(node, &ones)?;
            }
        }
        self.backward_all()
    }

    /// 将所有已播种的梯度传播到整张图
    ///
    /// 按创建顺序的逆序访问每个节点恰好一次：由于子节点总是晚于父节点创建，
    /// 访问到某节点时，它从所有下游收到的梯度都已累加完毕。
    /// 没有梯度的节点（未被播种、也没有下游传来梯度）直接跳过。
    ///
    /// 注意：本方法不会清空已有梯度。在同一张图上再次调用会把当前累积的梯度再传播一遍，
    /// 如需从头开始，请先调用`zero_grad`
    pub fn backward_all(&mut self) -> Result<(), GraphError> {
        let mut processed = 0;
        let mut skipped = 0;

        for index in (0..self.nodes.len()).rev() {
            let node = &self.nodes[index];
            let Some(upstream_grad) = node.grad() else {
                skipped += 1;
                continue;
            };
            // 叶子节点、以及不追踪梯度的子图都不必再往上传
            if node.is_leaf() || !node.requires_grad() {
                processed += 1;
                continue;
            }

            let parent_ids = node.parents().to_vec();
            let parents_values = parent_ids
                .iter()
                .map(|&id| self.get_node(id).map(|p| p.value()))
                .collect::<Result<Vec<_>, _>>()?;
            let grads_to_parents = node.node_type().calc_grads_to_parents(
                &parents_values,
                node.value(),
                upstream_grad,
            )?;

            // 同一父节点出现多次（如`sum(a, a)`）时，每次出现的贡献都会累加
            for (parent_id, grad) in parent_ids.into_iter().zip(grads_to_parents) {
                let parent = self.get_node_mut(parent_id)?;
                if parent.requires_grad() {
                    parent.accumulate_grad(&grad)?;
                }
            }
            processed += 1;
        }

        if processed == 0 {
            log::warn!("图{}中没有任何节点被播种梯度，反向传播未做任何事", self.name);
        }
        log::debug!(
            "图{}反向传播完成：处理了{}个节点，跳过了{}个节点",
            self.name,
            processed,
            skipped
        );
        Ok(())
    }

    /// 清空图中所有节点的梯度（唯一会清空梯度的方法）
    pub fn zero_grad(&mut self) {
        for node in &mut self.nodes {
            node.clear_grad();
        }
    }
}
