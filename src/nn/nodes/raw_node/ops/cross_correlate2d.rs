/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : 单通道二维互相关节点（即深度学习中通常所说的“卷积”）
 *
 * 约定：“valid”模式，步长为1，无填充
 * - 输入 X：[H, W]
 * - 卷积核 K：[kH, kW]，须满足 kH ≤ H 且 kW ≤ W
 * - 输出 O：[H - kH + 1, W - kW + 1]
 *
 * 父节点：
 * - parents[0]: 输入
 * - parents[1]: 卷积核
 */

use crate::nn::nodes::raw_node::{TraitNode, check_parents_count};
use crate::nn::{GraphError, NodeTypeDescriptor};
use crate::tensor::Tensor;

#[derive(Debug, Clone)]
pub(in crate::nn) struct CrossCorrelate2d;

impl TraitNode for CrossCorrelate2d {
    fn type_name(&self) -> &'static str {
        "CrossCorrelate2d"
    }

    fn name_prefix(&self) -> &'static str {
        "cross_correlate2d"
    }

    fn infer_shape(&self, parents_shapes: &[&[usize]]) -> Result<Vec<usize>, GraphError> {
        check_parents_count(self.type_name(), parents_shapes, 2, "[输入, 卷积核]")?;

        let (input_shape, kernel_shape) = (parents_shapes[0], parents_shapes[1]);
        let (input_h, input_w) = (input_shape[0], input_shape[1]);
        let (kernel_h, kernel_w) = (kernel_shape[0], kernel_shape[1]);

        if kernel_h == 0 || kernel_w == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "卷积核的尺寸不能为0，实际为{kernel_h}×{kernel_w}"
            )));
        }
        if kernel_h > input_h || kernel_w > input_w {
            return Err(GraphError::ShapeMismatch {
                expected: input_shape.to_vec(),
                got: kernel_shape.to_vec(),
                message: format!(
                    "卷积核（{kernel_h}×{kernel_w}）不能大于输入（{input_h}×{input_w}）"
                ),
            });
        }

        Ok(vec![input_h - kernel_h + 1, input_w - kernel_w + 1])
    }

    /// O[i, j] = Σ_{u,v} X[i+u, j+v]·K[u, v]
    fn calc_value_by_parents(&self, parents: &[&Tensor]) -> Result<Tensor, GraphError> {
        let (input, kernel) = (parents[0], parents[1]);
        let (kernel_h, kernel_w) = (kernel.rows(), kernel.cols());
        let (out_h, out_w) = (input.rows() - kernel_h + 1, input.cols() - kernel_w + 1);

        let mut output = Tensor::zeros(&[out_h, out_w]);
        for i in 0..out_h {
            for j in 0..out_w {
                let mut sum = 0.0f32;
                for u in 0..kernel_h {
                    for v in 0..kernel_w {
                        sum += input[[i + u, j + v]] * kernel[[u, v]];
                    }
                }
                output[[i, j]] = sum;
            }
        }
        Ok(output)
    }

    /// 对于 O = X ⋆ K:
    /// - dX[i+u, j+v] += dO[i, j]·K[u, v]
    /// - dK[u, v] += Σ_{i,j} dO[i, j]·X[i+u, j+v]
    fn calc_grads_to_parents(
        &self,
        parents: &[&Tensor],
        _value: &Tensor,
        upstream_grad: &Tensor,
    ) -> Result<Vec<Tensor>, GraphError> {
        let (input, kernel) = (parents[0], parents[1]);
        let (kernel_h, kernel_w) = (kernel.rows(), kernel.cols());

        let mut input_grad = Tensor::zeros(input.shape());
        let mut kernel_grad = Tensor::zeros(kernel.shape());
        for i in 0..upstream_grad.rows() {
            for j in 0..upstream_grad.cols() {
                let grad_val = upstream_grad[[i, j]];
                for u in 0..kernel_h {
                    for v in 0..kernel_w {
                        input_grad[[i + u, j + v]] += grad_val * kernel[[u, v]];
                        kernel_grad[[u, v]] += grad_val * input[[i + u, j + v]];
                    }
                }
            }
        }
        Ok(vec![input_grad, kernel_grad])
    }

    fn descriptor(&self) -> NodeTypeDescriptor {
        NodeTypeDescriptor::CrossCorrelate2d
    }
}
