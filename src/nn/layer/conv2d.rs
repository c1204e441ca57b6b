/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Conv2d (多通道二维卷积) 层
 *
 * 输入/输出形状：
 * - 输入：in_channels 个形状均为 [H, W] 的节点
 * - 输出：out_channels 个形状均为 [H - kH + 1, W - kW + 1] 的节点
 *
 * 计算：outputs[o] = act( Σ_c ( xcorr(inputs[c], K[o,c]) + B[o,c] ) )
 */

use crate::nn::{Activation, Graph, GraphError, Init, Module, NodeId, Parameter};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Conv2d 层的配置，可与 JSON 互相转换
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conv2dConfig {
    pub in_channels: usize,
    pub out_channels: usize,
    /// (kH, kW)
    pub kernel_size: (usize, usize),
    #[serde(default)]
    pub activation: Activation,
}

impl Conv2dConfig {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        serde_json::from_str(json).map_err(|e| GraphError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, GraphError> {
        serde_json::to_string_pretty(self).map_err(|e| GraphError::Config(e.to_string()))
    }
}

/// 一次`Conv2d::forward`建出的节点
///
/// `kernel_nodes`与`bias_nodes`按`o * in_channels + c`排列，
/// 与层内参数的顺序一致，供`Conv2d::collect_grads`取回梯度
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conv2dOutput {
    outputs: Vec<NodeId>,
    kernel_nodes: Vec<NodeId>,
    bias_nodes: Vec<NodeId>,
}

impl Conv2dOutput {
    /// 每个输出通道一个节点
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    pub fn kernel_nodes(&self) -> &[NodeId] {
        &self.kernel_nodes
    }

    pub fn bias_nodes(&self) -> &[NodeId] {
        &self.bias_nodes
    }
}

/// Conv2d (多通道二维卷积) 层
///
/// 对每一对（输出通道o, 输入通道c）各持有一个 [kH, kW] 的卷积核和一个标量偏置。
/// 参数归层所有，可跨越多个计算图使用：每次`forward`把参数的值绑定进当次的图，
/// 反向传播后再用`collect_grads`把梯度累加回参数。
///
/// # 使用示例
/// ```ignore
/// let mut conv = Conv2d::new(3, 2, 2, 2, Activation::Tanh)?;
/// conv.init_params(&Init::Normal { mean: 0.0, std: 0.1 }, &Init::Zeros)?;
///
/// let mut graph = Graph::new();
/// let inputs = /* 3 个 [H, W] 的 Variable 节点 */;
/// let out = conv.forward(&mut graph, &inputs)?;
/// for &y in out.outputs() {
///     graph.backward(y, None)?;
/// }
/// conv.collect_grads(&graph, &out)?;
/// ```
#[derive(Debug, Clone)]
pub struct Conv2d {
    config: Conv2dConfig,
    /// 按`o * in_channels + c`排列
    kernels: Vec<Parameter>,
    /// 按`o * in_channels + c`排列，每个都是 [1, 1]
    biases: Vec<Parameter>,
}

impl Conv2d {
    /// 创建新的 Conv2d 层，所有参数初始化为0
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_h`, `kernel_w`: 卷积核大小
    /// - `activation`: 输出上使用的激活函数
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_h: usize,
        kernel_w: usize,
        activation: Activation,
    ) -> Result<Self, GraphError> {
        Self::from_config(Conv2dConfig {
            in_channels,
            out_channels,
            kernel_size: (kernel_h, kernel_w),
            activation,
        })
    }

    pub fn from_config(config: Conv2dConfig) -> Result<Self, GraphError> {
        let (k_h, k_w) = config.kernel_size;
        if config.in_channels == 0 || config.out_channels == 0 || k_h == 0 || k_w == 0 {
            return Err(GraphError::InvalidOperation(format!(
                "Conv2d的通道数与卷积核大小都必须大于0，实际为：输入通道{}，输出通道{}，卷积核{}×{}",
                config.in_channels, config.out_channels, k_h, k_w
            )));
        }

        let mut kernels = Vec::with_capacity(config.in_channels * config.out_channels);
        let mut biases = Vec::with_capacity(config.in_channels * config.out_channels);
        for o in 0..config.out_channels {
            for c in 0..config.in_channels {
                kernels.push(Parameter::zeros(&format!("conv2d_K_{o}_{c}"), &[k_h, k_w]));
                biases.push(Parameter::zeros(&format!("conv2d_B_{o}_{c}"), &[1, 1]));
            }
        }

        Ok(Self {
            config,
            kernels,
            biases,
        })
    }

    /// 用给定策略重新初始化所有参数（使用全局 RNG）
    ///
    /// 初始化参数非法时返回错误，层内参数保持不变
    pub fn init_params(&mut self, kernel_init: &Init, bias_init: &Init) -> Result<(), GraphError> {
        kernel_init.check()?;
        bias_init.check()?;
        for kernel in &mut self.kernels {
            *kernel.value_mut() = kernel_init.generate(kernel.value().shape());
        }
        for bias in &mut self.biases {
            *bias.value_mut() = bias_init.generate(&[1, 1]);
        }
        Ok(())
    }

    /// 用给定策略重新初始化所有参数（带种子，确保可重复性）
    pub fn init_params_seeded(
        &mut self,
        kernel_init: &Init,
        bias_init: &Init,
        seed: u64,
    ) -> Result<(), GraphError> {
        kernel_init.check()?;
        bias_init.check()?;
        let mut rng = StdRng::seed_from_u64(seed);
        for kernel in &mut self.kernels {
            *kernel.value_mut() = kernel_init.generate_with_rng(kernel.value().shape(), &mut rng);
        }
        for bias in &mut self.biases {
            *bias.value_mut() = bias_init.generate_with_rng(&[1, 1], &mut rng);
        }
        Ok(())
    }

    /// 前向传播：在`graph`中建出整个卷积层，返回各输出通道的节点
    ///
    /// # 参数
    /// - `inputs`: `in_channels`个同形的 [H, W] 节点
    ///
    /// 所有校验都在往图中添加任何节点之前完成，出错时计算图不会被修改
    pub fn forward(&self, graph: &mut Graph, inputs: &[NodeId]) -> Result<Conv2dOutput, GraphError> {
        let in_channels = self.config.in_channels;
        if inputs.len() != in_channels {
            return Err(GraphError::InvalidOperation(format!(
                "Conv2d需要{}个输入通道，实际为{}个",
                in_channels,
                inputs.len()
            )));
        }

        // 1. 校验输入
        let input_shape = graph.value(inputs[0])?.shape().to_vec();
        for &input in &inputs[1..] {
            let shape = graph.value(input)?.shape();
            if shape != input_shape.as_slice() {
                return Err(GraphError::ShapeMismatch {
                    expected: input_shape,
                    got: shape.to_vec(),
                    message: "Conv2d的所有输入通道形状必须相同".to_string(),
                });
            }
        }
        let (k_h, k_w) = self.config.kernel_size;
        if k_h > input_shape[0] || k_w > input_shape[1] {
            return Err(GraphError::ShapeMismatch {
                expected: input_shape.clone(),
                got: vec![k_h, k_w],
                message: format!(
                    "卷积核（{}×{}）不能大于输入（{}×{}）",
                    k_h, k_w, input_shape[0], input_shape[1]
                ),
            });
        }

        // 1.1 参数的值可被外部修改，须确认其形状仍与配置一致
        for (kernel, bias) in self.kernels.iter().zip(&self.biases) {
            if kernel.value().shape() != [k_h, k_w] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![k_h, k_w],
                    got: kernel.value().shape().to_vec(),
                    message: format!("卷积核{}的形状与层配置不一致", kernel.name()),
                });
            }
            if bias.value().shape() != [1, 1] {
                return Err(GraphError::ShapeMismatch {
                    expected: vec![1, 1],
                    got: bias.value().shape().to_vec(),
                    message: format!("偏置{}必须是标量", bias.name()),
                });
            }
        }

        // 2. 绑定参数
        let kernel_nodes = self
            .kernels
            .iter()
            .map(|k| k.bind(graph))
            .collect::<Result<Vec<_>, _>>()?;
        let bias_nodes = self
            .biases
            .iter()
            .map(|b| b.bind(graph))
            .collect::<Result<Vec<_>, _>>()?;

        // 3. 逐输出通道建图，各输出通道之间只共享输入节点
        let mut outputs = Vec::with_capacity(self.config.out_channels);
        for o in 0..self.config.out_channels {
            let mut terms = Vec::with_capacity(in_channels);
            for (c, &input) in inputs.iter().enumerate() {
                let i = o * in_channels + c;
                let conv = graph.cross_correlate2d(input, kernel_nodes[i], None)?;
                terms.push(graph.broadcast_add_scalar(conv, bias_nodes[i], None)?);
            }
            let pre_activation = graph.elementwise_sum(&terms, None)?;
            outputs.push(graph.activation(pre_activation, self.config.activation, None)?);
        }

        Ok(Conv2dOutput {
            outputs,
            kernel_nodes,
            bias_nodes,
        })
    }

    /// 把`output`中各参数节点在`graph`里累积的梯度累加到本层参数上。
    /// 没有收到梯度的节点跳过
    pub fn collect_grads(&mut self, graph: &Graph, output: &Conv2dOutput) -> Result<(), GraphError> {
        if output.kernel_nodes.len() != self.kernels.len() || output.bias_nodes.len() != self.biases.len() {
            return Err(GraphError::InvalidOperation(format!(
                "Conv2dOutput的参数节点个数（{}个卷积核，{}个偏置）与本层参数个数（各{}个）不一致",
                output.kernel_nodes.len(),
                output.bias_nodes.len(),
                self.kernels.len()
            )));
        }

        let pairs = self
            .kernels
            .iter_mut()
            .zip(&output.kernel_nodes)
            .chain(self.biases.iter_mut().zip(&output.bias_nodes));
        for (param, &node) in pairs {
            if let Some(grad) = graph.grad(node)? {
                param.accumulate_grad(grad)?;
            }
        }
        Ok(())
    }

    pub const fn config(&self) -> &Conv2dConfig {
        &self.config
    }

    pub const fn in_channels(&self) -> usize {
        self.config.in_channels
    }

    pub const fn out_channels(&self) -> usize {
        self.config.out_channels
    }

    pub const fn kernel_size(&self) -> (usize, usize) {
        self.config.kernel_size
    }

    pub const fn activation(&self) -> Activation {
        self.config.activation
    }

    /// 获取（输出通道o, 输入通道c）对应的卷积核
    pub fn kernel(&self, o: usize, c: usize) -> Option<&Parameter> {
        self.pair_index(o, c).map(|i| &self.kernels[i])
    }

    pub fn kernel_mut(&mut self, o: usize, c: usize) -> Option<&mut Parameter> {
        self.pair_index(o, c).map(|i| &mut self.kernels[i])
    }

    /// 获取（输出通道o, 输入通道c）对应的偏置
    pub fn bias(&self, o: usize, c: usize) -> Option<&Parameter> {
        self.pair_index(o, c).map(|i| &self.biases[i])
    }

    pub fn bias_mut(&mut self, o: usize, c: usize) -> Option<&mut Parameter> {
        self.pair_index(o, c).map(|i| &mut self.biases[i])
    }

    pub fn kernels(&self) -> &[Parameter] {
        &self.kernels
    }

    pub fn biases(&self) -> &[Parameter] {
        &self.biases
    }

    const fn pair_index(&self, o: usize, c: usize) -> Option<usize> {
        if o < self.config.out_channels && c < self.config.in_channels {
            Some(o * self.config.in_channels + c)
        } else {
            None
        }
    }
}

impl Module for Conv2d {
    fn parameters(&self) -> Vec<&Parameter> {
        self.kernels.iter().chain(&self.biases).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
        self.kernels.iter_mut().chain(&mut self.biases).collect()
    }
}
