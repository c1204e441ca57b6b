use crate::assert_err;
use crate::nn::{Activation, Conv2d, Conv2dConfig, Graph, GraphError, Init, Module, NodeId};
use crate::tensor::Tensor;

fn new_inputs(graph: &mut Graph, count: usize, shape: &[usize]) -> Vec<NodeId> {
    (0..count)
        .map(|c| {
            let value = Init::Constant(c as f32 + 1.).generate(shape);
            graph.new_variable(value, false, None).unwrap()
        })
        .collect()
}

#[test]
fn test_conv2d_creation() {
    let conv = Conv2d::new(3, 2, 2, 2, Activation::Tanh).unwrap();
    assert_eq!(conv.in_channels(), 3);
    assert_eq!(conv.out_channels(), 2);
    assert_eq!(conv.kernel_size(), (2, 2));
    assert_eq!(conv.activation(), Activation::Tanh);

    // 每对（输出通道，输入通道）一个卷积核和一个偏置，全部初始化为0
    assert_eq!(conv.kernels().len(), 6);
    assert_eq!(conv.biases().len(), 6);
    assert_eq!(conv.parameters().len(), 12);
    assert_eq!(conv.num_params(), 6 * 4 + 6);
    assert!(conv.kernels().iter().all(|k| k.value() == &Tensor::zeros(&[2, 2])));
    assert!(conv.biases().iter().all(|b| b.value() == &Tensor::zeros(&[1, 1])));

    // 下标 o * in_channels + c
    assert_eq!(conv.kernel(1, 2).unwrap().name(), conv.kernels()[5].name());
    assert_eq!(conv.bias(0, 1).unwrap().name(), conv.biases()[1].name());
    assert!(conv.kernel(2, 0).is_none());
    assert!(conv.bias(0, 3).is_none());
}

#[test]
fn test_conv2d_invalid_config() {
    assert_err!(
        Conv2d::new(0, 2, 2, 2, Activation::Tanh),
        GraphError::InvalidOperation(msg) if msg.contains("必须大于0")
    );
    assert_err!(
        Conv2d::new(1, 1, 0, 2, Activation::Identity),
        GraphError::InvalidOperation(_)
    );
}

#[test]
fn test_conv2d_config_json() {
    let config = Conv2dConfig::from_json(
        r#"{"in_channels": 3, "out_channels": 2, "kernel_size": [2, 2], "activation": "Tanh"}"#,
    )
    .unwrap();
    assert_eq!(
        config,
        Conv2dConfig {
            in_channels: 3,
            out_channels: 2,
            kernel_size: (2, 2),
            activation: Activation::Tanh,
        }
    );
    let conv = Conv2d::from_config(config).unwrap();
    assert_eq!(conv.config(), &config);

    // 缺省激活函数为 Identity
    let config =
        Conv2dConfig::from_json(r#"{"in_channels": 1, "out_channels": 1, "kernel_size": [3, 1]}"#)
            .unwrap();
    assert_eq!(config.activation, Activation::Identity);
    assert_eq!(Conv2dConfig::from_json(&config.to_json().unwrap()).unwrap(), config);

    assert_err!(
        Conv2dConfig::from_json(r#"{"in_channels": 1}"#),
        GraphError::Config(_)
    );
}

#[test]
fn test_conv2d_forward_single_channel() {
    // in=1, out=1, 1×1 卷积核：y = 2x + 1
    let mut conv = Conv2d::new(1, 1, 1, 1, Activation::Identity).unwrap();
    conv.kernel_mut(0, 0).unwrap().set_value(Tensor::scalar(2.)).unwrap();
    conv.bias_mut(0, 0).unwrap().set_value(Tensor::scalar(1.)).unwrap();

    let mut graph = Graph::new();
    let x = graph
        .new_variable(Tensor::new(&[1., 2., 3., 4.], &[2, 2]), false, None)
        .unwrap();
    let out = conv.forward(&mut graph, &[x]).unwrap();

    assert_eq!(out.outputs().len(), 1);
    assert_eq!(
        graph.value(out.outputs()[0]).unwrap(),
        &Tensor::new(&[3., 5., 7., 9.], &[2, 2])
    );

    graph.backward(out.outputs()[0], None).unwrap();
    conv.collect_grads(&graph, &out).unwrap();
    // dK = Σ x，db = 元素个数
    assert_eq!(conv.kernel(0, 0).unwrap().grad(), Some(&Tensor::scalar(10.)));
    assert_eq!(conv.bias(0, 0).unwrap().grad(), Some(&Tensor::scalar(4.)));
}

#[test]
fn test_conv2d_forward_structure() {
    let mut conv = Conv2d::new(3, 2, 2, 2, Activation::Tanh).unwrap();
    conv.init_params_seeded(&Init::Normal { mean: 0., std: 0.1 }, &Init::Constant(0.1), 7).unwrap();

    let mut graph = Graph::new();
    let inputs = new_inputs(&mut graph, 3, &[4, 5]);
    let out = conv.forward(&mut graph, &inputs).unwrap();

    assert_eq!(out.outputs().len(), 2);
    assert_eq!(out.kernel_nodes().len(), 6);
    assert_eq!(out.bias_nodes().len(), 6);
    // 输入3 + 参数12 + 每个输出通道（3个卷积 + 3个加偏置 + 1个求和 + 1个激活）
    assert_eq!(graph.node_count(), 3 + 12 + 2 * 8);
    for &y in out.outputs() {
        assert_eq!(graph.value(y).unwrap().shape(), &[3, 4]);
        assert_eq!(graph.node_name(y).unwrap().split('_').next(), Some("tanh"));
    }

    // 绑定的参数节点与层内参数一一对应
    for (i, &node) in out.kernel_nodes().iter().enumerate() {
        assert_eq!(graph.value(node).unwrap(), conv.kernels()[i].value());
        assert!(graph.requires_grad(node).unwrap());
    }
    assert_eq!(
        graph.value(out.bias_nodes()[4]).unwrap(),
        &Tensor::scalar(0.1)
    );
}

#[test]
fn test_conv2d_forward_errors_leave_graph_unchanged() {
    let conv = Conv2d::new(2, 1, 3, 3, Activation::ReLU).unwrap();
    let mut graph = Graph::new();
    let a = graph.new_variable(Tensor::ones(&[4, 4]), false, None).unwrap();
    let b = graph.new_variable(Tensor::ones(&[4, 3]), false, None).unwrap();
    let small_1 = graph.new_variable(Tensor::ones(&[2, 5]), false, None).unwrap();
    let small_2 = graph.new_variable(Tensor::ones(&[2, 5]), false, None).unwrap();
    let nodes_before = graph.node_count();

    // 1. 输入个数不对
    assert_err!(
        conv.forward(&mut graph, &[a]),
        GraphError::InvalidOperation("Conv2d需要2个输入通道，实际为1个")
    );
    // 2. 输入形状不一致
    assert_err!(
        conv.forward(&mut graph, &[a, b]),
        GraphError::ShapeMismatch([4, 4], [4, 3], "Conv2d的所有输入通道形状必须相同")
    );
    // 3. 卷积核大于输入
    assert_err!(
        conv.forward(&mut graph, &[small_1, small_2]),
        GraphError::ShapeMismatch([2, 5], [3, 3], "卷积核（3×3）不能大于输入（2×5）")
    );
    // 4. 输入来自其它图
    let mut other = Graph::new();
    let foreign = other.new_variable(Tensor::ones(&[4, 4]), false, None).unwrap();
    assert_err!(
        conv.forward(&mut graph, &[a, foreign]),
        GraphError::InvalidOperandReference(foreign)
    );

    assert_eq!(graph.node_count(), nodes_before);
}

#[test]
fn test_conv2d_forward_rejects_reshaped_params() {
    let mut graph = Graph::new();
    let x = graph.new_variable(Tensor::ones(&[3, 3]), false, None).unwrap();

    // 1. 卷积核被外部改成了比输入还大的形状
    let mut conv = Conv2d::new(1, 1, 2, 2, Activation::Tanh).unwrap();
    *conv.kernel_mut(0, 0).unwrap().value_mut() = Tensor::zeros(&[5, 5]);
    assert_err!(
        conv.forward(&mut graph, &[x]),
        GraphError::ShapeMismatch([2, 2], [5, 5], "卷积核conv2d_K_0_0的形状与层配置不一致")
    );
    assert_eq!(graph.node_count(), 1);

    // 2. 偏置不再是标量
    let mut conv = Conv2d::new(1, 1, 2, 2, Activation::Tanh).unwrap();
    *conv.bias_mut(0, 0).unwrap().value_mut() = Tensor::zeros(&[1, 2]);
    assert_err!(
        conv.forward(&mut graph, &[x]),
        GraphError::ShapeMismatch([1, 1], [1, 2], "偏置conv2d_B_0_0必须是标量")
    );
    assert_eq!(graph.node_count(), 1);

    // 形状恢复后可正常建图
    conv.bias_mut(0, 0).unwrap().value_mut().clone_from(&Tensor::zeros(&[1, 1]));
    assert!(conv.forward(&mut graph, &[x]).is_ok());
    assert!(graph.node_count() > 1);
}

#[test]
fn test_conv2d_init_params_rejects_invalid_init() {
    let mut conv = Conv2d::new(2, 1, 2, 2, Activation::Tanh).unwrap();
    conv.init_params(&Init::Constant(0.5), &Init::Constant(0.5)).unwrap();
    let before = conv.clone();

    assert_err!(
        conv.init_params(&Init::Uniform { min: 1., max: -1. }, &Init::Zeros),
        GraphError::InvalidOperation(msg) if msg.contains("Uniform")
    );
    // 偏置策略非法时卷积核也不应被改动
    assert_err!(
        conv.init_params_seeded(&Init::Zeros, &Init::Normal { mean: 0., std: -1. }, 5),
        GraphError::InvalidOperation(_)
    );
    for (param, old) in conv.parameters().iter().zip(before.parameters()) {
        assert_eq!(param.value(), old.value());
    }
}

#[test]
fn test_conv2d_output_channels_are_independent() {
    let mut conv = Conv2d::new(1, 2, 2, 2, Activation::Identity).unwrap();
    conv.init_params_seeded(&Init::Uniform { min: -1., max: 1. }, &Init::Uniform { min: -1., max: 1. }, 3).unwrap();

    let mut graph = Graph::new();
    let inputs = new_inputs(&mut graph, 1, &[3, 3]);
    let out = conv.forward(&mut graph, &inputs).unwrap();

    // 只对第0个输出通道反向传播，第1个输出通道的参数收不到梯度
    graph.backward(out.outputs()[0], None).unwrap();
    conv.collect_grads(&graph, &out).unwrap();
    assert!(conv.kernel(0, 0).unwrap().grad().is_some());
    assert!(conv.bias(0, 0).unwrap().grad().is_some());
    assert_eq!(conv.kernel(1, 0).unwrap().grad(), None);
    assert_eq!(conv.bias(1, 0).unwrap().grad(), None);
}

#[test]
fn test_conv2d_collect_grads_across_graphs() {
    let mut conv = Conv2d::new(2, 1, 2, 2, Activation::Tanh).unwrap();
    conv.init_params_seeded(&Init::Normal { mean: 0., std: 0.5 }, &Init::Zeros, 11).unwrap();

    let run = |conv: &Conv2d| {
        let mut graph = Graph::new();
        let inputs = new_inputs(&mut graph, 2, &[3, 3]);
        let out = conv.forward(&mut graph, &inputs).unwrap();
        graph.backward(out.outputs()[0], None).unwrap();
        (graph, out)
    };

    // 第一次
    let (graph_1, out_1) = run(&conv);
    conv.collect_grads(&graph_1, &out_1).unwrap();
    let first: Vec<Tensor> = conv
        .parameters()
        .iter()
        .map(|p| p.grad().cloned().unwrap())
        .collect();

    // 第二次用新图：参数梯度在层上累加
    let (graph_2, out_2) = run(&conv);
    conv.collect_grads(&graph_2, &out_2).unwrap();
    for (param, first_grad) in conv.parameters().iter().zip(&first) {
        assert_eq!(param.grad(), Some(&(first_grad * 2.)));
    }

    // 显式清空
    conv.zero_grad();
    assert!(conv.parameters().iter().all(|p| p.grad().is_none()));

    // 与其它层的输出不匹配
    let other = Conv2d::new(1, 1, 2, 2, Activation::Tanh).unwrap();
    let mut graph_3 = Graph::new();
    let inputs = new_inputs(&mut graph_3, 1, &[3, 3]);
    let other_out = other.forward(&mut graph_3, &inputs).unwrap();
    assert_err!(
        conv.collect_grads(&graph_3, &other_out),
        GraphError::InvalidOperation(_)
    );
}
