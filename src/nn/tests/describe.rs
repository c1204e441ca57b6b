use crate::nn::{Activation, Conv2d, Graph, GraphDescriptor, Module, NodeTypeDescriptor};
use crate::tensor::Tensor;

fn build_graph() -> Graph {
    let mut graph = Graph::with_name("desc_graph");
    // 需要梯度的输入，但不是参数
    let x = graph.new_variable(Tensor::ones(&[4, 4]), true, Some("x")).unwrap();
    let k = graph.new_parameter(Tensor::ones(&[2, 2]), Some("k")).unwrap();
    let b = graph.new_parameter(Tensor::scalar(0.), Some("b")).unwrap();
    let conv = graph.cross_correlate2d(x, k, None).unwrap();
    let add = graph.broadcast_add_scalar(conv, b, None).unwrap();
    let sum = graph.elementwise_sum(&[add], None).unwrap();
    graph.activation(sum, Activation::Tanh, Some("y")).unwrap();
    graph
}

#[test]
fn test_describe() {
    let desc = build_graph().describe();

    assert_eq!(desc.name, "desc_graph");
    assert_eq!(desc.nodes.len(), 7);

    assert_eq!(desc.nodes[0].node_type, NodeTypeDescriptor::Variable);
    assert!(desc.nodes[0].requires_grad);
    assert_eq!(desc.nodes[1].node_type, NodeTypeDescriptor::Parameter);
    assert_eq!(desc.nodes[2].node_type, NodeTypeDescriptor::Parameter);

    let conv = &desc.nodes[3];
    assert_eq!(conv.id, 3);
    assert_eq!(conv.name, "cross_correlate2d_1");
    assert_eq!(conv.node_type, NodeTypeDescriptor::CrossCorrelate2d);
    assert_eq!(conv.output_shape, vec![3, 3]);
    assert_eq!(conv.parents, vec![0, 1]);
    assert!(conv.requires_grad);

    let y = &desc.nodes[6];
    assert_eq!(
        y.node_type,
        NodeTypeDescriptor::Activation {
            activation: Activation::Tanh
        }
    );
    assert_eq!(y.parents, vec![5]);

    // 只计参数 k（4个元素）+ b（1个元素），输入 x 不计入
    assert_eq!(desc.total_params(), 5);
}

#[test]
fn test_describe_json() {
    let desc = build_graph().describe();
    let json = desc.to_json().unwrap();
    assert!(json.contains("\"type\": \"Activation\""));
    assert!(json.contains("\"activation\": \"Tanh\""));
    assert_eq!(GraphDescriptor::from_json(&json).unwrap(), desc);
}

#[test]
fn test_summary_markdown() {
    let summary = build_graph().summary_markdown();
    assert!(summary.starts_with("# 计算图摘要: desc_graph"));
    assert!(summary.contains("| cross_correlate2d_1 | CrossCorrelate2d | [3, 3] | 是 | x, k |"));
    assert!(summary.contains("| x | Variable | [4, 4] | 是 | - |"));
    assert!(summary.contains("| k | Parameter | [2, 2] | 是 | - |"));
    assert!(summary.contains("**参数量**: 5"));
}

#[test]
fn test_total_params_counts_only_layer_params() {
    let conv = Conv2d::new(3, 2, 2, 2, Activation::Tanh).unwrap();
    let mut graph = Graph::new();
    let inputs = (0..3)
        .map(|_| graph.new_variable(Tensor::ones(&[4, 4]), true, None).unwrap())
        .collect::<Vec<_>>();
    conv.forward(&mut graph, &inputs).unwrap();

    let desc = graph.describe();
    assert_eq!(desc.total_params(), conv.num_params());
    assert_eq!(desc.total_params(), 30);
}
