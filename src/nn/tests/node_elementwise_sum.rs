use crate::assert_err;
use crate::nn::{Graph, GraphError};
use crate::tensor::Tensor;

#[test]
fn test_elementwise_sum_forward() {
    let mut graph = Graph::new();
    let a = graph
        .new_variable(Tensor::new(&[1., 2., 3., 4.], &[2, 2]), false, None)
        .unwrap();
    let b = graph
        .new_variable(Tensor::new(&[0.5, 0.5, -1., -1.], &[2, 2]), false, None)
        .unwrap();
    let c = graph.new_variable(Tensor::ones(&[2, 2]), false, None).unwrap();

    let single = graph.elementwise_sum(&[a], None).unwrap();
    assert_eq!(graph.value(single).unwrap(), graph.value(a).unwrap());

    let sum = graph.elementwise_sum(&[a, b, c], None).unwrap();
    assert_eq!(
        graph.value(sum).unwrap(),
        &Tensor::new(&[2.5, 3.5, 3., 4.], &[2, 2])
    );
}

#[test]
fn test_elementwise_sum_backward() {
    let mut graph = Graph::new();
    let a = graph.new_variable(Tensor::ones(&[2, 2]), true, None).unwrap();
    let b = graph.new_variable(Tensor::ones(&[2, 2]), true, None).unwrap();
    let c = graph.new_variable(Tensor::ones(&[2, 2]), false, None).unwrap();
    let sum = graph.elementwise_sum(&[a, b, c], None).unwrap();

    let upstream = Tensor::new(&[1., -2., 0.5, 4.], &[2, 2]);
    graph.backward(sum, Some(&upstream)).unwrap();

    assert_eq!(graph.grad(a).unwrap(), Some(&upstream));
    assert_eq!(graph.grad(b).unwrap(), Some(&upstream));
    assert_eq!(graph.grad(c).unwrap(), None);
}

#[test]
fn test_elementwise_sum_repeated_operand() {
    let mut graph = Graph::new();
    let a = graph
        .new_variable(Tensor::new(&[1., 2., 3., 4.], &[2, 2]), true, None)
        .unwrap();
    let sum = graph.elementwise_sum(&[a, a], None).unwrap();
    assert_eq!(
        graph.value(sum).unwrap(),
        &Tensor::new(&[2., 4., 6., 8.], &[2, 2])
    );

    // 重复出现的操作数收到两份贡献
    graph.backward(sum, None).unwrap();
    assert_eq!(graph.grad(a).unwrap(), Some(&Tensor::filled(2., &[2, 2])));
}

#[test]
fn test_elementwise_sum_errors() {
    let mut graph = Graph::new();
    let a = graph.new_variable(Tensor::ones(&[2, 2]), false, None).unwrap();
    let b = graph.new_variable(Tensor::ones(&[2, 3]), false, None).unwrap();

    assert_err!(
        graph.elementwise_sum(&[], None),
        GraphError::InvalidOperation("ElementwiseSum节点至少需要1个父节点")
    );
    assert_err!(
        graph.elementwise_sum(&[a, b], None),
        GraphError::ShapeMismatch([2, 2], [2, 3], "ElementwiseSum节点的所有父节点形状必须相同")
    );
    assert_eq!(graph.node_count(), 2);
}
