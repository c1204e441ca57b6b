mod describe;
mod layer_conv2d;
mod node_elementwise_sum;
