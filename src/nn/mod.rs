/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-10-12 21:05:10
 * @Description  : 负责神经网络（neural network）的构建：计算图、节点、参数与层
 */

mod activation;
mod descriptor;
mod graph;
mod init;
pub mod layer;
mod module;
mod nodes;
mod parameter;

pub use activation::Activation;
pub use descriptor::{GraphDescriptor, NodeDescriptor, NodeTypeDescriptor};
pub use graph::{Graph, GraphError, GraphId};
pub use init::Init;
pub use layer::{Conv2d, Conv2dConfig, Conv2dOutput};
pub use module::Module;
pub use nodes::{NodeId, OperatorKind};
pub use parameter::Parameter;

#[cfg(test)]
mod tests;
