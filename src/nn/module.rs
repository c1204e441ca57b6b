/*
 * @Author       : 老董
 * @Date         : 2026-10-11
 * @Description  : Module trait 定义
 */

use super::Parameter;

/// 模块 trait
///
/// # 设计原则
/// - `forward()` **不是** trait 方法（签名各异）
/// - `new()` **不是** trait 方法（参数各异）
/// - 参数由模块自己持有，跨越多个计算图存在；每次 forward 只是把参数的值绑定进当次的图
///
/// # 使用示例
///
/// ```ignore
/// use conv_autograd::nn::{Activation, Conv2d, Module, Parameter};
///
/// struct TwoConvs {
///     conv1: Conv2d,
///     conv2: Conv2d,
/// }
///
/// impl Module for TwoConvs {
///     fn parameters(&self) -> Vec<&Parameter> {
///         [self.conv1.parameters(), self.conv2.parameters()].concat()
///     }
///
///     fn parameters_mut(&mut self) -> Vec<&mut Parameter> {
///         let mut params = self.conv1.parameters_mut();
///         params.extend(self.conv2.parameters_mut());
///         params
///     }
/// }
/// ```
pub trait Module {
    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<&Parameter>;

    fn parameters_mut(&mut self) -> Vec<&mut Parameter>;

    /// 获取参数的元素总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.value().size()).sum()
    }

    /// 清空所有参数上累积的梯度
    fn zero_grad(&mut self) {
        for param in self.parameters_mut() {
            param.zero_grad();
        }
    }
}
