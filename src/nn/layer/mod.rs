/*
 * @Author       : 老董
 * @Date         : 2026-10-12
 * @Description  : Layer 模块：持有参数、组合 Node 构建常见网络结构
 */

mod conv2d;

pub use conv2d::{Conv2d, Conv2dConfig, Conv2dOutput};
