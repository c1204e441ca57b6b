/*
 * @Author       : 老董
 * @Date         : 2026-10-09
 * @Description  : 算子节点。每个算子是一对纯函数（前向、反向），其参数（如激活函数）存于节点本身
 */

mod activation;
mod broadcast_add_scalar;
mod cross_correlate2d;
mod elementwise_sum;

pub(in crate::nn) use activation::ElementwiseActivation;
pub(in crate::nn) use broadcast_add_scalar::BroadcastAddScalar;
pub(in crate::nn) use cross_correlate2d::CrossCorrelate2d;
pub(in crate::nn) use elementwise_sum::ElementwiseSum;
