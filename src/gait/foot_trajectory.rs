//! 步态周期的足端轨迹
//!
//! 把归一化相位 [0,1) 切成摆动相与支撑相两段：
//! - 摆动相（周期前段）：足离地前移，水平用余弦缓动避免落脚瞬间
//!   的速度突变，垂直用正弦拱在中点达到最大抬足高度；
//! - 支撑相（周期余段）：足贴地相对身体**线性**后移。线性是关键：
//!   着地期间地面速度恒定，足底才不会产生可见滑动。
//!
//! 输出是相对静息足端位置的偏移，叠加后交给 IK 求解。

use std::f32::consts::PI;

// ============================================================================
// 采样结果
// ============================================================================

/// 某一相位下的足端偏移
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootOffset {
    /// 前后偏移（沿身体前向）
    pub forward: f32,
    /// 抬足高度（支撑相恒为 0）
    pub height: f32,
    /// 是否处于支撑相
    pub stance: bool,
}

// ============================================================================
// 采样
// ============================================================================

/// 判断相位是否处于支撑相
#[inline]
pub fn is_stance(phase: f32, swing_fraction: f32) -> bool {
    phase.rem_euclid(1.0) >= swing_fraction
}

/// 采样足端轨迹
///
/// `phase` 可带肢体相位偏移，内部按模 1 处理；
/// `stride` 为步幅半长，`lift` 为最大抬足高度。
pub fn sample(phase: f32, stride: f32, lift: f32, swing_fraction: f32) -> FootOffset {
    let p = phase.rem_euclid(1.0);

    if p < swing_fraction {
        // 摆动相：-stride → +stride，余弦缓动
        let t = p / swing_fraction;
        let eased = (1.0 - (t * PI).cos()) * 0.5;
        FootOffset {
            forward: -stride + 2.0 * stride * eased,
            height: (t * PI).sin() * lift,
            stance: false,
        }
    } else {
        // 支撑相：+stride → -stride，线性
        let t = (p - swing_fraction) / (1.0 - swing_fraction);
        FootOffset {
            forward: stride - 2.0 * stride * t,
            height: 0.0,
            stance: true,
        }
    }
}
