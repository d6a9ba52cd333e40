//! 步态生成
//!
//! - foot_trajectory: 摆动/支撑两段式足端轨迹
//! - FootfallEvent: 摆动相 → 支撑相跨越时发出的落足事件，
//!   供外部音频层消费；对动画本身的正确性不是必需的

mod foot_trajectory;

pub use foot_trajectory::{is_stance, sample, FootOffset};

use crate::rig::LimbId;

/// 落足事件
///
/// 在某条腿的轨迹从摆动相进入支撑相的那一帧发出。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FootfallEvent {
    /// 落足的肢体
    pub limb: LimbId,
    /// 发生时刻（引擎累计时间，秒）
    pub at: f32,
    /// 触地强度（当前行走混合因子）
    pub intensity: f32,
}
