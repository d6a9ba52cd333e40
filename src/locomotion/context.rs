//! 行为状态与运动上下文
//!
//! 离散行为状态是封闭枚举，调度用穷举 match——新增状态时编译器
//! 强制覆盖所有分发点。所有计时器与混合因子收拢进一个自有的
//! 上下文结构体，随控制器逐帧显式传递，没有模块级可变状态。

use glam::Vec3;

// ============================================================================
// 行为状态
// ============================================================================

/// 离散行为状态，同一时刻恰有一个处于激活
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GaitState {
    /// 原地发呆（呼吸、轻微摇摆）
    Idle,
    /// 直线行走
    Walk,
    /// 随机漫步（带水源趋向）
    Wander,
    /// 喝水（站定，鼻子周期性下探）
    Drink,
    /// 兴奋（弹跳、甩鼻、扇耳）
    Excited,
    /// 好奇（抬鼻、左右张望）
    Curious,
}

impl GaitState {
    /// 是否为移动类状态（驱动行走混合因子趋向 1）
    #[inline]
    pub fn is_locomotive(self) -> bool {
        matches!(self, GaitState::Walk | GaitState::Wander)
    }

    /// 状态名（调试输出用）
    pub fn name(self) -> &'static str {
        match self {
            GaitState::Idle => "idle",
            GaitState::Walk => "walk",
            GaitState::Wander => "wander",
            GaitState::Drink => "drink",
            GaitState::Excited => "excited",
            GaitState::Curious => "curious",
        }
    }
}

// ============================================================================
// 运动上下文
// ============================================================================

/// 每只生物一份的运动上下文
///
/// `gait_phase` 仅在 `walk_blend` 超过阈值时推进，按模 1 回绕。
/// 两个混合因子只经指数趋近更新，从不直接赋值。
#[derive(Clone, Debug)]
pub struct LocomotionContext {
    /// 当前行为状态
    pub state: GaitState,
    /// 步态相位 [0,1)
    pub gait_phase: f32,
    /// 行走混合因子 [0,1]
    pub walk_blend: f32,
    /// 好奇混合因子 [0,1]
    pub curious_blend: f32,
    /// 当前状态已持续时间
    pub state_elapsed: f32,
    /// 引擎累计时间
    pub total_elapsed: f32,
    /// 身体世界位置（在 XZ 平面移动）
    pub position: Vec3,
    /// 朝向（XZ 平面单位向量）
    pub heading: Vec3,
    /// 最近一次状态切换的时刻
    pub last_state_change_at: f32,
}

impl Default for LocomotionContext {
    fn default() -> Self {
        Self {
            state: GaitState::Idle,
            gait_phase: 0.0,
            walk_blend: 0.0,
            curious_blend: 0.0,
            state_elapsed: 0.0,
            total_elapsed: 0.0,
            position: Vec3::ZERO,
            heading: Vec3::Z,
            last_state_change_at: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locomotive_states() {
        assert!(GaitState::Walk.is_locomotive());
        assert!(GaitState::Wander.is_locomotive());
        assert!(!GaitState::Idle.is_locomotive());
        assert!(!GaitState::Drink.is_locomotive());
        assert!(!GaitState::Excited.is_locomotive());
        assert!(!GaitState::Curious.is_locomotive());
    }

    #[test]
    fn test_default_faces_forward() {
        let ctx = LocomotionContext::default();
        assert_eq!(ctx.heading, Vec3::Z);
        assert_eq!(ctx.state, GaitState::Idle);
    }
}
