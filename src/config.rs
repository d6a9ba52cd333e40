//! 运动引擎配置
//!
//! 所有步态与行为参数集中在这里，按物种调参。每个生物的控制器
//! 持有自己的一份配置，互不影响；直接修改默认值即可改变默认物种
//! （低多边形大象）的手感。

use crate::spring::SpringParams;

/// 运动配置
#[derive(Debug, Clone)]
pub struct LocomotionConfig {
    // ========== 身体 ==========
    /// 身体根骨骼的站立高度，默认 0.45
    pub base_height: f32,
    /// 行走速度 (单位/秒)，默认 0.5
    pub walk_speed: f32,
    /// 漫步速度 (单位/秒)，默认 0.35
    pub wander_speed: f32,
    /// 最大转向角速度 (弧度/秒)，默认 0.4
    pub turn_speed: f32,

    // ========== 步态 ==========
    /// 步态频率（完整步幅周期/秒），默认 0.9
    pub gait_frequency: f32,
    /// 步幅半长（足端相对静息点的前后摆动幅度），默认 0.16
    pub stride_length: f32,
    /// 摆动相抬足高度，默认 0.08
    pub step_height: f32,
    /// 摆动相占整个周期的比例，默认 0.35
    /// 四足以 0.25 相位错开时，0.5 以下可保证任意时刻至少两足着地
    pub swing_fraction: f32,
    /// 行走时身体上下起伏幅度，默认 0.06
    pub bob_amplitude: f32,
    /// 行走时身体侧倾幅度，默认 0.03
    pub roll_amplitude: f32,
    /// 行走时身体前倾幅度，默认 0.04
    pub lean_amount: f32,

    // ========== 混合 ==========
    /// 行走/好奇混合因子的指数趋近速率，默认 6.0
    /// 越大 → 状态切换时姿态过渡越快
    pub blend_rate: f32,

    // ========== 状态调度 ==========
    /// 发呆时长 = base + rand * spread，默认 4.0 + rand * 3.0
    pub idle_duration_base: f32,
    pub idle_duration_spread: f32,
    /// 漫步时长，默认 5.0 + rand * 4.0
    pub wander_duration_base: f32,
    pub wander_duration_spread: f32,
    /// 好奇时长，默认 3.0 + rand * 2.0
    pub curious_duration_base: f32,
    pub curious_duration_spread: f32,
    /// 发呆结束后进入漫步的概率，默认 0.25
    pub wander_chance: f32,
    /// 发呆结束后进入好奇的概率，默认 0.10（其余概率继续发呆）
    pub curious_chance: f32,
    /// 漫步中每秒随机转向的概率，默认 0.2
    pub wander_turn_chance: f32,

    // ========== 喝水 ==========
    /// 喝水动作时长，默认 6.0
    pub drink_duration: f32,
    /// 两次喝水之间的最短间隔（秒），默认 25.0
    pub drink_cooldown: f32,

    // ========== 兴奋 ==========
    /// 每秒触发兴奋的概率，默认 0.02
    pub excited_rate: f32,
    /// 兴奋动作时长，默认 3.0
    pub excited_duration: f32,
    /// 两次兴奋之间的最短间隔（秒），默认 30.0
    pub excited_cooldown: f32,

    // ========== 附肢弹簧 ==========
    /// 鼻部弹簧参数
    pub trunk_spring: SpringParams,
    /// 耳部弹簧参数
    pub ears_spring: SpringParams,
    /// 尾部弹簧参数
    pub tail_spring: SpringParams,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            // ====== 身体 ======
            // 站立高度与行走/漫步速度按低多边形大象的体型标定
            base_height: 0.45,
            walk_speed: 0.5,
            wander_speed: 0.35,
            turn_speed: 0.4,

            // ====== 步态 ======
            // 一个完整步幅约 1.1 秒
            gait_frequency: 0.9,
            stride_length: 0.16,
            step_height: 0.08,
            swing_fraction: 0.35,
            bob_amplitude: 0.06,
            roll_amplitude: 0.03,
            lean_amount: 0.04,

            // ====== 混合 ======
            blend_rate: 6.0,

            // ====== 状态调度 ======
            idle_duration_base: 4.0,
            idle_duration_spread: 3.0,
            wander_duration_base: 5.0,
            wander_duration_spread: 4.0,
            curious_duration_base: 3.0,
            curious_duration_spread: 2.0,
            wander_chance: 0.25,
            curious_chance: 0.10,
            wander_turn_chance: 0.2,

            // ====== 喝水 ======
            drink_duration: 6.0,
            drink_cooldown: 25.0,

            // ====== 兴奋 ======
            excited_rate: 0.02,
            excited_duration: 3.0,
            excited_cooldown: 30.0,

            // ====== 附肢弹簧 ======
            trunk_spring: SpringParams::trunk(),
            ears_spring: SpringParams::ears(),
            tail_spring: SpringParams::tail(),
        }
    }
}
