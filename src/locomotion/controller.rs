//! 运动控制器
//!
//! 每只生物一个实例，外部每帧调用一次 `update`。帧内流程：
//! 推进计时 → 自动状态迁移 → 混合因子指数趋近 → 步态相位推进 →
//! 转向与位移 → 姿态清零并分发到当前状态的姿态例程 → 腿部
//! IK → 落足事件 → 附肢弹簧 → 世界变换传播。
//!
//! 骨架由调用方持有，控制器只在 update 期间借用；身体的世界
//! 位置由 `body_position` 暴露，调用方据此放置整个网格（根骨骼
//! 本地只承载起伏/摇摆）。缺失的环境数据只禁用依赖它的功能，
//! 这里没有任何致命路径。

use glam::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::LocomotionConfig;
use crate::environment::Environment;
use crate::gait::FootfallEvent;
use crate::rig::{AppendageGroup, BoneNames, LimbId, RigChains};
use crate::skeleton::BoneSet;
use crate::spring::Spring;

use super::context::{GaitState, LocomotionContext};
use super::states;
use super::steering;

/// 混合因子阈值：低于它视为静止，步态相位停止推进
const BLEND_EPS: f32 = 1e-3;

// ============================================================================
// 调试快照
// ============================================================================

/// 供外部 HUD/检查用的状态快照
#[derive(Clone, Copy, Debug)]
pub struct DebugSnapshot {
    pub state: GaitState,
    pub gait_phase: f32,
    pub walk_blend: f32,
}

// ============================================================================
// 运动控制器
// ============================================================================

/// 程序化运动控制器
pub struct LocomotionController {
    /// 调参数据（每物种一份）
    config: LocomotionConfig,
    /// 骨骼命名表
    names: BoneNames,
    /// 运动上下文
    ctx: LocomotionContext,
    /// 装配数据（首帧惰性构建）
    rig: Option<RigChains>,
    /// 附肢弹簧：鼻、耳、尾
    trunk_spring: Spring,
    ears_spring: Spring,
    tail_spring: Spring,
    /// 注入的随机源（可播种，保证测试确定性）
    rng: SmallRng,
    /// 当前状态的剩余调度时长
    state_timer: f32,
    /// 下一次允许喝水的时刻
    drink_ready_at: f32,
    /// 下一次允许兴奋的时刻
    excited_ready_at: f32,
    /// 上一帧的航向角（计算转向角速度）
    prev_heading_angle: f32,
    /// 上一帧各肢体的支撑相标志
    prev_stance: [bool; 4],

    // --- 预分配缓冲区（避免每帧堆分配） ---
    /// 本帧的落足事件
    footfalls: Vec<FootfallEvent>,
}

impl LocomotionController {
    /// 创建控制器
    pub fn new(config: LocomotionConfig, names: BoneNames, seed: u64) -> Self {
        let state_timer = config.idle_duration_base;
        let excited_ready_at = config.excited_cooldown;
        Self {
            config,
            names,
            ctx: LocomotionContext::default(),
            rig: None,
            trunk_spring: Spring::new(),
            ears_spring: Spring::new(),
            tail_spring: Spring::new(),
            rng: SmallRng::seed_from_u64(seed),
            state_timer,
            drink_ready_at: 0.0,
            excited_ready_at,
            prev_heading_angle: 0.0,
            prev_stance: [true; 4],
            footfalls: Vec::with_capacity(4),
        }
    }

    /// 默认配置 + 大象命名表
    pub fn with_seed(seed: u64) -> Self {
        Self::new(LocomotionConfig::default(), BoneNames::elephant(), seed)
    }

    // ========================================
    // 访问器
    // ========================================

    /// 当前运动上下文
    #[inline]
    pub fn context(&self) -> &LocomotionContext {
        &self.ctx
    }

    /// 调参数据
    #[inline]
    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// 身体世界位置（调用方据此放置网格）
    #[inline]
    pub fn body_position(&self) -> Vec3 {
        self.ctx.position
    }

    /// 本帧的落足事件
    #[inline]
    pub fn footfalls(&self) -> &[FootfallEvent] {
        &self.footfalls
    }

    /// 调试快照
    pub fn debug_info(&self) -> DebugSnapshot {
        DebugSnapshot {
            state: self.ctx.state,
            gait_phase: self.ctx.gait_phase,
            walk_blend: self.ctx.walk_blend,
        }
    }

    // ========================================
    // 外部状态切换
    // ========================================

    /// 外部请求切换状态
    ///
    /// 立即生效，随时安全：所有姿态都由相位/计时逐帧重算，
    /// 不存在半途更新的风险。
    pub fn set_state(&mut self, state: GaitState) {
        self.change_state(state);
        self.state_timer = self.scheduled_duration(state);
    }

    // ========================================
    // 每帧更新
    // ========================================

    /// 推进一帧
    pub fn update(&mut self, skeleton: &mut BoneSet, dt: f32, env: Option<&Environment>) {
        if dt <= 0.0 || skeleton.is_empty() {
            return;
        }

        self.ctx.total_elapsed += dt;
        self.ctx.state_elapsed += dt;
        self.state_timer -= dt;

        // 装配：首帧惰性构建；地面高度（预期触地位置）变化时重建
        let ground = env.map_or(0.0, |e| e.ground_height);
        let needs_build = match &self.rig {
            None => true,
            Some(rig) => (rig.ground_height - ground).abs() > 1e-6,
        };
        if needs_build {
            self.rig = Some(RigChains::build(skeleton, &self.names, ground));
        }

        self.auto_transitions(dt, env);

        // 混合因子：帧率无关的指数趋近，从不直接赋值
        let walk_target = if self.ctx.state.is_locomotive() { 1.0 } else { 0.0 };
        self.ctx.walk_blend =
            steering::damp(self.ctx.walk_blend, walk_target, self.config.blend_rate, dt);
        let curious_target = if self.ctx.state == GaitState::Curious { 1.0 } else { 0.0 };
        self.ctx.curious_blend = steering::damp(
            self.ctx.curious_blend,
            curious_target,
            self.config.blend_rate,
            dt,
        );

        // 步态相位仅在移动混合超过阈值时推进
        if self.ctx.walk_blend > BLEND_EPS {
            self.ctx.gait_phase =
                (self.ctx.gait_phase + dt * self.config.gait_frequency).rem_euclid(1.0);
        }

        // 转向与位移
        let speed = self.state_speed();
        if speed > 0.0 {
            self.steer_and_advance(dt, speed, env);
        }

        // 弹簧驱动信号：前向速度 + 转向角速度
        let heading_now = steering::heading_angle(self.ctx.heading);
        let turn_rate = steering::wrap_angle(heading_now - self.prev_heading_angle) / dt;
        self.prev_heading_angle = heading_now;

        // 姿态分发：好奇是发呆之上的叠加层，随混合因子淡入淡出
        skeleton.reset_pose();
        let Some(rig) = self.rig.as_ref() else { return };
        match self.ctx.state {
            GaitState::Idle | GaitState::Curious => {
                states::pose_idle(skeleton, rig, &self.ctx, &self.config)
            }
            GaitState::Walk | GaitState::Wander => {
                states::pose_walk(skeleton, rig, &self.ctx, &self.config)
            }
            GaitState::Drink => states::pose_drink(skeleton, rig, &self.ctx, &self.config),
            GaitState::Excited => states::pose_excited(skeleton, rig, &self.ctx, &self.config),
        }
        if self.ctx.curious_blend > BLEND_EPS {
            states::apply_curious_overlay(skeleton, rig, &self.ctx);
        }
        let stance = states::pose_legs(skeleton, rig, &self.ctx, &self.config);

        // 落足事件：摆动相 → 支撑相的跨越
        self.footfalls.clear();
        if self.ctx.walk_blend > BLEND_EPS {
            for limb in LimbId::ALL {
                let i = limb.index();
                if rig.legs[i].is_some() && !self.prev_stance[i] && stance[i] {
                    self.footfalls.push(FootfallEvent {
                        limb,
                        at: self.ctx.total_elapsed,
                        intensity: self.ctx.walk_blend,
                    });
                }
            }
        }
        self.prev_stance = stance;

        // 次级运动：状态切换时弹簧不重置，运动得以连续
        let forward_speed = speed * self.ctx.walk_blend;
        let trunk = self
            .trunk_spring
            .drive(&self.config.trunk_spring, forward_speed, turn_rate, dt);
        states::apply_appendage_swing(skeleton, rig.appendage(AppendageGroup::Trunk), trunk);
        let ears = self
            .ears_spring
            .drive(&self.config.ears_spring, forward_speed, turn_rate, dt);
        states::apply_appendage_swing(skeleton, rig.appendage(AppendageGroup::Ears), ears);
        let tail = self
            .tail_spring
            .drive(&self.config.tail_spring, forward_speed, turn_rate, dt);
        states::apply_appendage_swing(skeleton, rig.appendage(AppendageGroup::Tail), tail);

        skeleton.update_world_transforms();
    }

    // ========================================
    // 状态迁移
    // ========================================

    /// 自动迁移：喝水（范围 + 冷却门控）、兴奋（概率 + 冷却门控）、
    /// 定时调度（发呆 ↔ 漫步/好奇）
    fn auto_transitions(&mut self, dt: f32, env: Option<&Environment>) {
        let total = self.ctx.total_elapsed;

        // 喝水：身体进入水源捕获半径且冷却结束
        if self.ctx.state != GaitState::Drink {
            if let Some(poi) = env.and_then(|e| e.poi.as_ref()) {
                let mut to_poi = self.ctx.position - poi.center;
                to_poi.y = 0.0;
                if to_poi.length() <= poi.radius && total >= self.drink_ready_at {
                    self.change_state(GaitState::Drink);
                    self.state_timer = self.config.drink_duration;
                    self.drink_ready_at = total + self.config.drink_cooldown;
                    return;
                }
            }
        }

        // 兴奋：独立冷却结束后的小概率触发（喝水中不打断）
        if !matches!(self.ctx.state, GaitState::Excited | GaitState::Drink)
            && total >= self.excited_ready_at
            && self.rng.gen::<f32>() < dt * self.config.excited_rate
        {
            self.change_state(GaitState::Excited);
            self.state_timer = self.config.excited_duration;
            self.excited_ready_at = total + self.config.excited_cooldown;
            return;
        }

        // 定时调度
        if self.state_timer > 0.0 {
            return;
        }
        match self.ctx.state {
            GaitState::Idle => {
                let r: f32 = self.rng.gen();
                if r < self.config.wander_chance {
                    self.change_state(GaitState::Wander);
                    self.state_timer = self.config.wander_duration_base
                        + self.rng.gen::<f32>() * self.config.wander_duration_spread;
                } else if r < self.config.wander_chance + self.config.curious_chance {
                    self.change_state(GaitState::Curious);
                    self.state_timer = self.config.curious_duration_base
                        + self.rng.gen::<f32>() * self.config.curious_duration_spread;
                } else {
                    // 继续发呆，仅重置本状态计时
                    self.ctx.state_elapsed = 0.0;
                    self.state_timer = self.config.idle_duration_base
                        + self.rng.gen::<f32>() * self.config.idle_duration_spread;
                }
            }
            _ => {
                self.change_state(GaitState::Idle);
                self.state_timer = self.config.idle_duration_base
                    + self.rng.gen::<f32>() * self.config.idle_duration_spread;
            }
        }
    }

    /// 执行状态切换
    ///
    /// 只重置本状态计时；步态相位与弹簧状态保留（过渡连续），
    /// 唯一例外是进入发呆时清零相位，避免下次起步的跳变。
    fn change_state(&mut self, next: GaitState) {
        if self.ctx.state == next {
            return;
        }
        log::debug!(
            "[LOCO] 状态切换: {} -> {} (t={:.2})",
            self.ctx.state.name(),
            next.name(),
            self.ctx.total_elapsed
        );
        self.ctx.state = next;
        self.ctx.state_elapsed = 0.0;
        self.ctx.last_state_change_at = self.ctx.total_elapsed;
        if next == GaitState::Idle {
            self.ctx.gait_phase = 0.0;
        }
    }

    /// 某状态的调度时长（外部切换时使用同一套窗口）
    fn scheduled_duration(&mut self, state: GaitState) -> f32 {
        match state {
            GaitState::Idle => {
                self.config.idle_duration_base
                    + self.rng.gen::<f32>() * self.config.idle_duration_spread
            }
            GaitState::Walk | GaitState::Wander => {
                self.config.wander_duration_base
                    + self.rng.gen::<f32>() * self.config.wander_duration_spread
            }
            GaitState::Curious => {
                self.config.curious_duration_base
                    + self.rng.gen::<f32>() * self.config.curious_duration_spread
            }
            GaitState::Drink => self.config.drink_duration,
            GaitState::Excited => self.config.excited_duration,
        }
    }

    /// 当前状态的行进速度
    fn state_speed(&self) -> f32 {
        match self.ctx.state {
            GaitState::Walk => self.config.walk_speed,
            GaitState::Wander => self.config.wander_speed,
            _ => 0.0,
        }
    }

    // ========================================
    // 转向与位移
    // ========================================

    /// 计算期望朝向、受限转向、前进、围栏收容
    fn steer_and_advance(&mut self, dt: f32, speed: f32, env: Option<&Environment>) {
        let max_turn = self.config.turn_speed * dt;
        let mut heading = self.ctx.heading;

        // 期望朝向：出界回中心 > 水源趋向/障碍排斥 > 无
        let mut desired: Option<Vec3> = None;
        if let Some(env) = env {
            let mut offset = self.ctx.position - env.enclosure_center;
            offset.y = 0.0;
            if offset.length() > env.enclosure_radius {
                desired = Some((-offset).normalize_or_zero());
            } else {
                let mut d = Vec3::ZERO;
                // 漫步时趋向水源（仅当冷却结束，否则无目的游走）
                if self.ctx.state == GaitState::Wander
                    && self.ctx.total_elapsed >= self.drink_ready_at
                {
                    if let Some(poi) = &env.poi {
                        let mut to_poi = poi.center - self.ctx.position;
                        to_poi.y = 0.0;
                        if to_poi.length_squared() > 1e-6 {
                            d = to_poi.normalize();
                        }
                    }
                }
                let push = steering::obstacle_repulsion(self.ctx.position, &env.obstacles);
                let combined = d + push;
                if combined.length_squared() > 1e-8 {
                    desired = Some(combined.normalize());
                }
            }
        }

        match desired {
            Some(d) => heading = steering::turn_toward(heading, d, max_turn),
            None => {
                // 随机游走转向
                if self.rng.gen::<f32>() < dt * self.config.wander_turn_chance {
                    let angle = (self.rng.gen::<f32>() - 0.5) * self.config.turn_speed * dt;
                    heading = steering::rotate_heading(heading, angle);
                }
            }
        }

        self.ctx.heading = heading;
        self.ctx.position += heading * (speed * self.ctx.walk_blend * dt);

        if let Some(env) = env {
            steering::contain_in_enclosure(
                &mut self.ctx.position,
                &mut self.ctx.heading,
                env.enclosure_center,
                env.enclosure_radius,
            );
        }
    }
}
