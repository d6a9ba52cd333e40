//! 各行为状态的姿态例程
//!
//! 每个例程假定骨架姿态已清零，按叠加方式写入：身体根骨骼的
//! 位置/朝向、脊柱-颈-头的正弦微动、鼻/耳的步态叠加层。腿部
//! 姿态走统一路径（轨迹 → IK → 关节写入），步幅随行走混合因子
//! 缩放，因此任何状态间的过渡都是连续的。
//!
//! 装配期已经解析并验证了所有骨骼索引，这里不再逐骨骼判空；
//! 缺席的参考骨骼（Option 为 None）整块跳过。

use std::f32::consts::TAU;

use glam::Vec3;

use crate::config::LocomotionConfig;
use crate::gait::{is_stance, sample};
use crate::rig::{solve_two_bone, AppendageChain, LimbId, RigChains, SwingAxis};
use crate::skeleton::BoneSet;

use super::context::LocomotionContext;
use super::steering;

/// 鼻部行走摆动的每关节系数（根 → 尖，末项归梢端）
const TRUNK_SWAY_FALLOFF: [f32; 3] = [0.8, 0.6, 0.5];
/// 鼻部行走下探的每关节系数
const TRUNK_DIP_FALLOFF: [f32; 3] = [0.4, 0.8, 1.0];
/// 鼻部抬起的每关节系数（好奇/兴奋）
const TRUNK_LIFT_FALLOFF: [f32; 3] = [0.5, 0.8, 1.0];

// ============================================================================
// 公共辅助
// ============================================================================

/// 梢端取表尾，其余按序取表
#[inline]
fn falloff_index(j: usize, count: usize, table_len: usize) -> usize {
    if j + 1 == count {
        table_len - 1
    } else {
        j.min(table_len - 1)
    }
}

/// 叠加写入某根骨骼的姿态旋转
#[inline]
fn add_rotation(skeleton: &mut BoneSet, idx: Option<usize>, delta: Vec3) {
    if let Some(idx) = idx {
        skeleton.bone_mut(idx).pose_rotation += delta;
    }
}

/// 写入身体根骨骼：横向偏移、目标高度、旋转
fn write_root(skeleton: &mut BoneSet, rig: &RigChains, sway: f32, height: f32, rotation: Vec3) {
    let Some(idx) = rig.root else { return };
    let rest_y = skeleton.bone(idx).rest_translation.y;
    let bone = skeleton.bone_mut(idx);
    bone.pose_translation = Vec3::new(sway, height - rest_y, 0.0);
    bone.pose_rotation += rotation;
}

// ============================================================================
// 腿部（全状态共用）
// ============================================================================

/// 为四条腿采样轨迹并求解 IK
///
/// 步幅与抬足高度都按行走混合因子缩放：混合因子衰减到 0 时，
/// 目标自动回到静息足端位置。返回各肢体的支撑相标志
/// （按相位计算，与是否装配无关）。
pub(crate) fn pose_legs(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
    config: &LocomotionConfig,
) -> [bool; 4] {
    let mut stance = [true; 4];
    let stride = config.stride_length * ctx.walk_blend;
    let lift = config.step_height * ctx.walk_blend;

    for limb in LimbId::ALL {
        let i = limb.index();
        let limb_phase = (ctx.gait_phase + limb.phase_offset()).rem_euclid(1.0);
        stance[i] = is_stance(limb_phase, config.swing_fraction);

        let Some(chain) = rig.leg(limb) else { continue };

        let offset = sample(limb_phase, stride, lift, config.swing_fraction);
        let target = chain.rest_foot_local + Vec3::new(0.0, offset.height, offset.forward);

        // 目标与髋重合的退化帧保持静息姿态
        if let Some(angles) = solve_two_bone(chain.upper_len, chain.lower_len, target) {
            skeleton.bone_mut(chain.hip).pose_rotation.x +=
                chain.rest_hip_pitch + angles.hip_pitch;
            skeleton.bone_mut(chain.knee).pose_rotation.x +=
                chain.rest_knee_pitch + angles.knee_pitch;
            skeleton.bone_mut(chain.foot).pose_rotation.x +=
                chain.rest_foot_pitch + angles.foot_pitch;
        }
    }
    stance
}

/// 附肢弹簧角度按链上系数叠加写入
pub(crate) fn apply_appendage_swing(skeleton: &mut BoneSet, chain: &AppendageChain, angle: f32) {
    for &(idx, scale) in &chain.joints {
        let bone = skeleton.bone_mut(idx);
        match chain.axis {
            SwingAxis::Yaw => bone.pose_rotation.y += angle * scale,
            SwingAxis::Roll => bone.pose_rotation.z += angle * scale,
        }
    }
}

// ============================================================================
// 发呆
// ============================================================================

pub(crate) fn pose_idle(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
    config: &LocomotionConfig,
) {
    let t = ctx.total_elapsed;
    let breathe = (t * 1.0 + 0.3).sin() * 0.025;
    let sway = (t * 0.3).sin() * 0.02;
    let yaw = steering::heading_angle(ctx.heading);

    write_root(
        skeleton,
        rig,
        sway,
        config.base_height + breathe,
        Vec3::new(0.0, yaw, 0.0),
    );

    add_rotation(
        skeleton,
        rig.spine_mid,
        Vec3::new(0.03 * (t * 0.7).sin(), 0.0, 0.02 * (t * 0.5).sin()),
    );
    add_rotation(
        skeleton,
        rig.neck,
        Vec3::new(0.05 + 0.03 * (t * 0.8).sin(), 0.05 * (t * 0.6).sin(), 0.0),
    );
    add_rotation(
        skeleton,
        rig.head,
        Vec3::new(-0.15 + 0.05 * (t * 0.9).sin(), 0.05 * (t * 0.7).sin(), 0.0),
    );
}

// ============================================================================
// 行走 / 漫步
// ============================================================================

pub(crate) fn pose_walk(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
    config: &LocomotionConfig,
) {
    let t = ctx.total_elapsed;
    let phase = ctx.gait_phase * TAU;
    let blend = ctx.walk_blend;
    let yaw = steering::heading_angle(ctx.heading);

    // 每步幅两次起伏，一次侧倾，另加随速度前倾
    let bob = (phase * 2.0).sin() * config.bob_amplitude * blend;
    let roll = phase.sin() * config.roll_amplitude * blend;
    let lean = config.lean_amount * blend;
    write_root(
        skeleton,
        rig,
        0.0,
        config.base_height + bob,
        Vec3::new(lean, yaw, roll),
    );

    let body_pitch = phase.sin() * 0.03 * blend;
    let body_yaw = (phase * 0.5).sin() * 0.02 * blend;

    add_rotation(
        skeleton,
        rig.spine_mid,
        Vec3::new(body_pitch, body_yaw * 0.7, 0.0),
    );
    add_rotation(
        skeleton,
        rig.neck,
        Vec3::new(0.1 * blend + body_pitch * 0.5, body_yaw, 0.0),
    );
    add_rotation(
        skeleton,
        rig.head,
        Vec3::new(-0.2 * blend - body_pitch * 0.3, body_yaw * 1.2, 0.0),
    );

    apply_trunk_walk(skeleton, rig, t, phase, blend);
    apply_ear_walk(skeleton, rig, t, phase, blend);
}

/// 鼻部行走叠加：步态摆动 + 闲置摆动两种频率混合
fn apply_trunk_walk(skeleton: &mut BoneSet, rig: &RigChains, t: f32, phase: f32, blend: f32) {
    if rig.trunk.is_empty() {
        return;
    }

    let gait_sway = phase.sin() * 0.25 * blend;
    let gait_dip = (phase * 2.0).sin() * 0.1 * blend;
    let idle_sway = (t * 0.6).sin() * 0.08;
    let idle_dip = (t * 0.8).sin() * 0.05;
    let sway = gait_sway + idle_sway;
    let dip = gait_dip + idle_dip;

    let count = rig.trunk.joints.len();
    for (j, &(idx, _)) in rig.trunk.joints.iter().enumerate() {
        let k = falloff_index(j, count, TRUNK_SWAY_FALLOFF.len());
        let bone = skeleton.bone_mut(idx);
        bone.pose_rotation.y += sway * TRUNK_SWAY_FALLOFF[k];
        bone.pose_rotation.x += dip * TRUNK_DIP_FALLOFF[k];
    }
}

/// 耳部行走叠加：步态扇动 + 闲置扇动，左右镜像
fn apply_ear_walk(skeleton: &mut BoneSet, rig: &RigChains, t: f32, phase: f32, blend: f32) {
    let gait_flap = (phase * 2.0).sin() * 0.18 * blend;
    for &(idx, side) in &rig.ears.joints {
        // 右耳的闲置分量略弱，避免左右完全同步
        let idle_scale = if side > 0.0 { 1.0 } else { 0.9 };
        let idle_flap = (t * 0.9).sin() * 0.08 * idle_scale;
        skeleton.bone_mut(idx).pose_rotation.z += (gait_flap + idle_flap) * side;
    }
}

// ============================================================================
// 好奇
// ============================================================================

/// 好奇叠加层
///
/// 纯叠加，不写根骨骼位置：在任意基础姿态（通常是发呆）之上，
/// 随 `curious_blend` 淡入淡出。正弦相位取引擎累计时间，
/// 淡出期间跨状态也保持连续。
pub(crate) fn apply_curious_overlay(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
) {
    let ts = ctx.total_elapsed;
    let blend = ctx.curious_blend;

    add_rotation(
        skeleton,
        rig.root,
        Vec3::new(0.0, 0.0, 0.02 * (ts * 1.5).sin() * blend),
    );

    add_rotation(
        skeleton,
        rig.neck,
        Vec3::new(
            (0.1 + 0.05 * (ts * 2.0).sin()) * blend,
            0.1 * (ts * 1.0).sin() * blend,
            0.0,
        ),
    );
    add_rotation(
        skeleton,
        rig.head,
        Vec3::new(
            (-0.05 + 0.07 * (ts * 2.5).sin()) * blend,
            0.08 * (ts * 1.7).sin() * blend,
            0.0,
        ),
    );

    // 抬鼻张望，梢端抬得最高
    let lift = (0.3 + 0.1 * (ts * 2.2).sin()) * blend;
    let count = rig.trunk.joints.len();
    for (j, &(idx, _)) in rig.trunk.joints.iter().enumerate() {
        let k = falloff_index(j, count, TRUNK_LIFT_FALLOFF.len());
        skeleton.bone_mut(idx).pose_rotation.x += -lift * TRUNK_LIFT_FALLOFF[k];
    }

    // 左右耳反相扇动
    let flap = 0.15 * (ts * 3.0).sin() * blend;
    for &(idx, side) in &rig.ears.joints {
        skeleton.bone_mut(idx).pose_rotation.z += flap * side;
    }
}

// ============================================================================
// 喝水
// ============================================================================

pub(crate) fn pose_drink(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
    config: &LocomotionConfig,
) {
    let ts = ctx.state_elapsed;
    // 入水动作的过渡斜坡
    let settle = (ts / 0.8).min(1.0);
    let yaw = steering::heading_angle(ctx.heading);

    write_root(
        skeleton,
        rig,
        0.0,
        config.base_height,
        Vec3::new(0.0, yaw, 0.0),
    );

    add_rotation(skeleton, rig.neck, Vec3::new(0.3 * settle, 0.0, 0.0));
    add_rotation(skeleton, rig.head, Vec3::new(0.25 * settle, 0.0, 0.0));

    // 鼻子周期性下探-卷起
    let dip = settle * (0.5 + 0.25 * (ts * 1.8).sin());
    let count = rig.trunk.joints.len();
    for (j, &(idx, _)) in rig.trunk.joints.iter().enumerate() {
        let k = falloff_index(j, count, TRUNK_DIP_FALLOFF.len());
        skeleton.bone_mut(idx).pose_rotation.x += dip * TRUNK_DIP_FALLOFF[k];
    }

    let flap = 0.06 * (ts * 1.2).sin();
    for &(idx, side) in &rig.ears.joints {
        skeleton.bone_mut(idx).pose_rotation.z += flap * side;
    }
}

// ============================================================================
// 兴奋
// ============================================================================

pub(crate) fn pose_excited(
    skeleton: &mut BoneSet,
    rig: &RigChains,
    ctx: &LocomotionContext,
    config: &LocomotionConfig,
) {
    let ts = ctx.state_elapsed;
    let yaw = steering::heading_angle(ctx.heading);

    // 原地弹跳
    let bounce = (ts * 6.0).sin().abs() * 0.05;
    write_root(
        skeleton,
        rig,
        0.0,
        config.base_height + bounce,
        Vec3::new(0.0, yaw, 0.0),
    );

    add_rotation(
        skeleton,
        rig.head,
        Vec3::new(-0.1 + 0.05 * (ts * 5.0).sin(), 0.0, 0.0),
    );

    // 甩鼻
    let toss = 0.2 + 0.15 * (ts * 5.0).sin();
    let count = rig.trunk.joints.len();
    for (j, &(idx, _)) in rig.trunk.joints.iter().enumerate() {
        let k = falloff_index(j, count, TRUNK_LIFT_FALLOFF.len());
        skeleton.bone_mut(idx).pose_rotation.x += -toss * TRUNK_LIFT_FALLOFF[k];
    }

    // 快速扇耳
    let flap = 0.25 * (ts * 9.0).sin();
    for &(idx, side) in &rig.ears.joints {
        skeleton.bone_mut(idx).pose_rotation.z += flap * side;
    }

    // 摇尾
    let wag = 0.2 * (ts * 8.0).sin();
    for &(idx, scale) in &rig.tail.joints {
        skeleton.bone_mut(idx).pose_rotation.y += wag * scale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::BoneNames;
    use crate::test_util::{elephant_skeleton, legless_skeleton};

    fn setup() -> (BoneSet, RigChains) {
        let mut skeleton = elephant_skeleton();
        let rig = RigChains::build(&mut skeleton, &BoneNames::elephant(), 0.0);
        (skeleton, rig)
    }

    #[test]
    fn test_pose_legs_writes_leg_rotations() {
        let (mut skeleton, rig) = setup();
        let config = LocomotionConfig::default();
        let ctx = LocomotionContext {
            walk_blend: 1.0,
            gait_phase: 0.1,
            ..Default::default()
        };

        skeleton.reset_pose();
        let stance = pose_legs(&mut skeleton, &rig, &ctx, &config);

        // 相位 0.1：前左腿处于摆动相
        assert!(!stance[LimbId::FrontLeft.index()]);
        // 有腿链的骨骼应被写入姿态
        let chain = rig.leg(LimbId::FrontLeft).unwrap();
        assert!(skeleton.bone(chain.hip).pose_rotation.x.abs() > 1e-6);
        assert!(skeleton.bone(chain.knee).pose_rotation.x.abs() > 1e-6);
    }

    #[test]
    fn test_pose_legs_stance_flags_without_chains() {
        let mut skeleton = legless_skeleton();
        let rig = RigChains::build(&mut skeleton, &BoneNames::elephant(), 0.0);
        let config = LocomotionConfig::default();
        let ctx = LocomotionContext {
            walk_blend: 1.0,
            gait_phase: 0.4,
            ..Default::default()
        };

        // 无腿链也不 panic，支撑相标志照常按相位计算
        let stance = pose_legs(&mut skeleton, &rig, &ctx, &config);
        assert!(stance[LimbId::FrontLeft.index()]);
    }

    #[test]
    fn test_idle_breathing_moves_root() {
        let (mut skeleton, rig) = setup();
        let config = LocomotionConfig::default();

        let mut heights = Vec::new();
        for step in 0..4 {
            let ctx = LocomotionContext {
                total_elapsed: step as f32 * 0.8,
                ..Default::default()
            };
            skeleton.reset_pose();
            pose_idle(&mut skeleton, &rig, &ctx, &config);
            heights.push(skeleton.bone(rig.root.unwrap()).pose_translation.y);
        }
        // 呼吸起伏：高度随时间变化
        assert!(heights.iter().any(|h| (h - heights[0]).abs() > 1e-3));
    }

    #[test]
    fn test_walk_overlays_touch_trunk_and_ears() {
        let (mut skeleton, rig) = setup();
        let config = LocomotionConfig::default();
        let ctx = LocomotionContext {
            walk_blend: 1.0,
            gait_phase: 0.2,
            total_elapsed: 1.0,
            ..Default::default()
        };

        skeleton.reset_pose();
        pose_walk(&mut skeleton, &rig, &ctx, &config);

        let (trunk_base, _) = rig.trunk.joints[0];
        assert!(skeleton.bone(trunk_base).pose_rotation.y.abs() > 1e-4);
        let (ear_left, _) = rig.ears.joints[0];
        let (ear_right, _) = rig.ears.joints[1];
        // 左右耳扇动方向相反
        let l = skeleton.bone(ear_left).pose_rotation.z;
        let r = skeleton.bone(ear_right).pose_rotation.z;
        assert!(l * r < 0.0);
    }

    #[test]
    fn test_curious_lifts_trunk_tip_most() {
        let (mut skeleton, rig) = setup();
        let ctx = LocomotionContext {
            curious_blend: 1.0,
            total_elapsed: 0.5,
            ..Default::default()
        };

        skeleton.reset_pose();
        apply_curious_overlay(&mut skeleton, &rig, &ctx);

        let base = skeleton.bone(rig.trunk.joints[0].0).pose_rotation.x;
        let tip = skeleton.bone(rig.trunk.joints[2].0).pose_rotation.x;
        // 抬鼻为负向俯仰，梢端幅度最大
        assert!(base < 0.0);
        assert!(tip < base);
    }

    #[test]
    fn test_appendage_swing_respects_axis_and_mirror() {
        let (mut skeleton, rig) = setup();

        skeleton.reset_pose();
        apply_appendage_swing(&mut skeleton, &rig.ears, 0.3);
        let l = skeleton.bone(rig.ears.joints[0].0).pose_rotation.z;
        let r = skeleton.bone(rig.ears.joints[1].0).pose_rotation.z;
        assert!((l - 0.3).abs() < 1e-6);
        assert!((r + 0.3).abs() < 1e-6);

        skeleton.reset_pose();
        apply_appendage_swing(&mut skeleton, &rig.tail, 0.5);
        let (tail_base, scale) = rig.tail.joints[0];
        assert!((skeleton.bone(tail_base).pose_rotation.y - 0.5 * scale).abs() < 1e-6);
    }
}
