//! 双段解析 IK 求解器
//!
//! 用余弦定理一次求出髋/膝角度，不迭代。肢体被当作平面链处理：
//! 髋与膝只绕同一根轴旋转（前后摆 + 上下抬），这与简单四足的
//! 腿部摆动一致。
//!
//! 纯函数：相同输入必得相同输出，无隐藏状态，无堆分配。
//! 所有数值边界（目标过近、超出可达范围、acos 定义域）都在
//! 不安全运算之前钳制，运行期没有失败路径。

use std::f32::consts::PI;

use glam::Vec3;

/// 骨段长度下限，防止零长链
pub const MIN_SEGMENT_LEN: f32 = 1e-4;

/// 目标距离下限：低于此值视为目标与髋重合，放弃求解
const TARGET_EPS: f32 = 1e-5;

/// 最大伸展比例：刻意停在完全伸直之前，
/// 既保证余弦定理数值有效，也避免腿部锁死成一条直线
const MAX_EXTENSION: f32 = 0.999;

/// 足部反向补偿系数
const FOOT_COMP: f32 = 0.3;

// ============================================================================
// 求解结果
// ============================================================================

/// 单腿关节角度（绕俯仰轴，弧度）
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LegAngles {
    /// 髋关节角度
    pub hip_pitch: f32,
    /// 膝关节弯曲角度
    pub knee_pitch: f32,
    /// 足部反向补偿角度，维持足底视觉上的平贴
    pub foot_pitch: f32,
}

// ============================================================================
// 求解
// ============================================================================

/// 求解双段 IK
///
/// `target` 为髋骨本地空间中的目标位置；求解平面取
/// u = -target.y（向下距离）、v = target.z（向前距离）。
///
/// 目标与髋重合（d² < ε²）时返回 `None`，调用方保持该帧的静息姿态。
/// 目标超出可达范围时钳制到最大伸展，肢体朝目标伸展而不过度。
pub fn solve_two_bone(upper_len: f32, lower_len: f32, target: Vec3) -> Option<LegAngles> {
    let upper = upper_len.max(MIN_SEGMENT_LEN);
    let lower = lower_len.max(MIN_SEGMENT_LEN);

    let u = -target.y;
    let v = target.z;

    let d_sq = u * u + v * v;
    if d_sq < TARGET_EPS * TARGET_EPS {
        return None;
    }

    let max_reach = upper + lower * MAX_EXTENSION;
    let d = d_sq.sqrt().clamp(TARGET_EPS, max_reach);

    // 余弦定理，acos 参数钳制到 [-1, 1] 吸收完全伸展/收缩处的浮点越界
    let cos_knee =
        ((upper * upper + lower * lower - d * d) / (2.0 * upper * lower)).clamp(-1.0, 1.0);
    let knee_interior = cos_knee.acos();

    let knee_pitch = PI - knee_interior;

    // 髋角 = 目标方向角 − 髋处三角内角（以膝弯曲角表示）
    let target_angle = v.atan2(u);
    let hip_pitch =
        target_angle - (lower * knee_pitch.sin()).atan2(upper + lower * knee_pitch.cos());
    let foot_pitch = -(hip_pitch + knee_pitch) * FOOT_COMP;

    Some(LegAngles {
        hip_pitch,
        knee_pitch,
        foot_pitch,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 用已知骨段长度正向合成足端位置 (u, v)
    fn forward_foot(upper: f32, lower: f32, angles: &LegAngles) -> (f32, f32) {
        let knee_u = upper * angles.hip_pitch.cos();
        let knee_v = upper * angles.hip_pitch.sin();
        let total = angles.hip_pitch + angles.knee_pitch;
        (knee_u + lower * total.cos(), knee_v + lower * total.sin())
    }

    #[test]
    fn test_reachable_target_round_trip() {
        // 已知算例：d² = 0.1, cos_knee = 0.3525/0.45 ≈ 0.7833,
        // 膝内角 acos ≈ 0.6692
        let upper = 0.5;
        let lower = 0.45;
        let target = Vec3::new(0.0, -0.3, 0.1);

        let angles = solve_two_bone(upper, lower, target).unwrap();

        let knee_interior = PI - angles.knee_pitch;
        assert!((knee_interior - 0.6692).abs() < 1e-3);

        // 正向合成必须还原目标
        let (fu, fv) = forward_foot(upper, lower, &angles);
        assert!((fu - 0.3).abs() < 1e-4);
        assert!((fv - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_round_trip_over_workspace() {
        let upper = 0.5;
        let lower = 0.45;
        // 可达范围内的一批目标
        for &(down, fwd) in &[
            (0.6, 0.0),
            (0.4, 0.3),
            (0.7, -0.2),
            (0.2, 0.2),
            (0.9, 0.05),
        ] {
            let target = Vec3::new(0.0, -down, fwd);
            let angles = solve_two_bone(upper, lower, target).unwrap();
            let (fu, fv) = forward_foot(upper, lower, &angles);
            assert!(
                (fu - down).abs() < 1e-4 && (fv - fwd).abs() < 1e-4,
                "target ({down}, {fwd}) -> ({fu}, {fv})"
            );
        }
    }

    #[test]
    fn test_unreachable_target_clamps_to_max_reach() {
        let upper = 0.5;
        let lower = 0.45;
        // 远超 upper + lower 的目标
        let target = Vec3::new(0.0, -5.0, 3.0);

        let angles = solve_two_bone(upper, lower, target).unwrap();
        assert!(angles.hip_pitch.is_finite());
        assert!(angles.knee_pitch.is_finite());

        // 足端应落在最大伸展距离上，而不是 NaN 或超出
        let (fu, fv) = forward_foot(upper, lower, &angles);
        let d = (fu * fu + fv * fv).sqrt();
        let max_reach = upper + lower * 0.999;
        assert!((d - max_reach).abs() < 1e-4);

        // 方向保持朝向目标
        let target_dir = (3.0f32).atan2(5.0);
        assert!((fv.atan2(fu) - target_dir).abs() < 1e-4);
    }

    #[test]
    fn test_target_at_hip_is_rejected() {
        assert!(solve_two_bone(0.5, 0.45, Vec3::ZERO).is_none());
        assert!(solve_two_bone(0.5, 0.45, Vec3::new(0.0, 1e-6, -1e-6)).is_none());
    }

    #[test]
    fn test_never_fully_straight() {
        // 恰好在可达边界上的目标也不会得到 0 弯曲
        let angles = solve_two_bone(0.5, 0.45, Vec3::new(0.0, -0.95, 0.0)).unwrap();
        assert!(angles.knee_pitch > 0.0);
    }

    #[test]
    fn test_zero_length_chain_floored() {
        // 零长骨段被钳到下限，不产生 NaN
        let angles = solve_two_bone(0.0, 0.0, Vec3::new(0.0, -0.1, 0.0)).unwrap();
        assert!(angles.hip_pitch.is_finite());
        assert!(angles.knee_pitch.is_finite());
    }

    #[test]
    fn test_foot_compensation_counters_leg() {
        let angles = solve_two_bone(0.5, 0.45, Vec3::new(0.0, -0.4, 0.2)).unwrap();
        let expected = -(angles.hip_pitch + angles.knee_pitch) * 0.3;
        assert!((angles.foot_pitch - expected).abs() < 1e-6);
    }

    #[test]
    fn test_deterministic() {
        let target = Vec3::new(0.0, -0.35, 0.12);
        let a = solve_two_bone(0.5, 0.45, target).unwrap();
        let b = solve_two_bone(0.5, 0.45, target).unwrap();
        assert_eq!(a, b);
    }
}
