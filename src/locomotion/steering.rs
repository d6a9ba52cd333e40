//! 转向与平滑辅助
//!
//! 朝向始终以 XZ 平面上的单位向量表示；只有在计算最短弧转向时
//! 才临时换算成角度，角度差先回绕到 [-π, π] 再钳制转速。

use glam::Vec3;

use crate::environment::Obstacle;

use std::f32::consts::PI;

// ============================================================================
// 角度与平滑
// ============================================================================

/// 角度回绕到 [-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// 方向向量 → 航向角
#[inline]
pub fn heading_angle(dir: Vec3) -> f32 {
    dir.x.atan2(dir.z)
}

/// 航向角 → 方向向量
#[inline]
pub fn heading_vec(angle: f32) -> Vec3 {
    Vec3::new(angle.sin(), 0.0, angle.cos())
}

/// 帧率无关的指数趋近
///
/// blend += (target - blend) * (1 - exp(-rate*dt))：无论帧时长
/// 怎样变化，趋近速度在视觉上一致；目标等于当前值时恒等。
#[inline]
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (1.0 - (-rate * dt).exp())
}

// ============================================================================
// 转向
// ============================================================================

/// 绕 Y 轴旋转方向向量
pub fn rotate_heading(dir: Vec3, angle: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(
        dir.x * cos + dir.z * sin,
        0.0,
        -dir.x * sin + dir.z * cos,
    )
    .normalize_or_zero()
}

/// 以受限角速度朝目标方向转动（最短弧）
pub fn turn_toward(current: Vec3, desired: Vec3, max_turn: f32) -> Vec3 {
    if desired.length_squared() < 1e-8 {
        return current;
    }
    let delta = wrap_angle(heading_angle(desired) - heading_angle(current));
    rotate_heading(current, delta.clamp(-max_turn, max_turn))
}

// ============================================================================
// 环境约束
// ============================================================================

/// 障碍物排斥向量
///
/// 对作用半径内的每个障碍，按权重与穿入深度累加推离方向。
pub fn obstacle_repulsion(position: Vec3, obstacles: &[Obstacle]) -> Vec3 {
    let mut push = Vec3::ZERO;
    for obstacle in obstacles {
        let mut away = position - obstacle.position;
        away.y = 0.0;
        let dist = away.length();
        if dist < obstacle.radius && dist > 1e-5 {
            let depth = 1.0 - dist / obstacle.radius;
            push += away / dist * depth * obstacle.weight;
        }
    }
    push
}

/// 围栏收容：位置钳回半径内，撞界时把朝向沿边界法线反射
///
/// 返回是否触界。
pub fn contain_in_enclosure(
    position: &mut Vec3,
    heading: &mut Vec3,
    center: Vec3,
    radius: f32,
) -> bool {
    let mut offset = *position - center;
    offset.y = 0.0;
    let dist = offset.length();
    if dist <= radius || dist < 1e-6 {
        return false;
    }

    let normal = offset / dist;
    *position = center + normal * radius + Vec3::new(0.0, position.y - center.y, 0.0);

    // 仅当朝向继续向外时反射
    let outward = heading.dot(normal);
    if outward > 0.0 {
        *heading = (*heading - normal * (2.0 * outward)).normalize_or_zero();
    }
    true
}
