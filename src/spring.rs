//! 附肢次级运动弹簧
//!
//! 每个非承重附肢分组（鼻、耳、尾）一个标量阻尼振子，由身体的
//! 前向速度与转向角速度驱动。半隐式欧拉积分；角度钳制到每组
//! 的极限范围，防止不自然的过度伸展。目标回零后振子自然衰减
//! 到静止，stiffness、damping > 0 且 dt 足够小时恒稳定。

// ============================================================================
// 弹簧参数
// ============================================================================

/// 单组附肢的弹簧参数
#[derive(Clone, Copy, Debug)]
pub struct SpringParams {
    /// 刚度：越大回弹越快
    pub stiffness: f32,
    /// 阻尼：越大残余摆动越少
    pub damping: f32,
    /// 角度钳制范围（±limit，弧度）
    pub limit: f32,
    /// 前向速度 → 目标角度的增益
    pub speed_gain: f32,
    /// 转向角速度 → 目标角度的增益
    pub turn_gain: f32,
}

impl SpringParams {
    /// 鼻部：摆幅大、跟随慢
    pub fn trunk() -> Self {
        Self {
            stiffness: 10.0,
            damping: 5.0,
            limit: 0.6,
            speed_gain: 0.4,
            turn_gain: 0.25,
        }
    }

    /// 耳部：摆幅小
    pub fn ears() -> Self {
        Self {
            stiffness: 10.0,
            damping: 5.0,
            limit: 0.45,
            speed_gain: 0.3,
            turn_gain: 0.12,
        }
    }

    /// 尾部：对速度最敏感
    pub fn tail() -> Self {
        Self {
            stiffness: 10.0,
            damping: 5.0,
            limit: 0.8,
            speed_gain: 0.5,
            turn_gain: 0.35,
        }
    }
}

// ============================================================================
// 弹簧状态
// ============================================================================

/// 阻尼振子状态
#[derive(Clone, Copy, Debug, Default)]
pub struct Spring {
    /// 当前角度（弧度）
    pub angle: f32,
    /// 当前角速度
    pub velocity: f32,
}

impl Spring {
    pub fn new() -> Self {
        Self::default()
    }

    /// 朝目标角度积分一步，返回钳制后的角度
    pub fn update(&mut self, params: &SpringParams, target: f32, dt: f32) -> f32 {
        let accel = (target - self.angle) * params.stiffness - self.velocity * params.damping;
        self.velocity += accel * dt;
        self.angle = (self.angle + self.velocity * dt).clamp(-params.limit, params.limit);
        self.angle
    }

    /// 由身体运动信号驱动：目标 = 速度、转向率的固定线性组合
    #[inline]
    pub fn drive(&mut self, params: &SpringParams, speed: f32, turn_rate: f32, dt: f32) -> f32 {
        let target = speed * params.speed_gain + turn_rate * params.turn_gain;
        self.update(params, target, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_decays_to_rest() {
        let params = SpringParams::trunk();
        let mut spring = Spring {
            angle: 0.5,
            velocity: 1.0,
        };

        // 目标保持 0，包络单调衰减到静止
        let mut peak = f32::MAX;
        for step in 0..1200 {
            spring.update(&params, 0.0, DT);
            // 每秒检查一次包络
            if step % 60 == 59 {
                let envelope = spring.angle.abs() + spring.velocity.abs();
                assert!(envelope < peak + 1e-4, "包络在第 {step} 步反弹");
                peak = envelope;
            }
        }
        assert!(spring.angle.abs() < 1e-3);
        assert!(spring.velocity.abs() < 1e-3);
    }

    #[test]
    fn test_tracks_constant_target() {
        let params = SpringParams::tail();
        let mut spring = Spring::new();

        for _ in 0..1200 {
            spring.update(&params, 0.3, DT);
        }
        assert!((spring.angle - 0.3).abs() < 1e-2);
    }

    #[test]
    fn test_angle_clamped_to_limit() {
        let params = SpringParams {
            stiffness: 50.0,
            damping: 1.0,
            limit: 0.2,
            speed_gain: 1.0,
            turn_gain: 0.0,
        };
        let mut spring = Spring::new();

        for _ in 0..600 {
            spring.drive(&params, 10.0, 0.0, DT);
            assert!(spring.angle.abs() <= 0.2 + 1e-6);
        }
    }

    #[test]
    fn test_drive_combines_speed_and_turn() {
        let params = SpringParams::trunk();
        let mut a = Spring::new();
        let mut b = Spring::new();

        // drive 与显式目标等价
        let speed = 0.5;
        let turn = 0.4;
        let target = speed * params.speed_gain + turn * params.turn_gain;
        for _ in 0..120 {
            a.drive(&params, speed, turn, DT);
            b.update(&params, target, DT);
        }
        assert!((a.angle - b.angle).abs() < 1e-6);
    }

    #[test]
    fn test_at_rest_stays_at_rest() {
        let params = SpringParams::ears();
        let mut spring = Spring::new();
        spring.update(&params, 0.0, DT);
        assert_eq!(spring.angle, 0.0);
        assert_eq!(spring.velocity, 0.0);
    }
}
