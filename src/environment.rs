//! 环境快照
//!
//! 由调用方在每帧传入的只读数据：围栏范围、兴趣点（如水源）、障碍物、
//! 地面高度。引擎从不修改快照；缺失的部分只会禁用依赖它的功能
//! （转向约束、围栏收容、喝水触发），步态与 IK 照常运行。

use glam::Vec3;

/// 兴趣点（如水源）
#[derive(Clone, Debug)]
pub struct PointOfInterest {
    /// 中心位置
    pub center: Vec3,
    /// 捕获半径：身体进入该范围即可触发相关行为
    pub radius: f32,
}

/// 障碍物
#[derive(Clone, Debug)]
pub struct Obstacle {
    /// 位置
    pub position: Vec3,
    /// 作用半径
    pub radius: f32,
    /// 排斥权重
    pub weight: f32,
    /// 可选类型标签（引擎不解释，仅透传给调用方）
    pub kind: Option<String>,
}

/// 环境快照
#[derive(Clone, Debug)]
pub struct Environment {
    /// 围栏中心
    pub enclosure_center: Vec3,
    /// 围栏半径
    pub enclosure_radius: f32,
    /// 地面高度
    pub ground_height: f32,
    /// 兴趣点（水源等），可缺省
    pub poi: Option<PointOfInterest>,
    /// 障碍物列表
    pub obstacles: Vec<Obstacle>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            enclosure_center: Vec3::ZERO,
            enclosure_radius: 5.0,
            ground_height: 0.0,
            poi: None,
            obstacles: Vec::new(),
        }
    }
}
