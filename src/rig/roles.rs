//! 关节角色与骨骼命名表
//!
//! 运动引擎不直接用字符串在姿态代码里找骨骼：所有名称查找在装配期
//! 一次性完成，映射到封闭的角色枚举上。缺失的角色被记录为"缺席"，
//! 对应肢体整条跳过，姿态例程因此无需逐骨骼判空。

// ============================================================================
// 肢体与关节角色
// ============================================================================

/// 肢体编号
///
/// 相位偏移按侧序步态（lateral sequence）排列：
/// 左前 → 左后 → 右前 → 右后，彼此错开 1/4 周期，
/// 保证任意时刻至少有两足着地（对角支撑）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LimbId {
    FrontLeft,
    BackLeft,
    FrontRight,
    BackRight,
}

impl LimbId {
    /// 全部肢体（固定顺序）
    pub const ALL: [LimbId; 4] = [
        LimbId::FrontLeft,
        LimbId::BackLeft,
        LimbId::FrontRight,
        LimbId::BackRight,
    ];

    /// 数组索引
    #[inline]
    pub fn index(self) -> usize {
        match self {
            LimbId::FrontLeft => 0,
            LimbId::BackLeft => 1,
            LimbId::FrontRight => 2,
            LimbId::BackRight => 3,
        }
    }

    /// 步态相位偏移
    #[inline]
    pub fn phase_offset(self) -> f32 {
        match self {
            LimbId::FrontLeft => 0.0,
            LimbId::BackLeft => 0.25,
            LimbId::FrontRight => 0.5,
            LimbId::BackRight => 0.75,
        }
    }
}

/// 腿部关节角色
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JointRole {
    Hip,
    Knee,
    Foot,
}

/// 非承重附肢分组
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppendageGroup {
    Trunk,
    Ears,
    Tail,
}

// ============================================================================
// 骨骼命名表
// ============================================================================

/// 每个物种的骨骼命名表
///
/// 装配时据此解析角色 → 骨骼索引。任何名称在骨架中找不到时，
/// 对应功能静默降级（该肢体/附肢不参与姿态）。
#[derive(Clone, Debug)]
pub struct BoneNames {
    /// 每条腿的 [髋, 膝, 足] 名称，按 LimbId::ALL 顺序
    pub legs: [[String; 3]; 4],
    /// 鼻链名称（根 → 尖）
    pub trunk: Vec<String>,
    /// 左耳
    pub ear_left: String,
    /// 右耳
    pub ear_right: String,
    /// 尾链名称（根 → 尖）
    pub tail: Vec<String>,
    /// 身体根骨骼
    pub root: String,
    /// 脊柱中段
    pub spine_mid: String,
    /// 颈部
    pub neck: String,
    /// 头部
    pub head: String,
}

impl BoneNames {
    /// 低多边形大象的默认命名
    pub fn elephant() -> Self {
        let leg = |prefix: &str| {
            [
                format!("{prefix}_upper_leg"),
                format!("{prefix}_lower_leg"),
                format!("{prefix}_paw"),
            ]
        };
        Self {
            legs: [
                leg("front_left"),
                leg("back_left"),
                leg("front_right"),
                leg("back_right"),
            ],
            trunk: vec![
                "trunk_base".to_string(),
                "trunk_mid".to_string(),
                "trunk_tip".to_string(),
            ],
            ear_left: "ear_left".to_string(),
            ear_right: "ear_right".to_string(),
            tail: vec![
                "tail_base".to_string(),
                "tail_mid".to_string(),
                "tail_tip".to_string(),
            ],
            root: "spine_base".to_string(),
            spine_mid: "spine_mid".to_string(),
            neck: "spine_neck".to_string(),
            head: "head".to_string(),
        }
    }
}
