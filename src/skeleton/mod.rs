//! 骨骼系统
//!
//! 核心设计思想：
//! - BoneLink: 表示单个骨骼节点（绑定偏移 + 叠加姿态通道）
//! - BoneSet: 管理骨骼层次结构，负责世界变换传播
//!
//! 运动引擎只读取世界位置、写入本地姿态旋转（根骨骼另有姿态平移），
//! 网格蒙皮等消费方在引擎之外。

mod bone_link;
mod bone_set;

pub use bone_link::BoneLink;
pub use bone_set::{BoneDef, BoneSet, SkeletonError};

use glam::{Mat4, Quat, Vec3};

// ============================================================================
// 公共类型定义
// ============================================================================

/// 骨骼变换数据
#[derive(Clone, Copy, Debug)]
pub struct BoneTransform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl BoneTransform {
    /// 转换为 4x4 矩阵
    #[inline]
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// 从矩阵分解
    #[inline]
    pub fn from_matrix(m: Mat4) -> Self {
        let (scale, rotation, translation) = m.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }
}

/// Bone 别名
pub type Bone = BoneLink;
