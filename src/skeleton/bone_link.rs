//! 骨骼节点
//!
//! BoneLink 是骨骼层次中的单个节点。设计原则：
//! - 静态数据：骨骼的固有属性（名称、父子关系、绑定姿态偏移）
//! - 动态数据：每帧写入的姿态通道与缓存的变换矩阵
//! - 变换计算：local_to_world = parent.local_to_world * local_to_parent
//!
//! 动画系统以叠加方式写入欧拉角姿态通道（XYZ 顺序），每帧先经
//! `reset_pose` 清零，再由各姿态例程累加写入。

use glam::{EulerRot, Mat4, Quat, Vec3};

// ============================================================================
// 骨骼节点
// ============================================================================

/// 骨骼节点
#[derive(Clone, Debug)]
pub struct BoneLink {
    // ========================================
    // 静态数据（初始化后不变）
    // ========================================

    /// 骨骼名称
    pub name: String,

    /// 骨骼内部索引
    pub(crate) internal_id: usize,

    /// 父骨骼索引 (-1 表示根骨骼)
    pub parent_index: i32,

    /// 绑定姿态下相对父骨骼的偏移
    pub rest_translation: Vec3,

    // ========================================
    // 动态数据（每帧更新）
    // ========================================

    /// 姿态平移（一般仅根骨骼使用，叠加在 rest_translation 上）
    pub pose_translation: Vec3,

    /// 姿态旋转（XYZ 欧拉角，弧度，叠加式写入）
    pub pose_rotation: Vec3,

    /// 本地变换矩阵 (local_to_parent)
    pub local_to_parent: Mat4,

    /// 全局变换矩阵 (local_to_world)
    pub local_to_world: Mat4,

    /// 父骨骼到世界的变换（缓存）
    pub(crate) parent_to_world: Mat4,

    /// 是否为叶节点
    pub(crate) is_leaf: bool,
}

impl BoneLink {
    /// 创建新骨骼
    pub fn new(name: String) -> Self {
        Self {
            name,
            internal_id: 0,
            parent_index: -1,
            rest_translation: Vec3::ZERO,
            pose_translation: Vec3::ZERO,
            pose_rotation: Vec3::ZERO,
            local_to_parent: Mat4::IDENTITY,
            local_to_world: Mat4::IDENTITY,
            parent_to_world: Mat4::IDENTITY,
            is_leaf: true,
        }
    }

    // ========================================
    // 访问器
    // ========================================

    /// 骨骼索引
    #[inline]
    pub fn link_id(&self) -> usize {
        self.internal_id
    }

    /// 父骨骼索引
    #[inline]
    pub fn parent_id(&self) -> Option<usize> {
        if self.parent_index >= 0 {
            Some(self.parent_index as usize)
        } else {
            None
        }
    }

    /// 是否为根骨骼
    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_index < 0
    }

    /// 获取世界位置
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.local_to_world.col(3).truncate()
    }

    /// 获取世界旋转
    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_mat4(&self.local_to_world)
    }

    /// 父骨骼到世界的变换（缓存）
    #[inline]
    pub fn parent_to_world(&self) -> Mat4 {
        self.parent_to_world
    }

    /// 是否为叶节点
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.is_leaf
    }

    // ========================================
    // 变换计算
    // ========================================

    /// 重置姿态通道（保留绑定偏移）
    #[inline]
    pub fn reset_pose(&mut self) {
        self.pose_translation = Vec3::ZERO;
        self.pose_rotation = Vec3::ZERO;
    }

    /// 计算本地变换 (local_to_parent)
    ///
    /// 平移 = rest_translation + pose_translation
    /// 旋转 = 欧拉角 XYZ 顺序合成
    pub fn compute_local_transform(&mut self) {
        let translate = self.rest_translation + self.pose_translation;
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.pose_rotation.x,
            self.pose_rotation.y,
            self.pose_rotation.z,
        );
        self.local_to_parent = Mat4::from_rotation_translation(rotation, translate);
    }
}

impl Default for BoneLink {
    fn default() -> Self {
        Self::new(String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_pose_transform() {
        let mut bone = BoneLink::new("spine_base".to_string());
        bone.rest_translation = Vec3::new(0.0, 0.45, 0.0);
        bone.compute_local_transform();

        // 无姿态写入时，本地变换就是绑定偏移
        let p = bone.local_to_parent.col(3).truncate();
        assert!((p - Vec3::new(0.0, 0.45, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_pose_rotation_additive() {
        let mut bone = BoneLink::new("knee".to_string());
        bone.pose_rotation.x = std::f32::consts::FRAC_PI_2;
        bone.compute_local_transform();

        // 绕 X 轴旋转 90°：+Y 方向映射到 +Z
        let v = bone.local_to_parent.transform_vector3(Vec3::Y);
        assert!((v - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_reset_pose_keeps_rest() {
        let mut bone = BoneLink::new("hip".to_string());
        bone.rest_translation = Vec3::new(0.1, -0.2, 0.3);
        bone.pose_rotation = Vec3::new(0.4, 0.5, 0.6);
        bone.pose_translation = Vec3::ONE;
        bone.reset_pose();

        assert_eq!(bone.pose_rotation, Vec3::ZERO);
        assert_eq!(bone.pose_translation, Vec3::ZERO);
        assert_eq!(bone.rest_translation, Vec3::new(0.1, -0.2, 0.3));
    }
}
