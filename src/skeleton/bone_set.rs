//! 骨骼层次结构容器
//!
//! BoneSet 持有整棵骨骼树，负责：
//! - 从绑定姿态定义构建层次（含拓扑校验）
//! - 名称 → 索引查找
//! - 每帧的姿态清零与世界变换传播
//!
//! 骨骼在构建时要求父骨骼先于子骨骼出现，因此世界变换传播可以
//! 按索引顺序一次线性扫描完成。

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use thiserror::Error;

use super::bone_link::BoneLink;

// ============================================================================
// 错误类型
// ============================================================================

/// 骨骼构建错误
///
/// 仅在构建阶段出现；运行期的姿态计算没有失败路径。
#[derive(Debug, Error)]
pub enum SkeletonError {
    /// 空骨骼列表
    #[error("骨骼列表为空")]
    Empty,

    /// 父索引超出范围
    #[error("骨骼 '{name}' 的父索引 {parent} 越界")]
    ParentOutOfRange { name: String, parent: i32 },

    /// 父骨骼必须先于子骨骼出现
    #[error("骨骼 '{name}' 出现在其父骨骼之前")]
    ParentNotTopological { name: String },

    /// 骨骼名称重复
    #[error("骨骼名称 '{0}' 重复")]
    DuplicateName(String),
}

// ============================================================================
// 骨骼定义
// ============================================================================

/// 单根骨骼的绑定姿态定义
#[derive(Clone, Debug)]
pub struct BoneDef {
    /// 骨骼名称
    pub name: String,
    /// 父骨骼索引 (-1 表示根骨骼)
    pub parent: i32,
    /// 绑定姿态下的世界位置
    pub position: Vec3,
}

impl BoneDef {
    pub fn new(name: impl Into<String>, parent: i32, position: Vec3) -> Self {
        Self {
            name: name.into(),
            parent,
            position,
        }
    }
}

// ============================================================================
// 骨骼集合
// ============================================================================

/// 骨骼层次结构容器
#[derive(Clone, Debug, Default)]
pub struct BoneSet {
    /// 骨骼列表（父先于子）
    bones: Vec<BoneLink>,
    /// 名称 → 索引
    name_index: HashMap<String, usize>,
}

impl BoneSet {
    /// 从绑定姿态定义构建骨骼层次
    ///
    /// 校验：父索引在范围内、父先于子、名称唯一。
    /// 绑定偏移 rest_translation 由世界位置差计算。
    pub fn from_defs(defs: &[BoneDef]) -> Result<Self, SkeletonError> {
        if defs.is_empty() {
            return Err(SkeletonError::Empty);
        }

        let mut bones: Vec<BoneLink> = Vec::with_capacity(defs.len());
        let mut name_index: HashMap<String, usize> = HashMap::with_capacity(defs.len());

        for (idx, def) in defs.iter().enumerate() {
            if def.parent >= 0 {
                let parent = def.parent as usize;
                if parent >= defs.len() {
                    return Err(SkeletonError::ParentOutOfRange {
                        name: def.name.clone(),
                        parent: def.parent,
                    });
                }
                if parent >= idx {
                    return Err(SkeletonError::ParentNotTopological {
                        name: def.name.clone(),
                    });
                }
            }
            if name_index.contains_key(&def.name) {
                return Err(SkeletonError::DuplicateName(def.name.clone()));
            }

            let mut bone = BoneLink::new(def.name.clone());
            bone.internal_id = idx;
            bone.parent_index = def.parent;
            bone.rest_translation = if def.parent >= 0 {
                def.position - defs[def.parent as usize].position
            } else {
                def.position
            };
            name_index.insert(def.name.clone(), idx);
            bones.push(bone);
        }

        // 标记叶节点
        for idx in 0..bones.len() {
            if let Some(parent) = bones[idx].parent_id() {
                bones[parent].is_leaf = false;
            }
        }

        let mut set = Self { bones, name_index };
        set.update_world_transforms();
        Ok(set)
    }

    // ========================================
    // 访问器
    // ========================================

    /// 骨骼数量
    #[inline]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    /// 是否为空
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    /// 按名称查找骨骼索引
    #[inline]
    pub fn bone_index(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// 按索引取骨骼
    #[inline]
    pub fn bone(&self, idx: usize) -> &BoneLink {
        &self.bones[idx]
    }

    /// 按索引取可变骨骼
    #[inline]
    pub fn bone_mut(&mut self, idx: usize) -> &mut BoneLink {
        &mut self.bones[idx]
    }

    /// 遍历骨骼
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &BoneLink> {
        self.bones.iter()
    }

    // ========================================
    // 每帧更新
    // ========================================

    /// 清零所有姿态通道
    pub fn reset_pose(&mut self) {
        for bone in &mut self.bones {
            bone.reset_pose();
        }
    }

    /// 重新计算所有骨骼的本地与世界变换
    ///
    /// 构建时保证父先于子，按索引顺序线性传播即可。
    pub fn update_world_transforms(&mut self) {
        for idx in 0..self.bones.len() {
            self.bones[idx].compute_local_transform();
            let parent_to_world = match self.bones[idx].parent_id() {
                Some(parent) => self.bones[parent].local_to_world,
                None => Mat4::IDENTITY,
            };
            self.bones[idx].parent_to_world = parent_to_world;
            self.bones[idx].local_to_world = parent_to_world * self.bones[idx].local_to_parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_bone_leg() -> Vec<BoneDef> {
        vec![
            BoneDef::new("hip", -1, Vec3::new(0.0, 0.9, 0.0)),
            BoneDef::new("knee", 0, Vec3::new(0.0, 0.5, 0.0)),
            BoneDef::new("foot", 1, Vec3::new(0.0, 0.05, 0.0)),
        ]
    }

    #[test]
    fn test_build_and_rest_world_positions() {
        let set = BoneSet::from_defs(&three_bone_leg()).unwrap();
        assert_eq!(set.len(), 3);

        // 绑定姿态下世界位置应与定义一致
        assert!((set.bone(1).position() - Vec3::new(0.0, 0.5, 0.0)).length() < 1e-6);
        assert!((set.bone(2).position() - Vec3::new(0.0, 0.05, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_rotation_propagates_to_children() {
        let mut set = BoneSet::from_defs(&three_bone_leg()).unwrap();

        // 髋关节绕 X 旋转 90°，足端应被带到髋后方
        set.bone_mut(0).pose_rotation.x = std::f32::consts::FRAC_PI_2;
        set.update_world_transforms();

        let hip = set.bone(0).position();
        let foot = set.bone(2).position();
        let offset = foot - hip;
        // 原本朝下 (-Y) 的链条被旋到 -Z 方向
        assert!(offset.z < -0.5);
        assert!(offset.y.abs() < 1e-4);
    }

    #[test]
    fn test_name_lookup() {
        let set = BoneSet::from_defs(&three_bone_leg()).unwrap();
        assert_eq!(set.bone_index("knee"), Some(1));
        assert_eq!(set.bone_index("missing"), None);
    }

    #[test]
    fn test_leaf_detection() {
        let set = BoneSet::from_defs(&three_bone_leg()).unwrap();
        assert!(!set.bone(0).is_leaf());
        assert!(!set.bone(1).is_leaf());
        assert!(set.bone(2).is_leaf());
    }

    #[test]
    fn test_parent_out_of_range() {
        let defs = vec![BoneDef::new("a", 5, Vec3::ZERO)];
        assert!(matches!(
            BoneSet::from_defs(&defs),
            Err(SkeletonError::ParentOutOfRange { .. })
        ));
    }

    #[test]
    fn test_parent_must_precede_child() {
        let defs = vec![
            BoneDef::new("child", 1, Vec3::ZERO),
            BoneDef::new("parent", -1, Vec3::ZERO),
        ];
        assert!(matches!(
            BoneSet::from_defs(&defs),
            Err(SkeletonError::ParentNotTopological { .. })
        ));
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let defs = vec![
            BoneDef::new("a", -1, Vec3::ZERO),
            BoneDef::new("a", 0, Vec3::Y),
        ];
        assert!(matches!(
            BoneSet::from_defs(&defs),
            Err(SkeletonError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(BoneSet::from_defs(&[]), Err(SkeletonError::Empty)));
    }
}
