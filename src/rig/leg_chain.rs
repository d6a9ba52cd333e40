//! 肢体装配数据
//!
//! 从绑定姿态一次性派生的每肢体缓存：骨段长度、静息足端位置、
//! 附肢链的关节索引与衰减系数。装配在第一帧惰性完成；地面高度
//! 变化（预期触地位置随之变化）时整套重建。
//!
//! 缺失骨骼的肢体在装配期被跳过并记录日志，此后整个会话不再
//! 参与 IK 姿态。姿态例程因此可以假定链上所有索引有效。

use glam::Vec3;

use crate::skeleton::BoneSet;

use super::ik_solver::MIN_SEGMENT_LEN;
use super::roles::{AppendageGroup, BoneNames, JointRole, LimbId};

/// 鼻链各关节的摆动衰减（根 → 尖，末项归梢端）
const TRUNK_FALLOFF: [f32; 4] = [0.7, 0.5, 0.35, 0.2];

/// 尾链各关节的摆动衰减
const TAIL_FALLOFF: [f32; 3] = [0.6, 0.4, 0.2];

// ============================================================================
// 腿链
// ============================================================================

/// 单腿的派生装配数据
///
/// `rest_foot_local` 在装配时从绑定姿态算出后不再变化，
/// 所有步态运动都表达为相对它的偏移。
#[derive(Clone, Debug)]
pub struct LegChain {
    /// 肢体编号
    pub limb: LimbId,
    /// 髋骨索引
    pub hip: usize,
    /// 膝骨索引
    pub knee: usize,
    /// 足骨索引
    pub foot: usize,
    /// 大腿段长度（髋 → 膝）
    pub upper_len: f32,
    /// 小腿段长度（膝 → 足）
    pub lower_len: f32,
    /// 静息足端位置（髋骨本地空间）
    pub rest_foot_local: Vec3,
    /// 绑定姿态下的髋俯仰
    pub rest_hip_pitch: f32,
    /// 绑定姿态下的膝俯仰
    pub rest_knee_pitch: f32,
    /// 绑定姿态下的足俯仰
    pub rest_foot_pitch: f32,
}

// ============================================================================
// 附肢链
// ============================================================================

/// 附肢的摆动轴
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwingAxis {
    /// 绕 Y 轴（鼻、尾的左右摆）
    Yaw,
    /// 绕 Z 轴（耳朵的扇动）
    Roll,
}

/// 附肢链：骨骼索引 + 每关节摆动系数
///
/// 系数沿链递减，但旋转沿父子层级逐级叠加，
/// 梢端的实际摆幅仍然最大。耳朵用符号相反的系数实现镜像。
#[derive(Clone, Debug, Default)]
pub struct AppendageChain {
    /// (骨骼索引, 摆动系数)
    pub joints: Vec<(usize, f32)>,
    /// 摆动轴
    pub axis: SwingAxis,
}

impl Default for SwingAxis {
    fn default() -> Self {
        SwingAxis::Yaw
    }
}

impl AppendageChain {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }
}

// ============================================================================
// 装配集合
// ============================================================================

/// 一只生物的完整装配：腿链、附肢链、身体参考骨骼
#[derive(Clone, Debug)]
pub struct RigChains {
    /// 每条腿的链（缺失骨骼的腿为 None）
    pub legs: [Option<LegChain>; 4],
    /// 鼻链
    pub trunk: AppendageChain,
    /// 耳链（左右镜像）
    pub ears: AppendageChain,
    /// 尾链
    pub tail: AppendageChain,
    /// 身体根骨骼
    pub root: Option<usize>,
    /// 脊柱中段
    pub spine_mid: Option<usize>,
    /// 颈部
    pub neck: Option<usize>,
    /// 头部
    pub head: Option<usize>,
    /// 装配时使用的地面高度
    pub ground_height: f32,
}

impl RigChains {
    /// 从绑定姿态装配
    ///
    /// 骨架被重置到绑定姿态后采样世界位置。缺失骨骼 → 对应
    /// 肢体/附肢跳过（记录警告），不是致命错误。
    pub fn build(skeleton: &mut BoneSet, names: &BoneNames, ground_height: f32) -> Self {
        skeleton.reset_pose();
        skeleton.update_world_transforms();

        let mut legs: [Option<LegChain>; 4] = [None, None, None, None];
        for limb in LimbId::ALL {
            legs[limb.index()] = Self::build_leg(skeleton, names, limb, ground_height);
        }

        let rigged = legs.iter().filter(|l| l.is_some()).count();
        log::info!("[RIG] 装配完成: {rigged}/4 条腿, 地面高度 {ground_height}");

        Self {
            legs,
            trunk: Self::build_appendage(skeleton, &names.trunk, &TRUNK_FALLOFF, SwingAxis::Yaw),
            ears: Self::build_ears(skeleton, names),
            tail: Self::build_appendage(skeleton, &names.tail, &TAIL_FALLOFF, SwingAxis::Yaw),
            root: skeleton.bone_index(&names.root),
            spine_mid: skeleton.bone_index(&names.spine_mid),
            neck: skeleton.bone_index(&names.neck),
            head: skeleton.bone_index(&names.head),
            ground_height,
        }
    }

    /// 按肢体取腿链
    #[inline]
    pub fn leg(&self, limb: LimbId) -> Option<&LegChain> {
        self.legs[limb.index()].as_ref()
    }

    /// 按分组取附肢链
    #[inline]
    pub fn appendage(&self, group: AppendageGroup) -> &AppendageChain {
        match group {
            AppendageGroup::Trunk => &self.trunk,
            AppendageGroup::Ears => &self.ears,
            AppendageGroup::Tail => &self.tail,
        }
    }

    fn build_leg(
        skeleton: &BoneSet,
        names: &BoneNames,
        limb: LimbId,
        ground_height: f32,
    ) -> Option<LegChain> {
        let leg_names = &names.legs[limb.index()];

        const ROLES: [JointRole; 3] = [JointRole::Hip, JointRole::Knee, JointRole::Foot];
        let mut indices = [0usize; 3];
        for ((slot, role), name) in indices.iter_mut().zip(ROLES).zip(leg_names.iter()) {
            match skeleton.bone_index(name) {
                Some(idx) => *slot = idx,
                None => {
                    log::warn!("[RIG] 肢体 {limb:?} 缺少 {role:?} 骨骼 '{name}'，跳过");
                    return None;
                }
            }
        }
        let [hip, knee, foot] = indices;

        let hip_world = skeleton.bone(hip).position();
        let knee_world = skeleton.bone(knee).position();
        let foot_world = skeleton.bone(foot).position();

        let upper_len = (knee_world - hip_world).length().max(MIN_SEGMENT_LEN);
        let lower_len = (foot_world - knee_world).length().max(MIN_SEGMENT_LEN);

        // 足端世界位置换入髋骨本地空间，作为静息步态目标；
        // 纵向按地面高度修正，保证足底落在预期触地平面上
        let mut rest_foot_local = skeleton
            .bone(hip)
            .local_to_world
            .inverse()
            .transform_point3(foot_world);
        rest_foot_local.y += ground_height - foot_world.y;

        let hip_bone = skeleton.bone(hip);
        let knee_bone = skeleton.bone(knee);
        let foot_bone = skeleton.bone(foot);

        Some(LegChain {
            limb,
            hip,
            knee,
            foot,
            upper_len,
            lower_len,
            rest_foot_local,
            rest_hip_pitch: hip_bone.pose_rotation.x,
            rest_knee_pitch: knee_bone.pose_rotation.x,
            rest_foot_pitch: foot_bone.pose_rotation.x,
        })
    }

    fn build_appendage(
        skeleton: &BoneSet,
        names: &[String],
        falloff: &[f32],
        axis: SwingAxis,
    ) -> AppendageChain {
        let mut joints = Vec::with_capacity(names.len());
        let count = names.len();
        for (j, name) in names.iter().enumerate() {
            let Some(idx) = skeleton.bone_index(name) else {
                log::warn!("[RIG] 附肢骨骼 '{name}' 缺失，跳过");
                continue;
            };
            // 梢端取表尾，其余按序取表
            let scale = if j + 1 == count {
                *falloff.last().unwrap_or(&1.0)
            } else {
                falloff[j.min(falloff.len().saturating_sub(1))]
            };
            joints.push((idx, scale));
        }
        AppendageChain { joints, axis }
    }

    fn build_ears(skeleton: &BoneSet, names: &BoneNames) -> AppendageChain {
        let mut joints = Vec::with_capacity(2);
        for (name, scale) in [(&names.ear_left, 1.0f32), (&names.ear_right, -1.0f32)] {
            match skeleton.bone_index(name) {
                Some(idx) => joints.push((idx, scale)),
                None => log::warn!("[RIG] 附肢骨骼 '{name}' 缺失，跳过"),
            }
        }
        AppendageChain {
            joints,
            axis: SwingAxis::Roll,
        }
    }
}
