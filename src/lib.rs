//! 程序化四足运动引擎
//!
//! 把离散行为状态（发呆、行走、漫步、喝水、兴奋、好奇）逐帧转换
//! 成骨架上的连续关节旋转，不依赖任何预制动画片段。三套耦合算法：
//!
//! - 每条腿一个双段解析 IK（余弦定理，单轴平面解）
//! - 相位驱动的步态生成器，推动 IK 目标走过支撑/摆动循环
//! - 非承重附肢（鼻、耳、尾）的临界阻尼弹簧次级运动
//!
//! 典型用法：
//!
//! ```
//! use glam::Vec3;
//! use quadruped_engine::{
//!     BoneDef, BoneSet, Environment, GaitState, LocomotionController,
//! };
//!
//! # fn defs() -> Vec<BoneDef> {
//! #     vec![BoneDef::new("spine_base", -1, Vec3::new(0.0, 0.45, 0.0))]
//! # }
//! let mut skeleton = BoneSet::from_defs(&defs()).unwrap();
//! let mut controller = LocomotionController::with_seed(42);
//! let env = Environment::default();
//!
//! controller.set_state(GaitState::Walk);
//! for _ in 0..60 {
//!     controller.update(&mut skeleton, 1.0 / 60.0, Some(&env));
//! }
//! let snapshot = controller.debug_info();
//! assert!(snapshot.walk_blend > 0.0);
//! ```
//!
//! 骨架由调用方持有并在每帧传入；引擎只读取世界位置、写入关节
//! 旋转（以及根骨骼的位置）。环境快照可选，缺失时只禁用转向
//! 约束与水源触发，步态与 IK 照常运行。

pub mod config;
pub mod environment;
pub mod gait;
pub mod locomotion;
pub mod rig;
pub mod skeleton;
pub mod spring;

pub use config::LocomotionConfig;
pub use environment::{Environment, Obstacle, PointOfInterest};
pub use gait::{FootfallEvent, FootOffset};
pub use locomotion::{
    DebugSnapshot, GaitState, LocomotionContext, LocomotionController,
};
pub use rig::{BoneNames, LegChain, LimbId, RigChains};
pub use skeleton::{Bone, BoneDef, BoneLink, BoneSet, BoneTransform, SkeletonError};
pub use spring::{Spring, SpringParams};

#[cfg(test)]
pub(crate) mod test_util;
