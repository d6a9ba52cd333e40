//! 肢体装配与腿部 IK
//!
//! - roles: 封闭的关节角色枚举与物种命名表
//! - leg_chain: 绑定姿态派生的每肢体缓存数据
//! - ik_solver: 双段解析 IK（余弦定理，单轴平面解）

mod ik_solver;
mod leg_chain;
mod roles;

pub use ik_solver::{solve_two_bone, LegAngles, MIN_SEGMENT_LEN};
pub use leg_chain::{AppendageChain, LegChain, RigChains, SwingAxis};
pub use roles::{AppendageGroup, BoneNames, JointRole, LimbId};
