//! 行为状态机与运动控制
//!
//! - context: 封闭的行为状态枚举 + 自有的运动上下文
//! - steering: 最短弧转向、围栏收容、障碍排斥、指数趋近
//! - states: 各状态的姿态例程与共用腿部路径
//! - controller: 每帧驱动整条流水线的控制器

mod context;
mod controller;
mod states;
mod steering;

pub use context::{GaitState, LocomotionContext};
pub use controller::{DebugSnapshot, LocomotionController};
pub use steering::{damp, heading_angle, heading_vec, turn_toward, wrap_angle};
