//! 测试辅助：程序化搭建测试骨架

use glam::Vec3;

use crate::skeleton::{BoneDef, BoneSet};

/// 低多边形大象骨架（脊柱 + 头颈 + 鼻/耳/尾 + 四条腿）
pub(crate) fn elephant_skeleton() -> BoneSet {
    let mut defs = spine_defs();

    // 四条腿：髋(上腿) → 膝(下腿) → 足，前腿挂在脊柱中段，后腿挂在脊柱根
    for (prefix, parent, x, z) in [
        ("front_left", 1, 0.14, 0.22),
        ("back_left", 0, 0.14, -0.22),
        ("front_right", 1, -0.14, 0.22),
        ("back_right", 0, -0.14, -0.22),
    ] {
        let hip = defs.len();
        defs.push(BoneDef::new(
            format!("{prefix}_upper_leg"),
            parent,
            Vec3::new(x, 0.42, z),
        ));
        defs.push(BoneDef::new(
            format!("{prefix}_lower_leg"),
            hip as i32,
            Vec3::new(x, 0.22, z),
        ));
        defs.push(BoneDef::new(
            format!("{prefix}_paw"),
            (hip + 1) as i32,
            Vec3::new(x, 0.02, z),
        ));
    }

    BoneSet::from_defs(&defs).expect("测试骨架定义合法")
}

/// 无腿骨架：只有脊柱与附肢（降级路径测试用）
pub(crate) fn legless_skeleton() -> BoneSet {
    BoneSet::from_defs(&spine_defs()).expect("测试骨架定义合法")
}

fn spine_defs() -> Vec<BoneDef> {
    vec![
        BoneDef::new("spine_base", -1, Vec3::new(0.0, 0.45, -0.25)), // 0
        BoneDef::new("spine_mid", 0, Vec3::new(0.0, 0.48, 0.0)),     // 1
        BoneDef::new("spine_neck", 1, Vec3::new(0.0, 0.52, 0.28)),   // 2
        BoneDef::new("head", 2, Vec3::new(0.0, 0.58, 0.42)),         // 3
        BoneDef::new("trunk_base", 3, Vec3::new(0.0, 0.50, 0.52)),   // 4
        BoneDef::new("trunk_mid", 4, Vec3::new(0.0, 0.36, 0.58)),    // 5
        BoneDef::new("trunk_tip", 5, Vec3::new(0.0, 0.20, 0.60)),    // 6
        BoneDef::new("ear_left", 3, Vec3::new(0.12, 0.60, 0.40)),    // 7
        BoneDef::new("ear_right", 3, Vec3::new(-0.12, 0.60, 0.40)),  // 8
        BoneDef::new("tail_base", 0, Vec3::new(0.0, 0.46, -0.38)),   // 9
        BoneDef::new("tail_mid", 9, Vec3::new(0.0, 0.36, -0.44)),    // 10
        BoneDef::new("tail_tip", 10, Vec3::new(0.0, 0.26, -0.48)),   // 11
    ]
}
