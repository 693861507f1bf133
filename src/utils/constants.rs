// Constants used in the game, structured into modules.

/// Generic game constants
pub mod game_constants {
    // Starting value of the round countdown.
    pub const ROUND_TIME: u32 = 100;

    // Countdown decrement period.
    pub const TICK_INTERVAL_MS: u64 = 100;

    // Time lost on a wrong guess.
    pub const WRONG_CLICK_PENALTY: u32 = 10;

    // How long a wrong-guess highlight stays on screen.
    pub const FEEDBACK_CLEAR_MS: u64 = 1000;

    // Cooldown between a correct guess and the next target.
    pub const ROUND_ADVANCE_MS: u64 = 1000;
}

/// Persistence
pub mod storage_constants {
    pub const HIGH_SCORE_KEY: &str = "highScore";

    // File name of the native key-value store, placed in the temp dir unless configured.
    pub const SCORE_FILE_NAME: &str = "poke_a_bone_scores.toml";

    // Config lookup (native only)
    pub const CONFIG_ENV_VAR: &str = "POKE_A_BONE_CONFIG";
    pub const CONFIG_FILE_NAME: &str = "poke_a_bone.toml";
}

/// UI layout and colors
pub mod ui_constants {
    use bevy::prelude::Color;

    pub const WINDOW_TITLE: &str = "Poke a Bone!";
    pub const SKELETON_IMAGE_PATH: &str = "skeleton.png";

    // Share of the window width taken by the skeleton frame.
    pub const FRAME_WIDTH_PERCENT: f32 = 60.0;
    pub const INFO_PANEL_WIDTH_PERCENT: f32 = 30.0;

    pub const TITLE_FONT_SIZE: f32 = 40.0;
    pub const INFO_FONT_SIZE: f32 = 24.0;

    pub const BACKGROUND_COLOR: Color = Color::srgb(0.12, 0.13, 0.16);
    pub const AREA_IDLE_COLOR: Color = Color::srgba(0.0, 0.0, 0.0, 0.0);
    pub const AREA_CORRECT_COLOR: Color = Color::srgba(0.2, 0.9, 0.3, 0.5);
    pub const AREA_INCORRECT_COLOR: Color = Color::srgba(0.95, 0.2, 0.2, 0.5);
    pub const RESTART_BUTTON_COLOR: Color = Color::srgb(0.25, 0.45, 0.85);
}

/// Bone catalog, percentage coordinates (0-100) of the reference image.
pub mod bone_constants {
    use crate::utils::hit_regions::{BoneRegion, PercentRect};
    use crate::utils::objects::Bone;

    const fn single(name: &'static str, x1: f32, y1: f32, x2: f32, y2: f32) -> Bone {
        Bone {
            name,
            region: BoneRegion::Single(PercentRect::new(x1, y1, x2, y2)),
        }
    }

    const fn bilateral(name: &'static str, left: [f32; 4], right: [f32; 4]) -> Bone {
        Bone {
            name,
            region: BoneRegion::Bilateral {
                left: PercentRect::new(left[0], left[1], left[2], left[3]),
                right: PercentRect::new(right[0], right[1], right[2], right[3]),
            },
        }
    }

    pub const BONE_COUNT: usize = 18;

    pub const BONE_CATALOG: [Bone; BONE_COUNT] = [
        single("Skull", 39.0, 0.0, 61.0, 13.0),
        single("Clavicle", 23.0, 17.0, 76.0, 19.0),
        bilateral("Scapula", [24.0, 19.0, 35.0, 22.0], [65.0, 19.0, 75.0, 22.0]),
        single("Ribs", 36.0, 20.0, 64.0, 32.0),
        bilateral("Humerus", [18.0, 22.0, 27.0, 35.0], [70.0, 22.0, 80.0, 35.0]),
        bilateral("Ulna", [17.0, 35.0, 23.0, 48.0], [75.0, 35.0, 83.0, 48.0]),
        bilateral("Radius", [10.0, 35.0, 16.0, 48.0], [83.0, 35.0, 90.0, 48.0]),
        bilateral("Carpals", [2.0, 48.0, 20.0, 50.0], [82.0, 48.0, 98.0, 50.0]),
        bilateral("Metacarpals", [2.0, 50.0, 20.0, 52.0], [82.0, 50.0, 98.0, 52.0]),
        bilateral("Phalanges (Hand)", [2.0, 52.0, 20.0, 54.0], [82.0, 52.0, 98.0, 54.0]),
        single("Pelvis", 29.0, 37.0, 70.0, 47.0),
        bilateral("Femur", [30.0, 48.0, 47.0, 66.0], [53.0, 48.0, 68.0, 66.0]),
        bilateral("Patella", [30.0, 67.0, 47.0, 72.0], [53.0, 67.0, 68.0, 72.0]),
        bilateral("Tibia", [37.0, 73.0, 45.0, 90.0], [53.0, 73.0, 60.0, 90.0]),
        bilateral("Fibula", [30.0, 73.0, 35.0, 90.0], [62.0, 73.0, 66.0, 90.0]),
        bilateral("Tarsals", [28.0, 91.0, 45.0, 93.0], [53.0, 91.0, 69.0, 93.0]),
        bilateral("Metatarsals", [24.0, 93.0, 45.0, 95.0], [53.0, 93.0, 72.0, 95.0]),
        bilateral("Phalanges (Foot)", [20.0, 95.0, 45.0, 99.0], [53.0, 95.0, 74.0, 99.0]),
    ];
}
