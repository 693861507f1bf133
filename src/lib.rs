//! Poke a Bone: find the named bone on the skeleton before the countdown runs out.
use bevy::prelude::*;

use crate::plugins::bone_game_plugin::BoneGamePlugin;
use crate::utils::constants::ui_constants::{BACKGROUND_COLOR, WINDOW_TITLE};
use crate::utils::score_reporter::ScoreReporter;

pub mod utils {
    pub mod config;
    pub mod constants;
    pub mod errors;
    pub mod game_controller;
    pub mod game_functions;
    pub mod hit_regions;
    pub mod objects;
    pub mod scheduler;
    pub mod score_reporter;
    pub mod setup;
    pub mod storage;
    pub mod systems_logic;
}

pub mod plugins {
    pub mod bone_game_plugin;
}

/// Host entry point. `on_game_end` is called with the final score each time a game ends.
pub fn run_game(on_game_end: impl ScoreReporter + 'static) -> AppExit {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.into(),
                fit_canvas_to_parent: true,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .add_plugins(BoneGamePlugin::new(on_game_end))
        .run()
}
