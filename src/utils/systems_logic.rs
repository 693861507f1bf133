//! Systems logic based on the game phase.

use crate::utils::game_functions::{
    advance_game_clock, check_skeleton_image_load, despawn_game_over_ui, game_over_inputs,
    handle_bone_clicks, measure_skeleton_layout, setup_game_over_ui, sync_game_phase,
    sync_hit_areas, teardown_game, update_feedback_colors, update_info_panel,
};
use crate::utils::objects::GamePhase;
use crate::utils::setup::{setup_scene, start_game};
use bevy::prelude::*;

// Plugin for managing all the game systems based on the current game phase.
pub struct SystemsLogicPlugin;

impl Plugin for SystemsLogicPlugin {
    /// Builds the plugin by adding the systems to the app.
    fn build(&self, app: &mut App) {
        app.init_state::<GamePhase>()
            .add_systems(Startup, (setup_scene, start_game).chain())
            // Layout runs every frame, the map only changes when the metrics do
            .add_systems(
                Update,
                (measure_skeleton_layout, sync_hit_areas, check_skeleton_image_load).chain(),
            )
            .add_systems(
                Update,
                (
                    // Clicks before time so a click in the same frame as the last tick still counts
                    handle_bone_clicks.run_if(in_state(GamePhase::Active)),
                    advance_game_clock,
                    (update_feedback_colors, update_info_panel),
                    sync_game_phase,
                )
                    .chain(),
            )
            // Game over screens
            .add_systems(OnEnter(GamePhase::Ended), setup_game_over_ui)
            .add_systems(OnEnter(GamePhase::Completed), setup_game_over_ui)
            .add_systems(
                Update,
                game_over_inputs
                    .run_if(in_state(GamePhase::Ended).or(in_state(GamePhase::Completed))),
            )
            .add_systems(OnExit(GamePhase::Ended), despawn_game_over_ui)
            .add_systems(OnExit(GamePhase::Completed), despawn_game_over_ui)
            .add_systems(Last, teardown_game);
    }
}
