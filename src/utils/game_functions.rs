//! Core game and UI functions: drive the controller from Bevy time, clicks and layout.
use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::utils::constants::ui_constants::{
    AREA_CORRECT_COLOR, AREA_IDLE_COLOR, AREA_INCORRECT_COLOR,
};
use crate::utils::game_controller::GameController;
use crate::utils::hit_regions::{HitRegionMap, ImageMetrics};
use crate::utils::objects::{
    BoneArea, Feedback, GamePhase, InfoField, RestartButton, SkeletonFrame, SkeletonImage,
    UIEntity,
};

/// Helper to despawn ui entities given a mutable commands reference
pub fn despawn_ui_helper(commands: &mut Commands, query: &Query<Entity, With<UIEntity>>) {
    for entity in query {
        commands.entity(entity).despawn();
    }
}

/// Feeds frame time into the controller's scheduler.
pub fn advance_game_clock(time: Res<Time>, mut game: ResMut<GameController>) {
    // Only flag the resource as changed when a task actually fired
    if game.bypass_change_detection().advance(time.delta()) > 0 {
        game.set_changed();
    }
}

/// Forwards presses on bone areas to the controller.
pub fn handle_bone_clicks(
    areas: Query<(&Interaction, &BoneArea), Changed<Interaction>>,
    mut game: ResMut<GameController>,
) {
    for (interaction, area) in &areas {
        if *interaction != Interaction::Pressed {
            continue;
        }
        let name = game.catalog()[area.bone_index].name;
        game.handle_click(name);
    }
}

/// Restart via the button or the R key, only while the game is over.
pub fn game_over_inputs(
    keyboard: Res<ButtonInput<KeyCode>>,
    buttons: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
    mut game: ResMut<GameController>,
) {
    let pressed = buttons.iter().any(|i| *i == Interaction::Pressed);
    if pressed || keyboard.just_pressed(KeyCode::KeyR) {
        info!("Restarting game");
        game.restart_game();
    }
}

/// Layout provider: measures the frame and the image, and re-maps the hit regions when they change.
/// Covers window resizes and the image finishing loading (its size is zero until then).
pub fn measure_skeleton_layout(
    frame_query: Query<&ComputedNode, With<SkeletonFrame>>,
    image_query: Query<&ComputedNode, With<SkeletonImage>>,
    mut hit_map: ResMut<HitRegionMap>,
) {
    let (Ok(frame), Ok(image)) = (frame_query.single(), image_query.single()) else {
        return;
    };
    let metrics = ImageMetrics::centered_in(
        frame.size() * frame.inverse_scale_factor(),
        image.size() * image.inverse_scale_factor(),
    );
    if hit_map.bypass_change_detection().update_metrics(metrics) {
        debug!("Skeleton image measured: {:?}", metrics);
        hit_map.set_changed();
    }
}

/// Moves the click area nodes onto the freshly mapped pixel rectangles.
pub fn sync_hit_areas(hit_map: Res<HitRegionMap>, mut areas: Query<(&BoneArea, &mut Node)>) {
    if !hit_map.is_changed() {
        return;
    }
    for (area, mut node) in &mut areas {
        let Some(rect) = hit_map.rect_for(area.bone_index, area.side) else {
            continue;
        };
        node.left = Val::Px(rect.left);
        node.top = Val::Px(rect.top);
        node.width = Val::Px(rect.width());
        node.height = Val::Px(rect.height());
    }
}

/// Tints click areas with the bone's feedback. Both halves of a bilateral bone share it.
pub fn update_feedback_colors(
    game: Res<GameController>,
    mut areas: Query<(&BoneArea, &mut BackgroundColor)>,
) {
    if !game.is_changed() {
        return;
    }
    for (area, mut background) in &mut areas {
        let name = game.catalog()[area.bone_index].name;
        let color = match game.feedback_for(name) {
            Some(Feedback::Correct) => AREA_CORRECT_COLOR,
            Some(Feedback::Incorrect) => AREA_INCORRECT_COLOR,
            None => AREA_IDLE_COLOR,
        };
        *background = BackgroundColor(color);
    }
}

/// Refreshes the info panel texts.
pub fn update_info_panel(game: Res<GameController>, mut texts: Query<(&mut Text, &InfoField)>) {
    if !game.is_changed() {
        return;
    }
    for (mut text, field) in &mut texts {
        text.0 = match field {
            InfoField::Target => format!("Find the: {}", game.target().map_or("-", |b| b.name)),
            InfoField::TimeLeft => format!("Time left: {}", game.time_remaining()),
            InfoField::Score => format!("Score: {}", game.score()),
            InfoField::HighScore => format!("Best: {}", game.high_score()),
            InfoField::FinalScore => match game.last_outcome() {
                Some(outcome) if outcome.score > 0 => format!("Final Score: {}", outcome.score),
                _ => String::new(),
            },
        };
    }
}

/// Mirrors the controller phase into the Bevy state so enter/exit systems run.
pub fn sync_game_phase(
    game: Res<GameController>,
    state: Res<State<GamePhase>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if game.phase() != *state.get() {
        next_state.set(game.phase());
    }
}

/// Shows the restart button and the end-of-game banner.
pub fn setup_game_over_ui(
    mut commands: Commands,
    game: Res<GameController>,
    mut restart_query: Query<&mut Node, With<RestartButton>>,
) {
    for mut node in &mut restart_query {
        node.display = Display::Flex;
    }

    let Some(outcome) = game.last_outcome() else {
        return;
    };
    let mut text = if outcome.completed {
        format!("You found every bone! Score: {}", outcome.score)
    } else {
        format!("Time's up! Score: {}", outcome.score)
    };
    if outcome.new_high_score {
        text.push_str("\nNew high score!");
    }

    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 32.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            left: Val::Px(24.0),
            ..default()
        },
        UIEntity,
    ));
}

/// Hides the restart button and clears the banner.
pub fn despawn_game_over_ui(
    mut commands: Commands,
    query: Query<Entity, With<UIEntity>>,
    mut restart_query: Query<&mut Node, With<RestartButton>>,
) {
    despawn_ui_helper(&mut commands, &query);
    for mut node in &mut restart_query {
        node.display = Display::None;
    }
}

/// Reports once if the skeleton image cannot be loaded. The areas then stay zero-sized.
pub fn check_skeleton_image_load(
    asset_server: Res<AssetServer>,
    image_query: Query<&SkeletonImage>,
    mut reported: Local<bool>,
) {
    if *reported {
        return;
    }
    let Ok(image) = image_query.single() else {
        return;
    };
    if let Some(LoadState::Failed(e)) = asset_server.get_load_state(image.handle.id()) {
        warn!("Skeleton image failed to load, bones cannot be clicked: {e}");
        *reported = true;
    }
}

/// Unmount: no scheduled callback may fire after the app stops.
pub fn teardown_game(mut exit: MessageReader<AppExit>, mut game: ResMut<GameController>) {
    if exit.read().next().is_some() {
        game.teardown();
        info!("Game torn down");
    }
}
