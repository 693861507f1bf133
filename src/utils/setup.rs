//! Setup logic for the game screen: camera, skeleton frame with click areas, info panel.
use bevy::prelude::*;

use crate::utils::constants::ui_constants::{
    AREA_IDLE_COLOR, FRAME_WIDTH_PERCENT, INFO_FONT_SIZE, INFO_PANEL_WIDTH_PERCENT,
    RESTART_BUTTON_COLOR, SKELETON_IMAGE_PATH, TITLE_FONT_SIZE, WINDOW_TITLE,
};
use crate::utils::game_controller::GameController;
use crate::utils::objects::{BoneArea, InfoField, RestartButton, SkeletonFrame, SkeletonImage};

/// Spawns the persistent UI tree. Click areas start zero-sized until the image is measured.
pub fn setup_scene(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    game: Res<GameController>,
) {
    commands.spawn(Camera2d);

    let image: Handle<Image> = asset_server.load(SKELETON_IMAGE_PATH);

    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            padding: UiRect::all(Val::Px(16.0)),
            row_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|root| {
            root.spawn((
                Text::new(WINDOW_TITLE),
                TextFont {
                    font_size: TITLE_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));

            root.spawn(Node {
                width: Val::Percent(100.0),
                flex_grow: 1.0,
                flex_direction: FlexDirection::Row,
                justify_content: JustifyContent::Center,
                column_gap: Val::Px(24.0),
                ..default()
            })
            .with_children(|row| {
                // Skeleton frame: image centred, click areas absolutely positioned on top
                row.spawn((
                    Node {
                        width: Val::Percent(FRAME_WIDTH_PERCENT),
                        height: Val::Percent(100.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    SkeletonFrame,
                ))
                .with_children(|frame| {
                    frame.spawn((
                        ImageNode::new(image.clone()),
                        Node {
                            max_width: Val::Percent(100.0),
                            max_height: Val::Percent(100.0),
                            ..default()
                        },
                        SkeletonImage {
                            handle: image.clone(),
                        },
                    ));

                    for (bone_index, bone) in game.catalog().iter().enumerate() {
                        for (side, _) in bone.region.rects() {
                            frame.spawn((
                                Button,
                                Node {
                                    position_type: PositionType::Absolute,
                                    ..default()
                                },
                                BackgroundColor(AREA_IDLE_COLOR),
                                BoneArea { bone_index, side },
                            ));
                        }
                    }
                });

                row.spawn(Node {
                    width: Val::Percent(INFO_PANEL_WIDTH_PERCENT),
                    flex_direction: FlexDirection::Column,
                    row_gap: Val::Px(10.0),
                    ..default()
                })
                .with_children(|panel| spawn_info_panel(panel));
            });
        });

    info!("Game screen ready with {} bones", game.catalog().len());
}

fn spawn_info_panel(panel: &mut ChildSpawnerCommands) {
    for field in [
        InfoField::Target,
        InfoField::TimeLeft,
        InfoField::Score,
        InfoField::HighScore,
    ] {
        panel.spawn((
            Text::new(""),
            TextFont {
                font_size: INFO_FONT_SIZE,
                ..default()
            },
            TextColor(Color::WHITE),
            field,
        ));
    }

    // Hidden until the game is over
    panel
        .spawn((
            Button,
            Node {
                display: Display::None,
                padding: UiRect::axes(Val::Px(16.0), Val::Px(8.0)),
                justify_content: JustifyContent::Center,
                ..default()
            },
            BackgroundColor(RESTART_BUTTON_COLOR),
            RestartButton,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new("Restart Game"),
                TextFont {
                    font_size: INFO_FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    panel.spawn((
        Text::new(""),
        TextFont {
            font_size: INFO_FONT_SIZE,
            ..default()
        },
        TextColor(Color::srgb(1.0, 0.85, 0.3)),
        InfoField::FinalScore,
    ));
}

/// Mount: the first target is drawn once the screen exists.
pub fn start_game(mut game: ResMut<GameController>) {
    game.start();
}
