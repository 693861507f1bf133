// This file defines the various objects, resources, and components used in the game.
use bevy::prelude::*;

use crate::utils::hit_regions::{BoneRegion, RegionSide};

/// A named anatomical region with its click rectangles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bone {
    /// Unique identifier, also the label shown to the player
    pub name: &'static str,
    pub region: BoneRegion,
}

/// Transient highlight attached to a bone after a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect,
}

/// Game phase enum, mirrored into Bevy states so screens can react on enter/exit.
#[derive(States, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    // Not mounted yet
    Idle,
    // A target is set and the countdown runs
    Active,
    // Cooldown after a correct guess, before the next target
    RoundTransition,
    // The countdown reached zero
    Ended,
    // Every bone of the catalog was found
    Completed,
}

impl GamePhase {
    /// Active or cooling down between rounds.
    pub fn is_running(&self) -> bool {
        matches!(self, GamePhase::Active | GamePhase::RoundTransition)
    }

    pub fn is_over(&self) -> bool {
        matches!(self, GamePhase::Ended | GamePhase::Completed)
    }
}

/// Summary of a finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub score: u32,
    pub completed: bool,
    pub new_high_score: bool,
}

/// A component that marks the frame the skeleton image is centred in.
#[derive(Component)]
pub struct SkeletonFrame;

/// A component that marks the skeleton reference image.
#[derive(Component)]
pub struct SkeletonImage {
    pub handle: Handle<Image>,
}

/// A clickable rectangle of a bone.
#[derive(Component, Clone, Copy, Debug)]
pub struct BoneArea {
    pub bone_index: usize,
    pub side: RegionSide,
}

/// Text lines of the info panel.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfoField {
    Target,
    TimeLeft,
    Score,
    HighScore,
    FinalScore,
}

/// A component that marks the restart button.
#[derive(Component)]
pub struct RestartButton;

/// A component that marks an entity as a UI entity, despawned when leaving a screen.
#[derive(Component)]
pub struct UIEntity;
