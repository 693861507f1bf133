use std::sync::Mutex;

use bevy::prelude::*;

use crate::utils::config::GameConfig;
use crate::utils::constants::bone_constants::BONE_CATALOG;
use crate::utils::game_controller::GameController;
use crate::utils::hit_regions::{HitRegionMap, validate_catalog};
use crate::utils::score_reporter::{NoopReporter, ScoreReporter};
use crate::utils::storage::platform_store;
use crate::utils::systems_logic::SystemsLogicPlugin;

/// Plugin wiring the bone quiz into an app. The host's reporter receives each final score.
pub struct BoneGamePlugin {
    // Taken on build, plugins only get `&self`
    reporter: Mutex<Option<Box<dyn ScoreReporter>>>,
}

impl BoneGamePlugin {
    pub fn new(reporter: impl ScoreReporter + 'static) -> Self {
        Self {
            reporter: Mutex::new(Some(Box::new(reporter))),
        }
    }
}

impl Default for BoneGamePlugin {
    fn default() -> Self {
        Self::new(NoopReporter)
    }
}

impl Plugin for BoneGamePlugin {
    fn build(&self, app: &mut App) {
        let config = GameConfig::load_or_default();

        let reporter = self
            .reporter
            .lock()
            .ok()
            .and_then(|mut reporter| reporter.take())
            .unwrap_or_else(|| Box::new(NoopReporter));

        let catalog = BONE_CATALOG.to_vec();
        if let Err(e) = validate_catalog(&catalog) {
            error!("{e}");
        }

        let store = platform_store(config.storage.path.clone());
        let game = GameController::new(catalog, config.settings(), store, reporter);
        info!("Best score so far: {}", game.high_score());

        app.insert_resource(HitRegionMap::new(game.catalog()))
            .insert_resource(game)
            .add_plugins(SystemsLogicPlugin);
    }
}
