//! Round lifecycle: target selection, countdown, scoring and game end.
//!
//! The controller is headless. Time only moves through [`GameController::advance`],
//! the best score goes through an injected [`KeyValueStore`] and the final score
//! through an injected [`ScoreReporter`], so the whole state machine runs in tests
//! without an `App`.
use std::collections::HashMap;
use std::time::Duration;

use bevy::prelude::*;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::utils::config::GameSettings;
use crate::utils::errors::{BoneGameError, BoneGameResult};
use crate::utils::objects::{Bone, Feedback, GameOutcome, GamePhase};
use crate::utils::scheduler::{ScheduledAction, Scheduler, TaskHandle};
use crate::utils::score_reporter::ScoreReporter;
use crate::utils::storage::{KeyValueStore, load_high_score, save_high_score};

/// What a click did to the round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickOutcome {
    Ignored,
    Correct { points: u32 },
    Incorrect { time_remaining: u32 },
}

/// Per-round state, reset on every new target and on restart.
#[derive(Clone, Debug, Default)]
pub struct RoundState {
    /// Catalog indices not yet drawn this session
    pub pool: Vec<usize>,
    pub target: Option<usize>,
    pub time_remaining: u32,
    pub feedback: HashMap<&'static str, Feedback>,
    pub score: u32,
}

#[derive(Clone, Copy, Debug, Default)]
struct PendingTasks {
    tick: Option<TaskHandle>,
    advance_round: Option<TaskHandle>,
    clear_feedback: Option<TaskHandle>,
}

#[derive(Resource)]
pub struct GameController {
    catalog: Vec<Bone>,
    settings: GameSettings,
    phase: GamePhase,
    round: RoundState,
    high_score: u32,
    last_outcome: Option<GameOutcome>,
    rng: ChaCha8Rng,
    scheduler: Scheduler,
    pending: PendingTasks,
    store: Box<dyn KeyValueStore>,
    reporter: Box<dyn ScoreReporter>,
}

impl GameController {
    /// Creates an idle session and reads the stored best score.
    pub fn new(
        catalog: Vec<Bone>,
        settings: GameSettings,
        store: Box<dyn KeyValueStore>,
        reporter: Box<dyn ScoreReporter>,
    ) -> Self {
        let high_score = load_high_score(store.as_ref(), &settings.high_score_key);
        let rng = match settings.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::seed_from_u64(rand::rng().random()),
        };
        Self {
            catalog,
            round: RoundState {
                time_remaining: settings.round_time,
                ..default()
            },
            settings,
            phase: GamePhase::Idle,
            high_score,
            last_outcome: None,
            rng,
            scheduler: Scheduler::default(),
            pending: PendingTasks::default(),
            store,
            reporter,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn catalog(&self) -> &[Bone] {
        &self.catalog
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn target(&self) -> Option<&Bone> {
        self.round.target.map(|index| &self.catalog[index])
    }

    pub fn time_remaining(&self) -> u32 {
        self.round.time_remaining
    }

    pub fn score(&self) -> u32 {
        self.round.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn feedback_for(&self, name: &str) -> Option<Feedback> {
        self.round.feedback.get(name).copied()
    }

    pub fn last_outcome(&self) -> Option<GameOutcome> {
        self.last_outcome
    }

    pub fn bone_index(&self, name: &str) -> BoneGameResult<usize> {
        self.catalog
            .iter()
            .position(|bone| bone.name == name)
            .ok_or_else(|| BoneGameError::UnknownBone(name.to_string()))
    }

    /// Mount: Idle -> Active with a fresh session.
    pub fn start(&mut self) {
        if self.phase != GamePhase::Idle {
            return;
        }
        log::info!("Game started with {} bones", self.catalog.len());
        self.restart_game();
    }

    /// Draws the next target from the pool, or completes the game when the pool is empty.
    pub fn select_new_bone(&mut self) {
        cancel_task(&mut self.scheduler, self.pending.advance_round.take());
        cancel_task(&mut self.scheduler, self.pending.clear_feedback.take());
        self.round.feedback.clear();

        if self.round.pool.is_empty() {
            self.round.target = None;
            self.end_game(true);
            return;
        }

        let draw = self.rng.random_range(0..self.round.pool.len());
        let index = self.round.pool.swap_remove(draw);
        self.round.target = Some(index);
        self.round.time_remaining = self.settings.round_time;
        self.phase = GamePhase::Active;
        self.restart_tick();
        log::debug!(
            "New target: {} ({} left in pool)",
            self.catalog[index].name,
            self.round.pool.len()
        );
    }

    /// One countdown step. Reaching zero ends the game.
    pub fn tick(&mut self) {
        if self.phase != GamePhase::Active {
            return;
        }
        self.round.time_remaining = self.round.time_remaining.saturating_sub(1);
        if self.round.time_remaining == 0 {
            self.end_game(false);
        }
    }

    pub fn handle_click(&mut self, name: &str) -> ClickOutcome {
        if self.phase != GamePhase::Active {
            return ClickOutcome::Ignored;
        }
        let index = match self.bone_index(name) {
            Ok(index) => index,
            Err(e) => {
                log::warn!("{e}");
                return ClickOutcome::Ignored;
            }
        };
        let bone_name = self.catalog[index].name;

        self.round.feedback.clear();
        cancel_task(&mut self.scheduler, self.pending.clear_feedback.take());

        if self.round.target == Some(index) {
            let points = self.round.time_remaining;
            self.round.score += points;
            self.round.feedback.insert(bone_name, Feedback::Correct);
            self.phase = GamePhase::RoundTransition;
            // The clock is frozen until the next target
            cancel_task(&mut self.scheduler, self.pending.tick.take());
            self.pending.advance_round = Some(self.scheduler.schedule_once(
                self.settings.round_advance_delay,
                ScheduledAction::AdvanceRound,
            ));
            log::debug!("Correct: {bone_name} for {points} points");
            ClickOutcome::Correct { points }
        } else {
            self.round.time_remaining = self
                .round
                .time_remaining
                .saturating_sub(self.settings.wrong_click_penalty);
            self.round.feedback.insert(bone_name, Feedback::Incorrect);
            self.pending.clear_feedback = Some(self.scheduler.schedule_once(
                self.settings.feedback_clear_delay,
                ScheduledAction::ClearFeedback,
            ));
            log::debug!("Incorrect: {bone_name}, {} left", self.round.time_remaining);

            if self.round.time_remaining == 0 {
                self.end_game(false);
            } else {
                self.restart_tick();
            }
            ClickOutcome::Incorrect {
                time_remaining: self.round.time_remaining,
            }
        }
    }

    /// Stops the session, reports the score once and keeps the best score.
    pub fn end_game(&mut self, completed: bool) {
        if !self.phase.is_running() {
            return;
        }
        self.scheduler.cancel_all();
        self.pending = PendingTasks::default();
        self.round.feedback.clear();
        self.phase = if completed {
            GamePhase::Completed
        } else {
            GamePhase::Ended
        };

        let score = self.round.score;
        let new_high_score = score > self.high_score;
        if new_high_score {
            self.high_score = score;
            match save_high_score(self.store.as_mut(), &self.settings.high_score_key, score) {
                Ok(()) => log::info!("New high score: {score}"),
                Err(e) => log::warn!("New high score {score} kept for this session only: {e}"),
            }
        }
        self.last_outcome = Some(GameOutcome {
            score,
            completed,
            new_high_score,
        });
        log::info!("Game over (completed: {completed}) with score {score}");
        self.reporter.report(score);
    }

    /// Fresh session: full pool, zero score, new target.
    pub fn restart_game(&mut self) {
        self.scheduler.cancel_all();
        self.pending = PendingTasks::default();
        self.round = RoundState {
            pool: (0..self.catalog.len()).collect(),
            target: None,
            time_remaining: self.settings.round_time,
            feedback: HashMap::new(),
            score: 0,
        };
        self.last_outcome = None;
        self.phase = GamePhase::Active;
        self.select_new_bone();
    }

    /// Unmount: drops every pending task so nothing fires afterwards.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.pending = PendingTasks::default();
        self.round.feedback.clear();
        self.phase = GamePhase::Idle;
    }

    /// Moves the clock by `delta`, running every task that falls due in order.
    /// Returns how many tasks fired.
    pub fn advance(&mut self, delta: Duration) -> usize {
        let until = self.scheduler.now() + delta;
        let mut fired = 0;
        while let Some((handle, action)) = self.scheduler.pop_due(until) {
            fired += 1;
            self.run_scheduled(handle, action);
        }
        self.scheduler.advance_to(until);
        fired
    }

    fn run_scheduled(&mut self, handle: TaskHandle, action: ScheduledAction) {
        match action {
            ScheduledAction::Tick => self.tick(),
            ScheduledAction::AdvanceRound => {
                if self.pending.advance_round == Some(handle) {
                    self.pending.advance_round = None;
                }
                self.select_new_bone();
            }
            ScheduledAction::ClearFeedback => {
                if self.pending.clear_feedback == Some(handle) {
                    self.pending.clear_feedback = None;
                }
                self.round.feedback.clear();
            }
        }
    }

    fn restart_tick(&mut self) {
        cancel_task(&mut self.scheduler, self.pending.tick.take());
        self.pending.tick = Some(
            self.scheduler
                .schedule_repeating(self.settings.tick_interval, ScheduledAction::Tick),
        );
    }
}

fn cancel_task(scheduler: &mut Scheduler, handle: Option<TaskHandle>) {
    if let Some(handle) = handle {
        scheduler.cancel(handle);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::utils::constants::bone_constants::BONE_CATALOG;
    use crate::utils::storage::MemoryStore;

    const TICK: Duration = Duration::from_millis(100);
    const SECOND: Duration = Duration::from_secs(1);

    fn controller(seed: u64) -> (GameController, Arc<Mutex<Vec<u32>>>) {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = reports.clone();
        let settings = GameSettings {
            seed: Some(seed),
            ..default()
        };
        let game = GameController::new(
            BONE_CATALOG.to_vec(),
            settings,
            Box::new(MemoryStore::default()),
            Box::new(move |score: u32| sink.lock().unwrap().push(score)),
        );
        (game, reports)
    }

    fn target_name(game: &GameController) -> &'static str {
        game.target().unwrap().name
    }

    fn wrong_name(game: &GameController) -> &'static str {
        let target = target_name(game);
        game.catalog().iter().find(|b| b.name != target).unwrap().name
    }

    #[test]
    fn starts_active_with_a_target_drawn_from_the_pool() {
        let (mut game, _) = controller(1);
        assert_eq!(game.phase(), GamePhase::Idle);

        game.start();

        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.time_remaining(), 100);
        assert_eq!(game.round().pool.len(), 17);
        let target = game.round().target.unwrap();
        assert!(!game.round().pool.contains(&target));
    }

    #[test]
    fn correct_click_every_round_completes_with_full_score() {
        let (mut game, reports) = controller(2);
        game.start();

        let mut seen = Vec::new();
        while game.phase() == GamePhase::Active {
            let name = target_name(&game);
            assert!(!seen.contains(&name), "{name} drawn twice");
            seen.push(name);

            assert_eq!(game.handle_click(name), ClickOutcome::Correct { points: 100 });
            assert_eq!(game.feedback_for(name), Some(Feedback::Correct));
            game.advance(SECOND);
        }

        assert_eq!(seen.len(), 18);
        assert_eq!(game.phase(), GamePhase::Completed);
        assert_eq!(game.score(), 1800);
        assert!(game.round().pool.is_empty());
        assert_eq!(*reports.lock().unwrap(), vec![1800]);
        assert_eq!(game.high_score(), 1800);
    }

    #[test]
    fn never_clicking_times_out_after_one_hundred_ticks() {
        let (mut game, reports) = controller(3);
        game.start();

        for _ in 0..99 {
            game.advance(TICK);
        }
        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.time_remaining(), 1);

        game.advance(TICK);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.time_remaining(), 0);
        assert_eq!(*reports.lock().unwrap(), vec![0]);

        game.advance(SECOND * 10);
        assert_eq!(reports.lock().unwrap().len(), 1);
    }

    #[test]
    fn wrong_click_penalty_reduces_the_following_correct_score() {
        let (mut game, _) = controller(4);
        game.start();

        let wrong = wrong_name(&game);
        assert_eq!(game.handle_click(wrong), ClickOutcome::Incorrect { time_remaining: 90 });
        assert_eq!(game.feedback_for(wrong), Some(Feedback::Incorrect));

        let target = target_name(&game);
        assert_eq!(game.handle_click(target), ClickOutcome::Correct { points: 90 });
        assert_eq!(game.score(), 90);
        assert_eq!(game.feedback_for(wrong), None);
    }

    #[test]
    fn incorrect_feedback_clears_after_the_delay_latest_click_wins() {
        let (mut game, _) = controller(5);
        game.start();
        let wrong = wrong_name(&game);

        game.handle_click(wrong);
        game.advance(Duration::from_millis(600));
        game.handle_click(wrong);
        game.advance(Duration::from_millis(600));
        assert_eq!(game.feedback_for(wrong), Some(Feedback::Incorrect));

        game.advance(Duration::from_millis(400));
        assert_eq!(game.feedback_for(wrong), None);
    }

    #[test]
    fn wrong_click_rearms_the_countdown() {
        let (mut game, _) = controller(6);
        game.start();

        game.advance(Duration::from_millis(150));
        assert_eq!(game.time_remaining(), 99);

        game.handle_click(wrong_name(&game));
        assert_eq!(game.time_remaining(), 89);

        game.advance(Duration::from_millis(99));
        assert_eq!(game.time_remaining(), 89);
        game.advance(Duration::from_millis(1));
        assert_eq!(game.time_remaining(), 88);
    }

    #[test]
    fn penalty_to_zero_ends_the_game() {
        let (mut game, reports) = controller(7);
        game.start();
        for _ in 0..95 {
            game.advance(TICK);
        }
        assert_eq!(game.time_remaining(), 5);

        assert_eq!(
            game.handle_click(wrong_name(&game)),
            ClickOutcome::Incorrect { time_remaining: 0 }
        );
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(*reports.lock().unwrap(), vec![0]);
    }

    #[test]
    fn clicks_during_round_transition_are_ignored_and_clock_is_frozen() {
        let (mut game, _) = controller(8);
        game.start();
        let target = target_name(&game);
        game.handle_click(target);

        assert_eq!(game.phase(), GamePhase::RoundTransition);
        assert_eq!(game.handle_click(target), ClickOutcome::Ignored);

        game.advance(Duration::from_millis(900));
        assert_eq!(game.time_remaining(), 100);
        assert_eq!(game.phase(), GamePhase::RoundTransition);

        game.advance(Duration::from_millis(100));
        assert_eq!(game.phase(), GamePhase::Active);
        assert_ne!(target_name(&game), target);
        assert_eq!(game.feedback_for(target), None);
    }

    #[test]
    fn clicks_after_game_over_are_ignored() {
        let (mut game, _) = controller(9);
        game.start();
        game.advance(SECOND * 10);
        assert_eq!(game.phase(), GamePhase::Ended);

        assert_eq!(game.handle_click("Skull"), ClickOutcome::Ignored);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn unknown_bone_names_are_ignored() {
        let (mut game, _) = controller(10);
        game.start();

        assert_eq!(game.handle_click("Wishbone"), ClickOutcome::Ignored);
        assert_eq!(game.time_remaining(), 100);
        assert!(matches!(game.bone_index("Wishbone"), Err(BoneGameError::UnknownBone(_))));
    }

    #[test]
    fn restart_after_timeout_resets_pool_and_score() {
        let (mut game, reports) = controller(11);
        game.start();
        let target = target_name(&game);
        game.handle_click(target);
        game.advance(SECOND);
        game.advance(SECOND * 10);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.score(), 100);

        game.restart_game();

        assert_eq!(game.phase(), GamePhase::Active);
        assert_eq!(game.score(), 0);
        assert_eq!(game.time_remaining(), 100);
        assert_eq!(game.round().pool.len() + 1, 18);
        assert_eq!(game.last_outcome(), None);
        assert_eq!(*reports.lock().unwrap(), vec![100]);
    }

    #[test]
    fn restart_cancels_stale_round_advance() {
        let (mut game, _) = controller(12);
        game.start();
        game.handle_click(target_name(&game));

        game.restart_game();
        let fresh_target = target_name(&game);
        game.advance(SECOND);

        assert_eq!(target_name(&game), fresh_target);
        assert_eq!(game.round().pool.len(), 17);
    }

    #[test]
    fn high_score_only_grows_and_is_persisted() {
        let settings = GameSettings {
            seed: Some(13),
            ..default()
        };
        let mut game = GameController::new(
            BONE_CATALOG.to_vec(),
            settings,
            Box::new(MemoryStore::with_value("highScore", "150")),
            Box::new(crate::utils::score_reporter::NoopReporter),
        );
        assert_eq!(game.high_score(), 150);

        game.start();
        game.handle_click(target_name(&game));
        game.advance(SECOND * 12);
        assert_eq!(game.phase(), GamePhase::Ended);
        assert_eq!(game.last_outcome().map(|o| o.new_high_score), Some(false));
        assert_eq!(game.high_score(), 150);

        game.restart_game();
        game.handle_click(target_name(&game));
        game.advance(SECOND);
        game.handle_click(target_name(&game));
        game.advance(SECOND * 12);
        assert_eq!(game.score(), 200);
        assert_eq!(game.high_score(), 200);
        assert_eq!(
            game.last_outcome(),
            Some(GameOutcome {
                score: 200,
                completed: false,
                new_high_score: true
            })
        );
        assert_eq!(load_high_score(game.store.as_ref(), "highScore"), 200);
    }

    #[test]
    fn teardown_drops_pending_tasks() {
        let (mut game, reports) = controller(14);
        game.start();
        game.handle_click(wrong_name(&game));

        game.teardown();
        assert_eq!(game.advance(SECOND * 20), 0);
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(reports.lock().unwrap().is_empty());
    }

    #[test]
    fn same_seed_draws_the_same_order() {
        let (mut a, _) = controller(99);
        let (mut b, _) = controller(99);
        a.start();
        b.start();

        for _ in 0..18 {
            assert_eq!(target_name(&a), target_name(&b));
            a.handle_click(target_name(&a));
            b.handle_click(target_name(&b));
            a.advance(SECOND);
            b.advance(SECOND);
        }
        assert_eq!(a.phase(), GamePhase::Completed);
    }
}
