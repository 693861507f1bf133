//! Notifies the host of the final score when a game ends.

/// Receives the final score once per game-over transition.
pub trait ScoreReporter: Send + Sync {
    fn report(&mut self, score: u32);
}

impl<F> ScoreReporter for F
where
    F: FnMut(u32) + Send + Sync,
{
    fn report(&mut self, score: u32) {
        self(score)
    }
}

/// Reporter for hosts that do not listen for the final score.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopReporter;

impl ScoreReporter for NoopReporter {
    fn report(&mut self, _score: u32) {}
}
