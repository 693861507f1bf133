//! Cancellable scheduled callbacks on a virtual clock.
//!
//! The game never blocks: every delayed transition (countdown tick, round
//! advance, feedback clear) is a task owned by the controller and identified
//! by a [`TaskHandle`], so it can be cancelled whenever the state it depends
//! on is reset.
use std::time::Duration;

/// Identifies a scheduled task. Repeating tasks keep their handle across firings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// What the controller does when a task fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScheduledAction {
    Tick,
    AdvanceRound,
    ClearFeedback,
}

#[derive(Clone, Debug)]
struct ScheduledTask {
    handle: TaskHandle,
    due: Duration,
    period: Option<Duration>,
    action: ScheduledAction,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    tasks: Vec<ScheduledTask>,
}

impl Scheduler {
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn schedule_once(&mut self, delay: Duration, action: ScheduledAction) -> TaskHandle {
        self.push(delay, None, action)
    }

    /// Fires every `period`, first after one period. A zero period is clamped to 1ms.
    pub fn schedule_repeating(&mut self, period: Duration, action: ScheduledAction) -> TaskHandle {
        let period = period.max(Duration::from_millis(1));
        self.push(period, Some(period), action)
    }

    /// Returns false when the task already fired or was cancelled.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.handle != handle);
        self.tasks.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|task| task.handle == handle)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Pops the earliest task due at or before `until` and moves the clock to its due time.
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TaskHandle, ScheduledAction)> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| task.due <= until)
            .min_by_key(|(_, task)| (task.due, task.handle.0))
            .map(|(index, _)| index)?;

        let task = &mut self.tasks[index];
        let fired = (task.handle, task.action);
        self.now = self.now.max(task.due);
        match task.period {
            Some(period) => task.due += period,
            None => {
                self.tasks.swap_remove(index);
            }
        }
        Some(fired)
    }

    /// Moves the clock forward without firing anything. Never goes backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }

    fn push(
        &mut self,
        delay: Duration,
        period: Option<Duration>,
        action: ScheduledAction,
    ) -> TaskHandle {
        let handle = TaskHandle(self.next_id);
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due: self.now + delay,
            period,
            action,
        });
        handle
    }
}
