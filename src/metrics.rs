use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for engine activity.
/// All metrics are atomic counters for thread-safety
#[derive(Clone, Default, Debug)]
pub struct EngineMetrics {
    /// Answers passed to `record_answer`
    pub answers_recorded: Arc<AtomicU64>,
    /// Of those, answers marked correct
    pub correct_answers: Arc<AtomicU64>,
    /// Achievements unlocked across all students
    pub achievements_unlocked: Arc<AtomicU64>,
    /// Calls that reported a level-up
    pub level_ups: Arc<AtomicU64>,
    /// Daily challenges created (idempotent hits excluded)
    pub challenges_generated: Arc<AtomicU64>,
    /// Daily challenges completed
    pub challenges_completed: Arc<AtomicU64>,
}

/// Point-in-time copy of [`EngineMetrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub answers_recorded: u64,
    pub correct_answers: u64,
    pub achievements_unlocked: u64,
    pub level_ups: u64,
    pub challenges_generated: u64,
    pub challenges_completed: u64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer
    pub fn record_answer(&self, correct: bool) {
        self.answers_recorded.fetch_add(1, Ordering::Relaxed);
        if correct {
            self.correct_answers.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_achievements(&self, count: u64) {
        self.achievements_unlocked.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_level_up(&self) {
        self.level_ups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_challenge_generated(&self) {
        self.challenges_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_challenge_completed(&self) {
        self.challenges_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            answers_recorded: self.answers_recorded.load(Ordering::Relaxed),
            correct_answers: self.correct_answers.load(Ordering::Relaxed),
            achievements_unlocked: self.achievements_unlocked.load(Ordering::Relaxed),
            level_ups: self.level_ups.load(Ordering::Relaxed),
            challenges_generated: self.challenges_generated.load(Ordering::Relaxed),
            challenges_completed: self.challenges_completed.load(Ordering::Relaxed),
        }
    }
}
