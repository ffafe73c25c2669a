use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::{Mutex, RwLock};
use rand::seq::SliceRandom;
use rand::thread_rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::engine::EngineConfig;
use crate::metrics::EngineMetrics;
use crate::progress::model::{
    daily_challenge_id, subject_slug, AnswerContext, AnswerOutcome, DailyChallenge,
    Difficulty, LeaderboardEntry, StudentProgress,
};

/// Every student record known to an engine, as written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    pub saved_at: DateTime<Utc>,
    pub students: Vec<StudentProgress>,
}

type StudentSlot = Arc<Mutex<StudentProgress>>;

/// Owns all per-student progress records.
///
/// The map lock is only held to find or insert a slot; each student's record
/// has its own mutex, held for the full read-modify-write of an operation.
/// Updates for one student are therefore serialised while different students
/// proceed independently.
pub struct ProgressEngine {
    config: EngineConfig,
    students: RwLock<HashMap<String, StudentSlot>>,
    metrics: EngineMetrics,
}

impl ProgressEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_metrics(config, EngineMetrics::new())
    }

    pub fn with_metrics(config: EngineConfig, metrics: EngineMetrics) -> Self {
        ProgressEngine {
            config,
            students: RwLock::new(HashMap::new()),
            metrics,
        }
    }

    /// Rebuild an engine from a saved snapshot. Later duplicates of a student id win.
    pub fn from_snapshot(config: EngineConfig, metrics: EngineMetrics, snapshot: ProgressSnapshot) -> Self {
        let students = snapshot
            .students
            .into_iter()
            .map(|p| (p.student_id.clone(), Arc::new(Mutex::new(p))))
            .collect();
        ProgressEngine {
            config,
            students: RwLock::new(students),
            metrics,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    fn slot(&self, student_id: &str) -> StudentSlot {
        if let Some(slot) = self.students.read().get(student_id) {
            return Arc::clone(slot);
        }

        let mut students = self.students.write();
        let slot = students.entry(student_id.to_string()).or_insert_with(|| {
            tracing::debug!(student_id = %student_id, "Creating progress record");
            Arc::new(Mutex::new(StudentProgress::new(student_id, &self.config.subjects)))
        });
        Arc::clone(slot)
    }

    /// Existing record for the student, or a fresh one.
    pub fn get_or_create(&self, student_id: &str) -> StudentProgress {
        self.slot(student_id).lock().clone()
    }

    pub fn get_stats(&self, student_id: &str) -> StudentProgress {
        self.get_or_create(student_id)
    }

    pub fn contains(&self, student_id: &str) -> bool {
        self.students.read().contains_key(student_id)
    }

    pub fn student_count(&self) -> usize {
        self.students.read().len()
    }

    pub fn record_answer(
        &self,
        student_id: &str,
        subject: &str,
        was_correct: bool,
        time_spent_seconds: u64,
        difficulty: Difficulty,
    ) -> AnswerOutcome {
        let answer = AnswerContext {
            subject: subject.to_string(),
            was_correct,
            time_spent_seconds,
            difficulty,
        };

        let slot = self.slot(student_id);
        let mut progress = slot.lock();
        let outcome = progress.apply_answer(&answer, &self.config);

        tracing::debug!(
            student_id = %student_id,
            subject = %subject,
            difficulty = %difficulty,
            was_correct = was_correct,
            points = outcome.points_awarded,
            streak = progress.current_streak,
            accuracy = progress.average_accuracy,
            "Answer recorded"
        );
        if outcome.leveled_up {
            tracing::info!(student_id = %student_id, level = progress.level, "Level up");
            self.metrics.record_level_up();
        }
        for achievement in &outcome.newly_unlocked {
            tracing::info!(
                student_id = %student_id,
                achievement = %achievement.id,
                category = %achievement.category,
                rarity = %achievement.rarity,
                points = achievement.points,
                "Achievement unlocked"
            );
        }

        self.metrics.record_answer(was_correct);
        self.metrics.record_achievements(outcome.newly_unlocked.len() as u64);
        outcome
    }

    /// Challenge for (date, subject), created on first request and returned unchanged afterwards.
    pub fn generate_daily_challenge(
        &self,
        student_id: &str,
        subject: &str,
        date: NaiveDate,
    ) -> DailyChallenge {
        let id = daily_challenge_id(date, subject);
        let slot = self.slot(student_id);
        let mut progress = slot.lock();

        if let Some(existing) = progress.challenge(&id) {
            return existing.clone();
        }

        let challenge = DailyChallenge {
            id,
            date,
            subject: subject.to_string(),
            question_id: self.pick_question(subject, date),
            bonus_points: self.config.daily_challenge.bonus_points,
            completed: false,
            completed_at: None,
        };
        progress.daily_challenges.push(challenge.clone());

        tracing::debug!(
            student_id = %student_id,
            challenge_id = %challenge.id,
            question_id = %challenge.question_id,
            "Daily challenge created"
        );
        self.metrics.record_challenge_generated();
        challenge
    }

    fn pick_question(&self, subject: &str, date: NaiveDate) -> String {
        let mut rng = thread_rng();
        self.config
            .daily_challenge
            .question_pool
            .get(subject)
            .and_then(|pool| pool.choose(&mut rng).cloned())
            .unwrap_or_else(|| format!("{}-daily-{}", subject_slug(subject), date.format("%Y-%m-%d")))
    }

    /// Mark a challenge done and pay its bonus. Returns the bonus paid, or
    /// `None` when the challenge is unknown or already completed.
    pub fn complete_daily_challenge(&self, student_id: &str, challenge_id: &str) -> Option<u64> {
        let slot = self.slot(student_id);
        let mut progress = slot.lock();

        let challenge = progress
            .daily_challenges
            .iter_mut()
            .find(|c| c.id == challenge_id && !c.completed)?;
        challenge.completed = true;
        challenge.completed_at = Some(Utc::now());
        let bonus = challenge.bonus_points;
        progress.total_points = progress.total_points.saturating_add(bonus);

        let old_level = progress.level;
        progress.level = self.config.scoring.level_for(progress.total_points);

        tracing::info!(
            student_id = %student_id,
            challenge_id = %challenge_id,
            bonus = bonus,
            "Daily challenge completed"
        );
        if progress.level > old_level {
            tracing::info!(student_id = %student_id, level = progress.level, "Level up");
            self.metrics.record_level_up();
        }
        self.metrics.record_challenge_completed();
        Some(bonus)
    }

    /// Top `limit` students by points, highest first; equal totals order by student id.
    pub fn leaderboard(&self, limit: usize) -> Vec<LeaderboardEntry> {
        let slots: Vec<StudentSlot> = self.students.read().values().cloned().collect();

        let mut entries: Vec<LeaderboardEntry> = slots
            .iter()
            .map(|slot| {
                let p = slot.lock();
                LeaderboardEntry {
                    student_id: p.student_id.clone(),
                    total_points: p.total_points,
                    level: p.level,
                }
            })
            .collect();

        entries.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        entries.truncate(limit);
        entries
    }

    /// Copy of every record, sorted by student id.
    pub fn snapshot(&self) -> ProgressSnapshot {
        let slots: Vec<StudentSlot> = self.students.read().values().cloned().collect();
        let mut students: Vec<StudentProgress> = slots.iter().map(|s| s.lock().clone()).collect();
        students.sort_by(|a, b| a.student_id.cmp(&b.student_id));
        ProgressSnapshot {
            saved_at: Utc::now(),
            students,
        }
    }
}

impl Default for ProgressEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
