use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::achievements::{all_achievements, AchievementDefinition};
use crate::config::engine::EngineConfig;
use crate::error::ParseError;

/// Mastery scores live in this range.
pub const MASTERY_MIN: f64 = 0.0;
pub const MASTERY_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseError::Difficulty(s.to_string())),
        }
    }
}

/// One answer event as reported by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerContext {
    pub subject: String,
    pub was_correct: bool,
    pub time_spent_seconds: u64,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnlockedAchievement {
    pub achievement: AchievementDefinition,
    pub unlocked_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: String,
    pub date: NaiveDate,
    pub subject: String,
    pub question_id: String,
    pub bonus_points: u64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Lowercase, dash-separated form of a subject name used inside ids.
pub fn subject_slug(subject: &str) -> String {
    subject
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Challenge id for a (date, subject) pair, e.g. `2024-03-01-physics`.
pub fn daily_challenge_id(date: NaiveDate, subject: &str) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), subject_slug(subject))
}

/// Result of folding one answer into a student's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOutcome {
    pub newly_unlocked: Vec<AchievementDefinition>,
    pub leveled_up: bool,
    /// Points from the answer itself, excluding achievement rewards
    pub points_awarded: u64,
}

impl AnswerOutcome {
    pub fn unlocked(&self, achievement_id: &str) -> bool {
        self.newly_unlocked.iter().any(|a| a.id == achievement_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub student_id: String,
    pub total_points: u64,
    pub level: u32,
}

/// Gamification state for a single student.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentProgress {
    pub student_id: String,
    pub level: u32,
    pub total_points: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub questions_answered: u64,
    /// Whole percentage, 0..=100
    pub average_accuracy: u32,
    /// Seconds
    pub time_spent: u64,
    pub unlocked_achievements: Vec<UnlockedAchievement>,
    pub daily_challenges: Vec<DailyChallenge>,
    pub subject_mastery: HashMap<String, f64>,
}

impl StudentProgress {
    pub fn new(student_id: &str, subjects: &[String]) -> Self {
        StudentProgress {
            student_id: student_id.to_string(),
            level: 1,
            total_points: 0,
            current_streak: 0,
            longest_streak: 0,
            questions_answered: 0,
            average_accuracy: 0,
            time_spent: 0,
            unlocked_achievements: Vec::new(),
            daily_challenges: Vec::new(),
            subject_mastery: subjects.iter().map(|s| (s.clone(), MASTERY_MIN)).collect(),
        }
    }

    pub fn time_spent_minutes(&self) -> u64 {
        self.time_spent / 60
    }

    pub fn mastery(&self, subject: &str) -> f64 {
        self.subject_mastery.get(subject).copied().unwrap_or(MASTERY_MIN)
    }

    pub fn has_achievement(&self, achievement_id: &str) -> bool {
        self.unlocked_achievements
            .iter()
            .any(|u| u.achievement.id == achievement_id)
    }

    pub fn challenge(&self, challenge_id: &str) -> Option<&DailyChallenge> {
        self.daily_challenges.iter().find(|c| c.id == challenge_id)
    }

    /// Fold one answer into the record and report what changed.
    pub fn apply_answer(&mut self, answer: &AnswerContext, config: &EngineConfig) -> AnswerOutcome {
        self.questions_answered += 1;
        self.time_spent = self.time_spent.saturating_add(answer.time_spent_seconds);

        self.update_accuracy(answer.was_correct);
        self.update_streak(answer.was_correct);
        self.update_mastery(answer, config);

        let points_awarded = if answer.was_correct {
            config
                .scoring
                .base_points(answer.difficulty)
                .saturating_add(config.scoring.streak_bonus(self.current_streak))
        } else {
            0
        };
        self.total_points = self.total_points.saturating_add(points_awarded);

        let old_level = self.level;
        self.level = config.scoring.level_for(self.total_points);
        let leveled_up = self.level > old_level;

        // Rewards land after the level is computed and do not count towards it.
        let newly_unlocked = self.unlock_achievements(answer, Utc::now());

        AnswerOutcome {
            newly_unlocked,
            leveled_up,
            points_awarded,
        }
    }

    /// Rebuilds the correct count from the previous rounded average, so it can
    /// drift from the true count over long runs.
    fn update_accuracy(&mut self, was_correct: bool) {
        let answered = self.questions_answered as f64;
        let prior_correct = (f64::from(self.average_accuracy) * (answered - 1.0) / 100.0).round();
        let correct = prior_correct + if was_correct { 1.0 } else { 0.0 };
        let average = (100.0 * correct / answered).round();
        self.average_accuracy = average.clamp(0.0, 100.0) as u32;
    }

    fn update_streak(&mut self, was_correct: bool) {
        if was_correct {
            self.current_streak += 1;
            if self.current_streak > self.longest_streak {
                self.longest_streak = self.current_streak;
            }
        } else {
            self.current_streak = 0;
        }
    }

    fn update_mastery(&mut self, answer: &AnswerContext, config: &EngineConfig) {
        let delta = config.mastery.delta(answer.was_correct, answer.difficulty);
        let score = self
            .subject_mastery
            .entry(answer.subject.clone())
            .or_insert(MASTERY_MIN);
        *score = (*score + delta).clamp(MASTERY_MIN, MASTERY_MAX);
    }

    fn unlock_achievements(
        &mut self,
        answer: &AnswerContext,
        now: DateTime<Utc>,
    ) -> Vec<AchievementDefinition> {
        let current: &StudentProgress = self;
        let newly: Vec<AchievementDefinition> = all_achievements()
            .iter()
            .filter(|a| !current.has_achievement(&a.id))
            .filter(|a| a.requirement.is_satisfied(current, answer))
            .cloned()
            .collect();

        for achievement in &newly {
            self.total_points = self.total_points.saturating_add(achievement.points);
            self.unlocked_achievements.push(UnlockedAchievement {
                achievement: achievement.clone(),
                unlocked_at: now,
            });
        }
        newly
    }
}
