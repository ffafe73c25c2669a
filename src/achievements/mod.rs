pub mod definitions;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;
use crate::progress::model::{AnswerContext, StudentProgress};

pub use definitions::{all_achievements, find_achievement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    Streak,
    Accuracy,
    Speed,
    Topic,
    Special,
}

impl AchievementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Streak => "streak",
            Self::Accuracy => "accuracy",
            Self::Speed => "speed",
            Self::Topic => "topic",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for AchievementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementCategory {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "streak" => Ok(Self::Streak),
            "accuracy" => Ok(Self::Accuracy),
            "speed" => Ok(Self::Speed),
            "topic" => Ok(Self::Topic),
            "special" => Ok(Self::Special),
            _ => Err(ParseError::Category(s.to_string())),
        }
    }
}

/// Cosmetic tier; has no effect on unlocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }
}

impl FromStr for Rarity {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "common" => Ok(Self::Common),
            "rare" => Ok(Self::Rare),
            "epic" => Ok(Self::Epic),
            "legendary" => Ok(Self::Legendary),
            _ => Err(ParseError::Rarity(s.to_string())),
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a student has to reach before an achievement unlocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Requirement {
    /// Current streak of consecutive correct answers
    Streak { threshold: u32 },
    /// Average accuracy percentage, only once `min_questions` have been answered
    Accuracy { threshold: u32, min_questions: u32 },
    QuestionCount { threshold: u32 },
    /// The answer just recorded was correct and took at most this long
    TimeWindow { threshold_seconds: u32 },
    TopicMastery { threshold: f64, subject: String },
}

impl Requirement {
    /// Check against a record that already has the current answer folded in.
    pub fn is_satisfied(&self, progress: &StudentProgress, answer: &AnswerContext) -> bool {
        match self {
            Requirement::Streak { threshold } => progress.current_streak >= *threshold,
            Requirement::Accuracy { threshold, min_questions } => {
                progress.questions_answered >= u64::from(*min_questions)
                    && progress.average_accuracy >= *threshold
            }
            Requirement::QuestionCount { threshold } => {
                progress.questions_answered >= u64::from(*threshold)
            }
            Requirement::TimeWindow { threshold_seconds } => {
                answer.was_correct && answer.time_spent_seconds <= u64::from(*threshold_seconds)
            }
            Requirement::TopicMastery { threshold, subject } => progress
                .subject_mastery
                .get(subject)
                .map(|score| *score >= *threshold)
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementDefinition {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    pub requirement: Requirement,
    pub points: u64,
    pub rarity: Rarity,
}
