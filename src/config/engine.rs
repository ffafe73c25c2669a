use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::entitlement::FeatureKey;
use crate::error::ProgressError;
use crate::progress::model::Difficulty;

/// Subjects every new student starts with at zero mastery.
pub const DEFAULT_SUBJECTS: [&str; 4] = ["Physics", "Chemistry", "Biology", "Mathematics"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub subjects: Vec<String>,
    pub scoring: ScoringConfig,
    pub mastery: MasteryConfig,
    pub daily_challenge: DailyChallengeConfig,
    pub usage: UsageConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            subjects: DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            scoring: ScoringConfig::default(),
            mastery: MasteryConfig::default(),
            daily_challenge: DailyChallengeConfig::default(),
            usage: UsageConfig::default(),
        }
    }
}

/// Points for a correct answer and the level curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub easy_points: u64,
    pub medium_points: u64,
    pub hard_points: u64,
    /// Bonus per answer in the current streak
    pub streak_bonus_step: u64,
    pub streak_bonus_cap: u64,
    pub points_per_level: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            easy_points: 10,
            medium_points: 20,
            hard_points: 30,
            streak_bonus_step: 2,
            streak_bonus_cap: 50,
            points_per_level: 1000,
        }
    }
}

impl ScoringConfig {
    pub fn base_points(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.easy_points,
            Difficulty::Medium => self.medium_points,
            Difficulty::Hard => self.hard_points,
        }
    }

    pub fn streak_bonus(&self, streak: u32) -> u64 {
        u64::from(streak)
            .saturating_mul(self.streak_bonus_step)
            .min(self.streak_bonus_cap)
    }

    /// Level for a point total. A zero `points_per_level` pins everyone at level 1.
    pub fn level_for(&self, total_points: u64) -> u32 {
        if self.points_per_level == 0 {
            return 1;
        }
        let level = total_points / self.points_per_level + 1;
        u32::try_from(level).unwrap_or(u32::MAX)
    }
}

/// Per-answer mastery movement. Scores are always clamped to [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MasteryConfig {
    pub correct_gain: f64,
    pub incorrect_penalty: f64,
    pub easy_multiplier: f64,
    pub medium_multiplier: f64,
    pub hard_multiplier: f64,
}

impl Default for MasteryConfig {
    fn default() -> Self {
        MasteryConfig {
            correct_gain: 5.0,
            incorrect_penalty: 2.0,
            easy_multiplier: 1.0,
            medium_multiplier: 1.5,
            hard_multiplier: 2.0,
        }
    }
}

impl MasteryConfig {
    pub fn multiplier(&self, difficulty: Difficulty) -> f64 {
        match difficulty {
            Difficulty::Easy => self.easy_multiplier,
            Difficulty::Medium => self.medium_multiplier,
            Difficulty::Hard => self.hard_multiplier,
        }
    }

    pub fn delta(&self, was_correct: bool, difficulty: Difficulty) -> f64 {
        if was_correct {
            self.correct_gain * self.multiplier(difficulty)
        } else {
            -self.incorrect_penalty
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailyChallengeConfig {
    pub bonus_points: u64,
    /// Candidate question ids per subject; one is picked when a challenge is created
    pub question_pool: HashMap<String, Vec<String>>,
}

impl Default for DailyChallengeConfig {
    fn default() -> Self {
        DailyChallengeConfig {
            bonus_points: 100,
            question_pool: HashMap::new(),
        }
    }
}

/// Daily quotas per feature. Features without an entry are unlimited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    pub daily_limits: HashMap<FeatureKey, u32>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        let mut daily_limits = HashMap::new();
        daily_limits.insert(FeatureKey::StudyPlanner, 5);
        daily_limits.insert(FeatureKey::MockTest, 3);
        daily_limits.insert(FeatureKey::AiTutor, 20);
        UsageConfig { daily_limits }
    }
}

pub fn config_path() -> PathBuf {
    config_path_in(&super::app_data_dir())
}

pub fn config_path_in(dir: &Path) -> PathBuf {
    dir.join("progress.toml")
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing sections and keys take their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ProgressError> {
        Ok(toml::from_str::<EngineConfig>(content)?)
    }

    /// Strict load: a missing or malformed file is an error.
    pub fn load_from(path: &Path) -> Result<Self, ProgressError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ProgressError::new(
                format!("Failed to read config: {}", e),
                "config"
            ).with_context(format!("path: {:?}", path)))?;
        Self::from_toml_str(&content)
            .map_err(|e| e.with_context(format!("path: {:?}", path)))
    }

    /// Load `progress.toml` from the app data directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_in(&super::app_data_dir())
    }

    /// Load `progress.toml` from `dir`, falling back to defaults.
    pub fn load_in(dir: &Path) -> Self {
        let path = config_path_in(dir);
        if !path.exists() {
            tracing::info!(path = ?path, "No progress config found, using defaults");
            return EngineConfig::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = ?path, "Loaded progress config");
                config
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Failed to load progress config, using defaults");
                EngineConfig::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_scoring_rules() {
        let config = EngineConfig::default();
        assert_eq!(config.scoring.base_points(Difficulty::Easy), 10);
        assert_eq!(config.scoring.base_points(Difficulty::Medium), 20);
        assert_eq!(config.scoring.base_points(Difficulty::Hard), 30);
        assert_eq!(config.mastery.delta(true, Difficulty::Medium), 7.5);
        assert_eq!(config.mastery.delta(false, Difficulty::Hard), -2.0);
        assert_eq!(config.daily_challenge.bonus_points, 100);
        assert_eq!(config.subjects.len(), 4);
    }

    #[test]
    fn test_streak_bonus_caps() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.streak_bonus(1), 2);
        assert_eq!(scoring.streak_bonus(25), 50);
        assert_eq!(scoring.streak_bonus(400), 50);
    }

    #[test]
    fn test_level_curve() {
        let scoring = ScoringConfig::default();
        assert_eq!(scoring.level_for(0), 1);
        assert_eq!(scoring.level_for(999), 1);
        assert_eq!(scoring.level_for(1000), 2);
        assert_eq!(scoring.level_for(4321), 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            subjects = ["Physics", "History"]

            [scoring]
            hard_points = 40

            [daily_challenge.question_pool]
            Physics = ["phy-001", "phy-002"]

            [usage.daily_limits]
            mockTest = 1
            "#,
        ).unwrap();

        assert_eq!(config.subjects, vec!["Physics", "History"]);
        assert_eq!(config.scoring.hard_points, 40);
        assert_eq!(config.scoring.easy_points, 10);
        assert_eq!(config.mastery, MasteryConfig::default());
        assert_eq!(config.daily_challenge.bonus_points, 100);
        assert_eq!(config.daily_challenge.question_pool["Physics"].len(), 2);
        assert_eq!(config.usage.daily_limits.get(&FeatureKey::MockTest), Some(&1));
        assert_eq!(config.usage.daily_limits.get(&FeatureKey::StudyPlanner), None);
    }

    #[test]
    fn test_load_in_reads_dir_and_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(EngineConfig::load_in(dir.path()), EngineConfig::default());

        std::fs::write(config_path_in(dir.path()), "[scoring]\nhard_points = 45\n").unwrap();
        assert_eq!(EngineConfig::load_in(dir.path()).scoring.hard_points, 45);

        std::fs::write(config_path_in(dir.path()), "scoring = 3").unwrap();
        assert_eq!(EngineConfig::load_in(dir.path()), EngineConfig::default());
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = EngineConfig::from_toml_str("scoring = 3").unwrap_err();
        assert_eq!(err.stage, "config");
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = EngineConfig::load_from(Path::new("/definitely/not/here/progress.toml")).unwrap_err();
        assert_eq!(err.stage, "config");
        assert!(err.context.is_some());
    }
}
