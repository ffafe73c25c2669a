pub mod achievements;
pub mod config;
pub mod entitlement;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod progress;
pub mod state;

use std::path::Path;

pub use achievements::{AchievementCategory, AchievementDefinition, Rarity, Requirement};
pub use config::engine::EngineConfig;
pub use entitlement::{Entitlement, EntitlementGate, FeatureKey, UsageTracker};
pub use error::{ParseError, ProgressError};
pub use progress::{
    AnswerOutcome, DailyChallenge, Difficulty, LeaderboardEntry, ProgressEngine, StudentProgress,
};
pub use state::app::AppState;

/// Host startup: logging, config from the app data dir, and any saved progress.
pub async fn start() -> Result<AppState, ProgressError> {
    start_in(&config::app_data_dir()).await
}

/// Startup against an explicit data directory holding `progress.toml` and `data/`.
pub async fn start_in(dir: &Path) -> Result<AppState, ProgressError> {
    // Initialize structured logging first
    logging::init_logging();
    tracing::info!(dir = ?dir, "Progress engine starting");

    let config = EngineConfig::load_in(dir);
    let state = AppState::new(config);
    progress::store::hydrate(state, &progress::store::snapshot_path_in(dir)).await
}

/// Host shutdown: write progress to the app data dir.
pub async fn shutdown(state: &AppState) -> Result<(), ProgressError> {
    shutdown_in(state, &config::app_data_dir()).await
}

pub async fn shutdown_in(state: &AppState, dir: &Path) -> Result<(), ProgressError> {
    progress::store::persist(state, &progress::store::snapshot_path_in(dir)).await
}

#[cfg(test)]
mod tests {
    use crate::error::{ParseError, ProgressError};

    #[test]
    fn test_error_creation() {
        let error = ProgressError::new("Test error", "test_stage");
        assert_eq!(error.message, "Test error");
        assert_eq!(error.stage, "test_stage");
    }

    #[test]
    fn test_error_display() {
        let error = ProgressError::new("Test error", "test_stage")
            .with_context("context")
            .with_source("source");
        let display = format!("{}", error);
        assert_eq!(display, "[test_stage] Test error (context: context) (source: source)");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let error: ProgressError = io.into();
        assert_eq!(error.stage, "io");
        assert_eq!(error.source.as_deref(), Some("std::io"));
    }

    #[test]
    fn test_parse_error_message() {
        assert_eq!(ParseError::Difficulty("x".into()).to_string(), "unknown difficulty: x");
    }
}
