pub mod engine;
pub mod model;
pub mod store;

pub use engine::{ProgressEngine, ProgressSnapshot};
pub use model::{
    AnswerContext, AnswerOutcome, DailyChallenge, Difficulty, LeaderboardEntry,
    StudentProgress, UnlockedAchievement,
};
