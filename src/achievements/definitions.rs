use lazy_static::lazy_static;

use super::{AchievementCategory, AchievementDefinition, Rarity, Requirement};

pub const FIRST_STREAK: &str = "first_streak";
pub const HOT_STREAK: &str = "hot_streak";
pub const UNSTOPPABLE: &str = "unstoppable";
pub const SHARPSHOOTER: &str = "sharpshooter";
pub const PERFECTIONIST: &str = "perfectionist";
pub const QUICK_THINKER: &str = "quick_thinker";
pub const GETTING_STARTED: &str = "getting_started";
pub const HALF_CENTURY: &str = "half_century";
pub const CENTURION: &str = "centurion";
pub const MARATHONER: &str = "marathoner";
pub const PHYSICS_MASTER: &str = "physics_master";
pub const CHEMISTRY_MASTER: &str = "chemistry_master";
pub const BIOLOGY_MASTER: &str = "biology_master";
pub const MATHEMATICS_MASTER: &str = "mathematics_master";

#[allow(clippy::too_many_arguments)]
fn def(
    id: &str,
    title: &str,
    description: &str,
    icon: &str,
    category: AchievementCategory,
    requirement: Requirement,
    points: u64,
    rarity: Rarity,
) -> AchievementDefinition {
    AchievementDefinition {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        requirement,
        points,
        rarity,
    }
}

fn mastery(id: &str, subject: &str, icon: &str) -> AchievementDefinition {
    def(
        id,
        &format!("{} Master", subject),
        &format!("Reach 80% mastery in {}.", subject),
        icon,
        AchievementCategory::Topic,
        Requirement::TopicMastery { threshold: 80.0, subject: subject.to_string() },
        200,
        Rarity::Epic,
    )
}

lazy_static! {
    static ref ACHIEVEMENTS: Vec<AchievementDefinition> = vec![
        def(FIRST_STREAK, "On a Roll", "Answer 3 questions correctly in a row.", "flame",
            AchievementCategory::Streak, Requirement::Streak { threshold: 3 }, 50, Rarity::Common),
        def(HOT_STREAK, "Hot Streak", "Answer 10 questions correctly in a row.", "fire",
            AchievementCategory::Streak, Requirement::Streak { threshold: 10 }, 150, Rarity::Rare),
        def(UNSTOPPABLE, "Unstoppable", "Answer 25 questions correctly in a row.", "rocket",
            AchievementCategory::Streak, Requirement::Streak { threshold: 25 }, 400, Rarity::Epic),
        def(SHARPSHOOTER, "Sharpshooter", "Hold 80% accuracy over at least 20 questions.", "target",
            AchievementCategory::Accuracy,
            Requirement::Accuracy { threshold: 80, min_questions: 20 }, 100, Rarity::Rare),
        def(PERFECTIONIST, "Perfectionist", "Hold 95% accuracy over at least 50 questions.", "gem",
            AchievementCategory::Accuracy,
            Requirement::Accuracy { threshold: 95, min_questions: 50 }, 300, Rarity::Epic),
        def(QUICK_THINKER, "Quick Thinker", "Answer a question correctly within 5 seconds.", "bolt",
            AchievementCategory::Speed, Requirement::TimeWindow { threshold_seconds: 5 }, 75, Rarity::Common),
        def(GETTING_STARTED, "Getting Started", "Answer 10 questions.", "seedling",
            AchievementCategory::Special, Requirement::QuestionCount { threshold: 10 }, 50, Rarity::Common),
        def(HALF_CENTURY, "Half Century", "Answer 50 questions.", "book",
            AchievementCategory::Special, Requirement::QuestionCount { threshold: 50 }, 100, Rarity::Common),
        def(CENTURION, "Centurion", "Answer 100 questions.", "shield",
            AchievementCategory::Special, Requirement::QuestionCount { threshold: 100 }, 250, Rarity::Rare),
        def(MARATHONER, "Marathoner", "Answer 500 questions.", "trophy",
            AchievementCategory::Special, Requirement::QuestionCount { threshold: 500 }, 1000, Rarity::Legendary),
        mastery(PHYSICS_MASTER, "Physics", "atom"),
        mastery(CHEMISTRY_MASTER, "Chemistry", "flask"),
        mastery(BIOLOGY_MASTER, "Biology", "dna"),
        mastery(MATHEMATICS_MASTER, "Mathematics", "sigma"),
    ];
}

/// The fixed achievement table, in evaluation order.
pub fn all_achievements() -> &'static [AchievementDefinition] {
    &ACHIEVEMENTS
}

pub fn find_achievement(id: &str) -> Option<&'static AchievementDefinition> {
    ACHIEVEMENTS.iter().find(|a| a.id == id)
}
