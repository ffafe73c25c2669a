//! Property-based tests for the progress engine invariants:
//! - current streak never exceeds the longest streak
//! - mastery and accuracy stay within [0, 100]
//! - level follows the point total, excluding rewards unlocked in the same call
//! - points and level never decrease, achievements never repeat

use proptest::prelude::*;
use std::collections::HashSet;

use tutor_progress::{Difficulty, ProgressEngine};

const SUBJECTS: [&str; 5] = ["Physics", "Chemistry", "Biology", "Mathematics", "Economics"];

#[derive(Debug, Clone)]
struct Answer {
    subject: &'static str,
    correct: bool,
    seconds: u64,
    difficulty: Difficulty,
}

fn arb_difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Medium),
        Just(Difficulty::Hard),
    ]
}

fn arb_answer() -> impl Strategy<Value = Answer> {
    (0usize..SUBJECTS.len(), any::<bool>(), 1u64..=180, arb_difficulty()).prop_map(
        |(subject, correct, seconds, difficulty)| Answer {
            subject: SUBJECTS[subject],
            correct,
            seconds,
            difficulty,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn invariants_hold_after_every_answer(answers in prop::collection::vec(arb_answer(), 1..250)) {
        let engine = ProgressEngine::default();
        let mut last_points = 0;
        let mut last_level = 1;

        for answer in &answers {
            let outcome = engine.record_answer(
                "student",
                answer.subject,
                answer.correct,
                answer.seconds,
                answer.difficulty,
            );
            let p = engine.get_stats("student");

            prop_assert!(p.current_streak <= p.longest_streak);
            prop_assert!(p.average_accuracy <= 100);
            for score in p.subject_mastery.values() {
                prop_assert!((0.0..=100.0).contains(score));
            }

            let reward: u64 = outcome.newly_unlocked.iter().map(|a| a.points).sum();
            prop_assert_eq!(u64::from(p.level), (p.total_points - reward) / 1000 + 1);
            if outcome.newly_unlocked.is_empty() {
                prop_assert_eq!(u64::from(p.level), p.total_points / 1000 + 1);
            }

            prop_assert!(p.total_points >= last_points);
            prop_assert!(p.level >= last_level);
            last_points = p.total_points;
            last_level = p.level;

            let ids: HashSet<_> = p.unlocked_achievements.iter().map(|u| u.achievement.id.clone()).collect();
            prop_assert_eq!(ids.len(), p.unlocked_achievements.len());
        }

        prop_assert_eq!(engine.get_stats("student").questions_answered, answers.len() as u64);
    }

    #[test]
    fn incorrect_runs_floor_mastery_at_zero(run in 1usize..200, difficulty in arb_difficulty()) {
        let engine = ProgressEngine::default();
        for _ in 0..run {
            engine.record_answer("student", "Physics", false, 30, difficulty);
        }
        let p = engine.get_stats("student");
        prop_assert_eq!(p.mastery("Physics"), 0.0);
        prop_assert_eq!(p.current_streak, 0);
        prop_assert_eq!(p.average_accuracy, 0);
        prop_assert_eq!(p.total_points, 0);
    }

    #[test]
    fn leaderboard_is_sorted_and_bounded(
        counts in prop::collection::vec(0usize..30, 1..12),
        limit in 0usize..15,
    ) {
        let engine = ProgressEngine::default();
        for (i, count) in counts.iter().enumerate() {
            let id = format!("s{:02}", i);
            engine.get_or_create(&id);
            for _ in 0..*count {
                engine.record_answer(&id, "Mathematics", true, 30, Difficulty::Medium);
            }
        }

        let board = engine.leaderboard(limit);
        prop_assert_eq!(board.len(), limit.min(counts.len()));
        prop_assert!(board.windows(2).all(|w| w[0].total_points >= w[1].total_points));
    }
}
