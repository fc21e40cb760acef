use proptest::prelude::*;
use questlog::{
    badges::BADGE_VAULT,
    clock::Moment,
    core::ledger::{QuestLedger, SuccessEvent},
    quest::Quest,
    stats::XP_PER_LEVEL,
    types::{Difficulty, QuestType},
};

#[derive(Debug, Clone)]
enum Action {
    Success { points: u32, duration_seconds: u64, hour: u8 },
    Failure,
    Toggle { target: usize },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        4 => (
            prop::sample::select(vec![10u32, 50, 120, 450]),
            5u64..900,
            0u8..24,
        )
            .prop_map(|(points, duration_seconds, hour)| Action::Success {
                points,
                duration_seconds,
                hour,
            }),
        1 => Just(Action::Failure),
        2 => (0usize..64).prop_map(|target| Action::Toggle { target }),
    ]
}

fn quest(id: &str, points: u32) -> Quest {
    Quest {
        id: id.to_string(),
        title: id.to_string(),
        description: String::new(),
        difficulty: Difficulty::Medium,
        kind: QuestType::Text,
        points,
        instructions: String::new(),
        created_at: 0,
        quiz_options: None,
        correct_answer: None,
        location: None,
    }
}

proptest! {
    /// Folding any action sequence preserves the counter relationships the
    /// rest of the crate leans on.
    #[test]
    fn counters_stay_consistent(actions in prop::collection::vec(action_strategy(), 1..150)) {
        let mut ledger = QuestLedger::new();

        let mut successes: u32 = 0;
        let mut failures: u32 = 0;
        let mut trailing: u32 = 0;
        let mut best: u32 = 0;
        let mut prev_badges: Vec<String> = Vec::new();
        let mut next_id: u32 = 0;

        for (step, action) in actions.into_iter().enumerate() {
            let at = Moment { ts_ms: step as u64, local_hour: 12 };
            match action {
                Action::Success { points, duration_seconds, hour } => {
                    let id = format!("q{next_id}");
                    next_id += 1;
                    ledger.replace_active(vec![quest(&id, points)], false, at);
                    let applied = ledger.record_success(
                        SuccessEvent {
                            quest_id: id,
                            proof: "p".to_string(),
                            feedback: "f".to_string(),
                            duration_seconds,
                        },
                        Moment { ts_ms: step as u64, local_hour: hour },
                    );
                    prop_assert!(applied.is_some());
                    successes += 1;
                    trailing += 1;
                    best = best.max(trailing);
                }
                Action::Failure => {
                    ledger.record_failure(at);
                    failures += 1;
                    trailing = 0;
                }
                Action::Toggle { target } => {
                    let id = ledger
                        .completed_quests()
                        .get(target % ledger.completed_quests().len().max(1))
                        .map(|c| c.quest_id.clone());
                    if let Some(id) = id {
                        prop_assert!(ledger.toggle_saved(&id).is_some());
                    }
                }
            }

            let stats = ledger.stats();
            prop_assert_eq!(stats.completed, successes);
            prop_assert_eq!(stats.lost, failures);
            prop_assert_eq!(stats.streak, trailing);
            prop_assert_eq!(stats.best_streak, best);
            prop_assert!(stats.best_streak >= stats.streak);

            // All awards below the threshold, so xp never lands outside it
            // and levels account for every point earned.
            prop_assert!(stats.xp < XP_PER_LEVEL);
            prop_assert_eq!(
                stats.total_points,
                u64::from(stats.level - 1) * u64::from(XP_PER_LEVEL) + u64::from(stats.xp)
            );

            // Badges are append-only: the previous set is a prefix.
            prop_assert!(stats.badges.len() >= prev_badges.len());
            prop_assert_eq!(&stats.badges[..prev_badges.len()], &prev_badges[..]);
            prev_badges = stats.badges.clone();

            // No badge id ever repeats.
            let mut sorted = stats.badges.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), stats.badges.len());

            prop_assert_eq!(ledger.completed_quests().len(), successes as usize);
        }

        // Vault only exists when the bookmark count actually reached 10.
        if ledger.stats().has_badge(BADGE_VAULT) {
            prop_assert!(ledger.saved_count() >= 10 || successes >= 10);
        }
    }

    /// A snapshot round-trip reproduces the ledger bit for bit.
    #[test]
    fn snapshot_round_trip_is_lossless(actions in prop::collection::vec(action_strategy(), 1..60)) {
        let mut ledger = QuestLedger::new();
        let mut next_id = 0u32;
        for (step, action) in actions.into_iter().enumerate() {
            let at = Moment { ts_ms: step as u64, local_hour: 12 };
            match action {
                Action::Success { points, duration_seconds, .. } => {
                    let id = format!("q{next_id}");
                    next_id += 1;
                    ledger.replace_active(vec![quest(&id, points)], false, at);
                    ledger.record_success(
                        SuccessEvent {
                            quest_id: id,
                            proof: "p".to_string(),
                            feedback: "f".to_string(),
                            duration_seconds,
                        },
                        at,
                    );
                }
                Action::Failure => ledger.record_failure(at),
                Action::Toggle { target } => {
                    let id = ledger
                        .completed_quests()
                        .get(target % ledger.completed_quests().len().max(1))
                        .map(|c| c.quest_id.clone());
                    if let Some(id) = id {
                        ledger.toggle_saved(&id);
                    }
                }
            }
        }

        let snapshot = ledger.export_snapshot();
        let encoded = serde_json::to_vec(&snapshot).unwrap();
        let decoded = serde_json::from_slice(&encoded).unwrap();
        let restored = QuestLedger::from_snapshot(decoded);
        prop_assert_eq!(restored.export_snapshot(), snapshot);
    }
}
