use questlog::{
    clock::Moment,
    core::ledger::{LedgerSnapshot, QuestLedger, SuccessEvent},
    quest::{Proof, Quest},
    sources::{GeoDenial, judge_quiz},
    stats::UserStats,
    types::{Difficulty, QuestType},
};

fn quest(id: &str, difficulty: Difficulty, kind: QuestType, points: u32) -> Quest {
    Quest {
        id: id.to_string(),
        title: format!("quest {id}"),
        description: "do the thing".to_string(),
        difficulty,
        kind,
        points,
        instructions: "just do it".to_string(),
        created_at: 0,
        quiz_options: None,
        correct_answer: None,
        location: None,
    }
}

fn noon() -> Moment {
    Moment {
        ts_ms: 1_000,
        local_hour: 12,
    }
}

fn success(id: &str, duration_seconds: u64) -> SuccessEvent {
    SuccessEvent {
        quest_id: id.to_string(),
        proof: "proof".to_string(),
        feedback: "ok".to_string(),
        duration_seconds,
    }
}

fn ledger_with_stats(stats: UserStats) -> QuestLedger {
    QuestLedger::from_snapshot(LedgerSnapshot {
        stats,
        ..LedgerSnapshot::default()
    })
}

#[test]
fn level_up_carries_remainder_forward() {
    let mut stats = UserStats::new();
    stats.xp = 480;
    stats.level = 3;
    let mut ledger = ledger_with_stats(stats);
    ledger.replace_active(
        vec![quest("q1", Difficulty::Medium, QuestType::Text, 50)],
        false,
        noon(),
    );

    ledger.record_success(success("q1", 60), noon()).expect("applied");

    assert_eq!(ledger.stats().xp, 30);
    assert_eq!(ledger.stats().level, 4);
    assert_eq!(ledger.stats().total_points, 50);
    assert_eq!(ledger.stats().completed, 1);
}

#[test]
fn oversized_award_levels_up_once_without_second_rollover() {
    // Pins the single-step behavior: one 1000-point award crosses the
    // threshold twice but produces exactly one level-up, leaving xp at 500.
    let mut ledger = QuestLedger::new();
    ledger.replace_active(
        vec![quest("big", Difficulty::Impossible, QuestType::Text, 1_000)],
        false,
        noon(),
    );

    ledger.record_success(success("big", 60), noon()).expect("applied");

    assert_eq!(ledger.stats().level, 2);
    assert_eq!(ledger.stats().xp, 500);
    assert_eq!(ledger.stats().total_points, 1_000);
}

#[test]
fn first_quest_badge_unlocks_once() {
    let mut ledger = QuestLedger::new();
    ledger.replace_active(
        vec![
            quest("q1", Difficulty::Easy, QuestType::Text, 10),
            quest("q2", Difficulty::Easy, QuestType::Text, 10),
        ],
        false,
        noon(),
    );

    let first = ledger.record_success(success("q1", 60), noon()).expect("q1");
    assert!(first.unlocked.iter().any(|b| b == "badge_first_quest"));

    let second = ledger.record_success(success("q2", 60), noon()).expect("q2");
    assert!(!second.unlocked.iter().any(|b| b == "badge_first_quest"));
    assert_eq!(
        ledger
            .stats()
            .badges
            .iter()
            .filter(|b| *b == "badge_first_quest")
            .count(),
        1
    );
}

#[test]
fn streak_badge_survives_the_next_failure() {
    let mut stats = UserStats::new();
    stats.streak = 6;
    stats.best_streak = 6;
    stats.completed = 6;
    stats.badges = vec![
        "badge_first_quest".to_string(),
        "badge_streak_3".to_string(),
    ];
    let mut ledger = ledger_with_stats(stats);
    ledger.replace_active(
        vec![quest("q7", Difficulty::Easy, QuestType::Text, 10)],
        false,
        noon(),
    );

    let applied = ledger.record_success(success("q7", 60), noon()).expect("q7");
    assert_eq!(ledger.stats().streak, 7);
    assert!(applied.unlocked.iter().any(|b| b == "badge_streak_7"));

    ledger.record_failure(noon());
    assert_eq!(ledger.stats().streak, 0);
    assert!(ledger.stats().has_badge("badge_streak_7"));
    assert_eq!(ledger.stats().best_streak, 7);
}

#[test]
fn tenth_online_image_unlocks_web_10_in_the_same_event() {
    let mut stats = UserStats::new();
    stats.completed = 9;
    stats.type_counts.insert(QuestType::OnlineImage, 9);
    stats.badges = vec![
        "badge_first_quest".to_string(),
        "badge_web_1".to_string(),
    ];
    let mut ledger = ledger_with_stats(stats);
    ledger.replace_active(
        vec![quest("w10", Difficulty::Medium, QuestType::OnlineImage, 20)],
        false,
        noon(),
    );

    let applied = ledger.record_success(success("w10", 60), noon()).expect("w10");
    assert!(applied.unlocked.iter().any(|b| b == "badge_web_10"));
    assert_eq!(ledger.stats().type_count(QuestType::OnlineImage), 10);
}

#[test]
fn replaying_a_success_changes_nothing_the_second_time() {
    let mut ledger = QuestLedger::new();
    ledger.replace_active(
        vec![quest("q1", Difficulty::Easy, QuestType::Text, 10)],
        false,
        noon(),
    );

    assert!(ledger.record_success(success("q1", 60), noon()).is_some());
    let before = ledger.export_snapshot();

    assert!(ledger.record_success(success("q1", 60), noon()).is_none());
    assert_eq!(ledger.export_snapshot(), before);
}

#[test]
fn failure_touches_only_lost_and_streak() {
    let mut stats = UserStats::new();
    stats.completed = 3;
    stats.streak = 3;
    stats.best_streak = 3;
    stats.xp = 120;
    stats.level = 2;
    stats.total_points = 620;
    stats.badges = vec!["badge_first_quest".to_string(), "badge_streak_3".to_string()];
    let mut ledger = ledger_with_stats(stats.clone());

    ledger.record_failure(noon());

    let after = ledger.stats();
    assert_eq!(after.lost, 1);
    assert_eq!(after.streak, 0);
    assert_eq!(after.xp, stats.xp);
    assert_eq!(after.level, stats.level);
    assert_eq!(after.total_points, stats.total_points);
    assert_eq!(after.best_streak, stats.best_streak);
    assert_eq!(after.badges, stats.badges);
}

#[test]
fn toggle_saved_is_its_own_inverse_and_vault_never_double_counts() {
    let mut ledger = QuestLedger::new();
    for i in 0..10 {
        let id = format!("q{i}");
        ledger.replace_active(
            vec![quest(&id, Difficulty::Easy, QuestType::Text, 10)],
            false,
            noon(),
        );
        ledger.record_success(success(&id, 60), noon()).expect("applied");
    }

    for i in 0..9 {
        let applied = ledger.toggle_saved(&format!("q{i}")).expect("toggled");
        assert!(applied.saved);
        assert!(applied.unlocked.is_empty());
    }

    let tenth = ledger.toggle_saved("q9").expect("toggled");
    assert_eq!(tenth.unlocked, vec!["badge_vault".to_string()]);

    // Un-save and re-save: saved state round-trips, badge stays single.
    let off = ledger.toggle_saved("q0").expect("toggled");
    assert!(!off.saved);
    let on = ledger.toggle_saved("q0").expect("toggled");
    assert!(on.saved);
    assert!(on.unlocked.is_empty());
    assert_eq!(
        ledger.stats().badges.iter().filter(|b| *b == "badge_vault").count(),
        1
    );

    assert!(ledger.toggle_saved("missing").is_none());
}

#[test]
fn fast_owl_and_bird_badges_follow_the_triggering_completion() {
    let mut ledger = QuestLedger::new();
    ledger.replace_active(
        vec![
            quest("a", Difficulty::Easy, QuestType::Text, 10),
            quest("b", Difficulty::Easy, QuestType::Text, 10),
            quest("c", Difficulty::Easy, QuestType::Text, 10),
        ],
        false,
        noon(),
    );

    let fast = ledger
        .record_success(success("a", 12), Moment { ts_ms: 1, local_hour: 12 })
        .expect("a");
    assert!(fast.unlocked.iter().any(|b| b == "badge_fast"));
    assert!(!fast.unlocked.iter().any(|b| b == "badge_owl"));

    let owl = ledger
        .record_success(success("b", 60), Moment { ts_ms: 2, local_hour: 3 })
        .expect("b");
    assert!(owl.unlocked.iter().any(|b| b == "badge_owl"));

    let bird = ledger
        .record_success(success("c", 60), Moment { ts_ms: 3, local_hour: 7 })
        .expect("c");
    assert!(bird.unlocked.iter().any(|b| b == "badge_bird"));
}

#[test]
fn manual_refresh_consumes_allowance_floored_at_zero() {
    let mut ledger = QuestLedger::new();
    assert_eq!(ledger.profile().refreshes_left, 2);

    for _ in 0..4 {
        ledger.replace_active(
            vec![quest("q", Difficulty::Easy, QuestType::Text, 10)],
            true,
            noon(),
        );
    }
    assert_eq!(ledger.profile().refreshes_left, 0);

    ledger.replace_active(
        vec![quest("q", Difficulty::Easy, QuestType::Text, 10)],
        false,
        noon(),
    );
    assert_eq!(ledger.profile().refreshes_left, 0);
    assert_eq!(ledger.last_refresh(), 1_000);
}

#[test]
fn refresh_discards_pending_quests_and_drops_duplicate_ids() {
    let mut ledger = QuestLedger::new();
    ledger.replace_active(
        vec![quest("old", Difficulty::Easy, QuestType::Text, 10)],
        false,
        noon(),
    );
    ledger.replace_active(
        vec![quest("done", Difficulty::Easy, QuestType::Text, 10)],
        false,
        noon(),
    );
    ledger.record_success(success("done", 60), noon()).expect("done");

    // "done" already completed, "dup" repeats within the batch.
    let count = ledger.replace_active(
        vec![
            quest("done", Difficulty::Easy, QuestType::Text, 10),
            quest("dup", Difficulty::Easy, QuestType::Text, 10),
            quest("dup", Difficulty::Hard, QuestType::Image, 30),
            quest("new", Difficulty::Easy, QuestType::Text, 10),
        ],
        false,
        noon(),
    );

    assert_eq!(count, 2);
    let ids: Vec<&str> = ledger.active_quests().iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["dup", "new"]);
}

#[test]
fn quiz_judgement_is_local_and_lenient_without_an_answer() {
    let mut q = quest("quiz", Difficulty::Easy, QuestType::Quiz, 10);
    q.quiz_options = Some(vec!["a".into(), "b".into(), "c".into()]);
    q.correct_answer = Some("b".to_string());

    assert!(judge_quiz(&q, "b").success);
    assert!(!judge_quiz(&q, "a").success);

    q.correct_answer = None;
    assert!(judge_quiz(&q, "anything").success);
}

#[test]
fn geo_denials_map_to_distinct_failed_verdicts() {
    let denials = [
        GeoDenial::PermissionDenied,
        GeoDenial::PositionUnavailable,
        GeoDenial::Timeout,
    ];
    let mut messages = Vec::new();
    for denial in denials {
        let verdict = denial.verdict();
        assert!(!verdict.success);
        messages.push(verdict.feedback);
    }
    messages.dedup();
    assert_eq!(messages.len(), 3);
}

#[test]
fn coordinates_proof_encodes_as_lat_comma_lng() {
    let proof = Proof::Coordinates { lat: 44.8, lng: 20.5 };
    assert_eq!(proof.encode(), "44.8, 20.5");
}
