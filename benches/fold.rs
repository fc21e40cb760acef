use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use questlog::{
    badges::{self, UnlockContext},
    clock::Moment,
    core::ledger::{QuestLedger, SuccessEvent},
    quest::Quest,
    stats::UserStats,
    types::{Difficulty, QuestType},
};

fn quest(id: &str, points: u32) -> Quest {
    Quest {
        id: id.to_string(),
        title: id.to_string(),
        description: "bench".to_string(),
        difficulty: Difficulty::Medium,
        kind: QuestType::Text,
        points,
        instructions: "bench".to_string(),
        created_at: 0,
        quiz_options: None,
        correct_answer: None,
        location: None,
    }
}

fn bench_success_fold(c: &mut Criterion) {
    c.bench_function("fold_success_2k", |b| {
        b.iter(|| {
            let mut ledger = QuestLedger::new();
            for i in 0..2_000u64 {
                let at = Moment {
                    ts_ms: i,
                    local_hour: 12,
                };
                let id = format!("q{i}");
                ledger.replace_active(vec![quest(&id, 120)], false, at);
                let _ = ledger.record_success(
                    SuccessEvent {
                        quest_id: id,
                        proof: "p".to_string(),
                        feedback: "f".to_string(),
                        duration_seconds: 60,
                    },
                    at,
                );
            }
        });
    });
}

fn bench_badge_evaluation(c: &mut Criterion) {
    let mut stats = UserStats::new();
    stats.completed = 42;
    stats.streak = 6;
    stats.best_streak = 12;
    stats.level = 8;
    stats.type_counts.insert(QuestType::Text, 18);
    stats.type_counts.insert(QuestType::Image, 12);
    stats.type_counts.insert(QuestType::Quiz, 7);
    stats.badges = vec![
        "badge_first_quest".to_string(),
        "badge_quest_10".to_string(),
        "badge_streak_3".to_string(),
        "badge_text_1".to_string(),
        "badge_photo_1".to_string(),
        "badge_lvl_5".to_string(),
    ];
    let ctx = UnlockContext {
        duration_seconds: 45,
        local_hour: 14,
    };

    c.bench_function("badge_rules_mid_game", |b| {
        b.iter(|| badges::newly_unlocked(&stats, &ctx));
    });
}

fn bench_snapshot_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_encode");
    for n in [100usize, 1_000usize] {
        let mut ledger = QuestLedger::new();
        for i in 0..n as u64 {
            let at = Moment {
                ts_ms: i,
                local_hour: 12,
            };
            let id = format!("q{i}");
            ledger.replace_active(vec![quest(&id, 50)], false, at);
            let _ = ledger.record_success(
                SuccessEvent {
                    quest_id: id,
                    proof: "p".to_string(),
                    feedback: "f".to_string(),
                    duration_seconds: 60,
                },
                at,
            );
        }
        let snapshot = ledger.export_snapshot();

        group.bench_with_input(BenchmarkId::from_parameter(n), &snapshot, |b, snapshot| {
            b.iter(|| serde_json::to_vec(snapshot).expect("encode"));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_success_fold,
    bench_badge_evaluation,
    bench_snapshot_encode
);
criterion_main!(benches);
