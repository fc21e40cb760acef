//! Badge identifiers and the unlock rule table.

use crate::stats::UserStats;
use crate::types::QuestType;

/// Badge unlocked by bookmarking [`VAULT_THRESHOLD`] completions.
pub const BADGE_VAULT: &str = "badge_vault";
/// Saved-completion count that unlocks [`BADGE_VAULT`].
pub const VAULT_THRESHOLD: usize = 10;

/// Every badge id the ledger can award, for presentation enumeration.
pub const ALL_BADGES: &[&str] = &[
    "badge_first_quest",
    "badge_quest_10",
    "badge_quest_50",
    "badge_quest_100",
    "badge_streak_3",
    "badge_streak_7",
    "badge_streak_15",
    "badge_extreme",
    "badge_meme",
    "badge_web_1",
    "badge_web_10",
    "badge_photo_1",
    "badge_photo_20",
    "badge_loc_1",
    "badge_loc_10",
    "badge_text_1",
    "badge_text_20",
    "badge_quiz_pro",
    "badge_fast",
    "badge_owl",
    "badge_bird",
    BADGE_VAULT,
    "badge_lvl_5",
    "badge_lvl_10",
    "badge_lvl_20",
];

/// Completion-scoped inputs consulted by rules beyond the lifetime stats.
#[derive(Debug, Clone, Copy)]
pub struct UnlockContext {
    /// Solve time of the triggering completion, in seconds.
    pub duration_seconds: u64,
    /// Local hour of day at the moment of completion, `[0, 24)`.
    pub local_hour: u8,
}

struct BadgeRule {
    id: &'static str,
    unlocked: fn(&UserStats, &UnlockContext) -> bool,
}

/// Unlock rules evaluated after every successful completion.
///
/// Each predicate reads the post-event stats snapshot; rules are independent
/// and several may fire from one event. [`BADGE_VAULT`] is absent here since
/// it is checked only on the save-toggle path.
static RULES: &[BadgeRule] = &[
    BadgeRule { id: "badge_first_quest", unlocked: |s, _| s.completed >= 1 },
    BadgeRule { id: "badge_quest_10", unlocked: |s, _| s.completed >= 10 },
    BadgeRule { id: "badge_quest_50", unlocked: |s, _| s.completed >= 50 },
    BadgeRule { id: "badge_quest_100", unlocked: |s, _| s.completed >= 100 },
    BadgeRule { id: "badge_streak_3", unlocked: |s, _| s.streak >= 3 },
    BadgeRule { id: "badge_streak_7", unlocked: |s, _| s.streak >= 7 },
    BadgeRule { id: "badge_streak_15", unlocked: |s, _| s.streak >= 15 },
    BadgeRule { id: "badge_extreme", unlocked: |s, _| s.impossible_count >= 1 },
    BadgeRule { id: "badge_meme", unlocked: |s, _| s.meme_count >= 5 },
    BadgeRule { id: "badge_web_1", unlocked: |s, _| s.type_count(QuestType::OnlineImage) >= 1 },
    BadgeRule { id: "badge_web_10", unlocked: |s, _| s.type_count(QuestType::OnlineImage) >= 10 },
    BadgeRule { id: "badge_photo_1", unlocked: |s, _| s.type_count(QuestType::Image) >= 1 },
    BadgeRule { id: "badge_photo_20", unlocked: |s, _| s.type_count(QuestType::Image) >= 20 },
    BadgeRule { id: "badge_loc_1", unlocked: |s, _| s.type_count(QuestType::Location) >= 1 },
    BadgeRule { id: "badge_loc_10", unlocked: |s, _| s.type_count(QuestType::Location) >= 10 },
    BadgeRule { id: "badge_text_1", unlocked: |s, _| s.type_count(QuestType::Text) >= 1 },
    BadgeRule { id: "badge_text_20", unlocked: |s, _| s.type_count(QuestType::Text) >= 20 },
    BadgeRule { id: "badge_quiz_pro", unlocked: |s, _| s.type_count(QuestType::Quiz) >= 10 },
    BadgeRule { id: "badge_fast", unlocked: |_, ctx| ctx.duration_seconds < 30 },
    BadgeRule { id: "badge_owl", unlocked: |_, ctx| ctx.local_hour < 5 },
    BadgeRule { id: "badge_bird", unlocked: |_, ctx| (5..9).contains(&ctx.local_hour) },
    BadgeRule { id: "badge_lvl_5", unlocked: |s, _| s.level >= 5 },
    BadgeRule { id: "badge_lvl_10", unlocked: |s, _| s.level >= 10 },
    BadgeRule { id: "badge_lvl_20", unlocked: |s, _| s.level >= 20 },
];

/// Runs the rule table in one pass and returns ids satisfied now but not yet
/// present in `stats.badges`.
///
/// Idempotent: a rule once satisfied stays satisfied and is filtered out by
/// the presence check, so re-evaluation only ever adds.
pub fn newly_unlocked(stats: &UserStats, ctx: &UnlockContext) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| !stats.has_badge(rule.id) && (rule.unlocked)(stats, ctx))
        .map(|rule| rule.id)
        .collect()
}
