//! Lifetime progress counters and leveling arithmetic.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, QuestType};

/// XP required to advance one level.
pub const XP_PER_LEVEL: u32 = 500;

/// Cumulative statistics derived from completion and failure events.
///
/// Mutated only by the ledger's transition functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Lifetime successful completions.
    pub completed: u32,
    /// Lifetime failures.
    pub lost: u32,
    /// Consecutive successes since the last failure.
    pub streak: u32,
    /// High-water mark of `streak`; never decreases.
    pub best_streak: u32,
    /// Lifetime XP earned; never decreases.
    pub total_points: u64,
    /// Current level-progress XP.
    pub xp: u32,
    /// Current level, starting at 1; never decreases.
    pub level: u32,
    /// Completions at easy difficulty.
    pub easy_count: u32,
    /// Completions at medium difficulty.
    pub medium_count: u32,
    /// Completions at hard difficulty.
    pub hard_count: u32,
    /// Completions at meme difficulty.
    pub meme_count: u32,
    /// Completions at impossible difficulty.
    pub impossible_count: u32,
    /// Unlocked badge ids in unlock order; append-only.
    pub badges: Vec<String>,
    /// Lifetime completion count per quest type.
    pub type_counts: HashMap<QuestType, u32>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            completed: 0,
            lost: 0,
            streak: 0,
            best_streak: 0,
            total_points: 0,
            xp: 0,
            level: 1,
            easy_count: 0,
            medium_count: 0,
            hard_count: 0,
            meme_count: 0,
            impossible_count: 0,
            badges: Vec::new(),
            type_counts: HashMap::new(),
        }
    }
}

impl UserStats {
    /// Fresh stats for a new user.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `id` has already been unlocked.
    pub fn has_badge(&self, id: &str) -> bool {
        self.badges.iter().any(|b| b == id)
    }

    /// Lifetime completion count for `kind`.
    pub fn type_count(&self, kind: QuestType) -> u32 {
        self.type_counts.get(&kind).copied().unwrap_or(0)
    }

    /// Folds one successful completion into the counters.
    ///
    /// XP crossing [`XP_PER_LEVEL`] triggers exactly one level-up with the
    /// remainder carried forward; a single oversized award is never re-checked
    /// for a second rollover.
    pub(crate) fn apply_success(&mut self, difficulty: Difficulty, kind: QuestType, points: u32) {
        self.xp += points;
        if self.xp >= XP_PER_LEVEL {
            self.level += 1;
            self.xp -= XP_PER_LEVEL;
        }

        match difficulty {
            Difficulty::Easy => self.easy_count += 1,
            Difficulty::Medium => self.medium_count += 1,
            Difficulty::Hard => self.hard_count += 1,
            Difficulty::Meme => self.meme_count += 1,
            Difficulty::Impossible => self.impossible_count += 1,
        }
        *self.type_counts.entry(kind).or_insert(0) += 1;

        self.completed += 1;
        self.total_points += u64::from(points);
        self.streak += 1;
        self.best_streak = self.best_streak.max(self.streak);
    }

    /// Folds one failure: the streak resets to exactly 0, nothing else moves.
    pub(crate) fn apply_failure(&mut self) {
        self.lost += 1;
        self.streak = 0;
    }
}

/// Display tier derived from level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Levels 1.
    Noob,
    /// Levels 2-4.
    Novice,
    /// Levels 5-9.
    Explorer,
    /// Levels 10-19.
    Legend,
    /// Level 20 and up.
    Demigod,
}

impl Tier {
    /// Maps a level onto its tier.
    pub fn for_level(level: u32) -> Self {
        match level {
            0..=1 => Tier::Noob,
            2..=4 => Tier::Novice,
            5..=9 => Tier::Explorer,
            10..=19 => Tier::Legend,
            _ => Tier::Demigod,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Noob => "Noob",
            Tier::Novice => "Novice",
            Tier::Explorer => "Explorer",
            Tier::Legend => "Legend",
            Tier::Demigod => "Demigod",
        }
    }
}
