//! Runtime event stream payloads.

use crate::types::{QuestId, Revision};

/// Events emitted from the single-writer runtime loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A quest was resolved successfully.
    QuestCompleted {
        /// Completed quest id.
        quest_id: QuestId,
    },
    /// A verification came back negative or a failure was reported.
    QuestFailed,
    /// A badge was unlocked; emitted once per badge.
    BadgeUnlocked {
        /// Unlocked badge id.
        badge_id: String,
    },
    /// A completion bookmark was toggled.
    SavedToggled {
        /// Affected completion's quest id.
        quest_id: QuestId,
        /// New saved state.
        saved: bool,
    },
    /// The active quest set was replaced.
    QuestsReplaced {
        /// Quests now active.
        count: usize,
    },
    /// Persistence has stored at least this ledger revision.
    PersistedUpTo {
        /// Highest revision known durable.
        revision: Revision,
    },
}
