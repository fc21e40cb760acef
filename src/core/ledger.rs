use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::{
    badges::{self, BADGE_VAULT, VAULT_THRESHOLD, UnlockContext},
    clock::Moment,
    quest::{Quest, QuestCompletion},
    stats::UserStats,
    types::{Language, QuestId, Revision, Theme},
};

/// Manual refreshes granted to a fresh session.
pub const DEFAULT_MANUAL_REFRESHES: u8 = 2;

/// User/session slice of the ledger state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Chosen display name; `None` before login.
    pub username: Option<String>,
    /// Whether a session is active.
    pub logged_in: bool,
    /// Remaining manual quest refreshes.
    pub refreshes_left: u8,
    /// Quest and feedback language.
    pub language: Language,
    /// Presentation theme.
    pub theme: Theme,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            username: None,
            logged_in: false,
            refreshes_left: DEFAULT_MANUAL_REFRESHES,
            language: Language::En,
            theme: Theme::Dark,
        }
    }
}

/// Full persistable ledger state: one JSON-serializable blob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    /// User/session info.
    pub profile: Profile,
    /// Active quest set, in source order.
    pub active_quests: Vec<Quest>,
    /// Completed-quest history, most recent first.
    pub completed_quests: Vec<QuestCompletion>,
    /// Derived statistics.
    pub stats: UserStats,
    /// Timestamp of the last active-set replacement, ms since epoch.
    pub last_refresh: u64,
    /// Transition counter at snapshot time.
    pub revision: Revision,
}

/// Payload of a successful quest resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessEvent {
    /// Quest being resolved; must be in the active set or the event drops.
    pub quest_id: QuestId,
    /// Encoded proof payload as submitted.
    pub proof: String,
    /// Oracle feedback text.
    pub feedback: String,
    /// Elapsed solve time in seconds.
    pub duration_seconds: u64,
}

/// Output of an applied [`QuestLedger::record_success`].
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessApplied {
    /// The completion record appended to history.
    pub completion: QuestCompletion,
    /// Badge ids unlocked by this event, in table order.
    pub unlocked: Vec<String>,
}

/// Output of an applied [`QuestLedger::toggle_saved`].
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleApplied {
    /// New saved state of the completion.
    pub saved: bool,
    /// Badge ids unlocked by this event (at most [`BADGE_VAULT`]).
    pub unlocked: Vec<String>,
}

/// Deterministic reducer folding completion/failure events into persistent
/// statistics, leveling, streaks, and badge unlocks.
///
/// All transitions run to completion synchronously, never reject a
/// well-formed call, and report unlocks as explicit output rather than side
/// state. Callers own persistence: export a snapshot after each transition
/// and write it wherever it needs to live.
#[derive(Debug, Default)]
pub struct QuestLedger {
    profile: Profile,
    active: Vec<Quest>,
    completed: Vec<QuestCompletion>,
    stats: UserStats,
    last_refresh: u64,
    revision: Revision,
}

impl QuestLedger {
    /// Fresh ledger with default session state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a ledger from a persisted snapshot.
    pub fn from_snapshot(snapshot: LedgerSnapshot) -> Self {
        Self {
            profile: snapshot.profile,
            active: snapshot.active_quests,
            completed: snapshot.completed_quests,
            stats: snapshot.stats,
            last_refresh: snapshot.last_refresh,
            revision: snapshot.revision,
        }
    }

    /// Exports the full persistable state.
    pub fn export_snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            profile: self.profile.clone(),
            active_quests: self.active.clone(),
            completed_quests: self.completed.clone(),
            stats: self.stats.clone(),
            last_refresh: self.last_refresh,
            revision: self.revision,
        }
    }

    /// Applies a successful quest resolution.
    ///
    /// Returns `None` without touching state when the quest id is not in the
    /// active set; the quest may already have been consumed by a concurrent
    /// UI action, so the event drops silently. Replaying the same success is
    /// therefore a no-op the second time.
    ///
    /// Badge rules run against the post-update stats snapshot; newly
    /// unlocked ids come back in the result for exactly-once notification.
    pub fn record_success(&mut self, event: SuccessEvent, at: Moment) -> Option<SuccessApplied> {
        let idx = self.active.iter().position(|q| q.id == event.quest_id)?;
        let quest = self.active.remove(idx);

        self.stats
            .apply_success(quest.difficulty, quest.kind, quest.points);

        let ctx = UnlockContext {
            duration_seconds: event.duration_seconds,
            local_hour: at.local_hour,
        };
        let unlocked: Vec<String> = badges::newly_unlocked(&self.stats, &ctx)
            .into_iter()
            .map(str::to_owned)
            .collect();
        self.stats.badges.extend(unlocked.iter().cloned());

        let completion = QuestCompletion {
            quest_id: event.quest_id,
            quest,
            timestamp: at.ts_ms,
            duration_seconds: event.duration_seconds,
            proof: event.proof,
            feedback: event.feedback,
            saved: false,
        };
        self.completed.insert(0, completion.clone());

        self.revision += 1;
        Some(SuccessApplied {
            completion,
            unlocked,
        })
    }

    /// Applies a failure: increments `lost` and resets the streak to 0.
    ///
    /// Carries no quest id; a failure anywhere resets the global streak and
    /// the failed quest stays in the active set, available for retry. XP,
    /// level, points, and badges are untouched.
    pub fn record_failure(&mut self, _at: Moment) {
        self.stats.apply_failure();
        self.revision += 1;
    }

    /// Flips the bookmark on the matching completion.
    ///
    /// No-op (`None`) when the id is not in history. When the saved count
    /// reaches [`VAULT_THRESHOLD`] and the vault badge is still locked, it
    /// unlocks here; un-saving never revokes it.
    pub fn toggle_saved(&mut self, quest_id: &str) -> Option<ToggleApplied> {
        let entry = self.completed.iter_mut().find(|c| c.quest_id == quest_id)?;
        entry.saved = !entry.saved;
        let saved = entry.saved;

        let mut unlocked = Vec::new();
        if self.saved_count() >= VAULT_THRESHOLD && !self.stats.has_badge(BADGE_VAULT) {
            self.stats.badges.push(BADGE_VAULT.to_owned());
            unlocked.push(BADGE_VAULT.to_owned());
        }

        self.revision += 1;
        Some(ToggleApplied { saved, unlocked })
    }

    /// Replaces the entire active quest set.
    ///
    /// Pending quests are discarded, not preserved. Incoming quests whose id
    /// repeats within the batch or already appears in the completed history
    /// are dropped, keeping completion ids unique. A manual refresh consumes
    /// one unit of the allowance, floored at 0; automatic refreshes consume
    /// nothing.
    pub fn replace_active(
        &mut self,
        quests: Vec<Quest>,
        consumes_manual_refresh: bool,
        at: Moment,
    ) -> usize {
        let mut seen: HashSet<QuestId> = HashSet::with_capacity(quests.len());
        let mut batch = Vec::with_capacity(quests.len());
        for quest in quests {
            if !seen.insert(quest.id.clone()) {
                continue;
            }
            if self.completed.iter().any(|c| c.quest_id == quest.id) {
                continue;
            }
            batch.push(quest);
        }

        self.active = batch;
        self.last_refresh = at.ts_ms;
        if consumes_manual_refresh {
            self.profile.refreshes_left = self.profile.refreshes_left.saturating_sub(1);
        }
        self.revision += 1;
        self.active.len()
    }

    /// Opens a session under `username`.
    pub fn login(&mut self, username: impl Into<String>) {
        self.profile.username = Some(username.into());
        self.profile.logged_in = true;
        self.revision += 1;
    }

    /// Sets the quest/feedback language.
    pub fn set_language(&mut self, language: Language) {
        self.profile.language = language;
        self.revision += 1;
    }

    /// Sets the presentation theme.
    pub fn set_theme(&mut self, theme: Theme) {
        self.profile.theme = theme;
        self.revision += 1;
    }

    /// Current session info.
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Current statistics.
    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    /// Active quest set, in source order.
    pub fn active_quests(&self) -> &[Quest] {
        &self.active
    }

    /// Looks up an active quest by id.
    pub fn active_quest(&self, quest_id: &str) -> Option<&Quest> {
        self.active.iter().find(|q| q.id == quest_id)
    }

    /// Completed history, most recent first.
    pub fn completed_quests(&self) -> &[QuestCompletion] {
        &self.completed
    }

    /// The `n` most recent completions, cloned.
    pub fn recent_completed(&self, n: usize) -> Vec<QuestCompletion> {
        self.completed.iter().take(n).cloned().collect()
    }

    /// Number of bookmarked completions.
    pub fn saved_count(&self) -> usize {
        self.completed.iter().filter(|c| c.saved).count()
    }

    /// Timestamp of the last active-set replacement.
    pub fn last_refresh(&self) -> u64 {
        self.last_refresh
    }

    /// Transitions applied so far.
    pub fn revision(&self) -> Revision {
        self.revision
    }
}
