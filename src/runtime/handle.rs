use std::sync::Arc;

use tokio::{
    sync::{Mutex, broadcast, mpsc, oneshot},
    time::{Duration, Instant},
};

use crate::{
    clock::{Clock, Moment, SystemClock},
    core::ledger::{LedgerSnapshot, QuestLedger, SuccessEvent},
    persist::{PersistError, SnapshotStore},
    quest::{Proof, Quest, QuestCompletion},
    sources::{GENERIC_VERIFY_FAILURE, QuestSource, Verdict, VerificationOracle, judge_quiz},
    stats::UserStats,
    types::{Language, QuestId, Revision, QuestType, Theme},
};

use super::events::LedgerEvent;

/// Runtime-layer failure.
#[derive(Debug)]
pub enum RuntimeError {
    /// Persistence queue or storage failure.
    Persist(PersistError),
    /// The command loop has shut down.
    ChannelClosed,
}

impl From<PersistError> for RuntimeError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

/// Result of a proof submission round-trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Verification passed and the success was folded into the ledger.
    Passed {
        /// Oracle feedback text.
        feedback: String,
        /// Badge ids unlocked by this completion.
        unlocked: Vec<String>,
    },
    /// Verification failed; the failure was recorded and the quest stays
    /// active for retry.
    Failed {
        /// Oracle feedback text.
        feedback: String,
    },
    /// The quest was no longer in the active set; nothing changed.
    Ignored,
}

/// Tunables for the runtime loop and its persistence worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Bound of the snapshot queue feeding the persistence worker.
    pub persist_queue_bound: usize,
    /// How long the worker may coalesce snapshots before writing.
    pub snapshot_max_latency_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            persist_queue_bound: 64,
            snapshot_max_latency_ms: 75,
        }
    }
}

/// External collaborators wired into the runtime.
pub struct Collaborators {
    /// Quest batch generator.
    pub source: Box<dyn QuestSource>,
    /// Proof judge.
    pub oracle: Box<dyn VerificationOracle>,
    /// Snapshot store; `None` runs without durability.
    pub store: Option<Box<dyn SnapshotStore>>,
    /// Clock captured into every transition.
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Wires up a source and an oracle with the system clock and no store.
    pub fn new(source: Box<dyn QuestSource>, oracle: Box<dyn VerificationOracle>) -> Self {
        Self {
            source,
            oracle,
            store: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Adds a snapshot store.
    pub fn with_store(mut self, store: Box<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replaces the clock, for deterministic tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

/// Cloneable handle to the single-writer ledger loop.
pub struct LedgerHandle {
    cmd_tx: mpsc::Sender<Command>,
    events_tx: broadcast::Sender<LedgerEvent>,
}

impl Clone for LedgerHandle {
    fn clone(&self) -> Self {
        Self {
            cmd_tx: self.cmd_tx.clone(),
            events_tx: self.events_tx.clone(),
        }
    }
}

enum Command {
    SubmitProof {
        quest_id: QuestId,
        proof: Proof,
        duration_seconds: u64,
        resp: oneshot::Sender<Result<SubmitOutcome, RuntimeError>>,
    },
    FailQuest {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    RefreshQuests {
        manual: bool,
        resp: oneshot::Sender<Result<usize, RuntimeError>>,
    },
    ToggleSaved {
        quest_id: QuestId,
        resp: oneshot::Sender<Result<Option<bool>, RuntimeError>>,
    },
    Login {
        username: String,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Logout {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SetLanguage {
        language: Language,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    SetTheme {
        theme: Theme,
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
    Snapshot {
        resp: oneshot::Sender<LedgerSnapshot>,
    },
    Stats {
        resp: oneshot::Sender<UserStats>,
    },
    ActiveQuests {
        resp: oneshot::Sender<Vec<Quest>>,
    },
    RecentCompletions {
        n: usize,
        resp: oneshot::Sender<Vec<QuestCompletion>>,
    },
    Flush {
        resp: oneshot::Sender<Result<Revision, RuntimeError>>,
    },
    Shutdown {
        resp: oneshot::Sender<Result<(), RuntimeError>>,
    },
}

enum PersistMsg {
    Snapshot {
        snapshot: LedgerSnapshot,
        revision: Revision,
    },
    Clear {
        resp: oneshot::Sender<Result<(), PersistError>>,
    },
    Flush {
        resp: oneshot::Sender<Result<Revision, PersistError>>,
    },
    Shutdown {
        resp: oneshot::Sender<()>,
    },
}

/// Spawns the single-writer command loop and returns its handle.
///
/// All ledger transitions run to completion inside the loop before the next
/// command is applied; collaborator calls are awaited inline, so no two
/// transitions ever interleave. After every transition the full state is
/// forwarded to a background persistence worker.
pub fn spawn_questlog(
    ledger: QuestLedger,
    collaborators: Collaborators,
    config: RuntimeConfig,
) -> LedgerHandle {
    let (cmd_tx, mut cmd_rx) = mpsc::channel::<Command>(256);
    let (events_tx, _) = broadcast::channel::<LedgerEvent>(1024);

    let Collaborators {
        source,
        oracle,
        store,
        clock,
    } = collaborators;

    let (persist_tx_opt, mut durable_rx) = if let Some(store) = store {
        let (persist_tx, persist_rx) = mpsc::channel::<PersistMsg>(config.persist_queue_bound);
        let (durable_tx, durable_rx) = mpsc::unbounded_channel::<Result<Revision, PersistError>>();
        spawn_persistence_worker(store, persist_rx, durable_tx, config.clone());
        (Some(persist_tx), Some(durable_rx))
    } else {
        (None, None)
    };

    let events_tx_loop = events_tx.clone();

    tokio::spawn(async move {
        let mut ledger = ledger;

        loop {
            if let Some(rx) = durable_rx.as_mut() {
                tokio::select! {
                    cmd = cmd_rx.recv() => {
                        let Some(cmd) = cmd else { break; };
                        let done = handle_command(
                            cmd,
                            &mut ledger,
                            source.as_ref(),
                            oracle.as_ref(),
                            clock.as_ref(),
                            &events_tx_loop,
                            persist_tx_opt.as_ref(),
                        ).await;
                        if done {
                            break;
                        }
                    }
                    durable = rx.recv() => {
                        if let Some(Ok(revision)) = durable {
                            let _ = events_tx_loop.send(LedgerEvent::PersistedUpTo { revision });
                        }
                    }
                }
            } else {
                let Some(cmd) = cmd_rx.recv().await else { break; };
                let done = handle_command(
                    cmd,
                    &mut ledger,
                    source.as_ref(),
                    oracle.as_ref(),
                    clock.as_ref(),
                    &events_tx_loop,
                    persist_tx_opt.as_ref(),
                )
                .await;
                if done {
                    break;
                }
            }
        }
    });

    LedgerHandle { cmd_tx, events_tx }
}

impl LedgerHandle {
    /// Subscribes to the runtime event stream.
    ///
    /// Badge unlocks arrive as one [`LedgerEvent::BadgeUnlocked`] per badge,
    /// giving the presentation layer an acknowledge-once notification queue.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events_tx.subscribe()
    }

    /// Submits proof for an active quest and folds the verdict in.
    ///
    /// Quiz quests are judged locally against their `correct_answer`; all
    /// other kinds go through the verification oracle. An oracle transport
    /// failure counts as a judged failure with generic feedback.
    pub async fn submit_proof(
        &self,
        quest_id: impl Into<QuestId>,
        proof: Proof,
        duration_seconds: u64,
    ) -> Result<SubmitOutcome, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SubmitProof {
                quest_id: quest_id.into(),
                proof,
                duration_seconds,
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Records a failure without a verification round-trip.
    ///
    /// Used for device-side denials (geolocation) and wrong in-UI answers
    /// the presentation layer judges itself.
    pub async fn fail_quest(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::FailQuest { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Asks the quest source for a fresh batch and replaces the active set.
    ///
    /// Returns the number of quests now active. A source error or empty
    /// batch leaves the active set and the refresh allowance untouched and
    /// returns 0.
    pub async fn refresh_quests(&self, manual: bool) -> Result<usize, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RefreshQuests { manual, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Toggles the bookmark on a completion; `Ok(None)` when not found.
    pub async fn toggle_saved(
        &self,
        quest_id: impl Into<QuestId>,
    ) -> Result<Option<bool>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ToggleSaved {
                quest_id: quest_id.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Opens a session under `username`.
    pub async fn login(&self, username: impl Into<String>) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Login {
                username: username.into(),
                resp: tx,
            })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Resets the ledger to a fresh state and clears the persisted snapshot.
    pub async fn logout(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Logout { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Sets the quest/feedback language.
    pub async fn set_language(&self, language: Language) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetLanguage { language, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Sets the presentation theme.
    pub async fn set_theme(&self, theme: Theme) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::SetTheme { theme, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Full state snapshot.
    pub async fn snapshot(&self) -> Result<LedgerSnapshot, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Snapshot { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current statistics.
    pub async fn stats(&self) -> Result<UserStats, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Stats { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Current active quest set.
    pub async fn active_quests(&self) -> Result<Vec<Quest>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::ActiveQuests { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// The `n` most recent completions.
    pub async fn recent_completions(
        &self,
        n: usize,
    ) -> Result<Vec<QuestCompletion>, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::RecentCompletions { n, resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)
    }

    /// Forces pending snapshots to storage; returns the durable revision.
    pub async fn flush(&self) -> Result<Revision, RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Flush { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }

    /// Drains persistence and stops the loop.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        let (tx, rx) = oneshot::channel();
        self.cmd_tx
            .send(Command::Shutdown { resp: tx })
            .await
            .map_err(|_| RuntimeError::ChannelClosed)?;
        rx.await.map_err(|_| RuntimeError::ChannelClosed)?
    }
}

async fn handle_command(
    cmd: Command,
    ledger: &mut QuestLedger,
    source: &dyn QuestSource,
    oracle: &dyn VerificationOracle,
    clock: &dyn Clock,
    events_tx: &broadcast::Sender<LedgerEvent>,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
) -> bool {
    match cmd {
        Command::SubmitProof {
            quest_id,
            proof,
            duration_seconds,
            resp,
        } => {
            let Some(quest) = ledger.active_quest(&quest_id).cloned() else {
                let _ = resp.send(Ok(SubmitOutcome::Ignored));
                return false;
            };

            let verdict = if quest.kind == QuestType::Quiz {
                judge_quiz(&quest, &proof.encode())
            } else {
                match oracle
                    .verify(&quest, &proof, ledger.profile().language)
                    .await
                {
                    Ok(verdict) => verdict,
                    Err(err) => {
                        tracing::warn!(?err, quest_id, "verification call failed");
                        Verdict::failed(GENERIC_VERIFY_FAILURE)
                    }
                }
            };

            let res = if verdict.success {
                let event = SuccessEvent {
                    quest_id: quest_id.clone(),
                    proof: proof.encode(),
                    feedback: verdict.feedback.clone(),
                    duration_seconds,
                };
                match ledger.record_success(event, Moment::capture(clock)) {
                    Some(applied) => {
                        let _ = events_tx.send(LedgerEvent::QuestCompleted {
                            quest_id: quest_id.clone(),
                        });
                        for badge_id in &applied.unlocked {
                            let _ = events_tx.send(LedgerEvent::BadgeUnlocked {
                                badge_id: badge_id.clone(),
                            });
                        }
                        after_transition(ledger, events_tx, persist_tx).map(|()| {
                            SubmitOutcome::Passed {
                                feedback: verdict.feedback,
                                unlocked: applied.unlocked,
                            }
                        })
                    }
                    None => Ok(SubmitOutcome::Ignored),
                }
            } else {
                ledger.record_failure(Moment::capture(clock));
                let _ = events_tx.send(LedgerEvent::QuestFailed);
                after_transition(ledger, events_tx, persist_tx).map(|()| SubmitOutcome::Failed {
                    feedback: verdict.feedback,
                })
            };
            let _ = resp.send(res);
        }
        Command::FailQuest { resp } => {
            ledger.record_failure(Moment::capture(clock));
            let _ = events_tx.send(LedgerEvent::QuestFailed);
            let _ = resp.send(after_transition(ledger, events_tx, persist_tx));
        }
        Command::RefreshQuests { manual, resp } => {
            let res = match source.generate(ledger.profile().language).await {
                Ok(quests) if !quests.is_empty() => {
                    let count = ledger.replace_active(quests, manual, Moment::capture(clock));
                    let _ = events_tx.send(LedgerEvent::QuestsReplaced { count });
                    after_transition(ledger, events_tx, persist_tx).map(|()| count)
                }
                Ok(_) => {
                    tracing::debug!("quest source returned an empty batch");
                    Ok(0)
                }
                Err(err) => {
                    tracing::warn!(?err, "quest generation failed");
                    Ok(0)
                }
            };
            let _ = resp.send(res);
        }
        Command::ToggleSaved { quest_id, resp } => {
            let res = match ledger.toggle_saved(&quest_id) {
                Some(applied) => {
                    let _ = events_tx.send(LedgerEvent::SavedToggled {
                        quest_id,
                        saved: applied.saved,
                    });
                    for badge_id in applied.unlocked {
                        let _ = events_tx.send(LedgerEvent::BadgeUnlocked { badge_id });
                    }
                    after_transition(ledger, events_tx, persist_tx).map(|()| Some(applied.saved))
                }
                None => Ok(None),
            };
            let _ = resp.send(res);
        }
        Command::Login { username, resp } => {
            ledger.login(username);
            let _ = resp.send(after_transition(ledger, events_tx, persist_tx));
        }
        Command::Logout { resp } => {
            *ledger = QuestLedger::new();
            let out = if let Some(tx) = persist_tx {
                let (clear_tx, clear_rx) = oneshot::channel();
                if tx.send(PersistMsg::Clear { resp: clear_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    clear_rx
                        .await
                        .map_err(|_| RuntimeError::ChannelClosed)
                        .and_then(|r| r.map_err(RuntimeError::from))
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
        }
        Command::SetLanguage { language, resp } => {
            ledger.set_language(language);
            let _ = resp.send(after_transition(ledger, events_tx, persist_tx));
        }
        Command::SetTheme { theme, resp } => {
            ledger.set_theme(theme);
            let _ = resp.send(after_transition(ledger, events_tx, persist_tx));
        }
        Command::Snapshot { resp } => {
            let _ = resp.send(ledger.export_snapshot());
        }
        Command::Stats { resp } => {
            let _ = resp.send(ledger.stats().clone());
        }
        Command::ActiveQuests { resp } => {
            let _ = resp.send(ledger.active_quests().to_vec());
        }
        Command::RecentCompletions { n, resp } => {
            let _ = resp.send(ledger.recent_completed(n));
        }
        Command::Flush { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (flush_tx, flush_rx) = oneshot::channel();
                if tx.send(PersistMsg::Flush { resp: flush_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    flush_rx
                        .await
                        .map_err(|_| RuntimeError::ChannelClosed)
                        .and_then(|r| r.map_err(RuntimeError::from))
                }
            } else {
                Ok(ledger.revision())
            };
            let _ = resp.send(out);
        }
        Command::Shutdown { resp } => {
            let out = if let Some(tx) = persist_tx {
                let (done_tx, done_rx) = oneshot::channel();
                if tx.send(PersistMsg::Shutdown { resp: done_tx }).await.is_err() {
                    Err(RuntimeError::ChannelClosed)
                } else {
                    match done_rx.await {
                        Ok(()) => Ok(()),
                        Err(_) => Err(RuntimeError::ChannelClosed),
                    }
                }
            } else {
                Ok(())
            };
            let _ = resp.send(out);
            return true;
        }
    }

    false
}

/// Forwards the post-transition snapshot to the persistence worker, or
/// reports immediate durability when running without a store.
fn after_transition(
    ledger: &QuestLedger,
    events_tx: &broadcast::Sender<LedgerEvent>,
    persist_tx: Option<&mpsc::Sender<PersistMsg>>,
) -> Result<(), RuntimeError> {
    if let Some(tx) = persist_tx {
        tx.try_send(PersistMsg::Snapshot {
            snapshot: ledger.export_snapshot(),
            revision: ledger.revision(),
        })
        .map_err(|err| {
            RuntimeError::Persist(PersistError::Message(format!(
                "persist queue error: {err}"
            )))
        })
    } else {
        let _ = events_tx.send(LedgerEvent::PersistedUpTo {
            revision: ledger.revision(),
        });
        Ok(())
    }
}

fn spawn_persistence_worker(
    store: Box<dyn SnapshotStore>,
    mut rx: mpsc::Receiver<PersistMsg>,
    durable_tx: mpsc::UnboundedSender<Result<Revision, PersistError>>,
    config: RuntimeConfig,
) {
    let store = Arc::new(Mutex::new(store));
    tokio::spawn(async move {
        let mut pending: Option<(LedgerSnapshot, Revision)> = None;
        let mut deadline = Instant::now() + Duration::from_millis(config.snapshot_max_latency_ms);
        let mut last_durable: Revision = 0;

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(msg) = msg else {
                        let _ = write_pending(&store, &mut pending, &mut last_durable, &durable_tx, true).await;
                        break;
                    };

                    match msg {
                        PersistMsg::Snapshot { snapshot, revision } => {
                            // A newer snapshot supersedes anything queued.
                            pending = Some((snapshot, revision));
                        }
                        PersistMsg::Clear { resp } => {
                            pending = None;
                            let store_ref = Arc::clone(&store);
                            let result = match tokio::task::spawn_blocking(move || {
                                let mut store = store_ref.blocking_lock();
                                store.clear()
                            }).await {
                                Ok(inner) => inner,
                                Err(e) => Err(PersistError::Message(format!("join error: {e}"))),
                            };
                            let _ = resp.send(result);
                            deadline = Instant::now() + Duration::from_millis(config.snapshot_max_latency_ms);
                        }
                        PersistMsg::Flush { resp } => {
                            let result = write_pending(&store, &mut pending, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(result.map(|_| last_durable));
                            deadline = Instant::now() + Duration::from_millis(config.snapshot_max_latency_ms);
                        }
                        PersistMsg::Shutdown { resp } => {
                            let _ = write_pending(&store, &mut pending, &mut last_durable, &durable_tx, true).await;
                            let _ = resp.send(());
                            break;
                        }
                    }
                }
                _ = tokio::time::sleep_until(deadline), if pending.is_some() => {
                    let _ = write_pending(&store, &mut pending, &mut last_durable, &durable_tx, false).await;
                    deadline = Instant::now() + Duration::from_millis(config.snapshot_max_latency_ms);
                }
            }
        }
    });
}

async fn write_pending(
    store: &Arc<Mutex<Box<dyn SnapshotStore>>>,
    pending: &mut Option<(LedgerSnapshot, Revision)>,
    last_durable: &mut Revision,
    durable_tx: &mpsc::UnboundedSender<Result<Revision, PersistError>>,
    call_flush: bool,
) -> Result<(), PersistError> {
    let Some((snapshot, revision)) = pending.take() else {
        if call_flush {
            let store_ref = Arc::clone(store);
            tokio::task::spawn_blocking(move || {
                let mut store = store_ref.blocking_lock();
                store.flush()
            })
            .await
            .map_err(|e| PersistError::Message(format!("join error: {e}")))??;
        }
        return Ok(());
    };

    let store_ref = Arc::clone(store);
    let write_res: Result<Revision, PersistError> = tokio::task::spawn_blocking(move || {
        let mut store = store_ref.blocking_lock();
        store.write_snapshot(&snapshot, revision)?;
        if call_flush {
            store.flush()?;
        }
        Ok(revision)
    })
    .await
    .map_err(|e| PersistError::Message(format!("join error: {e}")))?;

    match write_res {
        Ok(revision) => {
            *last_durable = (*last_durable).max(revision);
            let _ = durable_tx.send(Ok(*last_durable));
            tracing::debug!(revision, "snapshot persisted");
            Ok(())
        }
        Err(err) => {
            let _ = durable_tx.send(Err(PersistError::Message(format!(
                "snapshot write failed: {err:?}"
            ))));
            Err(err)
        }
    }
}
