//! Deterministic quest-progress ledger with snapshot persistence.
//!
//! The ledger folds quest completion/failure events into persistent
//! statistics, leveling, streaks, and badge unlocks. Quest generation and
//! proof verification are external collaborators behind traits; the
//! presentation layer drives everything through the single-writer runtime
//! handle and renders the resulting state.
//!
//! # Examples
//!
//! Pure reducer usage with [`core::ledger::QuestLedger`]:
//! ```
//! use questlog::{
//!     clock::Moment,
//!     core::ledger::{QuestLedger, SuccessEvent},
//!     quest::Quest,
//!     types::{Difficulty, QuestType},
//! };
//!
//! let mut ledger = QuestLedger::new();
//! let at = Moment { ts_ms: 1, local_hour: 12 };
//! ledger.replace_active(
//!     vec![Quest {
//!         id: "q1".into(),
//!         title: "Touch grass".into(),
//!         description: "Go outside.".into(),
//!         difficulty: Difficulty::Easy,
//!         kind: QuestType::Text,
//!         points: 50,
//!         instructions: "Describe the grass you touched.".into(),
//!         created_at: 0,
//!         quiz_options: None,
//!         correct_answer: None,
//!         location: None,
//!     }],
//!     false,
//!     at,
//! );
//!
//! let applied = ledger
//!     .record_success(
//!         SuccessEvent {
//!             quest_id: "q1".into(),
//!             proof: "it was green".into(),
//!             feedback: "Acceptable.".into(),
//!             duration_seconds: 20,
//!         },
//!         at,
//!     )
//!     .expect("quest is active");
//! assert!(applied.unlocked.iter().any(|b| b == "badge_first_quest"));
//! assert_eq!(ledger.stats().xp, 50);
//! ```
//!
//! Runtime usage with the SQLite snapshot store:
//! ```no_run
//! use async_trait::async_trait;
//! use questlog::{
//!     core::ledger::QuestLedger,
//!     persist::{SnapshotStore, sqlite::SqliteSnapshotStore},
//!     quest::{Proof, Quest},
//!     runtime::handle::{Collaborators, RuntimeConfig, spawn_questlog},
//!     sources::{CollaboratorError, QuestSource, Verdict, VerificationOracle},
//!     types::Language,
//! };
//!
//! struct CannedSource;
//!
//! #[async_trait]
//! impl QuestSource for CannedSource {
//!     async fn generate(&self, _language: Language) -> Result<Vec<Quest>, CollaboratorError> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! struct LenientOracle;
//!
//! #[async_trait]
//! impl VerificationOracle for LenientOracle {
//!     async fn verify(
//!         &self,
//!         _quest: &Quest,
//!         _proof: &Proof,
//!         _language: Language,
//!     ) -> Result<Verdict, CollaboratorError> {
//!         Ok(Verdict::passed("Well done."))
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteSnapshotStore::open("questlog.db").expect("open sqlite");
//! let ledger = QuestLedger::from_snapshot(store.load_or_default());
//! let handle = spawn_questlog(
//!     ledger,
//!     Collaborators::new(Box::new(CannedSource), Box::new(LenientOracle))
//!         .with_store(Box::new(store)),
//!     RuntimeConfig::default(),
//! );
//! handle.login("ada").await.expect("login");
//! let _count = handle.refresh_quests(false).await.expect("refresh");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Badge identifiers and unlock rule table.
pub mod badges;
/// Injectable clock and transition moments.
pub mod clock;
/// Progress ledger reducer and snapshot types.
pub mod core;
/// Persistence abstraction and SQLite implementation.
pub mod persist;
/// Quest descriptors, proofs, and completion records.
pub mod quest;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Collaborator traits and verdict helpers.
pub mod sources;
/// Progress counters and leveling arithmetic.
pub mod stats;
/// Shared primitive types and enums.
pub mod types;
