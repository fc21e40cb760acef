//! Shared identifier aliases and quest vocabulary enums.

use serde::{Deserialize, Serialize};

/// Opaque quest identifier assigned by the quest source.
pub type QuestId = String;
/// Monotonic ledger revision, incremented once per applied transition.
pub type Revision = u64;

/// Difficulty bucket assigned by the quest source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    /// Low effort, low reward.
    Easy,
    /// Moderate effort.
    Medium,
    /// High effort.
    Hard,
    /// Joke quest.
    Meme,
    /// Deliberately absurd.
    Impossible,
}

/// Required proof type for a quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestType {
    /// Free-text answer.
    Text,
    /// Camera photo.
    Image,
    /// Device geolocation fix.
    Location,
    /// Multiple-choice quiz, judged locally.
    Quiz,
    /// Reasoning puzzle answered as text.
    Logic,
    /// Image found on the internet.
    OnlineImage,
}

/// Feedback and quest language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Serbian.
    Sr,
}

/// Presentation theme, persisted with the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Dark theme.
    Dark,
    /// Light theme.
    Light,
}
