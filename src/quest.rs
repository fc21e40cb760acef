//! Quest descriptors, proof payloads, and completion records.

use serde::{Deserialize, Serialize};

use crate::types::{Difficulty, QuestId, QuestType};

/// Geographic hint attached to location quests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoHint {
    /// Target latitude in degrees.
    pub lat: f64,
    /// Target longitude in degrees.
    pub lng: f64,
    /// Acceptance radius in meters.
    pub radius: f64,
    /// Human-readable place name.
    pub name: String,
}

/// Immutable challenge descriptor produced by the quest source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    /// Opaque unique id.
    pub id: QuestId,
    /// Short display title.
    pub title: String,
    /// Flavor description.
    pub description: String,
    /// Difficulty bucket.
    pub difficulty: Difficulty,
    /// Required proof type.
    #[serde(rename = "type")]
    pub kind: QuestType,
    /// XP awarded on success.
    pub points: u32,
    /// What the user must actually do.
    pub instructions: String,
    /// Creation timestamp in milliseconds since epoch.
    #[serde(default)]
    pub created_at: u64,
    /// Quiz answer choices, ordered; quiz quests only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_options: Option<Vec<String>>,
    /// Correct quiz choice; a quiz without one accepts any choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    /// Location hint; location quests only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoHint>,
}

/// User-supplied evidence submitted for judgement.
#[derive(Debug, Clone, PartialEq)]
pub enum Proof {
    /// Free-text answer.
    Text(String),
    /// Opaque encoded image blob (data URL or raw base64).
    Image(String),
    /// Device geolocation fix.
    Coordinates {
        /// Latitude in degrees.
        lat: f64,
        /// Longitude in degrees.
        lng: f64,
    },
    /// Selected quiz option.
    QuizChoice(String),
}

impl Proof {
    /// Encodes the payload into the wire/storage form.
    ///
    /// Coordinates encode as `"<lat>, <lng>"`; everything else passes
    /// through unchanged.
    pub fn encode(&self) -> String {
        match self {
            Proof::Text(s) | Proof::Image(s) | Proof::QuizChoice(s) => s.clone(),
            Proof::Coordinates { lat, lng } => format!("{lat}, {lng}"),
        }
    }
}

/// Record of one successful quest resolution.
///
/// The quest descriptor is frozen by value at completion time; later edits to
/// a quest definition never change a past completion. Only [`saved`] is
/// mutable after creation.
///
/// [`saved`]: QuestCompletion::saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestCompletion {
    /// Id of the originating quest.
    pub quest_id: QuestId,
    /// Frozen copy of the quest as completed.
    pub quest: Quest,
    /// Completion timestamp in milliseconds since epoch.
    pub timestamp: u64,
    /// Elapsed solve time in seconds.
    pub duration_seconds: u64,
    /// Encoded proof payload as submitted.
    pub proof: String,
    /// Oracle feedback text.
    pub feedback: String,
    /// User-toggleable bookmark; does not affect stats.
    pub saved: bool,
}
