//! Collaborator seams: quest generation and proof verification.
//!
//! The ledger never talks to a model or a device itself; it consumes the
//! output shapes defined here. Implementations live with the embedding
//! application.

use async_trait::async_trait;

use crate::quest::{Proof, Quest};
use crate::types::Language;

/// Feedback text used when a verification call errors out entirely.
pub const GENERIC_VERIFY_FAILURE: &str = "Judging failed. Try again!";

/// Pass/fail judgement plus free-text feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the proof passed.
    pub success: bool,
    /// User-facing feedback text.
    pub feedback: String,
}

impl Verdict {
    /// Failed verdict carrying `feedback`.
    pub fn failed(feedback: impl Into<String>) -> Self {
        Self {
            success: false,
            feedback: feedback.into(),
        }
    }

    /// Passing verdict carrying `feedback`.
    pub fn passed(feedback: impl Into<String>) -> Self {
        Self {
            success: true,
            feedback: feedback.into(),
        }
    }
}

/// Failure of an external collaborator call.
#[derive(Debug)]
pub enum CollaboratorError {
    /// Network or device transport failure.
    Transport(String),
    /// Response arrived but could not be decoded.
    Decode(String),
}

/// Produces a small batch of quest descriptors for a language.
///
/// An error yields no new quests; the runtime leaves the active set alone.
#[async_trait]
pub trait QuestSource: Send + Sync {
    /// Generates a fresh quest batch.
    async fn generate(&self, language: Language) -> Result<Vec<Quest>, CollaboratorError>;
}

/// Judges a proof against a quest.
///
/// An error is recovered as a failed [`Verdict`] with
/// [`GENERIC_VERIFY_FAILURE`] feedback; it never crashes the ledger.
#[async_trait]
pub trait VerificationOracle: Send + Sync {
    /// Returns the verdict for `proof` submitted against `quest`.
    async fn verify(
        &self,
        quest: &Quest,
        proof: &Proof,
        language: Language,
    ) -> Result<Verdict, CollaboratorError>;
}

/// Reasons the device layer may refuse a geolocation fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoDenial {
    /// User denied the location permission.
    PermissionDenied,
    /// Position could not be determined.
    PositionUnavailable,
    /// The fix timed out.
    Timeout,
}

impl GeoDenial {
    /// Maps the denial onto a failed verdict with a per-reason message.
    ///
    /// A denial always resolves to a failed verification; callers follow up
    /// with a failure record.
    pub fn verdict(&self) -> Verdict {
        let feedback = match self {
            GeoDenial::PermissionDenied => "Location denied! Enable GPS in settings.",
            GeoDenial::PositionUnavailable => "Location unavailable. Move outdoors!",
            GeoDenial::Timeout => "Location timeout. Satellite search failed.",
        };
        Verdict::failed(feedback)
    }
}

/// Judges a quiz choice locally, without consulting the oracle.
///
/// A quest without a `correct_answer` accepts any choice.
pub fn judge_quiz(quest: &Quest, choice: &str) -> Verdict {
    match quest.correct_answer.as_deref() {
        Some(answer) if answer != choice => Verdict::failed("Wrong answer!"),
        _ => Verdict::passed("Correct!"),
    }
}
