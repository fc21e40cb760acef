//! The progress ledger and its snapshot types.

/// Deterministic reducer over completion, failure, and session events.
pub mod ledger;
