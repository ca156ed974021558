//! Outcomes of a duplicate-submission check.

/// Result of [`super::gate::IdempotencyGate::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Not seen before, not in flight: safe to validate and track.
    Accepted,
    /// Already in the in-flight set; a racing submission is ahead of this one.
    Pending,
    /// Already committed to the feed message repository.
    AlreadyExists,
    /// The committed-state lookup failed; fail closed rather than risk a duplicate.
    Rejected,
}
