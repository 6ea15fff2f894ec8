use thiserror::Error;

use crate::roster::Side;

/// Failures the feature pipeline can surface per match. Malformed-input
/// variants abort the affected match only; batch callers match on them to
/// skip and log the offending record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    #[error("{side} side has {found} goalkeeper slots, expected exactly 1")]
    GoalkeeperCount { side: Side, found: usize },
    #[error("{side} slot {slot} has no player id")]
    MissingPlayerId { side: Side, slot: usize },
    #[error("team {0} queried before load")]
    TeamNotLoaded(i64),
    #[error("player {0} queried before resolve")]
    PlayerNotResolved(i64),
    #[error("positive cutoff {0} outside [0, 1]")]
    PositiveCutoff(f64),
    #[error("negative cutoff {0} outside [-1, 0]")]
    NegativeCutoff(f64),
}
