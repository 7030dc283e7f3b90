//! Per-chord attempt statistics.

use std::collections::HashMap;

use log::trace;

use crate::session::ChallengeTarget;

/// Response times at or under this count as a success for statistics.
/// Deliberately wider than the session's visual timeout: a slow-but-correct
/// answer still counts.
pub const DEFAULT_SUCCESS_THRESHOLD_MS: u64 = 10_000;

/// Receives completed attempts from a [`crate::Session`].
///
/// Fire-and-forget: implementations must return quickly and never block the
/// caller.
pub trait AttemptSink {
    /// Record that `target` was matched at logical time `now_ms`.
    fn record_attempt(&mut self, target: &ChallengeTarget, now_ms: u64);
}

/// Discards every attempt; for callers that don't track statistics.
impl AttemptSink for () {
    fn record_attempt(&mut self, _target: &ChallengeTarget, _now_ms: u64) {}
}

/// Accumulated performance for one chord display string.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordStat {
    /// Completed attempts, successful or not.
    pub attempts: u32,
    /// Attempts answered within the success threshold.
    pub successes: u32,
    /// Running mean response time over successes only, in milliseconds.
    pub average_response_ms: f64,
}

/// In-memory per-chord statistics for one practice session.
///
/// Stats are keyed by the target's display string (so `"C♯"` and `"D♭"`
/// track separately, matching what the player was shown), created lazily on
/// first attempt, and never deleted within a session.
#[derive(Debug)]
pub struct SessionStats {
    success_threshold_ms: u64,
    stats: HashMap<String, ChordStat>,
}

impl SessionStats {
    /// Empty stats with the default 10 s success threshold.
    pub fn new() -> Self {
        Self::with_success_threshold(DEFAULT_SUCCESS_THRESHOLD_MS)
    }

    /// Empty stats with a custom success threshold.
    pub fn with_success_threshold(threshold_ms: u64) -> Self {
        SessionStats {
            success_threshold_ms: threshold_ms,
            stats: HashMap::new(),
        }
    }

    /// Stats for one chord display string, if any attempts were recorded.
    pub fn get(&self, chord_name: &str) -> Option<&ChordStat> {
        self.stats.get(chord_name)
    }

    /// Iterate `(chord name, stats)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ChordStat)> {
        self.stats.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    /// Number of distinct chords attempted so far.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// Whether no attempts have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

impl AttemptSink for SessionStats {
    fn record_attempt(&mut self, target: &ChallengeTarget, now_ms: u64) {
        let name = target.display_name();
        let response_ms = now_ms.saturating_sub(target.started_at_ms().unwrap_or(now_ms));
        let success = response_ms <= self.success_threshold_ms;
        trace!("attempt {name}: {response_ms}ms, success={success}");

        let stat = self.stats.entry(name).or_insert(ChordStat {
            attempts: 0,
            successes: 0,
            average_response_ms: 0.0,
        });
        stat.attempts += 1;
        if success {
            let total = stat.average_response_ms * stat.successes as f64;
            stat.successes += 1;
            stat.average_response_ms = (total + response_ms as f64) / stat.successes as f64;
        }
    }
}
