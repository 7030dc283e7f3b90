//! Practice-session state machine.
//!
//! Drives the challenge lifecycle: a live target chord, a queued look-ahead
//! target, continuous match checks against the held notes, an advisory
//! timeout, and advancement once a correct chord is released.
//!
//! Time is caller-supplied logical milliseconds, so the machine is
//! deterministic under test and agnostic of any particular clock or timer
//! facility. Stale timers are harmless: [`Session::tick`] re-checks state,
//! and [`Session::generation`] lets externally scheduled callbacks detect
//! that their target was superseded.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::catalog::{ChordCatalog, ChordDefinition};
use crate::matcher::ChordMatcher;
use crate::note::{Accidental, NoteSet};
use crate::stats::AttemptSink;

/// Elapsed milliseconds after which a live target shows as timed out.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Errors raised while constructing a [`Session`].
#[derive(Debug, Error)]
pub enum SessionError {
    /// The catalog holds no chord definitions to draw targets from.
    #[error("cannot start a session over an empty chord catalog")]
    EmptyCatalog,
}

/// A chord drawn as a challenge, with its presentation spelling and the
/// logical time it went live.
///
/// While queued as the look-ahead target the start time is `None`; it is
/// stamped the moment the previous target is matched, so the countdown on
/// the next chord begins immediately rather than upon key release.
#[derive(Debug, Clone, PartialEq)]
pub struct ChallengeTarget {
    chord: ChordDefinition,
    accidental: Accidental,
    started_at_ms: Option<u64>,
}

impl ChallengeTarget {
    /// A not-yet-started target for `chord`, spelled with `accidental`.
    pub fn new(chord: ChordDefinition, accidental: Accidental) -> Self {
        ChallengeTarget {
            chord,
            accidental,
            started_at_ms: None,
        }
    }

    /// The same target with its start stamped at `now_ms`.
    pub fn started_at(mut self, now_ms: u64) -> Self {
        self.started_at_ms = Some(now_ms);
        self
    }

    /// The chord to play.
    pub fn chord(&self) -> &ChordDefinition {
        &self.chord
    }

    /// Spelling preference drawn for this target.
    pub fn accidental(&self) -> Accidental {
        self.accidental
    }

    /// Logical time this target went live, or `None` while queued.
    pub fn started_at_ms(&self) -> Option<u64> {
        self.started_at_ms
    }

    /// Chord symbol spelled with this target's accidental, e.g. `"E♭m"`.
    pub fn display_name(&self) -> String {
        self.chord.display_name(self.accidental)
    }
}

/// Builder for a [`Session`].
pub struct SessionBuilder {
    timeout_ms: u64,
    seed: Option<u64>,
}

impl SessionBuilder {
    /// Start with the default timeout (5000 ms) and an entropy-seeded RNG.
    pub fn new() -> Self {
        SessionBuilder {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            seed: None,
        }
    }

    /// Set the advisory timeout in milliseconds.
    pub fn timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    /// Seed the target-selection RNG for reproducible draws.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw the first two targets and go live at `now_ms`.
    pub fn build<'a>(
        self,
        catalog: &'a ChordCatalog,
        now_ms: u64,
    ) -> Result<Session<'a>, SessionError> {
        if catalog.is_empty() {
            return Err(SessionError::EmptyCatalog);
        }
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let target = Session::draw(catalog, &mut rng).started_at(now_ms);
        let queued = Session::draw(catalog, &mut rng);
        debug!(
            "session start: target {} (next {})",
            target.display_name(),
            queued.display_name()
        );
        Ok(Session {
            catalog,
            rng,
            timeout_ms: self.timeout_ms,
            target,
            queued,
            correct: false,
            failed: false,
            timed_out: false,
            generation: 0,
        })
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// The challenge state machine.
///
/// Callers feed it the currently held notes on every change
/// ([`Session::observe`]) and logical time periodically ([`Session::tick`]);
/// all state mutation flows through those two entry points. The exposed
/// state — targets plus the `correct`/`failed`/`timed_out` flags — is
/// read-only to the presentation layer.
#[derive(Debug)]
pub struct Session<'a> {
    catalog: &'a ChordCatalog,
    rng: StdRng,
    timeout_ms: u64,
    target: ChallengeTarget,
    queued: ChallengeTarget,
    correct: bool,
    failed: bool,
    timed_out: bool,
    generation: u64,
}

impl<'a> Session<'a> {
    /// Start customizing with a builder.
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    /// Uniform draw over the catalog's definitions, with an independently
    /// drawn accidental. Presentation-only randomness; matching never
    /// depends on it.
    fn draw(catalog: &ChordCatalog, rng: &mut StdRng) -> ChallengeTarget {
        let definitions = catalog.definitions();
        let chord = definitions[rng.gen_range(0..definitions.len())].clone();
        let accidental = if rng.gen::<bool>() {
            Accidental::Sharp
        } else {
            Accidental::Flat
        };
        ChallengeTarget::new(chord, accidental)
    }

    /// Feed the currently held notes. Call on every note-on/note-off.
    ///
    /// While the target is unmatched, a held set satisfying it moves the
    /// session to the satisfied state, records the attempt with `sink`, and
    /// stamps the queued target's start time. Once satisfied, the first
    /// observation with *all keys released* advances: the queued target goes
    /// live, a fresh look-ahead is drawn, and the flags reset. Requiring the
    /// release debounces the same physical keypress from re-matching.
    pub fn observe(&mut self, held: &NoteSet, now_ms: u64, sink: &mut dyn AttemptSink) {
        if self.correct {
            if held.is_empty() {
                self.advance();
            }
            return;
        }

        let matcher = ChordMatcher::new(self.catalog);
        if matcher.matches(&self.target.chord, held) {
            self.correct = true;
            debug!("matched {} at {now_ms}ms", self.target.display_name());
            sink.record_attempt(&self.target, now_ms);
            // The look-ahead's countdown starts now, not when it goes live.
            self.queued.started_at_ms = Some(now_ms);
        }
    }

    /// Periodic timeout check. Cadence is the caller's concern; once the
    /// live target's elapsed time exceeds the timeout it is flagged, but it
    /// stays matchable — the timeout is advisory, not terminal.
    pub fn tick(&mut self, now_ms: u64) {
        if self.correct || self.timed_out {
            return;
        }
        if let Some(started) = self.target.started_at_ms {
            if now_ms.saturating_sub(started) > self.timeout_ms {
                self.timed_out = true;
                debug!("{} timed out at {now_ms}ms", self.target.display_name());
            }
        }
    }

    fn advance(&mut self) {
        let next = Self::draw(self.catalog, &mut self.rng);
        self.target = std::mem::replace(&mut self.queued, next);
        self.correct = false;
        self.failed = false;
        self.timed_out = false;
        self.generation += 1;
        debug!(
            "advanced to {} (next {}, generation {})",
            self.target.display_name(),
            self.queued.display_name(),
            self.generation
        );
    }

    /// The live target.
    pub fn target(&self) -> &ChallengeTarget {
        &self.target
    }

    /// The queued look-ahead target.
    pub fn queued_target(&self) -> &ChallengeTarget {
        &self.queued
    }

    /// Whether the live target has been matched and awaits key release.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Reserved for a future mismatch-detection policy; no internal
    /// transition sets it today.
    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Whether the live target exceeded the timeout without a match.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Configured advisory timeout in milliseconds.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Bumped on every advance. Externally scheduled timer callbacks should
    /// capture it and bail out when it no longer matches, instead of firing
    /// against a superseded target.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
