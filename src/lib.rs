//! # chord_trainer
//!
//! Core engine for a chord-recognition practice app: encode held notes as
//! pitch-class sets, look them up in a precomputed chord catalog, and drive
//! a timed challenge session with per-chord statistics.
//!
//! ## Example
//! ```rust
//! use chord_trainer::{ChordCatalog, NoteSet, Session, SessionStats};
//!
//! fn run() -> Result<(), Box<dyn std::error::Error>> {
//!     // 1) Build a catalog (major and minor triads by default)
//!     let catalog = ChordCatalog::builder().build()?;
//!
//!     // 2) Start a session against it
//!     let mut session = Session::builder().build(&catalog, 0)?;
//!     let mut stats = SessionStats::new();
//!     println!("play {}", session.target().display_name());
//!
//!     // 3) In your MIDI input loop: feed held notes on every change,
//!     //    and tick the clock periodically.
//!     let mut held = NoteSet::new();
//!     held.add(60); // C4
//!     held.add(64); // E4
//!     held.add(67); // G4
//!     session.observe(&held, 1200, &mut stats);
//!     session.tick(1200);
//!
//!     if session.is_correct() {
//!         println!("nailed {}!", session.target().display_name());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The crate has no clock, timer, or MIDI dependency of its own: callers
//! supply logical time in milliseconds and the currently held notes, which
//! keeps every state transition deterministic and testable.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rust_2018_idioms)]
#![deny(clippy::all)]

/// Notes, accidental spelling, and ordered note sets.
pub use note::{is_black_key, note_name, pitch_class_name, Accidental, Note, NoteSet};

/// Chord catalog construction and reverse mask lookup.
pub use catalog::{
    CatalogError, ChordCatalog, ChordCatalogBuilder, ChordDefinition, ChordType, Voicing,
};

/// Matching held notes against target chords.
pub use matcher::ChordMatcher;

/// Timed practice-session lifecycle.
pub use session::{
    ChallengeTarget, Session, SessionBuilder, SessionError, DEFAULT_TIMEOUT_MS,
};

/// Attempt recording and per-chord statistics.
pub use stats::{AttemptSink, ChordStat, SessionStats, DEFAULT_SUCCESS_THRESHOLD_MS};

/// Note and note-set primitives.
pub mod note;

/// Chord catalog module.
pub mod catalog;

/// Chord matching module.
pub mod matcher;

/// Session state machine module.
pub mod session;

/// Statistics module.
pub mod stats;
