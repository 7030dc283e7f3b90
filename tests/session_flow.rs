//! Integration tests for the practice-session state machine and statistics.

use chord_trainer::{
    Accidental, AttemptSink, ChallengeTarget, ChordCatalog, ChordType, NoteSet, Session,
    SessionError, SessionStats,
};

/// Helper to build a note set from raw MIDI note numbers.
fn held(notes: &[u8]) -> NoteSet {
    notes.iter().copied().collect()
}

/// The live target's canonical voicing, playable as-is (pitch classes are
/// valid low-octave note numbers).
fn canonical_voicing(session: &Session<'_>) -> NoteSet {
    session.target().chord().pitch_classes.clone()
}

fn default_catalog() -> ChordCatalog {
    ChordCatalog::builder().build().unwrap()
}

#[test]
fn session_starts_live_with_a_queued_lookahead() {
    let catalog = default_catalog();
    let session = Session::builder().seed(7).build(&catalog, 100).unwrap();

    assert_eq!(session.target().started_at_ms(), Some(100));
    assert_eq!(session.queued_target().started_at_ms(), None);
    assert!(!session.is_correct());
    assert!(!session.is_failed());
    assert!(!session.is_timed_out());
    assert_eq!(session.generation(), 0);
}

#[test]
fn same_seed_draws_the_same_targets() {
    let catalog = default_catalog();
    let a = Session::builder().seed(42).build(&catalog, 0).unwrap();
    let b = Session::builder().seed(42).build(&catalog, 0).unwrap();

    assert_eq!(a.target(), b.target());
    assert_eq!(a.queued_target(), b.queued_target());
}

#[test]
fn empty_catalog_is_a_session_error() {
    let catalog = ChordCatalog::builder().chord_types(Vec::new()).build().unwrap();
    let err = Session::builder().build(&catalog, 0).unwrap_err();
    assert!(matches!(err, SessionError::EmptyCatalog));
}

#[test]
fn non_matching_notes_change_nothing() {
    let catalog = default_catalog();
    let mut session = Session::builder().seed(1).build(&catalog, 0).unwrap();
    let mut stats = SessionStats::new();

    // A bare semitone is no chord in the default catalog.
    session.observe(&held(&[60, 61]), 500, &mut stats);
    assert!(!session.is_correct());
    assert!(!session.is_failed());
    assert!(stats.is_empty());
}

#[test]
fn timeout_is_advisory_and_a_late_match_still_succeeds() {
    let catalog = default_catalog();
    let mut session = Session::builder().seed(3).build(&catalog, 0).unwrap();
    let mut stats = SessionStats::new();
    let name = session.target().display_name();

    session.tick(4999);
    assert!(!session.is_timed_out());
    session.tick(5001);
    assert!(session.is_timed_out());
    assert!(!session.is_correct());

    // The target stays matchable after timing out.
    let voicing = canonical_voicing(&session);
    session.observe(&voicing, 6000, &mut stats);
    assert!(session.is_correct());
    assert!(session.is_timed_out()); // cleared only on advance

    // 6000ms beats the 10s statistics threshold, so it records as a success.
    let stat = stats.get(&name).unwrap();
    assert_eq!(stat.attempts, 1);
    assert_eq!(stat.successes, 1);
    assert_eq!(stat.average_response_ms, 6000.0);
}

#[test]
fn tick_after_a_match_does_not_time_out() {
    let catalog = default_catalog();
    let mut session = Session::builder().seed(5).build(&catalog, 0).unwrap();

    let voicing = canonical_voicing(&session);
    session.observe(&voicing, 1000, &mut ());
    assert!(session.is_correct());

    session.tick(99_999);
    assert!(!session.is_timed_out());
}

#[test]
fn advance_waits_for_all_keys_released() {
    let catalog = default_catalog();
    let mut session = Session::builder().seed(11).build(&catalog, 0).unwrap();
    let mut stats = SessionStats::new();

    let voicing = canonical_voicing(&session);
    let queued_before = session.queued_target().clone();

    session.observe(&voicing, 1000, &mut stats);
    assert!(session.is_correct());
    // The look-ahead's clock starts at match time, not at release.
    assert_eq!(session.queued_target().started_at_ms(), Some(1000));

    // Keys still down: the same physical press must not re-trigger.
    session.observe(&voicing, 1100, &mut stats);
    assert_eq!(session.generation(), 0);
    assert_eq!(stats.get(&session.target().display_name()).unwrap().attempts, 1);

    // Full release advances: queued goes live with its stamped start.
    session.observe(&held(&[]), 1200, &mut stats);
    assert_eq!(session.generation(), 1);
    assert_eq!(session.target().chord(), queued_before.chord());
    assert_eq!(session.target().accidental(), queued_before.accidental());
    assert_eq!(session.target().started_at_ms(), Some(1000));
    assert_eq!(session.queued_target().started_at_ms(), None);
    assert!(!session.is_correct());
    assert!(!session.is_failed());
    assert!(!session.is_timed_out());
}

#[test]
fn failed_flag_stays_clear_through_a_full_cycle() {
    let catalog = default_catalog();
    let mut session = Session::builder().seed(13).build(&catalog, 0).unwrap();

    session.observe(&held(&[60, 61]), 100, &mut ());
    session.tick(6000);
    let voicing = canonical_voicing(&session);
    session.observe(&voicing, 7000, &mut ());
    session.observe(&held(&[]), 7500, &mut ());

    assert!(!session.is_failed());
}

#[test]
fn running_mean_over_successes_is_exact() {
    let catalog = default_catalog();
    let c_major = catalog
        .definitions()
        .iter()
        .find(|def| def.root == 0 && def.chord_type == ChordType::Maj)
        .unwrap();
    let mut stats = SessionStats::new();

    let first = ChallengeTarget::new(c_major.clone(), Accidental::Sharp).started_at(0);
    stats.record_attempt(&first, 1000);
    let second = ChallengeTarget::new(c_major.clone(), Accidental::Sharp).started_at(5000);
    stats.record_attempt(&second, 8000);

    let stat = stats.get("C").unwrap();
    assert_eq!(stat.attempts, 2);
    assert_eq!(stat.successes, 2);
    assert_eq!(stat.average_response_ms, 2000.0);
}

#[test]
fn slow_attempts_count_but_do_not_succeed() {
    let catalog = default_catalog();
    let c_major = catalog
        .definitions()
        .iter()
        .find(|def| def.root == 0 && def.chord_type == ChordType::Maj)
        .unwrap();
    let mut stats = SessionStats::new();

    let slow = ChallengeTarget::new(c_major.clone(), Accidental::Flat).started_at(0);
    stats.record_attempt(&slow, 10_001);
    let stat = stats.get("C").unwrap();
    assert_eq!(stat.attempts, 1);
    assert_eq!(stat.successes, 0);
    assert_eq!(stat.average_response_ms, 0.0);

    // Exactly at the threshold still counts as a success.
    let on_time = ChallengeTarget::new(c_major.clone(), Accidental::Flat).started_at(0);
    stats.record_attempt(&on_time, 10_000);
    let stat = stats.get("C").unwrap();
    assert_eq!(stat.attempts, 2);
    assert_eq!(stat.successes, 1);
    assert_eq!(stat.average_response_ms, 10_000.0);
}

#[test]
fn stats_key_on_the_displayed_spelling() {
    let catalog = ChordCatalog::builder().build().unwrap();
    let cs_major = catalog
        .definitions()
        .iter()
        .find(|def| def.root == 1 && def.chord_type == ChordType::Maj)
        .unwrap();
    let mut stats = SessionStats::new();

    let sharp = ChallengeTarget::new(cs_major.clone(), Accidental::Sharp).started_at(0);
    stats.record_attempt(&sharp, 500);
    let flat = ChallengeTarget::new(cs_major.clone(), Accidental::Flat).started_at(0);
    stats.record_attempt(&flat, 700);

    assert_eq!(stats.len(), 2);
    assert_eq!(stats.get("C♯").unwrap().attempts, 1);
    assert_eq!(stats.get("D♭").unwrap().attempts, 1);
}
