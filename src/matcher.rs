//! Chord matching and identification over a [`ChordCatalog`].

use crate::catalog::{ChordCatalog, ChordDefinition};
use crate::note::{NoteSet, SEMITONES};

/// Fewer held notes than this never confirm a chord; an incidental single
/// key press (or silence) must not produce a false positive.
const MIN_HELD_NOTES: usize = 2;

/// Pure queries answering "do these held notes satisfy this chord?" and
/// "which chord is this?".
pub struct ChordMatcher<'a> {
    catalog: &'a ChordCatalog,
}

impl<'a> ChordMatcher<'a> {
    /// Borrow a catalog to match against.
    pub fn new(catalog: &'a ChordCatalog) -> Self {
        ChordMatcher { catalog }
    }

    /// Whether `held` satisfies `target`: at least two notes, and their
    /// pitch-class mask equals any of the target's voicing masks (canonical
    /// or alternate).
    pub fn matches(&self, target: &ChordDefinition, held: &NoteSet) -> bool {
        if held.len() < MIN_HELD_NOTES {
            return false;
        }
        let mask = held.encode();
        target.voicings.iter().any(|voicing| voicing.mask == mask)
    }

    /// The chord `held` represents, if any.
    ///
    /// When a mask is ambiguous the candidate whose root equals the pitch
    /// class of the lowest held note wins; with no such candidate the first
    /// in catalog-registration order is returned. That fallback order is
    /// deterministic but carries no musical preference beyond the root
    /// tie-break.
    pub fn identify(&self, held: &NoteSet) -> Option<&'a ChordDefinition> {
        if held.len() < MIN_HELD_NOTES {
            return None;
        }
        let candidates: Vec<&ChordDefinition> = self.catalog.lookup(held.encode()).collect();
        let first = *candidates.first()?;
        let bottom = held.bottom_note()? % SEMITONES;
        Some(
            candidates
                .iter()
                .find(|candidate| candidate.root == bottom)
                .copied()
                .unwrap_or(first),
        )
    }
}
