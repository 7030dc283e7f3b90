//! Chord catalog
//!
//! Enumerates every (chord type × root) combination from a configurable
//! interval table and indexes each voicing's pitch-class mask for O(1)
//! reverse lookup. Built once, read-only afterwards.

use std::collections::HashMap;
use std::fmt::Display;

use thiserror::Error;

use crate::note::{pitch_class_name, Accidental, NoteSet, SEMITONES};

/// Chord quality tags the catalog can be configured with.
///
/// The default interval table enables only [`ChordType::Maj`] and
/// [`ChordType::Min`]; the rest are available for custom tables via
/// [`ChordCatalogBuilder::chord_type`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ChordType {
    /// Major triad (C-E-G)
    Maj,
    /// Minor triad (C-E♭-G)
    Min,
    /// Diminished triad (C-E♭-G♭)
    Dim,
    /// Augmented triad (C-E-G♯)
    Aug,
    /// Suspended fourth (C-F-G)
    Sus4,
    /// Major seventh (C-E-G-B)
    Maj7,
    /// Minor seventh (C-E♭-G-B♭)
    Min7,
    /// Dominant seventh (C-E-G-B♭)
    Dom7,
    /// Half-diminished seventh (C-E♭-G♭-B♭)
    Min7b5,
    /// Diminished seventh (C-E♭-G♭-A)
    Dim7,
    /// Minor-major seventh (C-E♭-G-B)
    MinMaj7,
    /// Augmented seventh (C-E-G♯-B♭)
    Aug7,
    /// Dominant seventh suspended fourth (C-F-G-B♭)
    Dom7Sus4,
    /// Major sixth (C-E-G-A)
    Maj6,
    /// Minor sixth (C-E♭-G-A)
    Min6,
}

impl ChordType {
    /// Suffix appended to the root name in chord symbols; major is bare.
    pub fn symbol(self) -> &'static str {
        match self {
            ChordType::Maj => "",
            ChordType::Min => "m",
            ChordType::Dim => "°",
            ChordType::Aug => "+",
            ChordType::Sus4 => "sus4",
            ChordType::Maj7 => "maj7",
            ChordType::Min7 => "m7",
            ChordType::Dom7 => "7",
            ChordType::Min7b5 => "m7b5",
            ChordType::Dim7 => "dim7",
            ChordType::MinMaj7 => "mMaj7",
            ChordType::Aug7 => "aug7",
            ChordType::Dom7Sus4 => "7sus4",
            ChordType::Maj6 => "6",
            ChordType::Min6 => "m6",
        }
    }
}

impl Display for ChordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One acceptable rendition of a chord: an exact pitch-class mask plus a
/// label. The canonical voicing carries the empty label `""`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Voicing {
    /// 12-bit pitch-class mask this voicing matches exactly.
    pub mask: u16,
    /// `""` for canonical, `"omit5"`, `"omit1"`, or `"guide"` for alternates.
    pub label: &'static str,
}

/// A concrete chord: one root × one chord type, with every voicing mask that
/// counts as playing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordDefinition {
    /// Root pitch class (0–11).
    pub root: u8,
    /// Quality of the chord.
    pub chord_type: ChordType,
    /// Pitch classes of the canonical voicing, ascending.
    pub pitch_classes: NoteSet,
    /// Acceptable voicings; the canonical one is always first.
    pub voicings: Vec<Voicing>,
}

impl ChordDefinition {
    /// The canonical voicing's pitch-class mask.
    pub fn canonical_mask(&self) -> u16 {
        self.voicings[0].mask
    }

    /// Chord symbol with the root spelled per `accidental`, e.g. `"C♯m"`.
    pub fn display_name(&self, accidental: Accidental) -> String {
        format!(
            "{}{}",
            pitch_class_name(self.root, accidental),
            self.chord_type.symbol()
        )
    }
}

/// Errors raised while building a [`ChordCatalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An interval table entry contained a semitone offset outside 0–11.
    #[error("chord type `{chord_type:?}`: interval {interval} is out of range (must be < 12)")]
    IntervalOutOfRange {
        /// The chord type whose interval list is malformed.
        chord_type: ChordType,
        /// The offending semitone offset.
        interval: u8,
    },
}

/// Builder for a [`ChordCatalog`] with a custom interval table.
pub struct ChordCatalogBuilder {
    interval_table: Vec<(ChordType, Vec<u8>)>,
    alternate_voicings: bool,
}

impl ChordCatalogBuilder {
    /// Start from the default table: major `{0,4,7}` and minor `{0,3,7}`
    /// triads, canonical voicings only.
    pub fn new() -> Self {
        ChordCatalogBuilder {
            interval_table: vec![
                (ChordType::Maj, vec![0, 4, 7]),
                (ChordType::Min, vec![0, 3, 7]),
            ],
            alternate_voicings: false,
        }
    }

    /// Add a chord type with its semitone intervals from the root, or replace
    /// the intervals of a type already in the table.
    pub fn chord_type(mut self, chord_type: ChordType, intervals: &[u8]) -> Self {
        match self
            .interval_table
            .iter_mut()
            .find(|(tag, _)| *tag == chord_type)
        {
            Some((_, existing)) => *existing = intervals.to_vec(),
            None => self.interval_table.push((chord_type, intervals.to_vec())),
        }
        self
    }

    /// Replace the entire interval table.
    pub fn chord_types<I>(mut self, table: I) -> Self
    where
        I: IntoIterator<Item = (ChordType, Vec<u8>)>,
    {
        self.interval_table = table.into_iter().collect();
        self
    }

    /// Also register reduced voicings (omitted fifth, rootless, guide-tone)
    /// as valid matches where the interval shape permits. Off by default.
    pub fn alternate_voicings(mut self, enabled: bool) -> Self {
        self.alternate_voicings = enabled;
        self
    }

    /// Enumerate every (type × root) definition and build the reverse index.
    pub fn build(self) -> Result<ChordCatalog, CatalogError> {
        for (chord_type, intervals) in &self.interval_table {
            if let Some(&bad) = intervals.iter().find(|&&iv| iv >= SEMITONES) {
                return Err(CatalogError::IntervalOutOfRange {
                    chord_type: *chord_type,
                    interval: bad,
                });
            }
        }

        let mut definitions = Vec::with_capacity(self.interval_table.len() * SEMITONES as usize);
        for (chord_type, intervals) in &self.interval_table {
            for root in 0..SEMITONES {
                let pitch_classes: NoteSet = intervals
                    .iter()
                    .map(|&iv| (root + iv) % SEMITONES)
                    .collect();
                definitions.push(ChordDefinition {
                    root,
                    chord_type: *chord_type,
                    pitch_classes,
                    voicings: voicings_for(root, intervals, self.alternate_voicings),
                });
            }
        }

        // Register canonical voicings of every chord before any alternates,
        // so registration order under an ambiguous mask lists canonical
        // interpretations first.
        let max_voicings = definitions
            .iter()
            .map(|d| d.voicings.len())
            .max()
            .unwrap_or(0);
        let mut index: HashMap<u16, Vec<usize>> = HashMap::new();
        for slot in 0..max_voicings {
            for (id, def) in definitions.iter().enumerate() {
                if let Some(voicing) = def.voicings.get(slot) {
                    index.entry(voicing.mask).or_default().push(id);
                }
            }
        }

        Ok(ChordCatalog { definitions, index })
    }
}

impl Default for ChordCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Mask of `{(root + iv) mod 12 : iv ∈ intervals}`.
fn mask_of(root: u8, intervals: impl IntoIterator<Item = u8>) -> u16 {
    intervals
        .into_iter()
        .fold(0u16, |mask, iv| mask | 1 << ((root + iv) % SEMITONES))
}

fn voicings_for(root: u8, intervals: &[u8], alternates: bool) -> Vec<Voicing> {
    let mut voicings = vec![Voicing {
        mask: mask_of(root, intervals.iter().copied()),
        label: "",
    }];
    if !alternates {
        return voicings;
    }

    let has_fifth = intervals.get(2) == Some(&7);

    if has_fifth {
        let without_fifth = intervals
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 2)
            .map(|(_, &iv)| iv);
        voicings.push(Voicing {
            mask: mask_of(root, without_fifth),
            label: "omit5",
        });
    }

    if intervals.len() >= 3 {
        voicings.push(Voicing {
            mask: mask_of(root, intervals[1..].iter().copied()),
            label: "omit1",
        });
    }

    // Guide tones: drop both root and fifth, keeping the third and extensions.
    if intervals.len() >= 4 && has_fifth {
        let guide = intervals
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != 0 && i != 2)
            .map(|(_, &iv)| iv);
        voicings.push(Voicing {
            mask: mask_of(root, guide),
            label: "guide",
        });
    }

    voicings
}

/// Precomputed chord definitions plus a reverse index from pitch-class mask
/// to every definition with a voicing matching that mask.
#[derive(Debug)]
pub struct ChordCatalog {
    definitions: Vec<ChordDefinition>,
    index: HashMap<u16, Vec<usize>>,
}

impl ChordCatalog {
    /// Start customizing with a builder.
    pub fn builder() -> ChordCatalogBuilder {
        ChordCatalogBuilder::new()
    }

    /// Every definition, in registration order (interval-table order × root).
    pub fn definitions(&self) -> &[ChordDefinition] {
        &self.definitions
    }

    /// Number of distinct chord definitions.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Whether the catalog holds no definitions.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Every definition with a voicing matching `mask` exactly, in
    /// registration order. Empty for unregistered masks; a mask shared by
    /// several chords (or an alternate voicing of another) yields them all.
    pub fn lookup(&self, mask: u16) -> impl Iterator<Item = &ChordDefinition> + '_ {
        self.index
            .get(&mask)
            .into_iter()
            .flatten()
            .map(move |&id| &self.definitions[id])
    }
}
