//! Notes, pitch classes, and ordered note sets.
//!
//! A [`NoteSet`] holds raw MIDI note numbers in strictly ascending order and
//! reduces them to a 12-bit pitch-class mask for chord lookup. Spelling
//! helpers render pitch classes and full note names with an explicit
//! sharp/flat preference.

/// A MIDI note number (0–127). Octave = note / 12 − 1, so middle C (C4) = 60.
pub type Note = u8;

/// Number of pitch classes in the chromatic scale.
pub(crate) const SEMITONES: u8 = 12;

/// Natural note name for each pitch class; empty for the five altered classes.
const NATURAL_NAMES: [&str; SEMITONES as usize] =
    ["C", "", "D", "", "E", "F", "", "G", "", "A", "", "B"];

/// Spelling preference for the five altered pitch classes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Accidental {
    /// Spell upward from the natural below (C♯, D♯, F♯, G♯, A♯).
    Sharp,
    /// Spell downward from the natural above (D♭, E♭, G♭, A♭, B♭).
    Flat,
}

/// Spell a pitch class (0–11), e.g. `pitch_class_name(1, Accidental::Flat)` is `"D♭"`.
pub fn pitch_class_name(pitch_class: u8, accidental: Accidental) -> String {
    let pc = pitch_class % SEMITONES;
    let natural = NATURAL_NAMES[pc as usize];
    if !natural.is_empty() {
        return natural.to_string();
    }
    match accidental {
        Accidental::Sharp => {
            format!("{}♯", NATURAL_NAMES[((pc + SEMITONES - 1) % SEMITONES) as usize])
        }
        Accidental::Flat => format!("{}♭", NATURAL_NAMES[((pc + 1) % SEMITONES) as usize]),
    }
}

/// Spell a full note name with its octave, e.g. `note_name(60, Accidental::Sharp)` is `"C4"`.
pub fn note_name(note: Note, accidental: Accidental) -> String {
    let octave = (note / SEMITONES) as i8 - 1;
    let mut name = pitch_class_name(note % SEMITONES, accidental);
    if octave >= 0 {
        name.push_str(&octave.to_string());
    }
    name
}

/// Whether a note falls on a black key of the piano keyboard.
pub fn is_black_key(note: Note) -> bool {
    matches!(note % SEMITONES, 1 | 3 | 6 | 8 | 10)
}

/// An ordered, duplicate-free set of raw note numbers.
///
/// Notes are kept strictly ascending, so membership is a binary search and
/// [`NoteSet::encode`] is deterministic regardless of insertion order.
/// Raw note numbers stay distinct across octaves (for display and the
/// bottom-note tie-break); only [`NoteSet::encode`] folds them to pitch
/// classes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteSet {
    notes: Vec<Note>,
}

impl NoteSet {
    /// Create an empty set.
    pub fn new() -> Self {
        NoteSet { notes: Vec::new() }
    }

    /// Insert a note. Returns `false` if it was already present.
    pub fn add(&mut self, note: Note) -> bool {
        match self.notes.binary_search(&note) {
            Ok(_) => false,
            Err(i) => {
                self.notes.insert(i, note);
                true
            }
        }
    }

    /// Remove a note. Returns `false` if it was not present.
    pub fn remove(&mut self, note: Note) -> bool {
        match self.notes.binary_search(&note) {
            Ok(i) => {
                self.notes.remove(i);
                true
            }
            Err(_) => false,
        }
    }

    /// Remove every note.
    pub fn clear(&mut self) {
        self.notes.clear();
    }

    /// Whether `note` is present.
    pub fn has(&self, note: Note) -> bool {
        self.notes.binary_search(&note).is_ok()
    }

    /// Number of distinct notes held.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the set holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// The lowest note, or `None` when empty.
    pub fn bottom_note(&self) -> Option<Note> {
        self.notes.first().copied()
    }

    /// The highest note, or `None` when empty.
    pub fn top_note(&self) -> Option<Note> {
        self.notes.last().copied()
    }

    /// Iterate the notes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Note> + '_ {
        self.notes.iter().copied()
    }

    /// Fold the set into a 12-bit pitch-class mask: bit `p` is set iff some
    /// note with pitch class `p` is present. Octave duplicates collapse, so
    /// `{60, 72}` encodes the same as `{60}`.
    pub fn encode(&self) -> u16 {
        self.notes
            .iter()
            .fold(0u16, |mask, &note| mask | 1 << (note % SEMITONES))
    }
}

impl FromIterator<Note> for NoteSet {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        let mut set = NoteSet::new();
        for note in iter {
            set.add(note);
        }
        set
    }
}

impl<'a> IntoIterator for &'a NoteSet {
    type Item = Note;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, Note>>;

    fn into_iter(self) -> Self::IntoIter {
        self.notes.iter().copied()
    }
}
