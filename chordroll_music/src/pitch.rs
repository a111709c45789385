// Pitch-class table: the fixed index space for all pitch arithmetic.
//
// The twelve semitone names of one octave, C through B, in sharp spelling.
// Every other module works in terms of `PitchClass` indices 0-11; names only
// appear at the edges (chord labels coming in from the detector, row labels
// going out to a renderer).
//
// Lookups are strict: `index_of` matches the exact, case-sensitive name, so
// flat spellings ("Db") and lowercase names ("c") are "not found". That is a
// normal outcome, not an error: callers treat it as an unresolved root.
//
// `name_at` and `PitchClass::new` accept any integer and normalise it with a
// Euclidean remainder, so -1 is B and 12 is C.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pitch classes in an octave.
pub const NUM_PITCH_CLASSES: usize = 12;

/// Pitch class names indexed by pitch class 0-11.
pub const PITCH_CLASS_NAMES: [&str; NUM_PITCH_CLASSES] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// One of the twelve semitone categories within an octave (0 = C, 11 = B).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PitchClass(u8);

impl PitchClass {
    pub const C: PitchClass = PitchClass(0);
    pub const B: PitchClass = PitchClass(11);

    /// All twelve pitch classes in ascending order.
    pub const ALL: [PitchClass; NUM_PITCH_CLASSES] = [
        PitchClass(0),
        PitchClass(1),
        PitchClass(2),
        PitchClass(3),
        PitchClass(4),
        PitchClass(5),
        PitchClass(6),
        PitchClass(7),
        PitchClass(8),
        PitchClass(9),
        PitchClass(10),
        PitchClass(11),
    ];

    /// Build a pitch class from any integer, wrapping into 0-11.
    pub fn new(index: i64) -> Self {
        PitchClass(index.rem_euclid(NUM_PITCH_CLASSES as i64) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn name(self) -> &'static str {
        PITCH_CLASS_NAMES[self.index()]
    }

    /// Move up (or down, for negative values) by a number of semitones.
    pub fn transpose(self, semitones: i64) -> Self {
        PitchClass::new(self.0 as i64 + semitones.rem_euclid(NUM_PITCH_CLASSES as i64))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up a pitch class by its exact name. Returns `None` for anything not
/// in `PITCH_CLASS_NAMES`.
pub fn index_of(name: &str) -> Option<PitchClass> {
    PITCH_CLASS_NAMES
        .iter()
        .position(|&n| n == name)
        .map(|i| PitchClass(i as u8))
}

/// Name of the pitch class at `index mod 12`.
pub fn name_at(index: i64) -> &'static str {
    PitchClass::new(index).name()
}
