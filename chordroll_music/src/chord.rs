// Chord resolution: chord root name -> major triad.
//
// The detector reports a bare root label per chord event. Every label that
// names a pitch class is read as the root of a major triad (root, major
// third, perfect fifth); there is no notion of chord quality. Minor,
// diminished, seventh and other labels never match a pitch-class name and so
// come back unresolved, which the roll draws as a silent column.
//
// `resolve_triad` returns `Option<Triad>` rather than an empty set so the
// unresolved case stays visible at call sites.

use serde::{Deserialize, Serialize};

use crate::pitch::{PitchClass, index_of};

/// Semitones from the root to the major third.
pub const MAJOR_THIRD: i64 = 4;

/// Semitones from the root to the perfect fifth.
pub const PERFECT_FIFTH: i64 = 7;

/// A major triad. Always derived from a root, never stored on its own.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Triad {
    pub root: PitchClass,
    pub third: PitchClass,
    pub fifth: PitchClass,
}

impl Triad {
    /// Build the major triad on `root`, wrapping above B.
    pub fn major(root: PitchClass) -> Self {
        Triad {
            root,
            third: root.transpose(MAJOR_THIRD),
            fifth: root.transpose(PERFECT_FIFTH),
        }
    }

    /// The three pitch classes in root, third, fifth order.
    pub fn pitch_classes(&self) -> [PitchClass; 3] {
        [self.root, self.third, self.fifth]
    }

    pub fn contains(&self, pc: PitchClass) -> bool {
        self.pitch_classes().contains(&pc)
    }
}

/// Resolve a chord root label to its major triad, or `None` if the label is
/// not a pitch-class name.
pub fn resolve_triad(root_name: &str) -> Option<Triad> {
    index_of(root_name).map(Triad::major)
}

/// One detected chord occurrence, as received from the detection service.
///
/// `root` is passed through untouched and may be anything, including an
/// empty string when the service reported no label.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChordEvent {
    pub root: String,
    /// Onset in seconds from the start of the audio, when the detector sends one.
    #[serde(default)]
    pub time: Option<f64>,
}

impl ChordEvent {
    pub fn new(root: impl Into<String>) -> Self {
        ChordEvent {
            root: root.into(),
            time: None,
        }
    }

    pub fn at(root: impl Into<String>, time: f64) -> Self {
        ChordEvent {
            root: root.into(),
            time: Some(time),
        }
    }

    pub fn triad(&self) -> Option<Triad> {
        resolve_triad(&self.root)
    }
}
