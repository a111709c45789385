// Chordroll music core
//
// Turns detected chord labels into a piano-roll activation grid. A remote
// service reports one root label per chord event; this crate resolves each
// label to a major triad and lays the results out as a 12-row grid, one
// column per event, ready for a presentation layer to draw.
//
// Architecture:
// - pitch.rs: The fixed 12-entry pitch-class table (C..B), name <-> index
// - chord.rs: Root label -> major triad resolution, `ChordEvent`
// - roll.rs: `ActivationGrid` and `build_grid`
// - render.rs: Plain-text piano-roll and chord timeline output
// - midi.rs: MIDI file output from activation grids
//
// Everything here is pure and synchronous. Labels that do not name a pitch
// class (including minor, seventh and other chord qualities) degrade to an
// empty column; nothing in this crate fails on bad input.

pub mod chord;
pub mod midi;
pub mod pitch;
pub mod render;
pub mod roll;

pub use chord::{ChordEvent, Triad, resolve_triad};
pub use pitch::{PITCH_CLASS_NAMES, PitchClass, index_of, name_at};
pub use roll::{ActivationGrid, ColumnInfo, GridStats, build_grid};
