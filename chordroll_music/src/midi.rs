// MIDI output from activation grids.
//
// Converts an ActivationGrid into a Standard MIDI File so the piano roll can
// be auditioned in any MIDI player. Every column lasts `ticks_per_column`
// ticks; each pitch-class row maps to one key in the octave starting at
// `base_note`. A row that stays active across consecutive columns is held as
// one note rather than re-struck, so repeated detections of the same chord
// sound as a single sustained chord.
//
// Uses the `midly` crate for MIDI writing. Output is SMF Format 1: a tempo
// track followed by a single piano track.
//
// Tick positions are computed in u64. Options are checked before anything is
// built: all twelve rows must land on distinct 7-bit keys, and no delta may
// exceed the 28-bit variable-length limit. Violations come back as
// `InvalidInput` rather than a truncated file.

use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;

use crate::pitch::PitchClass;
use crate::roll::ActivationGrid;

/// Ticks per quarter note in MIDI output.
const TICKS_PER_QUARTER: u16 = 480;

/// Largest delta time a track event can carry (28-bit variable-length quantity).
pub const MAX_DELTA_TICKS: u64 = 0x0FFF_FFFF;

/// Highest `base_note` that still fits B (base + 11) into the 7-bit key range.
pub const MAX_BASE_NOTE: u8 = 127 - 11;

const CHANNEL: u8 = 0;

/// Acoustic grand piano.
const PROGRAM: u8 = 0;

/// Tuning knobs for `grid_to_smf`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MidiOptions {
    pub tempo_bpm: u16,
    pub ticks_per_column: u32,
    /// MIDI key of pitch class C; the other rows sit above it.
    pub base_note: u8,
    pub velocity: u8,
}

impl Default for MidiOptions {
    fn default() -> Self {
        MidiOptions {
            tempo_bpm: 120,
            ticks_per_column: 120,
            base_note: 60, // C4
            velocity: 80,
        }
    }
}

impl MidiOptions {
    /// Check the options on their own, independent of grid size.
    pub fn validate(&self) -> Result<(), String> {
        if self.ticks_per_column == 0 || self.ticks_per_column as u64 > MAX_DELTA_TICKS {
            return Err(format!(
                "ticks_per_column must be in 1..={MAX_DELTA_TICKS}, got {}",
                self.ticks_per_column
            ));
        }
        if self.base_note > MAX_BASE_NOTE {
            return Err(format!(
                "base_note must be at most {MAX_BASE_NOTE} so B stays in range, got {}",
                self.base_note
            ));
        }
        if self.velocity > 127 {
            return Err(format!("velocity must be at most 127, got {}", self.velocity));
        }
        Ok(())
    }
}

/// A note boundary at an absolute tick, before delta encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct NoteEdge {
    tick: u64,
    /// Offs sort before ons at the same tick.
    on: bool,
    key: u8,
}

/// Convert a grid to MIDI and write it to a file.
pub fn write_midi(grid: &ActivationGrid, options: &MidiOptions, path: &Path) -> io::Result<()> {
    let smf = grid_to_smf(grid, options)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Convert a grid to an in-memory SMF.
///
/// Fails with `InvalidInput` if the options are invalid or a note would be
/// held longer than one delta can express.
pub fn grid_to_smf(grid: &ActivationGrid, options: &MidiOptions) -> io::Result<Smf<'static>> {
    options
        .validate()
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let mut smf = Smf::new(Header::new(
        Format::Parallel,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    // Track 0: tempo track
    let tempo_bpm = options.tempo_bpm.max(1) as u32;
    let mut tempo_track: Track<'static> = Vec::new();
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(
            (60_000_000 / tempo_bpm).min(0x00FF_FFFF),
        ))),
    });
    tempo_track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(tempo_track);

    let channel = u4::new(CHANNEL);
    let mut track: Track<'static> = vec![
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Piano Roll")),
        },
        TrackEvent {
            delta: u28::new(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::new(PROGRAM),
                },
            },
        },
    ];

    let mut last_tick = 0;
    for edge in note_edges(grid, options) {
        let key = u7::new(edge.key);
        let message = if edge.on {
            MidiMessage::NoteOn {
                key,
                vel: u7::new(options.velocity),
            }
        } else {
            MidiMessage::NoteOff {
                key,
                vel: u7::new(0),
            }
        };
        let delta = edge.tick - last_tick;
        if delta > MAX_DELTA_TICKS {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "note spans {delta} ticks, more than one MIDI delta can hold ({MAX_DELTA_TICKS}); \
                     lower ticks_per_column"
                ),
            ));
        }
        track.push(TrackEvent {
            delta: u28::new(delta as u32),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = edge.tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    Ok(smf)
}

/// Walk each row and emit an on-edge where it becomes active and an
/// off-edge where it stops (or where the grid ends).
fn note_edges(grid: &ActivationGrid, options: &MidiOptions) -> Vec<NoteEdge> {
    let mut edges = Vec::new();
    let ticks_per_column = options.ticks_per_column as u64;
    let end_tick = grid.num_columns() as u64 * ticks_per_column;

    for pc in PitchClass::ALL {
        let key = midi_key(options.base_note, pc);
        let mut sounding = false;
        for (col, &on) in grid.row(pc).iter().enumerate() {
            let tick = col as u64 * ticks_per_column;
            if on && !sounding {
                edges.push(NoteEdge { tick, on: true, key });
            } else if !on && sounding {
                edges.push(NoteEdge { tick, on: false, key });
            }
            sounding = on;
        }
        if sounding {
            edges.push(NoteEdge {
                tick: end_tick,
                on: false,
                key,
            });
        }
    }

    edges.sort();
    edges
}

/// MIDI key for a pitch class. `base_note` is already checked against
/// `MAX_BASE_NOTE`.
fn midi_key(base_note: u8, pc: PitchClass) -> u8 {
    base_note + pc.index() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordEvent;
    use crate::roll::build_grid;

    fn note_ons(smf: &Smf) -> Vec<u8> {
        smf.tracks[1]
            .iter()
            .filter_map(|ev| match &ev.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOn { key, .. },
                    ..
                } => Some(key.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_grid_to_smf_basic() {
        let grid = build_grid(&[ChordEvent::new("C"), ChordEvent::new("G")]);
        let smf = grid_to_smf(&grid, &MidiOptions::default()).unwrap();
        // 1 tempo track + 1 piano track
        assert_eq!(smf.tracks.len(), 2);
        // C E G, then B and D join while G is held.
        assert_eq!(note_ons(&smf), vec![60, 64, 67, 62, 71]);
    }

    #[test]
    fn test_repeated_chord_is_sustained() {
        let grid = build_grid(&[ChordEvent::new("F"), ChordEvent::new("F"), ChordEvent::new("F")]);
        let smf = grid_to_smf(&grid, &MidiOptions::default()).unwrap();
        assert_eq!(note_ons(&smf).len(), 3);
    }

    #[test]
    fn test_edges_balance_and_end_on_last_column() {
        let grid = build_grid(&[ChordEvent::new("D"), ChordEvent::new("??"), ChordEvent::new("D")]);
        let options = MidiOptions::default();
        let edges = note_edges(&grid, &options);
        let ons = edges.iter().filter(|e| e.on).count();
        let offs = edges.iter().filter(|e| !e.on).count();
        assert_eq!(ons, 6);
        assert_eq!(ons, offs);
        let last = edges.last().unwrap();
        assert!(!last.on);
        assert_eq!(last.tick, 3 * options.ticks_per_column as u64);
    }

    #[test]
    fn test_empty_grid_has_no_notes() {
        let smf = grid_to_smf(&build_grid(&[]), &MidiOptions::default()).unwrap();
        assert!(note_ons(&smf).is_empty());
        // Track name, program change, end of track.
        assert_eq!(smf.tracks[1].len(), 3);
    }

    fn note_off_deltas(smf: &Smf) -> Vec<u32> {
        smf.tracks[1]
            .iter()
            .filter_map(|ev| match &ev.kind {
                TrackEventKind::Midi {
                    message: MidiMessage::NoteOff { .. },
                    ..
                } => Some(ev.delta.as_int()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_huge_ticks_per_column_is_rejected_not_overflowed() {
        let events: Vec<ChordEvent> = (0..5).map(|_| ChordEvent::new("C")).collect();
        let grid = build_grid(&events);
        let options = MidiOptions {
            ticks_per_column: 1_000_000_000,
            ..Default::default()
        };
        let err = grid_to_smf(&grid, &options).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_long_delta_is_not_truncated() {
        let options = MidiOptions {
            ticks_per_column: 100_000_000,
            ..Default::default()
        };

        // Held across two columns: 200M ticks still fits in one delta.
        let two = build_grid(&[ChordEvent::new("C"), ChordEvent::new("C")]);
        let smf = grid_to_smf(&two, &options).unwrap();
        let offs = note_off_deltas(&smf);
        assert_eq!(offs.len(), 3);
        assert_eq!(offs.iter().map(|&d| d as u64).sum::<u64>(), 200_000_000);
        assert_eq!(offs[0], 200_000_000);

        // Three columns would need 300M ticks in one delta.
        let three = build_grid(&[ChordEvent::new("C"), ChordEvent::new("C"), ChordEvent::new("C")]);
        let err = grid_to_smf(&three, &options).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }

    #[test]
    fn test_ticks_per_column_above_delta_limit_is_invalid() {
        let options = MidiOptions {
            ticks_per_column: 300_000_000,
            ..Default::default()
        };
        assert!(options.validate().is_err());
        let grid = build_grid(&[ChordEvent::new("C")]);
        assert!(grid_to_smf(&grid, &options).is_err());
    }

    #[test]
    fn test_base_note_keeps_rows_on_distinct_keys() {
        let top = MidiOptions {
            base_note: MAX_BASE_NOTE,
            ..Default::default()
        };
        assert!(top.validate().is_ok());
        assert_eq!(midi_key(MAX_BASE_NOTE, PitchClass::B), 127);

        let grid = build_grid(&[ChordEvent::new("A")]);
        let smf = grid_to_smf(&grid, &top).unwrap();
        let mut keys = note_ons(&smf);
        keys.dedup();
        assert_eq!(keys.len(), 3);

        let too_high = MidiOptions {
            base_note: MAX_BASE_NOTE + 1,
            ..Default::default()
        };
        assert!(too_high.validate().is_err());
        assert!(grid_to_smf(&grid, &too_high).is_err());
    }

    #[test]
    fn test_velocity_out_of_range_is_invalid() {
        let options = MidiOptions {
            velocity: 200,
            ..Default::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_smf_writes() {
        let grid = build_grid(&[ChordEvent::new("A")]);
        let smf = grid_to_smf(&grid, &MidiOptions::default()).unwrap();
        let mut buf = Vec::new();
        smf.write_std(&mut buf).unwrap();
        assert!(buf.starts_with(b"MThd"));
    }
}
