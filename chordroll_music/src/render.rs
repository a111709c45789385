// Plain-text piano-roll rendering of an activation grid.
//
// Layout follows a keyboard turned on its side: one line per pitch class,
// highest (B) on top and C at the bottom, one character per chord column.
// A legend underneath explains the two cell glyphs.
//
//     B  |..#|
//     A# |...|
//     ...
//     C  |#..|
//
// The renderer only reads the grid; it makes no decisions about which notes
// are active.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

use crate::pitch::PitchClass;
use crate::roll::ActivationGrid;

/// Glyphs and layout switches for `render_roll`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub active: char,
    pub inactive: char,
    /// Append the two-line legend.
    pub legend: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            active: '#',
            inactive: '.',
            legend: true,
        }
    }
}

/// Render the grid as text, one row per pitch class, B first.
pub fn render_roll(grid: &ActivationGrid, options: &RenderOptions) -> String {
    let mut out = String::new();

    for pc in PitchClass::ALL.iter().rev() {
        let _ = write!(out, "{:<3}|", pc.name());
        for &on in grid.row(*pc) {
            out.push(if on { options.active } else { options.inactive });
        }
        out.push_str("|\n");
    }

    if options.legend {
        out.push('\n');
        let _ = writeln!(out, "{}  Active chord note", options.active);
        let _ = writeln!(out, "{}  Inactive", options.inactive);
    }
    out
}

/// One line per column: index, onset time and root label, with `?` marking
/// roots that did not resolve to a triad.
pub fn chord_timeline(grid: &ActivationGrid) -> String {
    let mut out = String::new();
    for (i, info) in grid.columns().iter().enumerate() {
        let time = match info.time {
            Some(t) => format!("{t:>8.3}s"),
            None => format!("{:>9}", "-"),
        };
        let marker = if info.resolved { "" } else { " ?" };
        let _ = writeln!(out, "{i:>5} {time}  {}{marker}", info.root);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::ChordEvent;
    use crate::roll::build_grid;

    #[test]
    fn test_render_two_columns() {
        let grid = build_grid(&[ChordEvent::new("C"), ChordEvent::new("G")]);
        let text = render_roll(&grid, &RenderOptions::default());
        let lines: Vec<&str> = text.lines().collect();

        // 12 rows, blank line, two legend lines.
        assert_eq!(lines.len(), 15);
        assert_eq!(lines[0], "B  |.#|");
        assert_eq!(lines[4], "G  |##|");
        assert_eq!(lines[7], "E  |#.|");
        assert_eq!(lines[9], "D  |.#|");
        assert_eq!(lines[11], "C  |#.|");
        assert!(text.contains("#  Active chord note"));
        assert!(text.contains(".  Inactive"));
    }

    #[test]
    fn test_render_empty_grid() {
        let grid = build_grid(&[]);
        let options = RenderOptions {
            legend: false,
            ..Default::default()
        };
        let text = render_roll(&grid, &options);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "B  ||");
        assert_eq!(lines[11], "C  ||");
    }

    #[test]
    fn test_custom_glyphs() {
        let grid = build_grid(&[ChordEvent::new("nope")]);
        let options = RenderOptions {
            active: 'X',
            inactive: ' ',
            legend: false,
        };
        let text = render_roll(&grid, &options);
        assert!(!text.contains('X'));
        assert!(text.lines().all(|l| l.ends_with("| |")));
    }

    #[test]
    fn test_chord_timeline() {
        let grid = build_grid(&[ChordEvent::at("C", 0.0), ChordEvent::new("Cm")]);
        let text = chord_timeline(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("0.000s"));
        assert!(lines[0].ends_with("C"));
        assert!(lines[1].ends_with("Cm ?"));
    }
}
