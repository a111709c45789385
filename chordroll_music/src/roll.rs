// The activation grid: the data behind the piano-roll view.
//
// Rows are the twelve pitch classes (row index = pitch class index), columns
// are chord events in the order the detector reported them. A cell is true
// when that pitch class sounds during that chord.
//
// Invariants:
// - There are always exactly 12 rows, each of length `num_columns`.
// - Column `i` corresponds to input event `i`; nothing is reordered, merged
//   or dropped.
// - The active rows of a column are exactly the triad of the event's root,
//   or none at all if the root is unresolved.
//
// The grid is rebuilt in full by `build_grid` whenever the event list
// changes. There are no mutating accessors; a grid never shares storage with
// the events it was built from or with earlier grids.

use serde::Serialize;
use tracing::debug;

use crate::chord::{ChordEvent, resolve_triad};
use crate::pitch::{NUM_PITCH_CLASSES, PitchClass};

/// Per-column metadata carried along for labelling.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ColumnInfo {
    /// The root label exactly as received.
    pub root: String,
    /// Onset in seconds, if the detector sent one.
    pub time: Option<f64>,
    /// True if the root named a pitch class.
    pub resolved: bool,
}

/// Pitch-class x chord-event boolean matrix.
///
/// Indexed as `rows[pitch_class][column]`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActivationGrid {
    rows: [Vec<bool>; NUM_PITCH_CLASSES],
    columns: Vec<ColumnInfo>,
}

/// Build the activation grid for a sequence of chord events.
pub fn build_grid(events: &[ChordEvent]) -> ActivationGrid {
    let mut rows: [Vec<bool>; NUM_PITCH_CLASSES] =
        std::array::from_fn(|_| vec![false; events.len()]);
    let mut columns = Vec::with_capacity(events.len());

    for (col, event) in events.iter().enumerate() {
        let triad = resolve_triad(&event.root);
        match triad {
            Some(triad) => {
                for pc in triad.pitch_classes() {
                    rows[pc.index()][col] = true;
                }
            }
            None => debug!(column = col, root = %event.root, "unresolved chord root"),
        }
        columns.push(ColumnInfo {
            root: event.root.clone(),
            time: event.time,
            resolved: triad.is_some(),
        });
    }

    ActivationGrid { rows, columns }
}

impl ActivationGrid {
    /// Always 12.
    pub fn num_rows(&self) -> usize {
        NUM_PITCH_CLASSES
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Whether `pc` sounds in column `col`. Out-of-range columns are inactive.
    pub fn is_active(&self, pc: PitchClass, col: usize) -> bool {
        self.rows[pc.index()].get(col).copied().unwrap_or(false)
    }

    /// The full row for one pitch class, one entry per column.
    pub fn row(&self, pc: PitchClass) -> &[bool] {
        &self.rows[pc.index()]
    }

    /// Vertical slice: all twelve cells of one column.
    pub fn column(&self, col: usize) -> [bool; NUM_PITCH_CLASSES] {
        PitchClass::ALL.map(|pc| self.is_active(pc, col))
    }

    /// Active pitch classes of a column, in ascending pitch-class order.
    pub fn active_rows(&self, col: usize) -> Vec<PitchClass> {
        PitchClass::ALL
            .into_iter()
            .filter(|&pc| self.is_active(pc, col))
            .collect()
    }

    pub fn column_info(&self, col: usize) -> Option<&ColumnInfo> {
        self.columns.get(col)
    }

    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    pub fn stats(&self) -> GridStats {
        let resolved_columns = self.columns.iter().filter(|c| c.resolved).count();
        let active_cells = self
            .rows
            .iter()
            .map(|row| row.iter().filter(|&&on| on).count())
            .sum();

        GridStats {
            total_columns: self.columns.len(),
            resolved_columns,
            unresolved_columns: self.columns.len() - resolved_columns,
            active_cells,
        }
    }
}

/// Statistics about a grid's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridStats {
    pub total_columns: usize,
    pub resolved_columns: usize,
    pub unresolved_columns: usize,
    pub active_cells: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::Triad;
    use proptest::prelude::*;

    fn idx(pcs: Vec<PitchClass>) -> Vec<usize> {
        pcs.into_iter().map(PitchClass::index).collect()
    }

    #[test]
    fn test_empty_input() {
        let grid = build_grid(&[]);
        assert_eq!(grid.num_rows(), 12);
        assert_eq!(grid.num_columns(), 0);
        assert!(grid.is_empty());
        for pc in PitchClass::ALL {
            assert!(grid.row(pc).is_empty());
            assert!(!grid.is_active(pc, 0));
        }
    }

    #[test]
    fn test_c_then_g() {
        let grid = build_grid(&[ChordEvent::new("C"), ChordEvent::new("G")]);
        assert_eq!(grid.num_columns(), 2);
        assert_eq!(idx(grid.active_rows(0)), vec![0, 4, 7]);
        assert_eq!(idx(grid.active_rows(1)), vec![2, 7, 11]);
        assert_eq!(grid.column_info(0).unwrap().root, "C");
        assert_eq!(grid.column_info(1).unwrap().root, "G");
    }

    #[test]
    fn test_unresolved_column_keeps_position() {
        let grid = build_grid(&[
            ChordEvent::new("Am"),
            ChordEvent::new("D"),
            ChordEvent::new(""),
            ChordEvent::new("E"),
        ]);
        assert_eq!(grid.num_columns(), 4);
        assert!(grid.active_rows(0).is_empty());
        assert_eq!(idx(grid.active_rows(1)), vec![2, 6, 9]);
        assert!(grid.active_rows(2).is_empty());
        assert_eq!(idx(grid.active_rows(3)), vec![4, 8, 11]);
        assert!(!grid.column_info(0).unwrap().resolved);
        assert!(grid.column_info(1).unwrap().resolved);
    }

    #[test]
    fn test_duplicates_are_not_merged() {
        let events = vec![ChordEvent::at("F", 0.0), ChordEvent::at("F", 0.023)];
        let grid = build_grid(&events);
        assert_eq!(grid.num_columns(), 2);
        assert_eq!(grid.column(0), grid.column(1));
        assert_eq!(grid.column_info(1).unwrap().time, Some(0.023));
    }

    #[test]
    fn test_rebuild_is_value_equal() {
        let events = vec![ChordEvent::new("B"), ChordEvent::new("x"), ChordEvent::new("C#")];
        assert_eq!(build_grid(&events), build_grid(&events));
    }

    #[test]
    fn test_row_and_column_agree() {
        let grid = build_grid(&[ChordEvent::new("A"), ChordEvent::new("C")]);
        let a = PitchClass::new(9);
        assert_eq!(grid.row(a), &[true, false]);
        let col = grid.column(0);
        assert!(col[9] && col[1] && col[4]);
        assert_eq!(col.iter().filter(|&&on| on).count(), 3);
    }

    #[test]
    fn test_stats() {
        let grid = build_grid(&[
            ChordEvent::new("C"),
            ChordEvent::new("Cmaj7"),
            ChordEvent::new("G"),
        ]);
        assert_eq!(
            grid.stats(),
            GridStats {
                total_columns: 3,
                resolved_columns: 2,
                unresolved_columns: 1,
                active_cells: 6,
            }
        );
    }

    #[test]
    fn test_json_shape() {
        let events = vec![
            ChordEvent::at("C", 0.0),
            ChordEvent::at("Am", 0.5),
            ChordEvent::new("G"),
        ];
        let value = serde_json::to_value(build_grid(&events)).unwrap();

        let rows = value["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 12);
        for row in rows {
            assert_eq!(row.as_array().unwrap().len(), events.len());
        }
        assert_eq!(rows[0], serde_json::json!([true, false, false]));
        assert_eq!(rows[7], serde_json::json!([true, false, true]));
        assert_eq!(rows[1], serde_json::json!([false, false, false]));

        let columns = value["columns"].as_array().unwrap();
        assert_eq!(columns.len(), events.len());
        assert_eq!(
            columns[0],
            serde_json::json!({"root": "C", "time": 0.0, "resolved": true})
        );
        assert_eq!(
            columns[1],
            serde_json::json!({"root": "Am", "time": 0.5, "resolved": false})
        );
        assert_eq!(
            columns[2],
            serde_json::json!({"root": "G", "time": null, "resolved": true})
        );
    }

    proptest! {
        #[test]
        fn prop_arbitrary_labels_degrade_silently(labels in proptest::collection::vec(".{0,8}", 0..24)) {
            let events: Vec<ChordEvent> = labels.iter().map(ChordEvent::new).collect();
            let grid = build_grid(&events);
            prop_assert_eq!(grid.num_rows(), 12);
            prop_assert_eq!(grid.num_columns(), events.len());
            for (col, event) in events.iter().enumerate() {
                let expected: Vec<PitchClass> = match resolve_triad(&event.root) {
                    Some(t) => {
                        let mut pcs = t.pitch_classes().to_vec();
                        pcs.sort();
                        pcs
                    }
                    None => Vec::new(),
                };
                prop_assert_eq!(grid.active_rows(col), expected);
            }
        }

        #[test]
        fn prop_valid_roots_light_three_rows(roots in proptest::collection::vec(0i64..12, 1..16)) {
            let events: Vec<ChordEvent> =
                roots.iter().map(|&r| ChordEvent::new(PitchClass::new(r).name())).collect();
            let grid = build_grid(&events);
            for (col, &r) in roots.iter().enumerate() {
                let triad = Triad::major(PitchClass::new(r));
                let active = grid.active_rows(col);
                prop_assert_eq!(active.len(), 3);
                prop_assert!(active.iter().all(|&pc| triad.contains(pc)));
            }
        }
    }
}
