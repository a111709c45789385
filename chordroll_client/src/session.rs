// Visualization session: the select-file / detect / show-roll flow.
//
// A session holds at most one selected audio file, the chord events last
// detected for it and the grid built from those events. Selecting a new file
// throws the old events and grid away. A detection pass moves through
// `Loading` and ends in `Ready` (events stored, grid rebuilt in full) or
// `Failed` (user-facing message stored, previous file kept so the user can
// retry).
//
// The session never talks to the network directly; it is handed a
// `ChordDetector` for each detection pass.

use std::path::{Path, PathBuf};

use chordroll_music::{ActivationGrid, ChordEvent, build_grid};
use tracing::{error, info};

use crate::error::ClientError;
use crate::upload::ChordDetector;

/// Message shown when detection fails for any reason other than a missing file.
pub const DETECTION_FAILED_MESSAGE: &str =
    "Error detecting chords. Make sure the backend is running.";

#[derive(Clone, Debug, PartialEq)]
pub enum SessionState {
    Idle,
    Loading,
    Ready,
    Failed(String),
}

pub struct Session {
    file: Option<PathBuf>,
    events: Vec<ChordEvent>,
    grid: ActivationGrid,
    state: SessionState,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Session {
            file: None,
            events: Vec::new(),
            grid: build_grid(&[]),
            state: SessionState::Idle,
        }
    }

    /// Choose the audio file for the next detection and clear old results.
    pub fn select_file(&mut self, path: impl Into<PathBuf>) {
        self.file = Some(path.into());
        self.set_events(Vec::new());
        self.state = SessionState::Idle;
    }

    /// Run one detection pass over the selected file.
    ///
    /// Without a selected file this returns `NoFileSelected` and leaves the
    /// session untouched. Detector failures are logged, recorded as
    /// `SessionState::Failed` and returned.
    pub fn detect(&mut self, detector: &dyn ChordDetector) -> Result<&ActivationGrid, ClientError> {
        let file = self.file.clone().ok_or(ClientError::NoFileSelected)?;

        self.state = SessionState::Loading;
        match detector.detect(&file) {
            Ok(events) => {
                self.set_events(events);
                let stats = self.grid.stats();
                info!(
                    file = %file.display(),
                    columns = stats.total_columns,
                    unresolved = stats.unresolved_columns,
                    "chords detected"
                );
                self.state = SessionState::Ready;
                Ok(&self.grid)
            }
            Err(e) => {
                error!(file = %file.display(), "chord detection failed: {e}");
                self.state = SessionState::Failed(DETECTION_FAILED_MESSAGE.to_string());
                Err(e)
            }
        }
    }

    /// Replace the event list and rebuild the grid from scratch.
    pub fn set_events(&mut self, events: Vec<ChordEvent>) {
        self.grid = build_grid(&events);
        self.events = events;
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn events(&self) -> &[ChordEvent] {
        &self.events
    }

    pub fn grid(&self) -> &ActivationGrid {
        &self.grid
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == SessionState::Loading
    }

    /// Whether there is anything to draw.
    pub fn has_roll(&self) -> bool {
        !self.events.is_empty()
    }
}
