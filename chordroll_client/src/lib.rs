// Chordroll client
//
// The glue around the chord-detection service: upload an audio file, get
// chord events back, build and show the piano roll.
//
// Module overview:
// - `config.rs`:  `ClientConfig` (JSON file + environment overrides).
// - `error.rs`:   `ClientError`, the single error type of this crate.
// - `logging.rs`: tracing subscriber setup (stderr, EnvFilter).
// - `upload.rs`:  `ChordDetector` trait and the HTTP `AudioUploadClient`.
// - `session.rs`: Select-file / detect / show-roll state machine.
//
// The `chordroll` binary (`main.rs`) wires these together.

pub mod config;
pub mod error;
pub mod logging;
pub mod session;
pub mod upload;

pub use config::ClientConfig;
pub use error::ClientError;
pub use session::{Session, SessionState};
pub use upload::{AudioUploadClient, ChordDetector};
