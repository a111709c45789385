// Error type for the client side: everything that can go wrong between
// picking an audio file and holding a list of chord events.
//
// Unresolved chord roots are not errors; they never reach this type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Please select a file first.")]
    NoFileSelected,
    #[error("Unsupported audio format: {0:?} (expected .wav or .mp3)")]
    UnsupportedFormat(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Detection service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}
