// Request/response vocabulary of the chord-detection service.
//
// Request: `POST /detect-chords`, multipart form with the audio file in the
// `file` field. Only `.wav` and `.mp3` uploads are offered to the service.
//
// Response: `{"chords": [{"time": 0.0, "chord": "C"}, ...]}`, one entry per
// analysis frame, in frame order. `chord` is a bare root name in the normal
// case but is kept as an arbitrary optional string here: the service may
// send `null` or a label the client cannot resolve, and that must decode
// cleanly rather than fail the whole response.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Path of the detection endpoint on the service.
pub const DETECT_CHORDS_PATH: &str = "/detect-chords";

/// Where the service listens when run locally.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000/detect-chords";

/// Multipart field name carrying the uploaded audio.
pub const UPLOAD_FIELD: &str = "file";

/// File extensions (lowercase, no dot) the client will upload.
pub const ACCEPTED_EXTENSIONS: [&str; 2] = ["wav", "mp3"];

/// Body of a successful detection response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResponse {
    #[serde(default)]
    pub chords: Vec<DetectedChord>,
}

/// One frame's detection result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedChord {
    /// Frame onset in seconds.
    #[serde(default)]
    pub time: Option<f64>,
    /// Root label, if the service produced one.
    #[serde(default)]
    pub chord: Option<String>,
}

/// Decode a response body.
pub fn decode_response(body: &[u8]) -> Result<DetectionResponse, serde_json::Error> {
    serde_json::from_slice(body)
}

/// True if `path` has one of `ACCEPTED_EXTENSIONS` (case-insensitive).
pub fn is_accepted_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}
