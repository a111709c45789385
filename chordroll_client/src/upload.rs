// Audio upload client for the remote chord-detection service.
//
// One call, one request: `detect` validates the local file, posts it as a
// multipart form and converts the JSON reply into `ChordEvent`s in the order
// the service listed them. No retries, no caching; a new file means a new
// request.
//
// The `ChordDetector` trait is the seam between the session state machine
// (`session.rs`) and the network, so the session can be driven by a canned
// detector in tests.

use std::path::Path;
use std::time::Duration;

use chordroll_music::ChordEvent;
use chordroll_protocol::{DetectedChord, UPLOAD_FIELD, decode_response, is_accepted_audio};
use reqwest::blocking::multipart::{Form, Part};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Anything that can turn an audio file into a list of chord events.
pub trait ChordDetector {
    fn detect(&self, audio: &Path) -> Result<Vec<ChordEvent>, ClientError>;
}

/// HTTP client for the detection endpoint.
pub struct AudioUploadClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl AudioUploadClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(AudioUploadClient {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(
            config.endpoint.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl ChordDetector for AudioUploadClient {
    fn detect(&self, audio: &Path) -> Result<Vec<ChordEvent>, ClientError> {
        if !is_accepted_audio(audio) {
            return Err(ClientError::UnsupportedFormat(audio.to_path_buf()));
        }
        let bytes = std::fs::read(audio)?;
        let file_name = audio
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        info!(file = %audio.display(), bytes = bytes.len(), endpoint = %self.endpoint, "uploading audio");
        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for(audio))?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let response = self.http.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.bytes()?;
        let decoded = decode_response(&body)?;
        debug!(frames = decoded.chords.len(), "decoded detection response");
        Ok(to_events(decoded.chords))
    }
}

/// Convert wire results to chord events, preserving order. A missing label
/// becomes an empty root, which the grid treats as unresolved.
pub fn to_events(chords: Vec<DetectedChord>) -> Vec<ChordEvent> {
    chords
        .into_iter()
        .map(|c| ChordEvent {
            root: c.chord.unwrap_or_default(),
            time: c.time,
        })
        .collect()
}

fn mime_for(audio: &Path) -> &'static str {
    match audio.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("mp3") => "audio/mpeg",
        _ => "audio/wav",
    }
}
