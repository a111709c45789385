// chordroll_protocol: wire types for the chord-detection service.
//
// The detector is a remote HTTP service: the client uploads one audio file as
// a multipart form and gets back a JSON document listing the chord detected
// in each analysis frame. This crate describes that exchange and nothing
// else; it has no dependency on the music crate, so the service contract can
// be read (and tested) on its own.
//
// Module overview:
// - `message.rs`: Endpoint constants, the `DetectionResponse` /
//                 `DetectedChord` body types, response decoding and the
//                 accepted upload formats.

pub mod message;

pub use message::{
    ACCEPTED_EXTENSIONS, DEFAULT_ENDPOINT, DETECT_CHORDS_PATH, DetectedChord, DetectionResponse,
    UPLOAD_FIELD, decode_response, is_accepted_audio,
};
