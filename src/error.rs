//! Error types for talking to the TTS model server and the local audio/clipboard

use thiserror::Error;

/// Failures of a single user action (fetch, listen, copy URL)
#[derive(Error, Debug)]
pub enum TtsError {
    /// Request could not be sent or the response could not be read
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with an unexpected status
    #[error("{endpoint} returned status {status}")]
    Status { endpoint: &'static str, status: u16 },

    /// Server reported an error in the payload or the `error` header
    #[error("server error: {0}")]
    Server(String),

    /// Response body was missing or unparsable
    #[error("missing or malformed payload: {0}")]
    MissingPayload(String),

    /// Invoke succeeded but returned no audio bytes
    #[error("server returned an empty audio payload")]
    EmptyAudio,

    /// Audio bytes could not be decoded
    #[error("failed to decode audio: {0}")]
    Decode(String),

    /// No usable audio output device
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// Clipboard could not be written
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    /// Server address is not a valid absolute URL
    #[error("invalid server address: {0}")]
    InvalidAddress(#[from] url::ParseError),
}
