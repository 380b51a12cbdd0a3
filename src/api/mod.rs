//! HTTP client for the TTS model server API

mod client;
mod traits;

pub use client::TtsApiClient;
pub use traits::TtsApi;

#[cfg(test)]
pub use traits::{AudioPayload, MockTtsApi};
