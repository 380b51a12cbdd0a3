//! Trait abstraction for the API client to enable mocking in tests

use crate::error::TtsError;
use crate::state::{Field, FormData};
use async_trait::async_trait;
use std::sync::Arc;

/// Audio returned by the invoke endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioPayload {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// TTS model server operations, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TtsApi: Send + Sync {
    /// Fetch the configurable field schema
    async fn fetch_fields(&self) -> Result<Vec<Arc<Field>>, TtsError>;

    /// Synthesize speech for the given form values
    async fn invoke(&self, form: FormData) -> Result<AudioPayload, TtsError>;
}
