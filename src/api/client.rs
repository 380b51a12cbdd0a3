//! reqwest client for the `/tts/api` endpoints

use super::traits::{AudioPayload, TtsApi};
use crate::error::TtsError;
use crate::state::{Field, FieldsResponse, FormData};
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, StatusCode};
use std::sync::Arc;
use url::Url;

pub const FIELDS_PATH: &str = "/tts/api/fields";
pub const INVOKE_PATH: &str = "/tts/api/invoke";
/// Response header the server sets when synthesis fails
const ERROR_HEADER: &str = "error";

/// Client for communicating with the TTS model server
#[derive(Debug, Clone)]
pub struct TtsApiClient {
    http: reqwest::Client,
    base: Url,
}

impl TtsApiClient {
    /// Create a client for the server at `address`
    pub fn new(address: &str) -> Result<Self, TtsError> {
        let base = Url::parse(address)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self { http, base })
    }

    /// Origin of the server, e.g. `http://127.0.0.1:1233`
    pub fn origin(&self) -> String {
        self.base.origin().ascii_serialization()
    }

    fn endpoint(&self, path: &str) -> Result<Url, TtsError> {
        Ok(self.base.join(path)?)
    }
}

#[async_trait]
impl TtsApi for TtsApiClient {
    async fn fetch_fields(&self) -> Result<Vec<Arc<Field>>, TtsError> {
        let url = self.endpoint(FIELDS_PATH)?;
        tracing::debug!("GET {url}");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(TtsError::Status {
                endpoint: FIELDS_PATH,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        let parsed: FieldsResponse =
            serde_json::from_slice(&body).map_err(|e| TtsError::MissingPayload(e.to_string()))?;

        if let Some(error) = parsed.error.filter(|e| !e.is_empty()) {
            return Err(TtsError::Server(error));
        }

        match parsed.fields {
            Some(fields) => {
                tracing::info!("Fetched {} top-level fields", fields.len());
                Ok(fields)
            }
            None => {
                tracing::warn!("Fields response carried no field list");
                Ok(Vec::new())
            }
        }
    }

    async fn invoke(&self, form: FormData) -> Result<AudioPayload, TtsError> {
        let url = self.endpoint(INVOKE_PATH)?;
        tracing::debug!("POST {url} with {} form values", form.keys().count());

        let response = self.http.post(url).json(&form).send().await?;

        // The server answers 200 and reports failures through this header
        if let Some(value) = response.headers().get(ERROR_HEADER) {
            let message = value
                .to_str()
                .unwrap_or("unreadable error header")
                .to_string();
            if !message.is_empty() {
                return Err(TtsError::Server(format!(
                    "invoke tts api failed, err: {message}"
                )));
            }
        }

        let status = response.status();
        if !status.is_success() {
            return Err(TtsError::Status {
                endpoint: INVOKE_PATH,
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(TtsError::EmptyAudio);
        }
        tracing::debug!(
            "Received {} bytes of audio ({})",
            bytes.len(),
            content_type.as_deref().unwrap_or("unknown type")
        );

        Ok(AudioPayload {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
