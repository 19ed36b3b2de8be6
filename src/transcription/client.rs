use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::messages::TranscriptionResponse;
use super::outcome::{FailureKind, TranscriptionOutcome, NO_TEXT_RETURNED};
use super::transcriber::Transcriber;
use crate::audio::{AudioFormat, NormalizedAudio};

/// Default bound on a single request, connect through body
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Credential for the transcription service; never printed
#[derive(Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Which authentication headers accompany a request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `api-key: <KEY>`
    ApiKey,
    /// `Authorization: Bearer <KEY>`
    Bearer,
    /// Both headers; older deployments accepted either
    #[default]
    Both,
}

/// Connection settings for the transcription service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub endpoint_url: String,
    pub api_key: ApiKey,
    pub timeout: Duration,
    pub auth_scheme: AuthScheme,
}

impl ClientConfig {
    pub fn new(endpoint_url: impl Into<String>, api_key: ApiKey) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            auth_scheme: AuthScheme::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_scheme(mut self, auth_scheme: AuthScheme) -> Self {
        self.auth_scheme = auth_scheme;
        self
    }
}

/// HTTP client for the remote speech-to-text endpoint
///
/// Each call to [`Transcriber::transcribe`] is exactly one multipart POST. There is
/// no retry and no caching; the configured timeout bounds the whole exchange.
pub struct TranscriptionClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl TranscriptionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        info!(
            "Transcription client ready: {} (timeout {:?}, auth {:?})",
            config.endpoint_url, config.timeout, config.auth_scheme
        );

        Ok(Self { client, config })
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let key = self.config.api_key.expose();
        match self.config.auth_scheme {
            AuthScheme::ApiKey => request.header("api-key", key),
            AuthScheme::Bearer => request.bearer_auth(key),
            AuthScheme::Both => request.header("api-key", key).bearer_auth(key),
        }
    }

    fn form(audio: &NormalizedAudio) -> Result<multipart::Form, reqwest::Error> {
        let part = multipart::Part::bytes(audio.bytes.clone())
            .file_name(audio.name.clone())
            .mime_str(AudioFormat::CANONICAL.mime_type())?;

        Ok(multipart::Form::new().part("file", part))
    }

    fn transport_failure(&self, err: &reqwest::Error) -> TranscriptionOutcome {
        let message = if err.is_timeout() {
            format!("request timed out after {:?}: {}", self.config.timeout, err)
        } else if err.is_connect() {
            format!("could not connect to transcription service: {}", err)
        } else {
            format!("request failed: {}", err)
        };

        warn!("Transcription transport failure: {}", message);
        TranscriptionOutcome::failure(FailureKind::Transport, message)
    }
}

#[async_trait]
impl Transcriber for TranscriptionClient {
    async fn transcribe(&self, audio: &NormalizedAudio) -> TranscriptionOutcome {
        let form = match Self::form(audio) {
            Ok(form) => form,
            Err(e) => return self.transport_failure(&e),
        };

        debug!(
            "Sending {} ({} bytes) to {}",
            audio.name,
            audio.len(),
            self.config.endpoint_url
        );

        let request = self
            .authorize(self.client.post(&self.config.endpoint_url))
            .multipart(form);

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return self.transport_failure(&e),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return self.transport_failure(&e),
        };

        if status != StatusCode::OK {
            warn!("Transcription service returned {}", status);
            return TranscriptionOutcome::failure(
                FailureKind::RemoteError,
                format!("{} - {}", status.as_u16(), body),
            );
        }

        let parsed: TranscriptionResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!("Unparseable transcription response: {}", e);
                return TranscriptionOutcome::failure(
                    FailureKind::Transport,
                    format!("failed to parse transcription response: {}", e),
                );
            }
        };

        match parsed.text {
            Some(text) if !text.trim().is_empty() => {
                info!("Transcription completed ({} chars)", text.len());
                TranscriptionOutcome::success(text)
            }
            _ => {
                info!("Transcription completed with no text");
                TranscriptionOutcome::success(NO_TEXT_RETURNED)
            }
        }
    }

    fn name(&self) -> &str {
        "remote"
    }
}
