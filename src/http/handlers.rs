use super::state::AppState;
use crate::audio::{AudioArtifact, AudioFormat, REASON_TOO_LARGE, REASON_UNSUPPORTED_FORMAT};
use crate::transcription::{FailureKind, TranscriptionOutcome};
use axum::{
    extract::{multipart::MultipartError, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use std::path::Path;
use tracing::{error, info};

/// Name offered to the browser for the plain-text download
pub const TRANSCRIPT_FILENAME: &str = "transcription.txt";

/// Multipart field carrying the audio
const FILE_FIELD: &str = "file";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    /// The outcome as JSON
    #[default]
    Json,
    /// The transcript as a `text/plain` attachment
    Text,
}

#[derive(Debug, Default, Deserialize)]
pub struct TranscribeQuery {
    pub format: Option<ResponseFormat>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /transcriptions
/// Transcribe an uploaded file or a browser recording
pub async fn transcribe(
    State(state): State<AppState>,
    Query(query): Query<TranscribeQuery>,
    multipart: Multipart,
) -> Response {
    let artifact = match read_artifact(multipart).await {
        Ok(artifact) => artifact,
        Err(e) => {
            error!("Failed to read upload: {}", e);
            let status = e.status();
            let message = if status == StatusCode::PAYLOAD_TOO_LARGE {
                format!("{}: {}", REASON_TOO_LARGE, e.body_text())
            } else {
                e.body_text()
            };
            let outcome = TranscriptionOutcome::failure(FailureKind::Input, message);
            return (status, Json(outcome)).into_response();
        }
    };

    match &artifact {
        Some(a) => info!("Received {} ({} bytes)", a.name, a.size()),
        None => info!("Received request without audio"),
    }

    let outcome = state.pipeline.run(artifact).await;
    render(outcome, query.format.unwrap_or_default())
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Pull the `file` field out of the form
///
/// A field with no filename is a microphone recording; an empty field with an empty
/// filename is what browsers send when nothing was picked, and counts as no file.
/// Browsers name an appended `Blob` "blob", so a name without an extension but
/// with an audio MIME type is treated as a recording too.
async fn read_artifact(mut multipart: Multipart) -> Result<Option<AudioArtifact>, MultipartError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::to_string)
            .filter(|name| !name.is_empty());
        let mime_type = field.content_type().map(str::to_string);
        let bytes: Vec<u8> = field.bytes().await?.into();

        let artifact = match file_name {
            Some(name) if is_blob_name(&name, mime_type.as_deref()) => {
                AudioArtifact::recording(bytes, mime_type)
            }
            Some(name) => {
                let artifact = AudioArtifact::new(name, bytes);
                match mime_type {
                    Some(mime) => artifact.with_mime_type(mime),
                    None => artifact,
                }
            }
            None if bytes.is_empty() => return Ok(None),
            None => AudioArtifact::recording(bytes, mime_type),
        };

        return Ok(Some(artifact));
    }

    Ok(None)
}

fn is_blob_name(name: &str, mime_type: Option<&str>) -> bool {
    Path::new(name).extension().is_none() && mime_type.and_then(AudioFormat::from_mime).is_some()
}

fn render(outcome: TranscriptionOutcome, format: ResponseFormat) -> Response {
    let status = status_for(&outcome);

    match (outcome, format) {
        (TranscriptionOutcome::Success { text }, ResponseFormat::Text) => (
            status,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", TRANSCRIPT_FILENAME),
                ),
            ],
            text,
        )
            .into_response(),
        (outcome, _) => (status, Json(outcome)).into_response(),
    }
}

/// HTTP status for an outcome
pub fn status_for(outcome: &TranscriptionOutcome) -> StatusCode {
    match outcome {
        TranscriptionOutcome::Success { .. } => StatusCode::OK,
        TranscriptionOutcome::Failure { kind, message } => match kind {
            FailureKind::Input => input_status(message),
            FailureKind::Normalization => StatusCode::UNPROCESSABLE_ENTITY,
            FailureKind::Transport | FailureKind::RemoteError => StatusCode::BAD_GATEWAY,
        },
    }
}

fn input_status(message: &str) -> StatusCode {
    if message.starts_with(REASON_TOO_LARGE) {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if message.starts_with(REASON_UNSUPPORTED_FORMAT) {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    } else {
        StatusCode::BAD_REQUEST
    }
}
