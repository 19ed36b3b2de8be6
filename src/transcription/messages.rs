use serde::Deserialize;

/// Body of a successful response from the transcription service
///
/// Only `text` is read; any other fields the service returns are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct TranscriptionResponse {
    #[serde(default)]
    pub text: Option<String>,
}
