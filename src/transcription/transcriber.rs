use async_trait::async_trait;

use super::outcome::TranscriptionOutcome;
use crate::audio::NormalizedAudio;

/// Speech-to-text backend
///
/// Implementations:
/// - `TranscriptionClient`: the remote HTTP service
/// - test stubs returning canned outcomes
///
/// Failures are reported through the outcome, never by panicking or returning early.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe canonical audio
    async fn transcribe(&self, audio: &NormalizedAudio) -> TranscriptionOutcome;

    /// Backend name for logging
    fn name(&self) -> &str;
}
