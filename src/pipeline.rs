//! Validate -> normalize -> transcribe, in that order, for a single artifact
//!
//! Every stage failure is folded into a `TranscriptionOutcome` so callers (the HTTP
//! API, the CLI) only ever render one type. A run stops at the first failing stage;
//! the transcriber is never called with audio that did not pass validation and
//! normalization.

use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::audio::{normalize, validate, AudioArtifact, InputError, ValidationPolicy};
use crate::transcription::{FailureKind, Transcriber, TranscriptionOutcome};

pub struct Pipeline {
    policy: ValidationPolicy,
    transcriber: Arc<dyn Transcriber>,
}

impl Pipeline {
    pub fn new(policy: ValidationPolicy, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            policy,
            transcriber,
        }
    }

    pub fn policy(&self) -> &ValidationPolicy {
        &self.policy
    }

    /// Run one artifact through every stage
    pub async fn run(&self, artifact: Option<AudioArtifact>) -> TranscriptionOutcome {
        let span = info_span!("transcription", request_id = %Uuid::new_v4());
        self.run_stages(artifact).instrument(span).await
    }

    async fn run_stages(&self, artifact: Option<AudioArtifact>) -> TranscriptionOutcome {
        if let Err(err) = validate(artifact.as_ref(), &self.policy).into_result() {
            warn!("Rejected input: {}", err);
            return TranscriptionOutcome::failure(FailureKind::Input, err.to_string());
        }

        let Some(artifact) = artifact else {
            return TranscriptionOutcome::failure(FailureKind::Input, InputError::NoFile.to_string());
        };

        info!("Accepted {} ({} bytes)", artifact.name, artifact.size());

        // Decoding is CPU-bound; keep it off the async workers
        let normalized = match tokio::task::spawn_blocking(move || normalize(artifact)).await {
            Ok(Ok(normalized)) => normalized,
            Ok(Err(err)) => {
                warn!("Normalization failed: {}", err);
                return TranscriptionOutcome::failure(FailureKind::Normalization, err.to_string());
            }
            Err(err) => {
                warn!("Normalization task aborted: {}", err);
                return TranscriptionOutcome::failure(
                    FailureKind::Normalization,
                    format!("normalization task failed: {}", err),
                );
            }
        };

        match normalized.summary() {
            Ok(summary) => info!(
                "Canonical audio {}: {:.1}s, {}Hz, {} channels",
                normalized.name, summary.duration_seconds, summary.sample_rate, summary.channels
            ),
            Err(e) => debug!("Could not summarize {}: {}", normalized.name, e),
        }

        let outcome = self.transcriber.transcribe(&normalized).await;

        match &outcome {
            TranscriptionOutcome::Success { text } => {
                info!("{} transcription succeeded ({} chars)", self.transcriber.name(), text.len())
            }
            TranscriptionOutcome::Failure { kind, message } => {
                warn!("{} transcription failed [{}]: {}", self.transcriber.name(), kind, message)
            }
        }

        outcome
    }
}
