pub mod audio;
pub mod config;
pub mod http;
pub mod pipeline;
pub mod transcription;

pub use audio::{
    normalize, validate, AudioArtifact, AudioFormat, InputError, NormalizationError,
    NormalizedAudio, ValidationPolicy, ValidationResult, WavSummary,
};
pub use config::Config;
pub use http::{create_router, AppState};
pub use pipeline::Pipeline;
pub use transcription::{
    ApiKey, AuthScheme, ClientConfig, FailureKind, Transcriber, TranscriptionClient,
    TranscriptionOutcome, NO_TEXT_RETURNED,
};
