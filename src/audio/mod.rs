//! Audio ingestion: artifact model, input validation, and normalization to canonical WAV

pub mod artifact;
pub mod normalize;
pub mod validate;
pub mod wav;

pub use artifact::{AudioArtifact, AudioFormat};
pub use normalize::{canonical_name, encode_wav, normalize, NormalizationError, NormalizedAudio};
pub use validate::{
    validate, InputError, ValidationPolicy, ValidationResult, DEFAULT_MAX_FILE_SIZE_BYTES,
    REASON_NO_FILE, REASON_TOO_LARGE, REASON_UNSUPPORTED_FORMAT,
};
pub use wav::WavSummary;
