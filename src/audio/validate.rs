use thiserror::Error;

use super::artifact::{AudioArtifact, AudioFormat};

/// Default upload ceiling: 25 MiB
pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 25 * 1024 * 1024;

pub const REASON_NO_FILE: &str = "no file";
pub const REASON_TOO_LARGE: &str = "too large";
pub const REASON_UNSUPPORTED_FORMAT: &str = "unsupported format";

/// Why an artifact was rejected before any processing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("no file: no audio was provided")]
    NoFile,

    #[error("too large: {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: u64, max: u64 },

    #[error("unsupported format: {found} (supported: {supported})")]
    UnsupportedFormat { found: String, supported: String },
}

impl InputError {
    /// Short machine-friendly reason
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoFile => REASON_NO_FILE,
            Self::TooLarge { .. } => REASON_TOO_LARGE,
            Self::UnsupportedFormat { .. } => REASON_UNSUPPORTED_FORMAT,
        }
    }
}

/// Verdict of the input validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(InputError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Reason for rejection, `None` when valid
    pub fn reason(&self) -> Option<&InputError> {
        match self {
            Self::Valid => None,
            Self::Invalid(err) => Some(err),
        }
    }

    pub fn into_result(self) -> Result<(), InputError> {
        match self {
            Self::Valid => Ok(()),
            Self::Invalid(err) => Err(err),
        }
    }
}

/// Size ceiling and accepted formats
#[derive(Debug, Clone)]
pub struct ValidationPolicy {
    /// Largest accepted artifact, in bytes (inclusive)
    pub max_size: u64,
    /// Accepted formats
    pub supported: Vec<AudioFormat>,
}

impl ValidationPolicy {
    pub fn new(max_size: u64) -> Self {
        Self {
            max_size,
            ..Self::default()
        }
    }

    fn supported_list(&self) -> String {
        self.supported
            .iter()
            .map(|f| f.extension())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_FILE_SIZE_BYTES,
            supported: AudioFormat::ALL.to_vec(),
        }
    }
}

/// Check an artifact's metadata against the policy
///
/// Only the declared name and byte length are consulted; audio content is not read.
/// Size is checked before format so oversized uploads always report "too large".
pub fn validate(artifact: Option<&AudioArtifact>, policy: &ValidationPolicy) -> ValidationResult {
    let Some(artifact) = artifact else {
        return ValidationResult::Invalid(InputError::NoFile);
    };

    let size = artifact.size();
    if size > policy.max_size {
        return ValidationResult::Invalid(InputError::TooLarge {
            size,
            max: policy.max_size,
        });
    }

    match artifact.format() {
        Some(format) if policy.supported.contains(&format) => ValidationResult::Valid,
        _ => ValidationResult::Invalid(InputError::UnsupportedFormat {
            found: artifact.extension().unwrap_or_else(|| "<none>".to_string()),
            supported: policy.supported_list(),
        }),
    }
}
