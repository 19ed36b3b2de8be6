use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder text for a completed request that produced no transcript
pub const NO_TEXT_RETURNED: &str = "No text returned";

/// Which pipeline stage failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No file, oversized, or unsupported format
    Input,
    /// Decode or encode failure
    Normalization,
    /// Network failure, timeout, or unreadable success body
    Transport,
    /// Non-200 response from the transcription service
    RemoteError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Input => "input",
            Self::Normalization => "normalization",
            Self::Transport => "transport",
            Self::RemoteError => "remote_error",
        };
        f.write_str(s)
    }
}

/// Result of one transcription attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranscriptionOutcome {
    Success { text: String },
    Failure { kind: FailureKind, message: String },
}

impl TranscriptionOutcome {
    pub fn success(text: impl Into<String>) -> Self {
        Self::Success { text: text.into() }
    }

    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure { .. } => None,
        }
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { kind, .. } => Some(*kind),
        }
    }
}
