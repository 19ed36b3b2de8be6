pub mod client;
pub mod messages;
pub mod outcome;
pub mod transcriber;

pub use client::{ApiKey, AuthScheme, ClientConfig, TranscriptionClient, DEFAULT_TIMEOUT};
pub use messages::TranscriptionResponse;
pub use outcome::{FailureKind, TranscriptionOutcome, NO_TEXT_RETURNED};
pub use transcriber::Transcriber;
