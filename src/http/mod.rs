//! HTTP API for the presentation layer
//!
//! - POST /transcriptions - Transcribe an upload or recording (multipart `file` field)
//! - POST /transcriptions?format=text - Same, returning the transcript as a `.txt` download
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{status_for, ResponseFormat, TRANSCRIPT_FILENAME};
pub use routes::create_router;
pub use state::AppState;
