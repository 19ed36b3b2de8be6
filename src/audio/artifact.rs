use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Audio container formats accepted for transcription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Mp4,
    Mpeg,
    Mpga,
    M4a,
    Wav,
    Webm,
}

impl AudioFormat {
    /// Every supported format, in the order they are advertised
    pub const ALL: [AudioFormat; 7] = [
        AudioFormat::Mp3,
        AudioFormat::Mp4,
        AudioFormat::Mpeg,
        AudioFormat::Mpga,
        AudioFormat::M4a,
        AudioFormat::Wav,
        AudioFormat::Webm,
    ];

    /// The format the transcription endpoint accepts natively
    pub const CANONICAL: AudioFormat = AudioFormat::Wav;

    /// Parse a file extension (case-insensitive, without the dot)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Map a declared MIME type to a format, ignoring parameters such as `;codecs=opus`
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "audio/wav" | "audio/wave" | "audio/x-wav" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/mp4" | "video/mp4" => Some(Self::Mp4),
            "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Mp4 => "mp4",
            Self::Mpeg => "mpeg",
            Self::Mpga => "mpga",
            Self::M4a => "m4a",
            Self::Wav => "wav",
            Self::Webm => "webm",
        }
    }

    /// Extension used as the symphonia format hint; MPEG audio aliases all decode as MP3
    pub fn hint_extension(self) -> &'static str {
        match self {
            Self::Mp3 | Self::Mpeg | Self::Mpga => "mp3",
            other => other.extension(),
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Mp3 | Self::Mpeg | Self::Mpga => "audio/mpeg",
            Self::Mp4 => "audio/mp4",
            Self::M4a => "audio/x-m4a",
            Self::Wav => "audio/wav",
            Self::Webm => "audio/webm",
        }
    }

    pub fn is_canonical(self) -> bool {
        self == Self::CANONICAL
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// A user-supplied audio blob (upload or recording) before any processing
///
/// Owned by a single pipeline run and consumed by normalization.
#[derive(Debug, Clone)]
pub struct AudioArtifact {
    /// Declared filename, including extension
    pub name: String,
    /// Raw bytes as received
    pub bytes: Vec<u8>,
    /// MIME type declared by the client, if any
    pub mime_type: Option<String>,
}

impl AudioArtifact {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            mime_type: None,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Wrap a microphone capture that arrived without a filename
    ///
    /// The name is derived from the MIME type (`audio/webm` -> `recording.webm`),
    /// falling back to the canonical format.
    pub fn recording(bytes: Vec<u8>, mime_type: Option<String>) -> Self {
        let format = mime_type
            .as_deref()
            .and_then(AudioFormat::from_mime)
            .unwrap_or(AudioFormat::CANONICAL);

        Self {
            name: format!("recording.{}", format.extension()),
            bytes,
            mime_type,
        }
    }

    /// Read an artifact from disk, keeping the file name as the declared name
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading audio file: {}", path.display());

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read audio file: {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self::new(name, bytes))
    }

    /// Byte length of the artifact
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Lowercased extension of the declared name, if it has one
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.name)
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
    }

    /// Format implied by the declared extension
    pub fn format(&self) -> Option<AudioFormat> {
        self.extension().as_deref().and_then(AudioFormat::from_extension)
    }
}
