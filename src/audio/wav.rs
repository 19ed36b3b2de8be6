use anyhow::{Context, Result};
use hound::WavReader;
use std::io::Cursor;

/// Header-level facts about a canonical WAV buffer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavSummary {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub bits_per_sample: u16,
    /// Samples per channel
    pub frames: u32,
}

impl WavSummary {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let reader = WavReader::new(Cursor::new(bytes)).context("Failed to parse WAV header")?;

        let spec = reader.spec();
        let frames = reader.duration();
        let duration_seconds = if spec.sample_rate == 0 {
            0.0
        } else {
            frames as f64 / spec.sample_rate as f64
        };

        Ok(Self {
            duration_seconds,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
            bits_per_sample: spec.bits_per_sample,
            frames,
        })
    }

    /// Decode every sample as interleaved 16-bit PCM
    pub fn read_samples(bytes: &[u8]) -> Result<Vec<i16>> {
        WavReader::new(Cursor::new(bytes))
            .context("Failed to parse WAV header")?
            .into_samples::<i16>()
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read audio samples")
    }
}
