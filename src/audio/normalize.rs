use std::io::Cursor;
use std::path::Path;

use symphonia::core::audio::{SampleBuffer, SignalSpec};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::artifact::{AudioArtifact, AudioFormat};
use super::wav::WavSummary;

/// Decode or encode failure on an otherwise valid artifact
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizationError {
    #[error("unrecognized audio format for {0}")]
    UnrecognizedFormat(String),

    #[error("invalid wav data: {0}")]
    InvalidWav(String),

    #[error("could not read audio container: {0}")]
    Container(String),

    #[error("no audio track found")]
    NoAudioTrack,

    #[error("no decoder available: {0}")]
    UnsupportedCodec(String),

    #[error("decode failed: {0}")]
    Decode(String),

    #[error("audio layout changed mid-stream ({from} -> {to})")]
    LayoutChanged { from: String, to: String },

    #[error("no audio samples decoded")]
    Empty,

    #[error("wav encoding failed: {0}")]
    Encode(String),
}

/// Canonical (16-bit PCM WAV) audio ready for the transcription endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAudio {
    /// Derived file name, always with the canonical extension
    pub name: String,
    /// WAV bytes
    pub bytes: Vec<u8>,
}

impl NormalizedAudio {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read the WAV header back (sample rate, channels, duration)
    pub fn summary(&self) -> anyhow::Result<WavSummary> {
        WavSummary::from_bytes(&self.bytes)
    }
}

impl From<NormalizedAudio> for AudioArtifact {
    fn from(audio: NormalizedAudio) -> Self {
        AudioArtifact::new(audio.name, audio.bytes)
            .with_mime_type(AudioFormat::CANONICAL.mime_type())
    }
}

/// Convert an artifact to canonical WAV
///
/// 16-bit PCM WAV is passed through untouched once its header parses; WAV at any
/// other depth is rescaled to 16 bits. Everything else is decoded with symphonia
/// and re-encoded as 16-bit PCM, keeping the decoded sample rate and channel
/// layout.
pub fn normalize(artifact: AudioArtifact) -> Result<NormalizedAudio, NormalizationError> {
    let format = artifact
        .format()
        .ok_or_else(|| NormalizationError::UnrecognizedFormat(artifact.name.clone()))?;

    if format.is_canonical() {
        let reader = hound::WavReader::new(Cursor::new(artifact.bytes.as_slice()))
            .map_err(|e| NormalizationError::InvalidWav(e.to_string()))?;
        let spec = reader.spec();

        if spec.bits_per_sample == 16 && spec.sample_format == hound::SampleFormat::Int {
            debug!("{} is already canonical, passing through", artifact.name);
            return Ok(NormalizedAudio {
                name: artifact.name,
                bytes: artifact.bytes,
            });
        }

        info!(
            "Re-encoding {} ({}-bit {:?}) as 16-bit PCM",
            artifact.name, spec.bits_per_sample, spec.sample_format
        );
        let samples = wav_to_i16(reader)?;
        let bytes = encode_wav(&samples, spec.sample_rate, spec.channels)?;

        return Ok(NormalizedAudio {
            name: artifact.name,
            bytes,
        });
    }

    info!(
        "Normalizing {} ({}, {} bytes) to {}",
        artifact.name,
        format,
        artifact.bytes.len(),
        AudioFormat::CANONICAL
    );

    let name = canonical_name(&artifact.name);
    let decoded = decode(artifact.bytes, format, artifact.mime_type.as_deref())?;
    let bytes = encode_wav(&decoded.samples, decoded.sample_rate, decoded.channels)?;

    info!(
        "Normalized to {}: {}Hz, {} channels, {} samples, {} bytes",
        name,
        decoded.sample_rate,
        decoded.channels,
        decoded.samples.len(),
        bytes.len()
    );

    Ok(NormalizedAudio { name, bytes })
}

/// Replace the extension with the canonical one (`talk.m4a` -> `talk.wav`)
pub fn canonical_name(name: &str) -> String {
    Path::new(name)
        .with_extension(AudioFormat::CANONICAL.extension())
        .to_string_lossy()
        .into_owned()
}

/// Interleaved PCM pulled out of a compressed stream
struct DecodedAudio {
    samples: Vec<i16>,
    sample_rate: u32,
    channels: u16,
}

fn decode(
    bytes: Vec<u8>,
    format: AudioFormat,
    mime_type: Option<&str>,
) -> Result<DecodedAudio, NormalizationError> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    hint.with_extension(format.hint_extension());
    if let Some(mime) = mime_type {
        hint.mime_type(mime);
    }

    let source = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| NormalizationError::Container(e.to_string()))?;

    let mut reader = source.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(NormalizationError::NoAudioTrack)?;
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| NormalizationError::UnsupportedCodec(e.to_string()))?;

    let mut samples: Vec<i16> = Vec::new();
    let mut layout: Option<SignalSpec> = None;

    loop {
        let packet = match reader.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(NormalizationError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt audio packet: {}", e);
                continue;
            }
            Err(e) => return Err(NormalizationError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let frames = decoded.frames();
        if frames == 0 {
            continue;
        }

        match layout {
            None => layout = Some(spec),
            Some(first) if first != spec => {
                return Err(NormalizationError::LayoutChanged {
                    from: describe(&first),
                    to: describe(&spec),
                });
            }
            Some(_) => {}
        }

        let mut buffer = SampleBuffer::<i16>::new(frames as u64, spec);
        buffer.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buffer.samples());
    }

    let spec = layout.ok_or(NormalizationError::Empty)?;

    Ok(DecodedAudio {
        samples,
        sample_rate: spec.rate,
        channels: spec.channels.count() as u16,
    })
}

/// Rescale WAV samples of any depth to 16-bit
fn wav_to_i16<R: std::io::Read>(
    reader: hound::WavReader<R>,
) -> Result<Vec<i16>, NormalizationError> {
    let spec = reader.spec();
    let invalid = |e: hound::Error| NormalizationError::InvalidWav(e.to_string());

    match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<_, _>>()
            .map_err(invalid),
        hound::SampleFormat::Int => {
            let bits = spec.bits_per_sample as u32;
            reader
                .into_samples::<i32>()
                .map(|s| {
                    s.map(|v| {
                        if bits <= 16 {
                            (v << (16 - bits)) as i16
                        } else {
                            (v >> (bits - 16)) as i16
                        }
                    })
                })
                .collect::<Result<_, _>>()
                .map_err(invalid)
        }
    }
}

fn describe(spec: &SignalSpec) -> String {
    format!("{}Hz/{}ch", spec.rate, spec.channels.count())
}

/// Write interleaved samples as a 16-bit PCM WAV file in memory
pub fn encode_wav(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>, NormalizationError> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| NormalizationError::Encode(e.to_string()))?;

        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| NormalizationError::Encode(e.to_string()))?;
        }

        writer
            .finalize()
            .map_err(|e| NormalizationError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}
