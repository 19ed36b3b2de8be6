// Shared fixtures for the integration tests: synthetic audio and a stub
// transcription endpoint served in-process.
#![allow(dead_code)]

use async_trait::async_trait;
use audioink::audio::encode_wav;
use audioink::{NormalizedAudio, Transcriber, TranscriptionOutcome};
use axum::body::Bytes;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

// ============================================================================
// Audio fixtures
// ============================================================================

/// Samples per MPEG-1 Layer III frame
pub const MP3_FRAME_SAMPLES: usize = 1152;

/// 128 kbps at 44.1 kHz without padding: 144 * 128000 / 44100
const MP3_FRAME_BYTES: usize = 417;

/// Build a silent MPEG-1 Layer III stream (44.1 kHz, 128 kbps)
///
/// Every frame carries zeroed side info, so each one decodes to 1152 samples of
/// silence per channel.
pub fn silent_mp3(seconds: f64, stereo: bool) -> Vec<u8> {
    let frames = (seconds * 44_100.0 / MP3_FRAME_SAMPLES as f64).ceil() as usize;
    // sync + MPEG-1 + Layer III + no CRC, 128 kbps / 44.1 kHz, then channel mode
    let header: [u8; 4] = if stereo {
        [0xFF, 0xFB, 0x90, 0x04]
    } else {
        [0xFF, 0xFB, 0x90, 0xC4]
    };

    let mut out = Vec::with_capacity(frames * MP3_FRAME_BYTES);
    for _ in 0..frames {
        out.extend_from_slice(&header);
        out.resize(out.len() + MP3_FRAME_BYTES - header.len(), 0);
    }
    out
}

/// Number of MP3 frames `silent_mp3` emits for a duration
pub fn silent_mp3_frames(seconds: f64) -> usize {
    (seconds * 44_100.0 / MP3_FRAME_SAMPLES as f64).ceil() as usize
}

/// A 16-bit PCM WAV tone
pub fn tone_wav(sample_rate: u32, channels: u16, seconds: f64) -> Vec<u8> {
    let frames = (sample_rate as f64 * seconds) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f64 / sample_rate as f64;
        let value = ((t * 440.0 * std::f64::consts::TAU).sin() * 8_000.0) as i16;
        for _ in 0..channels {
            samples.push(value);
        }
    }
    encode_wav(&samples, sample_rate, channels).expect("encode fixture wav")
}

// ============================================================================
// Stub transcription endpoint
// ============================================================================

/// One request as seen by the stub endpoint
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

pub struct StubEndpoint {
    pub url: String,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
}

impl StubEndpoint {
    pub fn captured(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for StubEndpoint {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
    }
}

/// Serve a fixed response on `POST /transcribe`, optionally after a delay
pub async fn start_stub_endpoint(
    response_status: u16,
    response_body: &'static str,
    delay: Duration,
) -> StubEndpoint {
    let requests: Arc<Mutex<Vec<CapturedRequest>>> = Arc::default();
    let captured = Arc::clone(&requests);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new()
        .route(
            "/transcribe",
            post(move |headers: HeaderMap, payload: Bytes| {
                let captured = Arc::clone(&captured);
                async move {
                    captured.lock().unwrap().push(CapturedRequest {
                        headers,
                        body: payload.to_vec(),
                    });
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    let status = StatusCode::from_u16(response_status).unwrap();
                    (status, response_body).into_response()
                }
            }),
        )
        .layer(DefaultBodyLimit::disable());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    StubEndpoint {
        url: format!("http://{}/transcribe", addr),
        requests,
        shutdown: Some(shutdown_tx),
    }
}

/// An address nothing is listening on
pub async fn unused_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/transcribe", addr)
}

// ============================================================================
// Stub transcriber
// ============================================================================

/// Returns a canned outcome and remembers what it was asked to transcribe
pub struct StubTranscriber {
    outcome: TranscriptionOutcome,
    calls: AtomicUsize,
    received: Mutex<Vec<NormalizedAudio>>,
}

impl StubTranscriber {
    pub fn new(outcome: TranscriptionOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn received(&self) -> Vec<NormalizedAudio> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transcriber for StubTranscriber {
    async fn transcribe(&self, audio: &NormalizedAudio) -> TranscriptionOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.received.lock().unwrap().push(audio.clone());
        self.outcome.clone()
    }

    fn name(&self) -> &str {
        "stub"
    }
}
