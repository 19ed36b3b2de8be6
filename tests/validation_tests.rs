// Integration tests for input validation
//
// The validator only looks at the declared name and byte length, so these tests
// use zero-filled buffers rather than real audio.

use audioink::audio::{
    validate, AudioArtifact, AudioFormat, InputError, ValidationPolicy, ValidationResult,
    DEFAULT_MAX_FILE_SIZE_BYTES,
};

fn artifact(name: &str, size: usize) -> AudioArtifact {
    AudioArtifact::new(name, vec![0u8; size])
}

#[test]
fn test_missing_artifact_is_rejected_as_no_file() {
    let result = validate(None, &ValidationPolicy::default());

    assert_eq!(result, ValidationResult::Invalid(InputError::NoFile));
    assert_eq!(result.reason().map(InputError::reason), Some("no file"));
}

#[test]
fn test_every_supported_extension_is_accepted() {
    let policy = ValidationPolicy::default();

    for ext in ["mp3", "mp4", "mpeg", "mpga", "m4a", "wav", "webm"] {
        let candidate = artifact(&format!("clip.{}", ext), 128);
        assert!(
            validate(Some(&candidate), &policy).is_valid(),
            "{} should be accepted",
            ext
        );
    }
}

#[test]
fn test_extension_check_is_case_insensitive() {
    let policy = ValidationPolicy::default();

    assert!(validate(Some(&artifact("Interview.MP3", 10)), &policy).is_valid());
    assert!(validate(Some(&artifact("memo.WebM", 10)), &policy).is_valid());
}

#[test]
fn test_oversized_artifact_is_too_large_regardless_of_extension() {
    let policy = ValidationPolicy::new(1024);

    for name in ["a.wav", "a.mp3", "a.txt", "no-extension", "a.flac"] {
        let result = validate(Some(&artifact(name, 1025)), &policy);
        match result {
            ValidationResult::Invalid(InputError::TooLarge { size, max }) => {
                assert_eq!(size, 1025);
                assert_eq!(max, 1024);
            }
            other => panic!("{} should be too large, got {:?}", name, other),
        }
    }
}

#[test]
fn test_size_at_the_limit_is_accepted() {
    let policy = ValidationPolicy::new(1024);

    assert!(validate(Some(&artifact("edge.wav", 1024)), &policy).is_valid());
}

#[test]
fn test_unsupported_extension_is_rejected_regardless_of_size() {
    let policy = ValidationPolicy::new(1024);

    for size in [0, 1, 512, 1024] {
        for name in ["notes.txt", "song.flac", "movie.mkv", "archive.tar.gz", "README"] {
            let result = validate(Some(&artifact(name, size)), &policy);
            assert!(!result.is_valid(), "{} ({} bytes) should be rejected", name, size);
            assert_eq!(
                result.reason().map(InputError::reason),
                Some("unsupported format")
            );
        }
    }
}

#[test]
fn test_extension_must_be_a_suffix() {
    let policy = ValidationPolicy::default();

    let result = validate(Some(&artifact("wav.backup", 10)), &policy);
    assert!(!result.is_valid());

    let result = validate(Some(&artifact("mp3", 10)), &policy);
    assert!(!result.is_valid(), "a bare name is not an extension");
}

#[test]
fn test_policy_can_narrow_the_supported_set() {
    let policy = ValidationPolicy {
        max_size: DEFAULT_MAX_FILE_SIZE_BYTES,
        supported: vec![AudioFormat::Wav],
    };

    assert!(validate(Some(&artifact("a.wav", 10)), &policy).is_valid());

    let err = validate(Some(&artifact("a.mp3", 10)), &policy)
        .into_result()
        .unwrap_err();
    assert_eq!(
        err,
        InputError::UnsupportedFormat {
            found: "mp3".to_string(),
            supported: "wav".to_string(),
        }
    );
}

#[test]
fn test_thirty_megabyte_wav_is_rejected_with_default_policy() {
    let upload = artifact("long-meeting.wav", 30 * 1000 * 1000);

    let result = validate(Some(&upload), &ValidationPolicy::default());

    let err = result.into_result().unwrap_err();
    assert_eq!(err.reason(), "too large");
    assert!(err.to_string().starts_with("too large"));
}

#[test]
fn test_default_ceiling_is_25_mib() {
    assert_eq!(DEFAULT_MAX_FILE_SIZE_BYTES, 26_214_400);
    assert_eq!(ValidationPolicy::default().max_size, 26_214_400);
    assert_eq!(ValidationPolicy::default().supported.len(), 7);
}

#[test]
fn test_recording_name_follows_mime_type() {
    let webm = AudioArtifact::recording(vec![1, 2, 3], Some("audio/webm;codecs=opus".to_string()));
    assert_eq!(webm.name, "recording.webm");
    assert_eq!(webm.format(), Some(AudioFormat::Webm));

    let unknown = AudioArtifact::recording(vec![1, 2, 3], Some("audio/ogg".to_string()));
    assert_eq!(unknown.name, "recording.wav");

    let bare = AudioArtifact::recording(vec![1, 2, 3], None);
    assert_eq!(bare.name, "recording.wav");
    assert!(validate(Some(&bare), &ValidationPolicy::default()).is_valid());
}

#[test]
fn test_format_aliases_share_the_mp3_decoder() {
    assert_eq!(AudioFormat::Mpeg.hint_extension(), "mp3");
    assert_eq!(AudioFormat::Mpga.hint_extension(), "mp3");
    assert_eq!(AudioFormat::M4a.hint_extension(), "m4a");
    assert!(AudioFormat::Wav.is_canonical());
    assert!(!AudioFormat::Webm.is_canonical());
}
