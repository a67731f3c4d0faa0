//! Integration tests for the Bink codec adapter
//!
//! This test suite verifies:
//! - Encode/decode round trips through the reference engine
//! - Header extraction without decoding
//! - Capability gating (engine never touched when unsupported)
//! - Engine failure mapping and buffer release
//! - Format detection on arbitrary input
//! - Concurrent use from threads and blocking tasks

use bridge_reference::ReferenceEngine;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::{CompressionEngine, EngineAllocator, EngineBuffer, EngineMetadata};
use bytes::Bytes;
use core_codec::{
    AudioFormat, BinkCodec, CodecConfig, CodecError, CodecOperation, DecodedAudio, EncodedAudio,
    EngineCapability, QualityIndex, RuntimeCodec,
};
use mockall::mock;
use proptest::prelude::*;
use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const STEP: f32 = 1.0 / 32768.0;

// ============================================================================
// Helpers
// ============================================================================

mock! {
    Engine {}

    impl CompressionEngine for Engine {
        fn name(&self) -> &'static str;
        fn read_compressed_info(&self, data: &[u8]) -> Option<EngineMetadata>;
        fn expand(&self, data: &[u8], info: &EngineMetadata, output: &mut [u8]) -> BridgeResult<usize>;
        fn compress(
            &self,
            pcm: &[i16],
            sample_rate: u32,
            channels: u16,
            compression_level: u8,
            allocator: &EngineAllocator,
        ) -> BridgeResult<EngineBuffer>;
    }
}

fn sine(frequency: f32, sample_rate: u32, channels: u16, seconds: f32) -> DecodedAudio {
    let frames = (sample_rate as f32 * seconds) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        let value = 0.5 * (2.0 * std::f32::consts::PI * frequency * t).sin();
        for _ in 0..channels {
            samples.push(value);
        }
    }
    DecodedAudio::new(samples, sample_rate, channels)
}

fn reference_codec() -> BinkCodec {
    let config = CodecConfig::builder()
        .engine(Arc::new(ReferenceEngine::new()))
        .build()
        .expect("valid config");
    BinkCodec::new(&config)
}

fn mock_codec(engine: MockEngine) -> BinkCodec {
    let config = CodecConfig::builder()
        .engine(Arc::new(engine))
        .build()
        .expect("valid config");
    BinkCodec::new(&config)
}

fn max_error(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f32::max)
}

// ============================================================================
// Round Trips
// ============================================================================

#[test]
fn test_sine_round_trip_stereo_48k() {
    let codec = reference_codec();
    let pcm = sine(440.0, 48_000, 2, 1.0);
    assert_eq!(pcm.frames, 48_000);

    let encoded = codec.encode(&pcm, QualityIndex::MAX).unwrap();
    assert_eq!(encoded.format, AudioFormat::Bink);
    assert!(!encoded.is_empty());

    let decoded = codec.decode(&encoded).unwrap();
    assert_eq!(decoded.channels, 2);
    assert_eq!(decoded.sample_rate, 48_000);
    assert_eq!(decoded.frames, pcm.frames);
    assert_eq!(decoded.samples.len(), pcm.samples.len());
    assert!((decoded.duration.as_secs_f64() - 1.0).abs() < 1e-6);

    // Best quality is lossless at 16 bits.
    assert!(max_error(&pcm.samples, &decoded.samples) <= STEP + f32::EPSILON);
}

#[test]
fn test_lowest_quality_is_lossy_but_bounded() {
    let codec = reference_codec();
    let pcm = sine(440.0, 48_000, 1, 0.1);

    let encoded = codec.encode(&pcm, QualityIndex::MIN).unwrap();
    let decoded = codec.decode(&encoded).unwrap();

    // Quality 1 maps to level 4: the four low bits are dropped.
    let error = max_error(&pcm.samples, &decoded.samples);
    assert!(error <= 17.0 * STEP);
}

#[test]
fn test_quality_is_clamped_at_api_boundary() {
    let codec = reference_codec();
    let pcm = sine(220.0, 8_000, 1, 0.05);

    let below = codec.encode(&pcm, QualityIndex::new(-3)).unwrap();
    let lowest = codec.encode(&pcm, QualityIndex::MIN).unwrap();
    assert_eq!(below, lowest);

    let above = codec.encode(&pcm, QualityIndex::new(500)).unwrap();
    let highest = codec.encode(&pcm, QualityIndex::MAX).unwrap();
    assert_eq!(above, highest);
}

#[test]
fn test_encode_empty_pcm_fails() {
    let codec = reference_codec();
    let pcm = DecodedAudio::new(Vec::new(), 48_000, 2);

    let err = codec.encode(&pcm, QualityIndex::new(20)).unwrap_err();
    assert!(matches!(err, CodecError::EmptyInput));
}

#[test]
fn test_decode_foreign_data_fails() {
    let codec = reference_codec();
    let wav = EncodedAudio::new(&b"RIFF\x24\x00\x00\x00WAVEfmt "[..], AudioFormat::Wav);

    let err = codec.decode(&wav).unwrap_err();
    assert!(err.is_format_error());
}

// ============================================================================
// Header Info
// ============================================================================

#[test]
fn test_header_info_matches_encoded_stream() -> anyhow::Result<()> {
    let codec = reference_codec();
    let pcm = sine(440.0, 48_000, 2, 1.0);
    let encoded = codec.encode(&pcm, QualityIndex::new(30))?;

    let header = codec.get_header_info(&encoded)?;
    assert_eq!(header.format, AudioFormat::Bink);
    assert_eq!(header.sample_rate, 48_000);
    assert_eq!(header.channels, 2);
    assert_eq!(header.duration, Duration::from_secs(1));
    assert_eq!(
        header.pcm_data_size,
        pcm.frames * pcm.channels as usize * std::mem::size_of::<f32>()
    );

    // The header agrees with a full decode.
    let decoded = codec.decode(&encoded)?;
    assert_eq!(header.pcm_data_size, decoded.samples.len() * 4);
    Ok(())
}

#[test]
fn test_header_info_on_empty_buffer_fails() {
    let codec = reference_codec();
    let err = codec
        .get_header_info(&EncodedAudio::new(Bytes::new(), AudioFormat::Bink))
        .unwrap_err();
    assert!(matches!(err, CodecError::HeaderParseFailed(_)));
}

// ============================================================================
// Format Detection
// ============================================================================

#[test]
fn test_check_format_accepts_own_output() {
    let codec = reference_codec();
    let encoded = codec
        .encode(&sine(440.0, 44_100, 2, 0.1), QualityIndex::MAX)
        .unwrap();
    assert!(codec.check_format(&encoded));
}

#[test]
fn test_check_format_rejects_empty_and_truncated() {
    let codec = reference_codec();
    let encoded = codec
        .encode(&sine(440.0, 44_100, 2, 0.1), QualityIndex::MAX)
        .unwrap();

    assert!(!codec.check_format(&EncodedAudio::new(Bytes::new(), AudioFormat::Bink)));

    let header_only = EncodedAudio::new(encoded.data.slice(..8), AudioFormat::Bink);
    assert!(!codec.check_format(&header_only));

    let short_payload = EncodedAudio::new(encoded.data.slice(..encoded.len() - 1), AudioFormat::Bink);
    assert!(!codec.check_format(&short_payload));
}

proptest! {
    #[test]
    fn check_format_rejects_random_bytes(data in proptest::collection::vec(any::<u8>(), 0..1024)) {
        let codec = reference_codec();
        prop_assert!(!codec.check_format(&EncodedAudio::new(data, AudioFormat::Unknown)));
    }

    #[test]
    fn check_format_rejects_any_truncation(cut in 0usize..4096) {
        let codec = reference_codec();
        let encoded = codec
            .encode(&sine(440.0, 8_000, 2, 0.0625), QualityIndex::MAX)
            .unwrap();
        let cut = cut.min(encoded.len() - 1);

        let truncated = EncodedAudio::new(encoded.data.slice(..cut), AudioFormat::Bink);
        prop_assert!(!codec.check_format(&truncated));
    }
}

// ============================================================================
// Capability Gating
// ============================================================================

#[test]
fn test_disabled_capability_never_touches_engine() {
    // No expectations: any engine call panics the test.
    let engine = MockEngine::new();
    let config = CodecConfig::builder()
        .engine(Arc::new(engine))
        .capability(EngineCapability::Disabled)
        .platform("Web")
        .build()
        .unwrap();
    let codec = BinkCodec::new(&config);

    let encoded = EncodedAudio::new(vec![0u8; 64], AudioFormat::Bink);
    let pcm = sine(440.0, 48_000, 2, 0.01);

    assert!(!codec.check_format(&encoded));

    for (result, expected) in [
        (codec.get_header_info(&encoded).map(|_| ()), CodecOperation::HeaderInfo),
        (codec.encode(&pcm, QualityIndex::MAX).map(|_| ()), CodecOperation::Encode),
        (codec.decode(&encoded).map(|_| ()), CodecOperation::Decode),
    ] {
        match result {
            Err(CodecError::UnsupportedOnPlatform { platform, operation }) => {
                assert_eq!(platform, "Web");
                assert_eq!(operation, expected);
            }
            other => panic!("expected UnsupportedOnPlatform, got {:?}", other),
        }
    }
}

#[test]
fn test_missing_engine_is_unsupported() {
    let codec = BinkCodec::with_binding(core_codec::EngineBinding::unsupported());

    let encoded = EncodedAudio::new(vec![0u8; 16], AudioFormat::Bink);
    assert!(!codec.check_format(&encoded));
    assert!(codec.decode(&encoded).unwrap_err().is_unsupported());
}

// ============================================================================
// Engine Failures
// ============================================================================

#[test]
fn test_empty_engine_output_is_engine_failure() {
    let mut engine = MockEngine::new();
    engine
        .expect_compress()
        .times(1)
        .returning(|_, _, _, _, allocator| Ok(allocator.allocate(0)));

    let codec = mock_codec(engine);
    let err = codec
        .encode(&sine(440.0, 48_000, 2, 0.01), QualityIndex::MAX)
        .unwrap_err();
    assert!(matches!(err, CodecError::EngineFailure(_)));
}

#[test]
fn test_engine_receives_mapped_level_and_layout() {
    let mut engine = MockEngine::new();
    engine.expect_name().return_const("mock");
    engine
        .expect_compress()
        .withf(|pcm, rate, channels, level, _| {
            pcm.len() == 4 && *rate == 22_050 && *channels == 2 && *level == 2
        })
        .times(1)
        .returning(|_, _, _, _, allocator| {
            let mut buffer = allocator.allocate(3);
            buffer.copy_from_slice(&[1, 2, 3]);
            Ok(buffer)
        });

    let codec = mock_codec(engine);
    let pcm = DecodedAudio::new(vec![0.1, -0.1, 0.2, -0.2], 22_050, 2);
    let encoded = codec.encode(&pcm, QualityIndex::new(20)).unwrap();
    assert_eq!(&encoded.data[..], &[1, 2, 3]);
}

#[test]
fn test_short_fill_is_engine_failure() {
    let mut engine = MockEngine::new();
    engine
        .expect_read_compressed_info()
        .returning(|_| Some(EngineMetadata::new(48_000, 2, Duration::from_millis(1), 8)));
    engine
        .expect_expand()
        .times(1)
        .returning(|_, _, output| Ok(output.len() / 2));

    let codec = mock_codec(engine);
    let err = codec
        .decode(&EncodedAudio::new(vec![0u8; 32], AudioFormat::Bink))
        .unwrap_err();
    assert!(matches!(err, CodecError::EngineFailure(_)));
}

#[test]
fn test_engine_error_is_engine_failure() {
    let mut engine = MockEngine::new();
    engine
        .expect_read_compressed_info()
        .returning(|_| Some(EngineMetadata::new(48_000, 2, Duration::from_millis(1), 8)));
    engine
        .expect_expand()
        .returning(|_, _, _| Err(BridgeError::Malformed("corrupt block".to_string())));

    let codec = mock_codec(engine);
    let err = codec
        .decode(&EncodedAudio::new(vec![0u8; 32], AudioFormat::Bink))
        .unwrap_err();
    assert!(matches!(err, CodecError::EngineFailure(msg) if msg.contains("corrupt block")));
}

#[test]
fn test_zero_size_header_is_not_recognized() {
    let mut engine = MockEngine::new();
    engine
        .expect_read_compressed_info()
        .returning(|_| Some(EngineMetadata::new(48_000, 2, Duration::ZERO, 0)));

    let codec = mock_codec(engine);
    let encoded = EncodedAudio::new(vec![0u8; 32], AudioFormat::Bink);
    assert!(!codec.check_format(&encoded));
    assert!(codec.get_header_info(&encoded).unwrap_err().is_format_error());
}

// ============================================================================
// Buffer Ownership
// ============================================================================

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
static RELEASES: AtomicUsize = AtomicUsize::new(0);

unsafe extern "C" fn counting_alloc(bytes: usize) -> *mut c_void {
    ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
    (EngineAllocator::aligned().alloc_fn())(bytes)
}

unsafe extern "C" fn counting_free(ptr: *mut c_void) {
    RELEASES.fetch_add(1, Ordering::SeqCst);
    (EngineAllocator::aligned().free_fn())(ptr)
}

#[test]
fn test_engine_buffers_are_released_on_success_and_failure() {
    let allocator = EngineAllocator::new(counting_alloc, counting_free);

    // Success path through the reference engine.
    let config = CodecConfig::builder()
        .engine(Arc::new(ReferenceEngine::new()))
        .allocator(allocator)
        .build()
        .unwrap();
    let codec = BinkCodec::new(&config);
    codec
        .encode(&sine(440.0, 8_000, 1, 0.1), QualityIndex::MAX)
        .unwrap();
    assert_eq!(ALLOCATIONS.load(Ordering::SeqCst), 1);
    assert_eq!(RELEASES.load(Ordering::SeqCst), 1);

    // Failure path: the engine hands back an empty buffer.
    let mut engine = MockEngine::new();
    engine
        .expect_compress()
        .returning(|_, _, _, _, allocator| Ok(allocator.allocate(0)));
    let config = CodecConfig::builder()
        .engine(Arc::new(engine))
        .allocator(allocator)
        .build()
        .unwrap();
    let codec = BinkCodec::new(&config);
    assert!(codec
        .encode(&sine(440.0, 8_000, 1, 0.1), QualityIndex::MAX)
        .is_err());
    assert_eq!(ALLOCATIONS.load(Ordering::SeqCst), 2);
    assert_eq!(RELEASES.load(Ordering::SeqCst), 2);
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_shared_codec_across_threads() {
    let codec = Arc::new(reference_codec());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let codec = codec.clone();
            std::thread::spawn(move || {
                let pcm = sine(200.0 + i as f32 * 50.0, 16_000, 1 + (i % 2) as u16, 0.25);
                let encoded = codec.encode(&pcm, QualityIndex::MAX).unwrap();
                let decoded = codec.decode(&encoded).unwrap();
                assert_eq!(decoded.frames, pcm.frames);
                assert_eq!(decoded.channels, pcm.channels);
                max_error(&pcm.samples, &decoded.samples)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap() <= STEP + f32::EPSILON);
    }
}

#[test]
fn test_serialized_engine_access_round_trips() {
    let config = CodecConfig::builder()
        .engine(Arc::new(ReferenceEngine::new()))
        .serialize_engine_access(true)
        .build()
        .unwrap();
    let codec = BinkCodec::new(&config);
    assert!(codec.binding().is_serialized());

    let pcm = sine(440.0, 8_000, 2, 0.1);
    let decoded = codec
        .decode(&codec.encode(&pcm, QualityIndex::MAX).unwrap())
        .unwrap();
    assert_eq!(decoded.frames, pcm.frames);
}

#[tokio::test]
async fn test_offload_to_blocking_pool() {
    let codec: Arc<dyn RuntimeCodec> = Arc::new(reference_codec());
    let pcm = sine(440.0, 48_000, 2, 0.5);

    let encoder = codec.clone();
    let encoded = tokio::task::spawn_blocking(move || encoder.encode(&pcm, QualityIndex::MAX))
        .await
        .unwrap()
        .unwrap();

    let decoder = codec.clone();
    let decoded = tokio::task::spawn_blocking(move || decoder.decode(&encoded))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(decoded.frames, 24_000);
    assert_eq!(decoded.sample_rate, 48_000);
}
