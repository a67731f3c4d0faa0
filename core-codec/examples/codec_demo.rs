//! Codec round-trip demonstration
//!
//! Encodes a two second 440 Hz stereo tone with the reference engine, reads
//! the stream header back, then decodes it and reports the reconstruction
//! error.
//!
//! Run with:
//! ```bash
//! # Pretty logs, best quality
//! cargo run -p core-codec --example codec_demo
//!
//! # JSON logs at quality 1
//! cargo run -p core-codec --example codec_demo -- json 1
//! ```

use bridge_traits::logging::{ConsoleLogger, LogLevel};
use core_codec::{BinkCodec, CodecConfig, DecodedAudio, QualityIndex, RuntimeCodec};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use std::env;
use std::sync::Arc;

fn tone(frequency: f32, sample_rate: u32, channels: u16, seconds: f32) -> DecodedAudio {
    let frames = (sample_rate as f32 * seconds) as usize;
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for frame in 0..frames {
        let t = frame as f32 / sample_rate as f32;
        let value = 0.5 * (2.0 * std::f32::consts::PI * frequency * t).sin();
        samples.extend(std::iter::repeat(value).take(channels as usize));
    }
    DecodedAudio::new(samples, sample_rate, channels)
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };
    let quality = args
        .get(2)
        .and_then(|q| q.parse::<i32>().ok())
        .map(QualityIndex::new)
        .unwrap_or(QualityIndex::MAX);

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug)
            .with_operation_timing(true)
            .with_logger_sink(Arc::new(ConsoleLogger::new(LogLevel::Warn))),
    )?;

    let codec = BinkCodec::new(&CodecConfig::builder().build()?);
    let pcm = tone(440.0, 48_000, 2, 2.0);

    let encoded = codec.encode(&pcm, quality)?;
    println!("{} at quality {}", encoded, quality);

    anyhow::ensure!(codec.check_format(&encoded), "encoder output not recognized");

    let header = codec.get_header_info(&encoded)?;
    println!("{}", header);

    let decoded = codec.decode(&encoded)?;
    println!("{}", decoded);

    let max_error = pcm
        .samples
        .iter()
        .zip(&decoded.samples)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    println!(
        "Compression ratio: {:.2}, max sample error: {:.6}",
        (pcm.samples.len() * 4) as f64 / encoded.len() as f64,
        max_error
    );

    Ok(())
}
