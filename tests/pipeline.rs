//! End-to-end tests: plaintext → cover text, and bitstream → plaintext.

mod common;

use std::io::Write;

use common::{OfflineModel, RankedModel, ToyModel};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use windtexter_core::{
    encode, CipherMode, CodecConfig, CodecPipeline, CompressionMethod, CoverTextEncoder, SeedPrompt, Settings,
    StegoError, StopPolicy,
};

const KEY: &[u8; 16] = b"thisis16byteskey";
const IV: &[u8; 16] = b"initialvector123";

fn ofb() -> CodecConfig {
    CodecConfig::new(CompressionMethod::Utf8, CipherMode::Ofb, KEY, 128, Some(IV)).unwrap()
}

#[test]
fn cover_text_then_plaintext_recovery() {
    let model = ToyModel::new();
    let pipeline = CodecPipeline::new(&model);
    let cfg = ofb();

    let (bits, out) = pipeline.to_cover_text_with_bits("hi", &cfg, 4, &SeedPrompt::default()).unwrap();
    assert_eq!(bits.len(), 16);
    assert!(out.bits_embedded <= 16);
    assert_eq!(pipeline.from_bits(&bits, &cfg).unwrap(), "hi");
}

#[test]
fn to_cover_text_matches_manual_composition() {
    let model = ToyModel::new();
    let pipeline = CodecPipeline::new(&model);
    let cfg = ofb();
    let prompt = SeedPrompt::style(4).unwrap();

    let out = pipeline.to_cover_text("on my way", &cfg, 4, &prompt).unwrap();
    let bits = encode("on my way", &cfg).unwrap();
    let manual = CoverTextEncoder::new(&model).embed(&bits, 4, &prompt).unwrap();
    assert_eq!(out, manual);
}

#[test]
fn seeded_prompt_choice_is_reproducible() {
    let model = ToyModel::new();
    let pipeline = CodecPipeline::new(&model);
    let cfg = ofb();

    let mut a = ChaCha20Rng::seed_from_u64(2024);
    let mut b = ChaCha20Rng::seed_from_u64(2024);
    for _ in 0..3 {
        let pa = SeedPrompt::random(&mut a);
        let pb = SeedPrompt::random(&mut b);
        assert_eq!(
            pipeline.to_cover_text("ping", &cfg, 4, &pa).unwrap(),
            pipeline.to_cover_text("ping", &cfg, 4, &pb).unwrap()
        );
    }
}

#[test]
fn empty_plaintext_in_stream_mode_has_nothing_to_embed() {
    let model = ToyModel::new();
    let pipeline = CodecPipeline::new(&model);
    assert_eq!(
        pipeline.to_cover_text("", &ofb(), 4, &SeedPrompt::default()),
        Err(StegoError::EmptyBitstream)
    );
}

#[test]
fn codec_errors_propagate_unchanged() {
    let model = ToyModel::new();
    let pipeline = CodecPipeline::new(&model);
    let cfg = CodecConfig::with_passphrase(
        CompressionMethod::Utf8,
        CipherMode::Ecb,
        "pw",
        b"12345678",
        128,
        None,
    )
    .unwrap();
    let bits = encode("abc", &cfg).unwrap();
    // ECB pads to one block.
    assert_eq!(bits.len(), 128);
    let short = windtexter_core::Bitstream::from_bits(bits.as_slice()[..120].to_vec()).unwrap();
    assert!(matches!(pipeline.from_bits(&short, &cfg), Err(StegoError::DecryptionFailure { .. })));
}

#[test]
fn model_errors_propagate_unchanged() {
    let pipeline = CodecPipeline::new(&OfflineModel);
    assert!(matches!(
        pipeline.to_cover_text("hello", &ofb(), 4, &SeedPrompt::default()),
        Err(StegoError::ModelUnavailable(_))
    ));
}

#[test]
fn pipeline_with_configured_encoder() {
    let model = RankedModel::with_overrides(&[]);
    let encoder = CoverTextEncoder::new(&model).with_stop_policy(StopPolicy { max_terminal_marks: 2, max_words: 3 });
    let pipeline = CodecPipeline::with_encoder(encoder);
    let out = pipeline.to_cover_text("long enough message", &ofb(), 4, &SeedPrompt::default()).unwrap();
    assert_eq!(out.chunks_consumed, 4);
    assert_eq!(out.bits_embedded, 16);
}

#[test]
fn settings_file_drives_pipeline() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[encryption]\ncipher_mode = \"CBC\"\nkey_length = 128\n\n[compression]\nmethod = \"default\"\n\n[generation]\nchunk_width = 3\n"
    )
    .unwrap();

    let settings = Settings::load(file.path()).unwrap();
    let cfg = settings.codec_config(KEY, Some(IV)).unwrap();
    assert_eq!(cfg.mode(), CipherMode::Cbc);

    let model = ToyModel::new();
    let encoder = CoverTextEncoder::new(&model).with_stop_policy(settings.stop_policy());
    let pipeline = CodecPipeline::with_encoder(encoder);
    let (bits, out) = pipeline
        .to_cover_text_with_bits("config driven", &cfg, settings.chunk_width(), &SeedPrompt::default())
        .unwrap();
    assert_eq!(out.chunk_width, 3);
    assert!(out.bits_embedded <= bits.chunk_count(3) * 3);
    assert_eq!(pipeline.from_bits(&bits, &cfg).unwrap(), "config driven");
}

#[test]
fn missing_settings_file() {
    assert!(matches!(
        Settings::load("/nonexistent/windtexter.toml"),
        Err(windtexter_core::ConfigError::Io(_))
    ));
}
