//! Criterion benchmarks for Polydict.
//!
//! Covers the pieces on the request path:
//! - Request text decoding
//! - Tokenization through the facade with each built-in engine
//! - A full multi-dictionary request through the service

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use polydict::dictionary::DictionaryRegistry;
use polydict::server::decode::decode_text;
use polydict::server::{ServerConfig, TokenizeService};
use polydict::tokenizer::Tokenizer;

const SENTENCES: &[&str] = &[
    "すもももももももものうち",
    "東京タワーへ行く",
    "Rust 2024で書かれたトークナイザー",
    "The quick brown fox jumps over the lazy dog.",
    "今日は良い天気ですね。明日も晴れるでしょう。",
];

/// Generate a text of roughly `chars` characters from the sample sentences.
fn generate_text(chars: usize) -> String {
    let mut text = String::new();
    for sentence in SENTENCES.iter().cycle() {
        if text.chars().count() >= chars {
            break;
        }
        text.push_str(sentence);
    }
    text
}

/// Percent-encode every byte of `text`.
fn encode(text: &str) -> String {
    text.bytes().map(|b| format!("%{b:02X}")).collect()
}

/// Benchmark request text decoding.
fn bench_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("decoding");
    let encoded = encode(&generate_text(512));

    group.throughput(Throughput::Bytes(encoded.len() as u64));
    group.bench_function("decode_utf8_512_chars", |b| {
        b.iter(|| decode_text(black_box(&encoded), "utf-8").unwrap())
    });

    group.finish();
}

/// Benchmark tokenization with each built-in engine.
fn bench_tokenization(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenization");
    let registry = DictionaryRegistry::with_builtin_engines();
    let text = generate_text(512);

    group.throughput(Throughput::Elements(1));
    for name in registry.names() {
        let tokenizer = Tokenizer::for_dictionary(&registry, Some(&name)).unwrap();
        tokenizer.warm_up().unwrap();
        group.bench_function(format!("tokenize_{name}"), |b| {
            b.iter(|| tokenizer.tokenize(black_box(&text)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark a full request across every dictionary.
fn bench_service(c: &mut Criterion) {
    let mut group = c.benchmark_group("service");
    group.sample_size(50);

    let config = ServerConfig {
        render_command: None,
        ..Default::default()
    };
    let service = TokenizeService::new(Arc::new(DictionaryRegistry::with_builtin_engines()), config);
    service.preload();
    let encoded = encode(&generate_text(512));

    group.throughput(Throughput::Elements(service.dictionary_names().len() as u64));
    group.bench_function("tokenize_all_dictionaries", |b| {
        b.iter(|| service.tokenize(black_box(&encoded), "utf-8", 0).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_decoding, bench_tokenization, bench_service);
criterion_main!(benches);
