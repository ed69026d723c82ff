use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chatcrypt::{
    create_cipher, AlgorithmKind, BlockCipher, CipherConfig, CipherContext, CipherMode, DhKeyPair, DhParameters,
    PaddingScheme, SessionKeys,
};

fn context(algorithm: AlgorithmKind, mode: CipherMode, workers: usize) -> CipherContext {
    let config = CipherConfig::with_algorithms(algorithm, mode, PaddingScheme::Pkcs7).with_workers(workers);
    CipherContext::from_config(&[0x42u8; 16], &[0x24u8; 16], config).unwrap()
}

fn benchmark_block_ciphers(c: &mut Criterion) {
    let mut group = c.benchmark_group("block_cipher");
    group.throughput(Throughput::Bytes(16));

    for algorithm in AlgorithmKind::ALL {
        let mut cipher = create_cipher(algorithm);
        cipher.set_key(&[7u8; 16]).unwrap();
        let block = [0x5Au8; 16];

        group.bench_function(BenchmarkId::new("encrypt_block", algorithm), |b| {
            b.iter(|| black_box(cipher.encrypt_block(black_box(&block)).unwrap()));
        });
        group.bench_function(BenchmarkId::new("decrypt_block", algorithm), |b| {
            b.iter(|| black_box(cipher.decrypt_block(black_box(&block)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("modes");
    let data = vec![0x42u8; 64 * 1024];
    group.throughput(Throughput::Bytes(data.len() as u64));

    for mode in CipherMode::ALL {
        let ctx = context(AlgorithmKind::Rc5, mode, 1);
        group.bench_with_input(BenchmarkId::new("encrypt", mode), &data, |b, data| {
            b.iter(|| black_box(ctx.encrypt(data).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("parallel");
    let data = vec![0x42u8; 1024 * 1024];
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    for workers in [1usize, 2, 4, 8] {
        for mode in [CipherMode::Ecb, CipherMode::Ctr] {
            let ctx = context(AlgorithmKind::Magenta, mode, workers);
            let id = BenchmarkId::new(mode.to_string(), workers);
            group.bench_with_input(id, &data, |b, data| {
                b.iter(|| black_box(ctx.encrypt(data).unwrap()));
            });
        }
    }

    group.finish();
}

fn benchmark_streaming(c: &mut Criterion) {
    let mut group = c.benchmark_group("streaming");

    // 1MB of data
    let data = vec![0x42u8; 1024 * 1024];
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.sample_size(20);

    for buffer_blocks in [64usize, 256, 1024, 4096] {
        let config = CipherConfig::with_algorithms(AlgorithmKind::Rc5, CipherMode::Cbc, PaddingScheme::Pkcs7)
            .with_stream_buffer_blocks(buffer_blocks);
        let ctx = CipherContext::from_config(&[1u8; 16], &[2u8; 16], config).unwrap();

        group.bench_with_input(BenchmarkId::new("encrypt_stream", buffer_blocks), &data, |b, data| {
            b.iter(|| {
                let mut out = Vec::with_capacity(data.len() + 16);
                ctx.encrypt_stream(Cursor::new(data), &mut out).unwrap();
                black_box(out)
            });
        });
    }

    group.finish();
}

fn benchmark_key_exchange(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_exchange");
    group.sample_size(10);

    group.bench_function("generate_prime_512", |b| {
        b.iter(|| black_box(DhParameters::generate(512).unwrap()));
    });

    let params = DhParameters::generate(1024).unwrap();
    group.bench_function("key_pair_1024", |b| {
        b.iter(|| black_box(DhKeyPair::generate(&params).unwrap()));
    });

    let alice = DhKeyPair::generate(&params).unwrap();
    let bob = DhKeyPair::generate(&params).unwrap();
    group.bench_function("shared_secret_and_derive_1024", |b| {
        b.iter(|| {
            let secret = alice.shared_secret(bob.public_key(), &params).unwrap();
            black_box(SessionKeys::derive(&secret))
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_block_ciphers,
    benchmark_modes,
    benchmark_parallel,
    benchmark_streaming,
    benchmark_key_exchange
);
criterion_main!(benches);
