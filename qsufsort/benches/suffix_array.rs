// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use qsufsort::QuickSuffixSorter;
use rastore::{MemoryStore, MemoryStoreFactory};

const SIZES: [usize; 3] = [1 << 10, 1 << 14, 1 << 17];

/// Deterministic xorshift filler so the bench needs no checked-in test data.
fn pseudo_random(len: usize) -> Vec<u8> {
    let mut state: u32 = 0x9e37_79b9;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state >> 24) as u8
        })
        .collect()
}

fn sort(data: &[u8]) {
    let mut data = MemoryStore::from_vec(data.to_vec());
    QuickSuffixSorter::new(MemoryStoreFactory)
        .suffix_sort(&mut data)
        .unwrap();
}

fn construct(c: &mut Criterion) {
    let mut group = c.benchmark_group("construct");

    for size in SIZES {
        let random = pseudo_random(size);
        group
            .throughput(Throughput::Bytes(size as u64 + 1))
            .bench_with_input(BenchmarkId::new("random", size), &random, |b, data| {
                b.iter(|| sort(data));
            });

        // Long tie runs maximize the number of doubling passes.
        let uniform = vec![b'a'; size];
        group
            .throughput(Throughput::Bytes(size as u64 + 1))
            .bench_with_input(BenchmarkId::new("uniform", size), &uniform, |b, data| {
                b.iter(|| sort(data));
            });
    }

    group.finish();
}

criterion_group!(benches, construct);
criterion_main!(benches);
