// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

#![allow(missing_docs)]

use std::{fs, io, path::Path};

use qsufsort::{QuickSuffixSorter, SortError, SuffixSorter};
use rastore::{
    FileStore, FileStoreFactory, MemoryStore, MemoryStoreFactory, MmapStoreFactory, RandomAccess,
    StoreFactory,
};

/// Reference implementation: sort all suffixes, empty suffix included, by
/// direct comparison.
fn naive_suffix_array(data: &[u8]) -> Vec<i32> {
    let mut sa: Vec<i32> = (0..=data.len() as i32).collect();
    sa.sort_by(|&a, &b| data[a as usize..].cmp(&data[b as usize..]));
    sa
}

fn store_ints<S: RandomAccess>(store: &mut S, count: i32) -> Vec<i32> {
    (0..count).map(|i| store.read_int_at(i).unwrap()).collect()
}

fn sort_with<F: StoreFactory>(factory: F, data: &[u8]) -> Vec<i32> {
    let mut data = MemoryStore::from_vec(data.to_vec());
    let mut suffix_array = QuickSuffixSorter::new(factory).suffix_sort(&mut data).unwrap();
    let count = data.len() as i32 + 1;
    store_ints(&mut suffix_array, count)
}

#[test]
fn empty_input() {
    assert_eq!(sort_with(MemoryStoreFactory, b""), [0]);
}

#[test]
fn single_byte() {
    assert_eq!(sort_with(MemoryStoreFactory, b"x"), [1, 0]);
}

#[test]
fn banana() {
    assert_eq!(sort_with(MemoryStoreFactory, b"banana"), [6, 5, 3, 1, 0, 4, 2]);
}

#[test]
fn mississippi_matches_naive() {
    let data = b"mississippi";

    assert_eq!(sort_with(MemoryStoreFactory, data), naive_suffix_array(data));
}

#[test]
fn all_identical_bytes() {
    // Every prefix ties, so suffixes sort purely by decreasing length. This
    // drives the doubling loop through its worst-case number of passes.
    let n = 1000;
    let data = vec![b'a'; n];

    let expected: Vec<i32> = (0..=n as i32).rev().collect();
    assert_eq!(sort_with(MemoryStoreFactory, &data), expected);
}

#[test]
fn repetitive_input_matches_naive() {
    let data: Vec<u8> = b"abcab".iter().copied().cycle().take(500).collect();

    assert_eq!(sort_with(MemoryStoreFactory, &data), naive_suffix_array(&data));
}

#[test]
fn all_byte_values_match_naive() {
    let data: Vec<u8> = (0..=255u8).cycle().take(700).collect();

    assert_eq!(sort_with(MemoryStoreFactory, &data), naive_suffix_array(&data));
}

#[test]
fn repeated_sorts_are_identical() {
    let data: Vec<u8> = b"the quick brown fox jumped over the lazy dog"
        .iter()
        .copied()
        .cycle()
        .take(300)
        .collect();

    assert_eq!(
        sort_with(MemoryStoreFactory, &data),
        sort_with(MemoryStoreFactory, &data),
    );
}

#[test]
fn backends_agree() {
    let data: Vec<u8> = b"compare all three storage backends".repeat(8);

    let from_memory = sort_with(MemoryStoreFactory, &data);
    let from_file = sort_with(FileStoreFactory::new(), &data);
    let from_mmap = sort_with(MmapStoreFactory::new(), &data);

    assert_eq!(from_memory, naive_suffix_array(&data));
    assert_eq!(from_file, from_memory);
    assert_eq!(from_mmap, from_memory);
}

#[test]
fn file_backed_data_buffer() {
    // The data buffer itself may live behind any store, not just memory.
    let path = Path::new(env!("CARGO_TARGET_TMPDIR")).join("banana.data");
    fs::write(&path, b"banana").unwrap();
    let mut data = FileStore::open(&path).unwrap();

    let suffix_array = QuickSuffixSorter::new(MemoryStoreFactory)
        .suffix_sort(&mut data)
        .unwrap();

    assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
}

#[test]
fn trait_object_data() {
    let mut data = MemoryStore::from_vec(b"banana".to_vec());
    let data: &mut dyn RandomAccess = &mut data;

    let sorter = QuickSuffixSorter::new(MemoryStoreFactory);
    let suffix_array = SuffixSorter::suffix_sort(&sorter, data).unwrap();

    assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
}

/// A data buffer claiming a length beyond the 32-bit indexing limit. Reads
/// must never happen.
struct OversizedData;

impl RandomAccess for OversizedData {
    fn seek(&mut self, _pos: u64) -> io::Result<()> {
        unreachable!("oversized data must be rejected before any access");
    }

    fn read_int(&mut self) -> io::Result<i32> {
        unreachable!("oversized data must be rejected before any access");
    }

    fn write_int(&mut self, _value: i32) -> io::Result<()> {
        unreachable!("oversized data must be rejected before any access");
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        unreachable!("oversized data must be rejected before any access");
    }

    fn len(&self) -> u64 {
        u64::from(u32::MAX)
    }
}

/// A factory that fails the test if the sorter tries to allocate.
struct NoAllocFactory;

impl StoreFactory for NoAllocFactory {
    type Store = MemoryStore;

    fn create(&self, _len: u64) -> io::Result<MemoryStore> {
        panic!("no storage may be allocated for an oversized input");
    }
}

#[test]
fn oversized_input_rejected_before_allocation() {
    let mut data = OversizedData;

    let result = QuickSuffixSorter::new(NoAllocFactory).suffix_sort(&mut data);

    assert!(matches!(result, Err(SortError::InputTooLarge(len)) if len == u64::from(u32::MAX)));
}

/// A store whose reads and writes all fail, for exercising the failure path.
#[derive(Debug)]
struct BrokenStore;

impl RandomAccess for BrokenStore {
    fn seek(&mut self, _pos: u64) -> io::Result<()> {
        Ok(())
    }

    fn read_int(&mut self) -> io::Result<i32> {
        Err(io::Error::other("broken medium"))
    }

    fn write_int(&mut self, _value: i32) -> io::Result<()> {
        Err(io::Error::other("broken medium"))
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        Err(io::Error::other("broken medium"))
    }

    fn len(&self) -> u64 {
        64
    }
}

struct BrokenFactory;

impl StoreFactory for BrokenFactory {
    type Store = BrokenStore;

    fn create(&self, _len: u64) -> io::Result<BrokenStore> {
        Ok(BrokenStore)
    }
}

#[test]
fn storage_failure_is_tagged_with_init_phase() {
    let mut data = MemoryStore::from_vec(b"banana".to_vec());

    let result = QuickSuffixSorter::new(BrokenFactory).suffix_sort(&mut data);

    match result {
        Err(SortError::Storage { phase, .. }) => {
            assert_eq!(phase, qsufsort::SortPhase::Init);
        }
        other => panic!("expected a storage error, got {other:?}"),
    }
}
