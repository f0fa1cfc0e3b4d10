// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Prefix-doubling suffix sorting over random-access storage.
//!
//! This crate implements the qsufsort algorithm of N. Jesper Larsson and
//! Kunihiko Sadakane ("Faster Suffix Sorting"): suffixes are first grouped by
//! their leading byte with a counting sort, then repeatedly refined by
//! comparing ranks at a doubling offset h = 1, 2, 4, … until every suffix
//! occupies its own group. The result is the suffix array of the input: the
//! permutation of buffer offsets that lists all suffixes in lexicographic
//! order, with the empty suffix at offset N sorting first.
//!
//! All working state lives in [`rastore`] stores created by a caller-supplied
//! factory, so buffers whose index arrays do not fit in memory can be sorted
//! against disk-backed storage. The refinement step runs on an explicit work
//! stack rather than native recursion, which keeps adversarial inputs (such
//! as long runs of one byte) from exhausting the call stack.
//!
//! # Examples
//!
//! ```
//! use qsufsort::QuickSuffixSorter;
//! use rastore::{MemoryStore, MemoryStoreFactory};
//!
//! # fn main() -> Result<(), qsufsort::SortError> {
//! let mut data = MemoryStore::from_vec(b"banana".to_vec());
//!
//! let sorter = QuickSuffixSorter::new(MemoryStoreFactory);
//! let suffix_array = sorter.suffix_sort(&mut data)?;
//!
//! assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
//! # Ok(())
//! # }
//! ```

mod cell;
mod sorter;
mod split;

pub use sorter::{QuickSuffixSorter, SortConfig, SortError, SortPhase, SuffixSorter};
