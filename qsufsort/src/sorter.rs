// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use rastore::{RandomAccess, StoreFactory};

use crate::{cell::GroupCell, split::split};

/// A suffix-array construction algorithm over random-access storage.
pub trait SuffixSorter {
    /// The store type holding the resulting suffix array.
    type Store: RandomAccess;

    /// Computes the suffix array of `data`.
    ///
    /// The returned store holds `data.len() + 1` signed 32-bit integers:
    /// slot k is the offset of the k-th smallest suffix, with the empty
    /// suffix (offset `data.len()`) sorting first. Ownership of the store
    /// transfers to the caller, who releases it by dropping it.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is too large to index with 32-bit
    /// offsets or if the underlying storage fails.
    fn suffix_sort<D: RandomAccess + ?Sized>(&self, data: &mut D) -> Result<Self::Store, SortError>;
}

/// An error indicating that suffix sorting failed.
///
/// A failed sort yields no partial result. Any working arrays allocated
/// before the failure are released before the error is returned.
#[derive(Debug)]
pub enum SortError {
    /// The input is too large for the 32-bit indexing scheme: the working
    /// arrays of a buffer of this byte length would exceed the signed
    /// 32-bit address space.
    InputTooLarge(u64),
    /// The underlying storage failed during the tagged phase.
    Storage {
        /// The phase of the sort in which the failure occurred.
        phase: SortPhase,
        /// The storage failure itself.
        source: io::Error,
    },
}

/// The phase of a sort in which a storage failure occurred.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SortPhase {
    /// Building the initial single-byte rank groups.
    Init,
    /// Refining groups in the doubling passes or extracting the result.
    Sort,
}

impl Display for SortError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SortError::InputTooLarge(len) => {
                write!(f, "input of {len} bytes is too large to index with 32-bit offsets")
            }
            SortError::Storage { phase, source } => {
                write!(f, "storage failure during {phase}: {source}")
            }
        }
    }
}

impl Display for SortPhase {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            SortPhase::Init => f.write_str("initialization"),
            SortPhase::Sort => f.write_str("suffix sorting"),
        }
    }
}

impl Error for SortError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SortError::Storage { source, .. } => Some(source),
            SortError::InputTooLarge(_) => None,
        }
    }
}

/// Configuration for a suffix sort.
///
/// The defaults reproduce the reference qsufsort behavior and should be kept
/// for most use cases.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct SortConfig {
    split_threshold: i32,
}

impl SortConfig {
    /// Creates a new configuration for sort operations
    ///
    /// This configuration can be reused across sort operations.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            split_threshold: Self::DEFAULT_SPLIT_THRESHOLD,
        }
    }

    /// Sets the group length below which refinement switches from ternary
    /// partitioning to quadratic selection.
    ///
    /// Any threshold produces an identical suffix array; the knob trades
    /// partitioning overhead against quadratic scanning on short groups.
    /// Values below 2 are clamped to 2.
    pub fn split_threshold(&mut self, threshold: i32) -> &mut Self {
        self.split_threshold = threshold.max(Self::MIN_SPLIT_THRESHOLD);
        self
    }

    /// The default group length below which refinement uses quadratic
    /// selection, matching the reference implementation.
    pub const DEFAULT_SPLIT_THRESHOLD: i32 = 16;

    const MIN_SPLIT_THRESHOLD: i32 = 2;
}

impl Default for SortConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A suffix sorter implementing the qsufsort (prefix-doubling) algorithm.
///
/// The sorter allocates its two working arrays (the group array, which
/// becomes the suffix array, and the inverse rank array) through the
/// supplied [`StoreFactory`], so the same engine serves in-memory and
/// disk-backed workloads.
pub struct QuickSuffixSorter<F> {
    factory: F,
    config: SortConfig,
}

impl<F: StoreFactory> QuickSuffixSorter<F> {
    /// Creates a sorter that allocates working arrays through `factory`,
    /// with the default configuration.
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, SortConfig::new())
    }

    /// Creates a sorter that allocates working arrays through `factory`,
    /// with the given configuration.
    pub fn with_config(factory: F, config: SortConfig) -> Self {
        Self { factory, config }
    }

    /// Computes the suffix array of `data`.
    ///
    /// See [`SuffixSorter::suffix_sort`] for the result contract.
    ///
    /// # Errors
    ///
    /// Returns [`SortError::InputTooLarge`], before any allocation happens,
    /// if `4 * (data.len() + 1)` does not fit in the signed 32-bit address
    /// space, and [`SortError::Storage`] if the underlying storage fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use qsufsort::QuickSuffixSorter;
    /// use rastore::{MemoryStore, MemoryStoreFactory};
    ///
    /// # fn main() -> Result<(), qsufsort::SortError> {
    /// let mut data = MemoryStore::from_vec(b"banana".to_vec());
    /// let sorter = QuickSuffixSorter::new(MemoryStoreFactory);
    ///
    /// let suffix_array = sorter.suffix_sort(&mut data)?;
    ///
    /// assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn suffix_sort<D: RandomAccess + ?Sized>(&self, data: &mut D) -> Result<F::Store, SortError> {
        let n = indexable_len(data.len())?;

        // The inverse array is scoped to this call; the group array is
        // returned on success and dropped if any later step fails.
        let mut inverse = self
            .factory
            .create(array_bytes(n))
            .map_err(|source| SortError::Storage {
                phase: SortPhase::Init,
                source,
            })?;
        let mut group = self.init_groups(data, &mut inverse, n)?;

        drive(&mut group, &mut inverse, n, self.config.split_threshold).map_err(|source| {
            SortError::Storage {
                phase: SortPhase::Sort,
                source,
            }
        })?;

        Ok(group)
    }

    /// Builds the initial rank groups from a counting sort over the byte
    /// values of `data`, returning the freshly allocated group array.
    fn init_groups<D: RandomAccess + ?Sized>(
        &self,
        data: &mut D,
        inverse: &mut F::Store,
        n: i32,
    ) -> Result<F::Store, SortError> {
        let init_error = |source| SortError::Storage {
            phase: SortPhase::Init,
            source,
        };

        indexable_len(data.len())?;
        let buckets = byte_buckets(data).map_err(init_error)?;

        let mut group = self.factory.create(array_bytes(n)).map_err(init_error)?;
        fill_initial_groups(data, &mut group, inverse, buckets, n).map_err(init_error)?;

        Ok(group)
    }
}

impl<F: StoreFactory> SuffixSorter for QuickSuffixSorter<F> {
    type Store = F::Store;

    fn suffix_sort<D: RandomAccess + ?Sized>(&self, data: &mut D) -> Result<F::Store, SortError> {
        QuickSuffixSorter::suffix_sort(self, data)
    }
}

/// Checks that the working arrays for a buffer of `len` bytes are
/// addressable with signed 32-bit byte offsets.
fn indexable_len(len: u64) -> Result<i32, SortError> {
    let fits = len
        .checked_add(1)
        .and_then(|slots| slots.checked_mul(4))
        .is_some_and(|bytes| bytes < i32::MAX as u64);

    if fits {
        Ok(len as i32)
    } else {
        Err(SortError::InputTooLarge(len))
    }
}

fn array_bytes(n: i32) -> u64 {
    (n as u64 + 1) * 4
}

/// Counts byte occurrences and converts the histogram in place into an
/// exclusive prefix sum: `buckets[v]` becomes the number of bytes strictly
/// less than `v`.
fn byte_buckets<D: RandomAccess + ?Sized>(data: &mut D) -> io::Result<[i32; 256]> {
    let mut buckets = [0i32; 256];

    data.seek(0)?;
    for _ in 0..data.len() {
        buckets[usize::from(data.read_u8()?)] += 1;
    }

    for v in 1..256 {
        buckets[v] += buckets[v - 1];
    }
    for v in (1..256).rev() {
        buckets[v] = buckets[v - 1];
    }
    buckets[0] = 0;

    Ok(buckets)
}

/// Seeds the group and inverse arrays from the bucket boundaries: suffixes
/// are grouped by first byte, every suffix's rank is its byte's final fill
/// boundary, and single-member buckets are finalized immediately.
fn fill_initial_groups<D, S>(
    data: &mut D,
    group: &mut S,
    inverse: &mut S,
    mut buckets: [i32; 256],
    n: i32,
) -> io::Result<()>
where
    D: RandomAccess + ?Sized,
    S: RandomAccess,
{
    // Place each offset into the next free slot of its byte's bucket. Slot 0
    // stays reserved for the boundary suffix.
    data.seek(0)?;
    for i in 0..n {
        let v = usize::from(data.read_u8()?);
        buckets[v] += 1;
        group.write_int_at(buckets[v], i)?;
    }
    group.write_int_at(0, n)?;

    // After the pre-increments, buckets[v] holds the last slot of byte v's
    // bucket, which is the shared initial rank of its suffixes.
    data.seek(0)?;
    inverse.seek_to_int(0)?;
    for _ in 0..n {
        let v = usize::from(data.read_u8()?);
        inverse.write_int(buckets[v])?;
    }
    // The empty suffix always ranks first.
    inverse.write_int_at(n, 0)?;

    // Buckets holding exactly one suffix are already sorted.
    for v in 1..256 {
        if buckets[v] == buckets[v - 1] + 1 {
            group.write_int_at(buckets[v], GroupCell::Finalized(1).encode())?;
        }
    }
    group.write_int_at(0, GroupCell::Finalized(1).encode())?;

    Ok(())
}

/// Runs the doubling passes until the whole array is one finalized run, then
/// inverts the rank array into the suffix array.
fn drive<S: RandomAccess + ?Sized>(
    group: &mut S,
    inverse: &mut S,
    n: i32,
    threshold: i32,
) -> io::Result<()> {
    let mut h: i32 = 1;
    while GroupCell::decode(group.read_int_at(0)?) != GroupCell::Finalized(n + 1) {
        // One left-to-right pass: skip finalized runs, merging neighbors
        // into a single sentinel, and refine each live group at offset h.
        let mut pending_run: i32 = 0;
        let mut i: i32 = 0;
        while i < n + 1 {
            match GroupCell::decode(group.read_int_at(i)?) {
                GroupCell::Finalized(run) => {
                    pending_run += run;
                    i += run;
                }
                GroupCell::Pending(suffix) => {
                    if pending_run > 0 {
                        group.write_int_at(i - pending_run, GroupCell::Finalized(pending_run).encode())?;
                        pending_run = 0;
                    }

                    // A live group ends at the rank its members share.
                    let length = inverse.read_int_at(suffix)? + 1 - i;
                    split(group, inverse, i, length, h, threshold)?;
                    i += length;
                }
            }
        }
        if pending_run > 0 {
            group.write_int_at(i - pending_run, GroupCell::Finalized(pending_run).encode())?;
        }

        h *= 2;
    }

    // Every rank is now unique; reading the inverse array as a permutation
    // yields the suffix array.
    inverse.seek_to_int(0)?;
    for i in 0..=n {
        let rank = inverse.read_int()?;
        group.write_int_at(rank, i)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use rastore::{MemoryStore, MemoryStoreFactory};

    use super::*;

    fn ints(store: &mut MemoryStore, count: i32) -> Vec<i32> {
        (0..count).map(|i| store.read_int_at(i).unwrap()).collect()
    }

    #[test]
    fn initial_groups_for_banana() {
        let mut data = MemoryStore::from_vec(b"banana".to_vec());
        let sorter = QuickSuffixSorter::new(MemoryStoreFactory);

        let mut inverse = MemoryStoreFactory.create(28).unwrap();
        let mut group = sorter.init_groups(&mut data, &mut inverse, 6).unwrap();

        // 'b' is a singleton bucket and slot 0 is the boundary suffix; both
        // start out finalized. The 'a' and 'n' buckets stay live.
        assert_eq!(ints(&mut group, 7), [-1, 1, 3, 5, -1, 2, 4]);
        assert_eq!(ints(&mut inverse, 7), [4, 3, 6, 3, 6, 3, 0]);
    }

    #[test]
    fn sorts_banana() {
        let mut data = MemoryStore::from_vec(b"banana".to_vec());
        let sorter = QuickSuffixSorter::new(MemoryStoreFactory);

        let suffix_array = sorter.suffix_sort(&mut data).unwrap();

        assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn sorts_empty_input() {
        let mut data = MemoryStore::from_vec(Vec::new());
        let sorter = QuickSuffixSorter::new(MemoryStoreFactory);

        let suffix_array = sorter.suffix_sort(&mut data).unwrap();

        assert_eq!(suffix_array.into_ints(), [0]);
    }

    #[test]
    fn sorts_single_byte() {
        let mut data = MemoryStore::from_vec(vec![b'x']);
        let sorter = QuickSuffixSorter::new(MemoryStoreFactory);

        let suffix_array = sorter.suffix_sort(&mut data).unwrap();

        assert_eq!(suffix_array.into_ints(), [1, 0]);
    }

    #[test]
    fn rejects_oversized_input() {
        assert!(matches!(
            indexable_len(u64::from(u32::MAX)),
            Err(SortError::InputTooLarge(_)),
        ));
        assert!(matches!(indexable_len(u64::MAX), Err(SortError::InputTooLarge(_))));
        assert_eq!(indexable_len(100).unwrap(), 100);
    }

    #[test]
    fn config_clamps_threshold() {
        let mut config = SortConfig::new();
        config.split_threshold(-5);

        let mut data = MemoryStore::from_vec(b"banana".to_vec());
        let sorter = QuickSuffixSorter::with_config(MemoryStoreFactory, config);

        let suffix_array = sorter.suffix_sort(&mut data).unwrap();

        assert_eq!(suffix_array.into_ints(), [6, 5, 3, 1, 0, 4, 2]);
    }
}
