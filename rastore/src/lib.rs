// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

//! Random-access integer storage for suffix sorting.
//!
//! This crate models the scratch arrays used by suffix-array construction as
//! an addressable sequence of signed 32-bit integers with seek-by-byte-offset
//! and sequential read/write, so that the sorting engine never needs to know
//! whether its working set lives in memory or on disk. Three backends are
//! provided: [`MemoryStore`] for buffers that fit in memory, [`FileStore`]
//! for streamed file I/O, and [`MmapStore`] for memory-mapped scratch files.
//! A [`StoreFactory`] chooses the medium; the consumer of the arrays does
//! not.
//!
//! # Examples
//!
//! ```
//! use rastore::{MemoryStore, RandomAccess};
//!
//! # fn main() -> std::io::Result<()> {
//! let mut store = MemoryStore::new(8);
//! store.write_int_at(1, 42)?;
//! assert_eq!(store.read_int_at(1)?, 42);
//! # Ok(())
//! # }
//! ```

use std::io;

mod file;
mod memory;
mod mmap;

pub use file::{FileStore, FileStoreFactory};
pub use memory::{MemoryStore, MemoryStoreFactory};
pub use mmap::{MmapStore, MmapStoreFactory};

/// An addressable sequence of bytes read and written as signed 32-bit
/// integers or single bytes at a seekable position.
///
/// A store has a fixed capacity established at creation. Positions are byte
/// offsets; integers occupy four bytes and are usually accessed at 4-byte
/// aligned positions via [`seek_to_int`](RandomAccess::seek_to_int) and the
/// `*_at` combinators. The integer encoding is an internal detail of each
/// backend: a value written through [`write_int`](RandomAccess::write_int)
/// reads back identically through [`read_int`](RandomAccess::read_int) on the
/// same store, but stores are not an interchange format.
///
/// Dropping a store always releases its underlying resources. [`close`]
/// additionally surfaces flush errors that `Drop` would swallow.
///
/// [`close`]: RandomAccess::close
pub trait RandomAccess {
    /// Moves the current position to `pos`, a byte offset from the start of
    /// the store.
    ///
    /// Seeking beyond the end of the store is not itself an error; the
    /// subsequent read or write fails instead.
    fn seek(&mut self, pos: u64) -> io::Result<()>;

    /// Reads one signed 32-bit integer at the current position, advancing
    /// the position by 4.
    fn read_int(&mut self) -> io::Result<i32>;

    /// Writes one signed 32-bit integer at the current position, advancing
    /// the position by 4.
    fn write_int(&mut self, value: i32) -> io::Result<()>;

    /// Reads one unsigned byte at the current position, advancing the
    /// position by 1.
    fn read_u8(&mut self) -> io::Result<u8>;

    /// Returns the total addressable byte length of the store.
    fn len(&self) -> u64;

    /// Returns `true` if the store has zero length.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Moves the current position to the 4-byte aligned integer slot
    /// `index`, equivalent to `seek(index * 4)`.
    fn seek_to_int(&mut self, index: i32) -> io::Result<()> {
        debug_assert!(index >= 0, "integer slot index must be non-negative");
        self.seek(index as u64 * 4)
    }

    /// Reads the integer in slot `index`.
    fn read_int_at(&mut self, index: i32) -> io::Result<i32> {
        self.seek_to_int(index)?;
        self.read_int()
    }

    /// Writes `value` into slot `index`.
    fn write_int_at(&mut self, index: i32, value: i32) -> io::Result<()> {
        self.seek_to_int(index)?;
        self.write_int(value)
    }

    /// Consumes the store, flushing any buffered state to the underlying
    /// medium and releasing it.
    ///
    /// Dropping a store releases it as well; `close` exists so that callers
    /// who care can observe flush failures.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing to the underlying medium fails.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// A factory for new stores of a requested byte capacity.
///
/// Factories decide the storage medium. The suffix-sorting engine receives a
/// factory from its caller and creates its working arrays through it without
/// ever naming a concrete backend.
pub trait StoreFactory {
    /// The store type this factory produces.
    type Store: RandomAccess;

    /// Allocates a new zero-filled store of `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying medium cannot provide `len` bytes.
    fn create(&self, len: u64) -> io::Result<Self::Store>;
}
