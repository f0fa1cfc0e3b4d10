// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::io::{self, Error, ErrorKind};

use byteorder::{ByteOrder, NativeEndian};

use crate::{RandomAccess, StoreFactory};

/// An in-memory store backed by a byte vector.
///
/// This is the backend of choice when the buffer being sorted and its two
/// working arrays comfortably fit in memory. Integers are encoded
/// native-endian so the buffer can be reinterpreted as a `Vec<i32>` without
/// copying per element; see [`into_ints`](MemoryStore::into_ints).
pub struct MemoryStore {
    buf: Vec<u8>,
    pos: usize,
}

impl MemoryStore {
    /// Creates a zero-filled store of `len` bytes.
    #[must_use]
    pub fn new(len: usize) -> Self {
        Self {
            buf: vec![0; len],
            pos: 0,
        }
    }

    /// Creates a store over an existing byte buffer, positioned at the
    /// start.
    #[must_use]
    pub fn from_vec(buf: Vec<u8>) -> Self {
        Self { buf, pos: 0 }
    }

    /// Creates a store holding the native-endian encoding of `ints`.
    #[must_use]
    pub fn from_ints(ints: &[i32]) -> Self {
        Self::from_vec(bytemuck::cast_slice(ints).to_vec())
    }

    /// Returns the raw contents of the store.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the store and returns its contents as a vector of signed
    /// 32-bit integers.
    ///
    /// # Panics
    ///
    /// Panics if the store's length is not a multiple of 4.
    #[must_use]
    pub fn into_ints(self) -> Vec<i32> {
        assert_eq!(self.buf.len() % 4, 0, "store length must be a multiple of 4");

        bytemuck::pod_collect_to_vec(&self.buf)
    }

    fn range(&self, width: usize) -> io::Result<usize> {
        if self.pos.checked_add(width).is_none_or(|end| end > self.buf.len()) {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("access of {width} bytes at {} past end of {}-byte store", self.pos, self.buf.len()),
            ));
        }
        Ok(self.pos)
    }
}

impl RandomAccess for MemoryStore {
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.pos = pos
            .try_into()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "seek offset exceeds usize"))?;
        Ok(())
    }

    fn read_int(&mut self) -> io::Result<i32> {
        let pos = self.range(4)?;
        let value = NativeEndian::read_i32(&self.buf[pos..pos + 4]);
        self.pos += 4;
        Ok(value)
    }

    fn write_int(&mut self, value: i32) -> io::Result<()> {
        let pos = self.range(4)?;
        NativeEndian::write_i32(&mut self.buf[pos..pos + 4], value);
        self.pos += 4;
        Ok(())
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let pos = self.range(1)?;
        self.pos += 1;
        Ok(self.buf[pos])
    }

    fn len(&self) -> u64 {
        self.buf.len() as u64
    }
}

/// A [`StoreFactory`] producing [`MemoryStore`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct MemoryStoreFactory;

impl StoreFactory for MemoryStoreFactory {
    type Store = MemoryStore;

    fn create(&self, len: u64) -> io::Result<MemoryStore> {
        let len = len
            .try_into()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "store length exceeds usize"))?;
        Ok(MemoryStore::new(len))
    }
}
