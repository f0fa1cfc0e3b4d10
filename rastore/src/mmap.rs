// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    env,
    io::{self, Error, ErrorKind},
    path::{Path, PathBuf},
};

use byteorder::{ByteOrder, NativeEndian};
use memmap2::MmapMut;

use crate::{RandomAccess, StoreFactory};

/// A store backed by a memory-mapped scratch file.
///
/// Mapping gives file-backed working arrays the access cost of memory once
/// their pages are resident, which suits the highly random access pattern of
/// suffix sorting far better than seek-and-read file I/O when the arrays
/// exceed available RAM only moderately.
pub struct MmapStore {
    map: MmapMut,
    len: usize,
    pos: usize,
}

impl MmapStore {
    /// Creates a zero-filled store of `len` bytes mapped from an unlinked
    /// scratch file in the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch file cannot be created, sized, or
    /// mapped.
    pub fn create(len: u64) -> io::Result<Self> {
        Self::create_in(env::temp_dir(), len)
    }

    /// Creates a zero-filled store of `len` bytes mapped from an unlinked
    /// scratch file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch file cannot be created, sized, or
    /// mapped.
    pub fn create_in<P: AsRef<Path>>(dir: P, len: u64) -> io::Result<Self> {
        let len_usize: usize = len
            .try_into()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "store length exceeds usize"))?;

        let file = tempfile::tempfile_in(dir)?;
        // Zero-length mappings are rejected on some platforms; keep the file
        // at least one byte long and bound accesses by the requested length.
        file.set_len(len.max(1))?;

        // SAFETY: the mapping is backed by a freshly created, unlinked
        // temporary file owned exclusively by this store, so no other code
        // can truncate or modify it for the lifetime of the map.
        let map = unsafe { MmapMut::map_mut(&file)? };

        Ok(Self {
            map,
            len: len_usize,
            pos: 0,
        })
    }

    fn range(&self, width: usize) -> io::Result<usize> {
        if self.pos.checked_add(width).is_none_or(|end| end > self.len) {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("access of {width} bytes at {} past end of {}-byte store", self.pos, self.len),
            ));
        }
        Ok(self.pos)
    }
}

impl RandomAccess for MmapStore {
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.pos = pos
            .try_into()
            .map_err(|_| Error::new(ErrorKind::InvalidInput, "seek offset exceeds usize"))?;
        Ok(())
    }

    fn read_int(&mut self) -> io::Result<i32> {
        let pos = self.range(4)?;
        let value = NativeEndian::read_i32(&self.map[pos..pos + 4]);
        self.pos += 4;
        Ok(value)
    }

    fn write_int(&mut self, value: i32) -> io::Result<()> {
        let pos = self.range(4)?;
        NativeEndian::write_i32(&mut self.map[pos..pos + 4], value);
        self.pos += 4;
        Ok(())
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        let pos = self.range(1)?;
        self.pos += 1;
        Ok(self.map[pos])
    }

    fn len(&self) -> u64 {
        self.len as u64
    }

    fn close(self) -> io::Result<()> {
        self.map.flush()
    }
}

/// A [`StoreFactory`] producing [`MmapStore`]s backed by unlinked scratch
/// files.
#[derive(Clone, Debug, Default)]
pub struct MmapStoreFactory {
    dir: Option<PathBuf>,
}

impl MmapStoreFactory {
    /// Creates a factory mapping scratch files from the system temporary
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Creates a factory mapping scratch files from `dir`.
    #[must_use]
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl StoreFactory for MmapStoreFactory {
    type Store = MmapStore;

    fn create(&self, len: u64) -> io::Result<MmapStore> {
        match &self.dir {
            Some(dir) => MmapStore::create_in(dir, len),
            None => MmapStore::create(len),
        }
    }
}
