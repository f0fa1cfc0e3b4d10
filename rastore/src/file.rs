// Copyright 2026 Logan Magee
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    env,
    fs::File,
    io::{self, Seek, SeekFrom},
    path::{Path, PathBuf},
};

use byteorder::{NativeEndian, ReadBytesExt, WriteBytesExt};

use crate::{RandomAccess, StoreFactory};

/// A disk-backed store using positioned file I/O.
///
/// Factory-created stores live in unlinked temporary files, so the backing
/// space is reclaimed by the operating system as soon as the store is
/// dropped. Use [`open`](FileStore::open) to read existing data, such as the
/// buffer being sorted, through the same interface.
pub struct FileStore {
    file: File,
    len: u64,
}

impl FileStore {
    /// Creates a zero-filled store of `len` bytes in the system temporary
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch file cannot be created or sized.
    pub fn create(len: u64) -> io::Result<Self> {
        Self::create_in(env::temp_dir(), len)
    }

    /// Creates a zero-filled store of `len` bytes backed by an unlinked
    /// scratch file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch file cannot be created or sized.
    pub fn create_in<P: AsRef<Path>>(dir: P, len: u64) -> io::Result<Self> {
        let file = tempfile::tempfile_in(dir)?;
        file.set_len(len)?;

        Ok(Self { file, len })
    }

    /// Opens the file at `path` as a read-only view of existing data.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its metadata read.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();

        Ok(Self { file, len })
    }
}

impl RandomAccess for FileStore {
    fn seek(&mut self, pos: u64) -> io::Result<()> {
        self.file.seek(SeekFrom::Start(pos)).map(|_| ())
    }

    fn read_int(&mut self) -> io::Result<i32> {
        self.file.read_i32::<NativeEndian>()
    }

    fn write_int(&mut self, value: i32) -> io::Result<()> {
        self.file.write_i32::<NativeEndian>(value)
    }

    fn read_u8(&mut self) -> io::Result<u8> {
        self.file.read_u8()
    }

    fn len(&self) -> u64 {
        self.len
    }

    fn close(self) -> io::Result<()> {
        self.file.sync_all()
    }
}

/// A [`StoreFactory`] producing [`FileStore`]s backed by unlinked scratch
/// files.
#[derive(Clone, Debug, Default)]
pub struct FileStoreFactory {
    dir: Option<PathBuf>,
}

impl FileStoreFactory {
    /// Creates a factory allocating scratch files in the system temporary
    /// directory.
    #[must_use]
    pub fn new() -> Self {
        Self { dir: None }
    }

    /// Creates a factory allocating scratch files in `dir`.
    ///
    /// Pointing the factory at a directory on the same filesystem as the
    /// data keeps large working arrays off a possibly small system temp
    /// partition.
    #[must_use]
    pub fn in_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }
}

impl StoreFactory for FileStoreFactory {
    type Store = FileStore;

    fn create(&self, len: u64) -> io::Result<FileStore> {
        match &self.dir {
            Some(dir) => FileStore::create_in(dir, len),
            None => FileStore::create(len),
        }
    }
}
