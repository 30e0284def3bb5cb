//! Read-only file table stored in a flash partition.
//!
//! Layout, all integers little endian:
//!
//! | offset | size               | field                          |
//! |--------|--------------------|--------------------------------|
//! | 0      | 4                  | magic `LTFS`                   |
//! | 4      | 2                  | format version                 |
//! | 6      | 2                  | entry count                    |
//! | 8      | `ENTRY_SIZE` * n   | entries                        |
//!
//! Each entry is a NUL padded name (`/dir/file.ext`), then the data offset
//! relative to the partition start and the data size. The image is written
//! by the host tooling; the device never modifies it.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embedded_storage::nor_flash::ReadNorFlash;
use heapless::{String, Vec};

use super::{FileStat, FileSystem, FsError};

pub const MAGIC_HEADER: u32 = u32::from_le_bytes(*b"LTFS");
pub const VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 8;
/// Longest file name, leading slash included.
pub const NAME_LEN: usize = 32;
pub const ENTRY_SIZE: usize = NAME_LEN + 8;
pub const MAX_FILES: usize = 32;

const READ_BLOCK_SIZE: usize = 64;

#[derive(Debug)]
struct FileEntry {
    name: String<NAME_LEN>,
    stat: FileStat,
}

/// Filesystem over a flash partition, shared between HTTP workers.
pub struct FlashFileSystem<M: RawMutex, F: ReadNorFlash> {
    flash: Mutex<M, RefCell<F>>,
    mount_point: &'static str,
    partition_offset: u32,
    entries: Vec<FileEntry, MAX_FILES>,
}

impl<M: RawMutex, F: ReadNorFlash> FlashFileSystem<M, F> {
    /// Mount the file table found at `partition_offset`.
    pub fn mount(
        flash: F,
        mount_point: &'static str,
        partition_offset: u32,
        partition_size: u32,
    ) -> Result<Self, FsError> {
        let mut fs = Self::empty(flash, mount_point, partition_offset);
        fs.load_table(partition_size)?;
        log::info!("flash_fs: mounted {} files at {}", fs.entries.len(), mount_point);
        Ok(fs)
    }

    /// Like [`Self::mount`], but falls back to an empty mount when the
    /// partition holds no valid file table.
    pub fn mount_or_empty(
        flash: F,
        mount_point: &'static str,
        partition_offset: u32,
        partition_size: u32,
    ) -> Self {
        let mut fs = Self::empty(flash, mount_point, partition_offset);
        match fs.load_table(partition_size) {
            Ok(()) => {
                log::info!("flash_fs: mounted {} files at {}", fs.entries.len(), mount_point);
            }
            Err(e) => {
                fs.entries.clear();
                log::warn!("flash_fs: mount failed ({:?}), {} is empty", e, mount_point);
            }
        }
        fs
    }

    /// Mount point without any files.
    ///
    /// Only the root directory exists.
    pub fn empty(flash: F, mount_point: &'static str, partition_offset: u32) -> Self {
        Self {
            flash: Mutex::new(RefCell::new(flash)),
            mount_point,
            partition_offset,
            entries: Vec::new(),
        }
    }

    fn load_table(&mut self, partition_size: u32) -> Result<(), FsError> {
        let partition_offset = self.partition_offset;
        let flash = self.flash.get_mut().get_mut();

        let mut header = [0u8; HEADER_SIZE];
        read_unaligned(flash, partition_offset, &mut header)?;

        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        let version = u16::from_le_bytes([header[4], header[5]]);
        let count = usize::from(u16::from_le_bytes([header[6], header[7]]));
        if magic != MAGIC_HEADER || version != VERSION || count > MAX_FILES {
            log::error!("flash_fs: no valid file table at {:#x}", partition_offset);
            return Err(FsError::Corrupt);
        }

        let mut raw = [0u8; ENTRY_SIZE];
        for index in 0..count {
            #[allow(clippy::cast_possible_truncation)]
            let addr = partition_offset + (HEADER_SIZE + index * ENTRY_SIZE) as u32;
            read_unaligned(flash, addr, &mut raw)?;
            let entry = decode_entry(&raw, partition_size)?;
            self.entries.push(entry).map_err(|_| FsError::Corrupt)?;
        }
        Ok(())
    }

    /// Names of all stored files, relative to the mount point.
    pub fn files(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|e| (e.name.as_str(), e.stat.size))
    }

    fn relative<'p>(&self, path: &'p str) -> Option<&'p str> {
        path.strip_prefix(self.mount_point)
    }
}

impl<M: RawMutex, F: ReadNorFlash> FileSystem for FlashFileSystem<M, F> {
    fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        let name = self.relative(path).ok_or(FsError::NotFound)?;
        self.entries
            .iter()
            .find(|e| e.name.as_str() == name)
            .map(|e| e.stat)
            .ok_or(FsError::NotFound)
    }

    fn read(&self, file: &FileStat, offset: u32, buf: &mut [u8]) -> Result<usize, FsError> {
        if offset >= file.size {
            return Ok(0);
        }
        let remaining = (file.size - offset) as usize;
        let n = buf.len().min(remaining);
        let addr = self.partition_offset + file.location + offset;
        self.flash
            .lock(|flash| read_unaligned(&mut *flash.borrow_mut(), addr, &mut buf[..n]))?;
        Ok(n)
    }

    fn open_dir(&self, path: &str) -> Result<(), FsError> {
        let dir = self.relative(path).ok_or(FsError::NotFound)?;
        if dir.is_empty() || dir == "/" {
            return Ok(());
        }
        let dir = dir.strip_suffix('/').unwrap_or(dir);
        let is_parent = self.entries.iter().any(|e| {
            e.name
                .as_str()
                .strip_prefix(dir)
                .is_some_and(|rest| rest.starts_with('/'))
        });
        if is_parent { Ok(()) } else { Err(FsError::NotFound) }
    }
}

fn decode_entry(raw: &[u8; ENTRY_SIZE], partition_size: u32) -> Result<FileEntry, FsError> {
    let name_len = raw[..NAME_LEN].iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
    let name = core::str::from_utf8(&raw[..name_len]).map_err(|_| FsError::Corrupt)?;
    if !name.starts_with('/') {
        return Err(FsError::Corrupt);
    }
    let location = u32::from_le_bytes([raw[NAME_LEN], raw[NAME_LEN + 1], raw[NAME_LEN + 2], raw[NAME_LEN + 3]]);
    let size = u32::from_le_bytes([
        raw[NAME_LEN + 4],
        raw[NAME_LEN + 5],
        raw[NAME_LEN + 6],
        raw[NAME_LEN + 7],
    ]);
    let end = location.checked_add(size).ok_or(FsError::Corrupt)?;
    if end > partition_size {
        return Err(FsError::Corrupt);
    }

    let mut stored = String::new();
    stored.push_str(name).map_err(|()| FsError::Corrupt)?;
    Ok(FileEntry {
        name: stored,
        stat: FileStat { size, location },
    })
}

/// Read `out.len()` bytes at `addr` honouring the driver read alignment.
fn read_unaligned<F: ReadNorFlash>(flash: &mut F, addr: u32, out: &mut [u8]) -> Result<(), FsError> {
    #[allow(clippy::cast_possible_truncation)]
    let align = F::READ_SIZE.max(1) as u32;
    let mut block = [0u8; READ_BLOCK_SIZE];
    let mut done = 0usize;

    while done < out.len() {
        #[allow(clippy::cast_possible_truncation)]
        let pos = addr + done as u32;
        let start = pos - pos % align;
        let skip = (pos - start) as usize;
        let len = (skip + out.len() - done).min(READ_BLOCK_SIZE);
        let aligned_len = len.div_ceil(align as usize) * align as usize;
        let aligned_len = aligned_len.min(READ_BLOCK_SIZE);

        flash
            .read(start, &mut block[..aligned_len])
            .map_err(|_| FsError::Driver)?;
        let take = (aligned_len - skip).min(out.len() - done);
        out[done..done + take].copy_from_slice(&block[skip..skip + take]);
        done += take;
    }
    Ok(())
}
