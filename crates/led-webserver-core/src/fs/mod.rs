//! Read-only filesystem view used by the file server.

mod flash;

pub use flash::{
    ENTRY_SIZE,
    FlashFileSystem,
    HEADER_SIZE,
    MAGIC_HEADER,
    MAX_FILES,
    NAME_LEN,
    VERSION,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsError {
    NotFound,
    Driver,
    Corrupt,
}

/// Metadata of a regular file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub size: u32,
    /// Filesystem specific location of the file data.
    pub location: u32,
}

/// A filesystem mounted under a base path.
///
/// All paths are absolute, mount point included (`/spiffs/style.css`).
pub trait FileSystem {
    /// Get file metadata.
    fn stat(&self, path: &str) -> Result<FileStat, FsError>;

    /// Read file contents starting at `offset`.
    ///
    /// Returns the number of bytes read, `0` at end of file.
    fn read(&self, file: &FileStat, offset: u32, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Check that `path` can be opened as a directory.
    fn open_dir(&self, path: &str) -> Result<(), FsError>;
}

impl<T: FileSystem> FileSystem for &T {
    fn stat(&self, path: &str) -> Result<FileStat, FsError> {
        (**self).stat(path)
    }

    fn read(&self, file: &FileStat, offset: u32, buf: &mut [u8]) -> Result<usize, FsError> {
        (**self).read(file, offset, buf)
    }

    fn open_dir(&self, path: &str) -> Result<(), FsError> {
        (**self).open_dir(path)
    }
}
