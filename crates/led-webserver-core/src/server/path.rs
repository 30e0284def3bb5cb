//! Request URI to filesystem path mapping.
//!
//! No `.`/`..` normalisation and no percent-decoding is done, a URI such as
//! `/../x` reaches the filesystem as `/spiffs/../x`.

use heapless::String;

/// Longest full path, `ESP_VFS_PATH_MAX + SPIFFS_OBJ_NAME_LEN`.
pub const FILE_PATH_MAX: usize = 15 + 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathTooLong;

/// A path written by [`resolve_path`].
#[derive(Debug, Clone, Copy)]
pub struct ResolvedPath<'a> {
    full: &'a str,
    base_len: usize,
}

impl<'a> ResolvedPath<'a> {
    /// Base path followed by the URI path, for filesystem calls.
    pub fn full(&self) -> &'a str {
        self.full
    }

    /// The URI path alone, starting right after the base path.
    pub fn relative(&self) -> &'a str {
        &self.full[self.base_len..]
    }
}

/// The part of `uri` before the first `?` or `#`.
pub fn uri_path(uri: &str) -> &str {
    uri.find(['?', '#']).map_or(uri, |end| &uri[..end])
}

/// Write `base` followed by the path portion of `uri` into `dest`.
///
/// One byte of `dest` capacity stays reserved for a NUL terminator. When
/// the result does not fit, `dest` is left untouched.
pub fn resolve_path<'a, const N: usize>(
    dest: &'a mut String<N>,
    base: &str,
    uri: &str,
) -> Result<ResolvedPath<'a>, PathTooLong> {
    let path = uri_path(uri);
    if base.len() + path.len() + 1 > N {
        return Err(PathTooLong);
    }

    dest.clear();
    dest.push_str(base).map_err(|()| PathTooLong)?;
    dest.push_str(path).map_err(|()| PathTooLong)?;

    Ok(ResolvedPath {
        full: dest.as_str(),
        base_len: base.len(),
    })
}
