use heapless::String;
use static_cell::StaticCell;

/// Longest base path, `ESP_VFS_PATH_MAX + 1`.
pub const BASE_PATH_MAX: usize = 16;

/// The only base path the file server supports.
pub const ACCEPTED_BASE_PATH: &str = "/spiffs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
    /// Base path is not [`ACCEPTED_BASE_PATH`].
    InvalidBasePath,
    /// The slot already holds a context.
    AlreadyStarted,
}

/// State shared by all handlers for the server lifetime.
#[derive(Debug)]
pub struct ServerContext {
    base_path: String<BASE_PATH_MAX>,
}

impl ServerContext {
    pub fn base_path(&self) -> &str {
        self.base_path.as_str()
    }
}

/// Static storage for the single [`ServerContext`].
///
/// ```ignore
/// static SERVER_CONTEXT: ContextSlot = ContextSlot::new();
/// let context = SERVER_CONTEXT.start("/spiffs")?;
/// ```
pub struct ContextSlot {
    cell: StaticCell<ServerContext>,
}

impl ContextSlot {
    pub const fn new() -> Self {
        Self {
            cell: StaticCell::new(),
        }
    }

    /// Create the server context.
    ///
    /// Succeeds at most once per slot, concurrent callers included.
    pub fn start(&'static self, base_path: &str) -> Result<&'static ServerContext, StartError> {
        if base_path != ACCEPTED_BASE_PATH {
            log::error!(
                "file_server: only '{}' is supported as base path",
                ACCEPTED_BASE_PATH
            );
            return Err(StartError::InvalidBasePath);
        }
        let mut stored = String::new();
        stored
            .push_str(base_path)
            .map_err(|()| StartError::InvalidBasePath)?;

        match self.cell.try_init(ServerContext { base_path: stored }) {
            Some(context) => Ok(&*context),
            None => {
                log::error!("file_server: already started");
                Err(StartError::AlreadyStarted)
            }
        }
    }
}

impl Default for ContextSlot {
    fn default() -> Self {
        Self::new()
    }
}
