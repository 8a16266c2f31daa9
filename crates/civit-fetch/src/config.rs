use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

/// Models root of a stock ComfyUI container image
pub const DEFAULT_MODELS_ROOT: &str = "/workspace/ComfyUI/models";

/// Bytes read from the response per write
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Settings for a [`crate::ModelFetcher`].
///
/// The token is passed in explicitly instead of being looked up from the
/// environment, so callers decide where it comes from.
#[derive(Clone)]
pub struct FetchConfig {
    /// Directory holding the per-category folders
    pub models_root: PathBuf,
    /// API token appended to every download URL as `token=`
    pub token: SecretString,
    /// Read buffer size for streaming the body
    pub chunk_size: usize,
    /// Whole-request timeout, `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            models_root: PathBuf::from(DEFAULT_MODELS_ROOT),
            token: SecretString::from(String::new()),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: None,
        }
    }
}

impl FetchConfig {
    pub fn with_models_root(mut self, models_root: impl Into<PathBuf>) -> Self {
        self.models_root = models_root.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = SecretString::from(token.into());
        self
    }

    /// A zero chunk size is bumped to one byte.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn models_root(&self) -> &Path {
        &self.models_root
    }

    pub(crate) fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for FetchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchConfig")
            .field("models_root", &self.models_root)
            .field("token", &"[REDACTED]")
            .field("chunk_size", &self.chunk_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}
