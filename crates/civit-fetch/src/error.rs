use std::path::PathBuf;

/// Errors that can occur while resolving or downloading a model.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The request was malformed: wrong shape, missing field, bad link or file name.
    #[error("Invalid model request: {0}")]
    InvalidInput(String),

    /// `model_type` is not one of the known categories.
    #[error("Invalid model_type '{given}'. Expected one of [{valid}]", valid = .expected.join(", "))]
    InvalidModelType {
        given: String,
        expected: &'static [&'static str],
    },

    /// The server answered with a non-2xx status.
    #[error("Download failed with status {0}")]
    Status(reqwest::StatusCode),

    /// Network error or truncated body.
    #[error("Download failed: {0}")]
    Transport(String),

    /// The destination could not be created, written or moved into place.
    #[error("Filesystem error at {path:?}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FetchError::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Short, user-facing description suitable for a terminal.
    pub fn user_message(&self) -> String {
        match self {
            FetchError::InvalidInput(msg) => format!("Invalid request: {}", msg),
            FetchError::InvalidModelType { given, expected } => format!(
                "Unknown model type '{}'. Use one of: {}",
                given,
                expected.join(", ")
            ),
            FetchError::Status(
                status @ (reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN),
            ) => format!("Download was refused ({}). Check CIVIT_KEY.", status),
            FetchError::Status(status) => format!("Server answered {}", status),
            FetchError::Transport(msg) => format!("Download failed: {}", msg),
            FetchError::Filesystem { path, source } => match source.kind() {
                std::io::ErrorKind::NotFound => format!(
                    "Directory for {:?} does not exist. Create it first.",
                    path
                ),
                std::io::ErrorKind::PermissionDenied => {
                    format!("No permission to write {:?}", path)
                }
                _ => format!("Failed to write {:?}: {}", path, source),
            },
        }
    }
}
