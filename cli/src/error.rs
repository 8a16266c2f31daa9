use std::path::PathBuf;

use derive_more::{Display, From};

#[derive(Debug, Display, From)]
pub enum Error {
    #[from]
    #[display("{}", _0.user_message())]
    Fetch(civit_fetch::FetchError),

    #[display("Failed to read manifest {path:?}: {source}")]
    Manifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("{_0}")]
    Usage(String),
}
