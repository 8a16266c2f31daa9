//! Model artifact downloader for ComfyUI model trees.
//!
//! This crate downloads a single model file from a remote link into the
//! directory that matches its category (`checkpoints`, `loras`, ...). If the
//! file is already on disk nothing is fetched.
//!
//! # Example
//!
//! ```no_run
//! use civit_fetch::{FetchConfig, ModelFetcher, ModelRequest, ModelType, NoProgress};
//!
//! fn main() -> Result<(), civit_fetch::FetchError> {
//!     let config = FetchConfig::default().with_token("my-token");
//!     let fetcher = ModelFetcher::new(config)?;
//!
//!     let request = ModelRequest::new(
//!         "https://civitai.com/api/download/models/12345?type=Model",
//!         "detail-tweaker.safetensors",
//!         ModelType::Loras,
//!     )?;
//!
//!     let outcome = fetcher.fetch(&request, &NoProgress)?;
//!     println!("{}", outcome.path().display());
//!     Ok(())
//! }
//! ```

mod config;
mod error;
mod fetcher;
mod model_type;
mod progress;
mod request;
mod transport;

pub use config::{FetchConfig, DEFAULT_CHUNK_SIZE, DEFAULT_MODELS_ROOT};
pub use error::FetchError;
pub use fetcher::{FetchOutcome, ModelFetcher};
pub use model_type::ModelType;
pub use progress::{DownloadEvent, NoProgress, ProgressSink};
pub use request::{parse_manifest, ModelRecord, ModelRequest, ModelTriple, RawModelRequest};
pub use transport::{RemoteFile, ReqwestTransport, Transport};
