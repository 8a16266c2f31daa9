use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use reqwest::Url;

use crate::transport::{describe_read_error, RemoteFile, ReqwestTransport, Transport};
use crate::{DownloadEvent, FetchConfig, FetchError, ModelRequest, ProgressSink};

/// Log a progress line every this many bytes
const LOG_EVERY_BYTES: u64 = 64 * 1024 * 1024;

/// What a call to [`ModelFetcher::fetch`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file was already on disk; the network was not touched.
    AlreadyPresent { path: PathBuf },
    /// The file was downloaded and moved into place.
    Downloaded { path: PathBuf, bytes: u64 },
}

impl FetchOutcome {
    pub fn path(&self) -> &Path {
        match self {
            FetchOutcome::AlreadyPresent { path } | FetchOutcome::Downloaded { path, .. } => path,
        }
    }

    pub fn was_downloaded(&self) -> bool {
        matches!(self, FetchOutcome::Downloaded { .. })
    }
}

/// Ensures a model exists at its category path, downloading it if absent.
///
/// Existence of the destination file is the only state consulted: an
/// existing file is never compared against the remote.
pub struct ModelFetcher<T = ReqwestTransport> {
    config: FetchConfig,
    transport: T,
}

impl ModelFetcher<ReqwestTransport> {
    /// Create a fetcher using a blocking `reqwest` client.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let transport = ReqwestTransport::new(config.timeout)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ModelFetcher<T> {
    pub fn with_transport(config: FetchConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// `<models_root>/<category dir>/<model_name>`
    pub fn destination(&self, request: &ModelRequest) -> PathBuf {
        request
            .model_type()
            .directory(self.config.models_root())
            .join(request.model_name())
    }

    /// The link with the configured token appended.
    pub fn effective_url(&self, request: &ModelRequest) -> Url {
        request.download_url(self.config.token())
    }

    /// Download `request` unless its destination already exists.
    ///
    /// The body is streamed into `<model_name>.partial` and renamed into
    /// place once complete; on failure the staging file is removed. The
    /// category directory must already exist.
    pub fn fetch(
        &self,
        request: &ModelRequest,
        progress: &dyn ProgressSink,
    ) -> Result<FetchOutcome, FetchError> {
        let path = self.destination(request);

        if path.exists() {
            info!(
                "File '{}' already exists in {:?}. Skipping download.",
                request.model_name(),
                path.parent().unwrap_or(&path)
            );
            progress.on_event(&DownloadEvent::Skipped {
                model_name: request.model_name().to_string(),
                path: path.clone(),
            });
            return Ok(FetchOutcome::AlreadyPresent { path });
        }

        info!(
            "Downloading '{}' from {}",
            request.model_name(),
            request.redacted_url()
        );

        let remote = self.transport.get(&self.effective_url(request))?;
        let partial_path = partial_path(&path);

        let result = self
            .stream_to_file(request, remote, &partial_path, progress)
            .and_then(|bytes| {
                fs::rename(&partial_path, &path)
                    .map_err(|e| FetchError::filesystem(&path, e))?;
                Ok(bytes)
            });

        match result {
            Ok(bytes) => {
                info!("File downloaded and saved to {:?} ({} bytes)", path, bytes);
                progress.on_event(&DownloadEvent::Complete {
                    model_name: request.model_name().to_string(),
                    path: path.clone(),
                    bytes,
                });
                Ok(FetchOutcome::Downloaded { path, bytes })
            }
            Err(e) => {
                remove_partial(&partial_path);
                Err(e)
            }
        }
    }

    fn stream_to_file(
        &self,
        request: &ModelRequest,
        remote: RemoteFile,
        partial_path: &Path,
        progress: &dyn ProgressSink,
    ) -> Result<u64, FetchError> {
        let model_name = request.model_name();
        let total_bytes = remote.content_length.unwrap_or(0);

        debug!(
            "Streaming {} bytes into {:?}",
            if total_bytes > 0 {
                total_bytes.to_string()
            } else {
                "unknown".to_string()
            },
            partial_path
        );

        progress.on_event(&DownloadEvent::Started {
            model_name: model_name.to_string(),
            total_bytes,
        });

        let file =
            File::create(partial_path).map_err(|e| FetchError::filesystem(partial_path, e))?;
        let mut writer = BufWriter::new(file);
        let mut body = remote.body;
        let mut buffer = vec![0u8; self.config.chunk_size.max(1)];
        let mut downloaded = 0u64;
        let mut next_log = LOG_EVERY_BYTES;

        loop {
            let read = read_chunk(&mut body, &mut buffer)?;
            if read == 0 {
                break;
            }

            writer
                .write_all(&buffer[..read])
                .map_err(|e| FetchError::filesystem(partial_path, e))?;
            downloaded += read as u64;

            progress.on_event(&DownloadEvent::Progress {
                model_name: model_name.to_string(),
                downloaded_bytes: downloaded,
                total_bytes,
            });

            if downloaded >= next_log {
                debug!("'{}': {} / {} bytes", model_name, downloaded, total_bytes);
                next_log += LOG_EVERY_BYTES;
            }
        }

        let file = writer
            .into_inner()
            .map_err(|e| FetchError::filesystem(partial_path, e.into_error()))?;
        file.sync_all()
            .map_err(|e| FetchError::filesystem(partial_path, e))?;

        if total_bytes > 0 && downloaded != total_bytes {
            return Err(FetchError::Transport(format!(
                "Incomplete download: received {} of {} bytes",
                downloaded, total_bytes
            )));
        }

        Ok(downloaded)
    }
}

/// Fill `buffer` from `body`, returning fewer bytes only at end of stream.
fn read_chunk(body: &mut dyn Read, buffer: &mut [u8]) -> Result<usize, FetchError> {
    let mut filled = 0;
    while filled < buffer.len() {
        match body.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(FetchError::Transport(format!(
                    "Download error: {}",
                    describe_read_error(e)
                )))
            }
        }
    }
    Ok(filled)
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    path.with_file_name(name)
}

fn remove_partial(partial_path: &Path) {
    match fs::remove_file(partial_path) {
        Ok(()) => debug!("Removed staging file {:?}", partial_path),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove staging file {:?}: {}", partial_path, e),
    }
}
