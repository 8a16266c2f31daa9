//! Download progress events.
//!
//! Uses a discriminated union so a consumer can render a bar, print JSON
//! lines, or ignore the stream entirely.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Download state change, emitted in order for a single request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DownloadEvent {
    /// The destination already exists; nothing is fetched
    #[serde(rename = "skipped")]
    Skipped {
        #[serde(rename = "modelName")]
        model_name: String,
        path: PathBuf,
    },
    /// Response headers received, body about to stream
    #[serde(rename = "started")]
    Started {
        #[serde(rename = "modelName")]
        model_name: String,
        /// 0 when the server sent no `content-length`
        #[serde(rename = "totalBytes")]
        total_bytes: u64,
    },
    /// One chunk written
    #[serde(rename = "progress")]
    Progress {
        #[serde(rename = "modelName")]
        model_name: String,
        #[serde(rename = "downloadedBytes")]
        downloaded_bytes: u64,
        #[serde(rename = "totalBytes")]
        total_bytes: u64,
    },
    /// File moved into place
    #[serde(rename = "complete")]
    Complete {
        #[serde(rename = "modelName")]
        model_name: String,
        path: PathBuf,
        bytes: u64,
    },
}

impl DownloadEvent {
    /// Percentage complete, `None` while the total is unknown.
    pub fn percentage(&self) -> Option<f64> {
        match self {
            DownloadEvent::Progress {
                downloaded_bytes,
                total_bytes,
                ..
            } if *total_bytes > 0 => Some(*downloaded_bytes as f64 / *total_bytes as f64 * 100.0),
            DownloadEvent::Complete { .. } | DownloadEvent::Skipped { .. } => Some(100.0),
            _ => None,
        }
    }
}

/// Receiver for [`DownloadEvent`]s.
pub trait ProgressSink {
    fn on_event(&self, event: &DownloadEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_event(&self, _event: &DownloadEvent) {}
}

impl<F> ProgressSink for F
where
    F: Fn(&DownloadEvent),
{
    fn on_event(&self, event: &DownloadEvent) {
        self(event)
    }
}
