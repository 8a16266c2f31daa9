//! Terminal renderings of the download event stream.

use std::cell::Cell;
use std::io::Write;
use std::time::{Duration, Instant};

use civit_fetch::{DownloadEvent, ProgressSink};

const BAR_WIDTH: usize = 30;
const REDRAW_EVERY: Duration = Duration::from_millis(100);

/// Single-line progress bar on stderr, redrawn at most every 100ms.
#[derive(Default)]
pub struct TerminalProgress {
    last_draw: Cell<Option<Instant>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw(&self, line: &str, finished: bool) {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r{}", line);
        if finished {
            let _ = writeln!(stderr);
        }
        let _ = stderr.flush();
        self.last_draw.set(Some(Instant::now()));
    }
}

impl ProgressSink for TerminalProgress {
    fn on_event(&self, event: &DownloadEvent) {
        match event {
            DownloadEvent::Started {
                model_name,
                total_bytes,
            } => {
                self.last_draw.set(None);
                self.draw(&render_line(model_name, 0, *total_bytes), false);
            }
            DownloadEvent::Progress {
                model_name,
                downloaded_bytes,
                total_bytes,
            } => {
                let done = *total_bytes > 0 && downloaded_bytes >= total_bytes;
                let due = self
                    .last_draw
                    .get()
                    .map_or(true, |at| at.elapsed() >= REDRAW_EVERY);
                if due || done {
                    self.draw(
                        &render_line(model_name, *downloaded_bytes, *total_bytes),
                        false,
                    );
                }
            }
            DownloadEvent::Complete {
                model_name, bytes, ..
            } => {
                self.draw(&render_line(model_name, *bytes, *bytes), true);
            }
            DownloadEvent::Skipped { .. } => {}
        }
    }
}

/// One JSON object per event on stdout.
#[derive(Default)]
pub struct JsonProgress;

impl ProgressSink for JsonProgress {
    fn on_event(&self, event: &DownloadEvent) {
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => ::log::warn!("Failed to serialize progress event: {}", e),
        }
    }
}

/// `Downloading <name>:  42%|############                  | 1.2 MiB/2.9 MiB`
pub fn render_line(model_name: &str, downloaded: u64, total: u64) -> String {
    if total == 0 {
        return format!(
            "Downloading {}: {} (unknown total)",
            model_name,
            format_bytes(downloaded)
        );
    }

    let fraction = (downloaded as f64 / total as f64).clamp(0.0, 1.0);
    let filled = (fraction * BAR_WIDTH as f64).round() as usize;

    format!(
        "Downloading {}: {:>3}%|{}{}| {}/{}",
        model_name,
        (fraction * 100.0).floor() as u64,
        "#".repeat(filled),
        " ".repeat(BAR_WIDTH - filled),
        format_bytes(downloaded),
        format_bytes(total)
    )
}

/// Binary-unit size, e.g. `512 B`, `1.5 KiB`, `2.0 GiB`
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        let test_cases = vec![
            (0, "0 B"),
            (1023, "1023 B"),
            (1024, "1.0 KiB"),
            (1536, "1.5 KiB"),
            (5 * 1024 * 1024, "5.0 MiB"),
            (3 * 1024 * 1024 * 1024, "3.0 GiB"),
        ];

        for (bytes, expected) in test_cases {
            assert_eq!(format_bytes(bytes), expected, "{} bytes", bytes);
        }
    }

    #[test]
    fn test_render_line_with_total() {
        let line = render_line("model.safetensors", 512, 1024);
        assert!(line.starts_with("Downloading model.safetensors:  50%|"));
        assert!(line.ends_with("| 512 B/1.0 KiB"));
        assert_eq!(line.matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_render_line_complete_and_unknown() {
        let done = render_line("vae.pt", 2048, 2048);
        assert!(done.contains("100%"));
        assert_eq!(done.matches('#').count(), BAR_WIDTH);

        let unknown = render_line("vae.pt", 4096, 0);
        assert_eq!(unknown, "Downloading vae.pt: 4.0 KiB (unknown total)");
    }
}
