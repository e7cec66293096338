//! Verbose reporting for sheet operations.
//!
//! A [`SpriteSheet`](crate::sheet::SpriteSheet) in verbose mode describes what it
//! does (loading, alpha resolution, extraction, export) through a
//! [`SheetReporter`]. The console reporter prints one line per event to stderr;
//! tests inject their own writer or reporter.

use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use image::Rgb;

use crate::color::format_color_key;

/// Events reported by a sheet in verbose mode.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    /// Sheet pixels decoded
    Loaded {
        /// Where the pixels came from (a path, or a label for in-memory images)
        source: String,
        width: u32,
        height: u32,
    },
    /// Background mode decided
    AlphaResolved {
        /// Key color, `None` for native per-pixel alpha
        background: Option<Rgb<u8>>,
    },
    /// Grid built
    Extracted {
        sprites: usize,
        transparent: usize,
        rows: usize,
        columns: usize,
    },
    /// Export directory did not exist and was created
    DirectoryCreated { path: PathBuf },
    /// Export finished
    Exported { count: usize, directory: PathBuf },
}

impl std::fmt::Display for SheetEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SheetEvent::Loaded { source, width, height } => {
                write!(f, "Loaded spritesheet {} ({}x{})", source, width, height)
            }
            SheetEvent::AlphaResolved { background: None } => {
                write!(f, "Using per-pixel alpha")
            }
            SheetEvent::AlphaResolved { background: Some(key) } => {
                write!(f, "Using color key {}", format_color_key(*key))
            }
            SheetEvent::Extracted { sprites, transparent, rows, columns } => write!(
                f,
                "Extracted {} sprite{} from a {}x{} grid ({} transparent)",
                sprites,
                if *sprites == 1 { "" } else { "s" },
                rows,
                columns,
                transparent
            ),
            SheetEvent::DirectoryCreated { path } => {
                write!(f, "Created directory '{}'", path.display())
            }
            SheetEvent::Exported { count, directory } => write!(
                f,
                "Exported {} image{} to directory '{}'",
                count,
                if *count == 1 { "" } else { "s" },
                directory.display()
            ),
        }
    }
}

/// Trait for verbose reporters.
pub trait SheetReporter: Send + Sync {
    /// Report an event.
    fn report(&self, event: SheetEvent);
}

/// A reporter that discards all events.
#[derive(Debug, Default)]
pub struct NullReporter;

impl SheetReporter for NullReporter {
    fn report(&self, _event: SheetEvent) {}
}

/// Console reporter with optional colors.
pub struct ConsoleReporter {
    use_colors: bool,
    /// Output writer (for testing)
    output: Mutex<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for ConsoleReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleReporter").field("use_colors", &self.use_colors).finish()
    }
}

impl ConsoleReporter {
    /// Create a reporter writing to stderr, colored when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            use_colors: std::io::stderr().is_terminal(),
            output: Mutex::new(Box::new(std::io::stderr())),
        }
    }

    /// Create a reporter that writes to a custom output.
    pub fn with_output<W: Write + Send + 'static>(output: W) -> Self {
        Self {
            use_colors: false, // Disable colors for custom output
            output: Mutex::new(Box::new(output)),
        }
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn tag(&self) -> String {
        if self.use_colors {
            "\x1b[36m[sheet]\x1b[0m".to_string()
        } else {
            "[sheet]".to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetReporter for ConsoleReporter {
    fn report(&self, event: SheetEvent) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{} {}", self.tag(), event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Writer sharing its buffer with the test.
    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    #[test]
    fn test_console_lines() {
        let buf = SharedBuf::default();
        let reporter = ConsoleReporter::with_output(buf.clone());

        reporter.report(SheetEvent::AlphaResolved {
            background: Some(Rgb([255, 0, 255])),
        });
        reporter.report(SheetEvent::Extracted {
            sprites: 1,
            transparent: 3,
            rows: 2,
            columns: 2,
        });
        reporter.report(SheetEvent::Exported {
            count: 4,
            directory: PathBuf::from("png"),
        });

        let out = buf.contents();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[sheet] Using color key #FF00FF",
                "[sheet] Extracted 1 sprite from a 2x2 grid (3 transparent)",
                "[sheet] Exported 4 images to directory 'png'",
            ]
        );
    }

    #[test]
    fn test_colors_wrap_tag() {
        let buf = SharedBuf::default();
        let reporter = ConsoleReporter::with_output(buf.clone()).with_colors(true);
        reporter.report(SheetEvent::AlphaResolved { background: None });

        assert!(buf.contents().starts_with("\x1b[36m[sheet]\x1b[0m Using per-pixel alpha"));
    }
}
