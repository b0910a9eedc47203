use std::path::PathBuf;
use std::time::SystemTime;
use walkdir::WalkDir;

/// Default screenshot directory, relative to the working directory
pub const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

/// A screenshot file picked for a test
#[derive(Debug, Clone, PartialEq)]
pub struct Screenshot {
    /// File name inside the screenshot directory
    pub name: String,
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// File name prefix screenshots of a test start with
///
/// Whitespace runs become a single `_` and the result is lowercased, so
/// "Login Test" maps to "login_test".
pub fn screenshot_prefix(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_whitespace = false;
    for c in title.chars() {
        if is_title_whitespace(c) {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out.to_lowercase()
}

/// Whitespace as the browser engine's title matching sees it: Unicode
/// White_Space without U+0085, plus the byte order mark U+FEFF.
fn is_title_whitespace(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

/// Finds the newest screenshot belonging to a test title
pub struct ScreenshotResolver {
    dir: PathBuf,
}

impl ScreenshotResolver {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Newest file whose name starts with the title's prefix, if any
    pub fn resolve(&self, title: &str) -> Option<Screenshot> {
        if !self.dir.is_dir() {
            return None;
        }

        let prefix = screenshot_prefix(title);
        let mut best: Option<Screenshot> = None;

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| match e {
                Ok(e) => Some(e),
                Err(err) => {
                    log::debug!("Skipping unreadable screenshot entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if !name.starts_with(&prefix) {
                continue;
            }

            let modified = match entry.metadata().map(|m| m.modified()) {
                Ok(Ok(t)) => t,
                _ => {
                    log::debug!("No modification time for {}", entry.path().display());
                    continue;
                }
            };

            if best.as_ref().map_or(true, |b| modified > b.modified) {
                best = Some(Screenshot {
                    name,
                    path: entry.path().to_path_buf(),
                    modified,
                });
            }
        }

        best
    }
}
