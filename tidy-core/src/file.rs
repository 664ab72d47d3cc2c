use crate::error::{Result, TidyError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Line-oriented access to the one file a rule inspects.
///
/// Reads always go to disk so a rule sees the effect of an earlier fix.
/// Writes are all-or-nothing: the new content lands in a temporary file next
/// to the target and is renamed over it, so a failed write never leaves a
/// half-written file behind.
#[derive(Debug, Clone)]
pub struct FileAccessor {
    path: PathBuf,
}

impl FileAccessor {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Full text of the file.
    pub fn read_content(&self) -> Result<String> {
        fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                TidyError::FileNotFound(self.path.clone())
            } else {
                TidyError::Read {
                    path: self.path.clone(),
                    source,
                }
            }
        })
    }

    /// All lines in order, with trailing whitespace and line endings removed.
    pub fn read_lines_stripped(&self) -> Result<Vec<String>> {
        let content = self.read_content()?;
        Ok(content.lines().map(|line| line.trim_end().to_string()).collect())
    }

    /// Whether `needle` occurs anywhere in the file, across line boundaries.
    pub fn has_content(&self, needle: &str) -> Result<bool> {
        Ok(self.read_content()?.contains(needle))
    }

    /// Replaces line `index` (0-based) and leaves every other line untouched.
    pub fn replace_line(&self, index: usize, new_text: &str) -> Result<()> {
        let content = self.read_content()?;
        let mut lines = split_lines(&content);

        let len = lines.len();
        let line = lines.get_mut(index).ok_or_else(|| TidyError::LineOutOfRange {
            path: self.path.clone(),
            index,
            len,
        })?;
        let ending = line_ending(line);
        *line = format!("{}{}", strip_ending(new_text), ending);

        self.write_atomically(&lines.concat())
    }

    /// Inserts a line before `index`; `index == line count` appends.
    pub fn insert_line(&self, index: usize, new_text: &str) -> Result<()> {
        let content = self.read_content()?;
        let mut lines = split_lines(&content);

        let len = lines.len();
        if index > len {
            return Err(TidyError::LineOutOfRange {
                path: self.path.clone(),
                index,
                len,
            });
        }

        let ending = lines
            .first()
            .map(|line| line_ending(line))
            .filter(|ending| !ending.is_empty())
            .unwrap_or("\n");
        if let Some(last) = lines.last_mut() {
            if index == len && line_ending(last).is_empty() {
                last.push_str(ending);
            }
        }
        lines.insert(index, format!("{}{}", strip_ending(new_text), ending));

        self.write_atomically(&lines.concat())
    }

    fn write_atomically(&self, content: &str) -> Result<()> {
        let target = self.resolve_target()?;
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        self.write_through(&dir, &target, content)
    }

    /// The path the new content has to land on. A symlinked file is edited
    /// at its destination so the link itself survives.
    fn resolve_target(&self) -> Result<PathBuf> {
        match fs::symlink_metadata(&self.path) {
            Ok(metadata) if metadata.file_type().is_symlink() => {
                fs::canonicalize(&self.path).map_err(|source| TidyError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
            _ => Ok(self.path.clone()),
        }
    }

    /// Writes `content` to a temporary file in `temp_dir`, then renames it onto `target`.
    fn write_through(&self, temp_dir: &Path, target: &Path, content: &str) -> Result<()> {
        let write_error = |source: io::Error| TidyError::Write {
            path: self.path.clone(),
            source,
        };

        let mut temp = NamedTempFile::new_in(temp_dir).map_err(write_error)?;
        temp.write_all(content.as_bytes()).map_err(write_error)?;
        temp.as_file().sync_all().map_err(write_error)?;

        // Keep the target's mode; the temporary file is created private.
        if let Ok(metadata) = fs::metadata(target) {
            fs::set_permissions(temp.path(), metadata.permissions()).map_err(write_error)?;
        }

        temp.persist(target).map_err(|err| write_error(err.error))?;

        tracing::debug!(path = %self.path.display(), resolved = %target.display(), "Rewrote file");
        Ok(())
    }
}

/// Splits into lines that still carry their own line ending.
fn split_lines(content: &str) -> Vec<String> {
    content.split_inclusive('\n').map(str::to_string).collect()
}

fn line_ending(line: &str) -> &'static str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

fn strip_ending(text: &str) -> &str {
    text.trim_end_matches(['\r', '\n'])
}
