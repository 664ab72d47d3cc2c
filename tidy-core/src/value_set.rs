use crate::error::{Result, TidyError};
use crate::file::FileAccessor;

/// A configured list of snippets of which exactly one must occur in a file.
///
/// Badge and status rules share this: the structure of the check is the same,
/// only the vocabulary differs.
#[derive(Debug, Clone, Copy)]
pub struct ConfiguredValueSet<'a> {
    values: &'a [String],
}

impl<'a> ConfiguredValueSet<'a> {
    /// Accepts `values` only if it holds exactly `expected` non-empty entries.
    pub fn sized(values: &'a [String], expected: usize, kind: &str) -> Result<Self> {
        if values.len() != expected {
            return Err(TidyError::Config(format!(
                "expected {} {} (one per maturity state), found {}",
                expected,
                kind,
                values.len()
            )));
        }
        if values.iter().any(|value| value.is_empty()) {
            return Err(TidyError::Config(format!("{} must not contain empty values", kind)));
        }

        Ok(Self { values })
    }

    pub fn values(&self) -> &'a [String] {
        self.values
    }

    /// The configured values found anywhere in the file, in configuration order.
    pub fn present_in(&self, file: &FileAccessor) -> Result<Vec<&'a str>> {
        let mut present = Vec::new();
        for value in self.values {
            if file.has_content(value)? {
                present.push(value.as_str());
            }
        }
        Ok(present)
    }

    /// Zero matches and several matches both fail.
    pub fn exactly_one_present(&self, file: &FileAccessor) -> Result<bool> {
        Ok(self.present_in(file)?.len() == 1)
    }
}
