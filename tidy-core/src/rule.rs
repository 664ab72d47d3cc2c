use crate::context::RuleContext;
use crate::error::Result;
use crate::file::FileAccessor;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters the Standard supplies for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Badge snippets, status snippets, or nothing for rules without parameters.
    #[serde(default)]
    pub values: Vec<String>,
    /// Whether a failure blocks acceptance. Only the driver looks at this.
    #[serde(default)]
    pub required: bool,
}

impl RuleConfig {
    pub fn new(values: Vec<String>, required: bool) -> Self {
        Self { values, required }
    }
}

/// The capability set every rule of the Standard provides.
pub trait Rule {
    /// Standard ID this rule implements, e.g. `README.TITLE`.
    fn id(&self) -> &'static str;

    /// Inspects the target file without touching it.
    ///
    /// Non-conformance is `Ok(false)` after exactly one diagnostic has been
    /// logged. `Err` is reserved for environment errors such as a missing file.
    fn check(&self) -> Result<bool>;

    /// Rewrites the target file into conformance.
    ///
    /// Returns `Ok(false)` when the rule cannot be fixed automatically. The
    /// caller is expected to run [`Rule::check`] again afterwards.
    fn fix(&self) -> Result<bool>;
}

/// State and helpers shared by every file-backed rule.
///
/// Rules hold one of these instead of inheriting from a base type.
#[derive(Debug)]
pub struct RuleBase<'a> {
    context: &'a RuleContext,
    config: &'a RuleConfig,
    file: FileAccessor,
}

impl<'a> RuleBase<'a> {
    pub fn new(context: &'a RuleContext, config: &'a RuleConfig) -> Self {
        Self {
            context,
            config,
            file: FileAccessor::new(context.target_path()),
        }
    }

    pub fn context(&self) -> &'a RuleContext {
        self.context
    }

    pub fn config(&self) -> &'a RuleConfig {
        self.config
    }

    pub fn values(&self) -> &'a [String] {
        &self.config.values
    }

    pub fn library_name(&self) -> &'a str {
        self.context.library_name()
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn file(&self) -> &FileAccessor {
        &self.file
    }

    pub fn log(&self, message: &str) {
        self.context.log(message);
    }

    pub fn read_lines_stripped(&self) -> Result<Vec<String>> {
        self.file.read_lines_stripped()
    }

    pub fn has_content(&self, needle: &str) -> Result<bool> {
        self.file.has_content(needle)
    }

    pub fn replace_line(&self, index: usize, new_text: &str) -> Result<()> {
        self.file.replace_line(index, new_text)
    }
}
