use regex::Regex;
use tidy_core::{Result, Rule, RuleBase, RuleConfig, RuleContext, TidyError};

pub const ID: &str = "README.TITLE";

pub fn build<'a>(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Box<dyn Rule + 'a>> {
    Ok(Box::new(TitleRule::new(context, config)?))
}

/// The first line must read `# <library name>: <short description>`.
pub struct TitleRule<'a> {
    base: RuleBase<'a>,
    pattern: Regex,
}

impl<'a> TitleRule<'a> {
    pub fn new(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Self> {
        let pattern = format!(r"^# {}: (.*\S.*)$", regex::escape(context.library_name()));
        let pattern = Regex::new(&pattern)
            .map_err(|err| TidyError::Config(format!("{}: {}", ID, err)))?;

        Ok(Self {
            base: RuleBase::new(context, config),
            pattern,
        })
    }

    fn placeholder(&self) -> String {
        format!("# {}: TODO Short Description", self.base.library_name())
    }
}

impl Rule for TitleRule<'_> {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self) -> Result<bool> {
        let lines = self.base.read_lines_stripped()?;
        let first_line = lines.first().map(String::as_str).unwrap_or_default();

        if !self.pattern.is_match(first_line) {
            self.base.log(&format!(
                "The first line of the file '{}' is invalid. It should start with '# {}: <short_description>'.",
                self.base.path().display(),
                self.base.library_name()
            ));
            return Ok(false);
        }

        Ok(true)
    }

    /// Writes a placeholder title a human still has to finish.
    fn fix(&self) -> Result<bool> {
        let title = self.placeholder();
        if self.base.read_lines_stripped()?.is_empty() {
            self.base.file().insert_line(0, &title)?;
        } else {
            self.base.replace_line(0, &title)?;
        }

        tracing::info!(path = %self.base.path().display(), "Rewrote README title");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::tempdir;
    use tidy_core::CollectingSink;

    fn context(library: &str, path: &Path, sink: Arc<CollectingSink>) -> RuleContext {
        RuleContext::new(library, path, vec!["RETIRED".to_string()], sink).unwrap()
    }

    fn check_title(library: &str, first_line: &str) -> bool {
        let temp = tempdir().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, format!("{}\n\nBody.\n", first_line)).unwrap();

        let context = context(library, &path, Arc::new(CollectingSink::new()));
        let config = RuleConfig::default();
        TitleRule::new(&context, &config).unwrap().check().unwrap()
    }

    #[test]
    fn test_valid_titles() {
        assert!(check_title("Foo", "# Foo: A library"));
        assert!(check_title("beman.scan_view", "# beman.scan_view: Scan view for C++"));
        assert!(check_title("Foo", "# Foo: x"));
    }

    #[test]
    fn test_invalid_titles() {
        assert!(!check_title("Foo", "# WrongName: A library"));
        assert!(!check_title("Foo", "# Foo A library"));
        assert!(!check_title("Foo", "# Foo:"));
        assert!(!check_title("Foo", "# Foo:    "));
        assert!(!check_title("Foo", "## Foo: A library"));
        assert!(!check_title("Foo", " # Foo: A library"));
        assert!(!check_title("Foo", "# Foobar: A library"));
    }

    #[test]
    fn test_library_name_is_literal() {
        // The dot must not act as a wildcard.
        assert!(!check_title("beman.optional", "# bemanXoptional: A library"));
    }

    #[test]
    fn test_check_logs_one_diagnostic() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, "# Bar: nope\n").unwrap();

        let sink = Arc::new(CollectingSink::new());
        let context = context("Foo", &path, sink.clone());
        let config = RuleConfig::default();
        assert!(!TitleRule::new(&context, &config).unwrap().check().unwrap());

        let messages = sink.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("README.md"));
        assert!(messages[0].contains("# Foo: <short_description>"));
    }

    #[test]
    fn test_empty_file_fails_and_fix_inserts_title() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, "").unwrap();

        let context = context("Foo", &path, Arc::new(CollectingSink::new()));
        let config = RuleConfig::default();
        let rule = TitleRule::new(&context, &config).unwrap();

        assert!(!rule.check().unwrap());
        assert!(rule.fix().unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "# Foo: TODO Short Description\n");
        assert!(rule.check().unwrap());
    }

    #[test]
    fn test_fix_is_idempotent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("README.md");
        fs::write(&path, "Title\nrest\n").unwrap();

        let context = context("Foo", &path, Arc::new(CollectingSink::new()));
        let config = RuleConfig::default();
        let rule = TitleRule::new(&context, &config).unwrap();

        assert!(rule.fix().unwrap());
        let once = fs::read_to_string(&path).unwrap();
        assert!(rule.fix().unwrap());
        let twice = fs::read_to_string(&path).unwrap();

        assert_eq!(once, "# Foo: TODO Short Description\nrest\n");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_missing_readme_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("README.md");

        let context = context("Foo", &path, Arc::new(CollectingSink::new()));
        let config = RuleConfig::default();
        let rule = TitleRule::new(&context, &config).unwrap();

        assert!(matches!(rule.check(), Err(TidyError::FileNotFound(_))));
    }
}
