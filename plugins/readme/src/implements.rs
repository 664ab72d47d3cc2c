use crate::STANDARD_DOCS;
use regex::Regex;
use tidy_core::{Result, Rule, RuleBase, RuleConfig, RuleContext, TidyError};

pub const ID: &str = "README.IMPLEMENTS";

// A bold "Implements" marker, at least one paper number like P0898R3, then a
// wg21.link URL. For example:
// **Implements**: [Standard Library Concepts (P0898R3)](https://wg21.link/P0898R3).
const IMPLEMENTS_PATTERN: &str = r"^\*\*Implements\*\*:\s+.*\bP\d{4}R\d+\b.*wg21\.link/\S+";

pub fn build<'a>(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Box<dyn Rule + 'a>> {
    Ok(Box::new(ImplementsRule::new(context, config)?))
}

/// Exactly one line must declare the proposal(s) the library implements.
pub struct ImplementsRule<'a> {
    base: RuleBase<'a>,
    pattern: Regex,
}

impl<'a> ImplementsRule<'a> {
    pub fn new(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Self> {
        let pattern = Regex::new(IMPLEMENTS_PATTERN)
            .map_err(|err| TidyError::Config(format!("{}: {}", ID, err)))?;

        Ok(Self {
            base: RuleBase::new(context, config),
            pattern,
        })
    }

    fn count_implements_lines(&self, lines: &[String]) -> usize {
        lines.iter().filter(|line| self.pattern.is_match(line)).count()
    }
}

impl Rule for ImplementsRule<'_> {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self) -> Result<bool> {
        let lines = self.base.read_lines_stripped()?;

        if self.count_implements_lines(&lines) == 1 {
            return Ok(true);
        }

        self.base.log(&format!(
            "Invalid/missing/duplicate 'Implements:' line in '{}'. See {}#readmeimplements for more information.",
            self.base.path().display(),
            STANDARD_DOCS
        ));
        Ok(false)
    }

    /// Which proposals a library implements is for a human to state.
    fn fix(&self) -> Result<bool> {
        self.base.log(&format!(
            "Please write an Implements line in '{}'. See {}#readmeimplements for the desired format.",
            self.base.path().display(),
            STANDARD_DOCS
        ));
        Ok(false)
    }
}
