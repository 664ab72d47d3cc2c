use tidy_core::{ConfiguredValueSet, Result, Rule, RuleBase, RuleConfig, RuleContext};

pub const ID: &str = "README.LIBRARY_STATUS";

pub fn build<'a>(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Box<dyn Rule + 'a>> {
    Ok(Box::new(LibraryStatusRule::new(context, config)?))
}

/// Exactly one of the configured status snippets must appear somewhere in the file.
///
/// The configuration lists one status per maturity state.
pub struct LibraryStatusRule<'a> {
    base: RuleBase<'a>,
    statuses: ConfiguredValueSet<'a>,
}

impl<'a> LibraryStatusRule<'a> {
    pub fn new(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Self> {
        let statuses =
            ConfiguredValueSet::sized(&config.values, context.maturity_states().len(), "statuses")?;

        Ok(Self {
            base: RuleBase::new(context, config),
            statuses,
        })
    }
}

impl Rule for LibraryStatusRule<'_> {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self) -> Result<bool> {
        if !self.statuses.exactly_one_present(self.base.file())? {
            self.base.log(&format!(
                "The file '{}' does not contain exactly one of the required statuses from {:?}",
                self.base.path().display(),
                self.statuses.values()
            ));
            return Ok(false);
        }

        Ok(true)
    }

    fn fix(&self) -> Result<bool> {
        Ok(false)
    }
}
