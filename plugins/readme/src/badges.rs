use tidy_core::{ConfiguredValueSet, Result, Rule, RuleBase, RuleConfig, RuleContext};

pub const ID: &str = "README.BADGES";

pub fn build<'a>(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Box<dyn Rule + 'a>> {
    Ok(Box::new(BadgesRule::new(context, config)?))
}

/// Exactly one maturity badge from the configured set must appear.
///
/// The configuration lists one badge per maturity state.
pub struct BadgesRule<'a> {
    base: RuleBase<'a>,
    badges: ConfiguredValueSet<'a>,
}

impl<'a> BadgesRule<'a> {
    pub fn new(context: &'a RuleContext, config: &'a RuleConfig) -> Result<Self> {
        let badges =
            ConfiguredValueSet::sized(&config.values, context.maturity_states().len(), "badges")?;

        Ok(Self {
            base: RuleBase::new(context, config),
            badges,
        })
    }
}

impl Rule for BadgesRule<'_> {
    fn id(&self) -> &'static str {
        ID
    }

    fn check(&self) -> Result<bool> {
        if !self.badges.exactly_one_present(self.base.file())? {
            self.base.log(&format!(
                "The file '{}' does not contain exactly one of the required badges from {:?}",
                self.base.path().display(),
                self.badges.values()
            ));
            return Ok(false);
        }

        Ok(true)
    }

    // Picking a badge means picking a maturity state, which is a human call.
    fn fix(&self) -> Result<bool> {
        Ok(false)
    }
}
