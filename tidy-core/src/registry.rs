use crate::context::RuleContext;
use crate::error::{Result, TidyError};
use crate::rule::{Rule, RuleConfig};
use std::collections::HashMap;

/// Builds a rule bound to one library's context and the rule's configuration.
///
/// A factory validates the configuration it is given; a bad value set is a
/// setup defect and surfaces here, before the rule touches any file.
pub type RuleFactory = for<'a> fn(&'a RuleContext, &'a RuleConfig) -> Result<Box<dyn Rule + 'a>>;

/// Everything the registry knows about one standard ID.
#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    pub id: &'static str,
    /// File the rule inspects, relative to the library root.
    pub target_file: &'static str,
    pub factory: RuleFactory,
}

impl std::fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("target_file", &self.target_file)
            .finish_non_exhaustive()
    }
}

/// Maps standard IDs to rule constructors.
///
/// Populated once at startup through explicit `register` calls, read-only
/// afterwards.
pub struct RuleRegistry {
    rules: HashMap<&'static str, RuleDescriptor>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: HashMap::new(),
        }
    }

    /// Adds a rule.
    ///
    /// # Panics
    ///
    /// On an empty ID or an ID that is already registered. Both are
    /// programming errors in the rule crates.
    pub fn register(&mut self, descriptor: RuleDescriptor) {
        assert!(!descriptor.id.is_empty(), "rule ID must not be empty");
        if self.rules.contains_key(descriptor.id) {
            panic!("rule '{}' is already registered", descriptor.id);
        }

        tracing::debug!(rule = descriptor.id, file = descriptor.target_file, "Registered rule");
        self.rules.insert(descriptor.id, descriptor);
    }

    pub fn lookup(&self, id: &str) -> Result<&RuleDescriptor> {
        self.rules
            .get(id)
            .ok_or_else(|| TidyError::UnknownRule(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.contains_key(id)
    }

    /// Looks up `id` and builds the rule for one library.
    pub fn instantiate<'a>(
        &self,
        id: &str,
        context: &'a RuleContext,
        config: &'a RuleConfig,
    ) -> Result<Box<dyn Rule + 'a>> {
        let descriptor = self.lookup(id)?;
        tracing::debug!(
            rule = id,
            library = context.library_name(),
            "Instantiating rule"
        );
        (descriptor.factory)(context, config)
    }

    /// Registered IDs, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.rules.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn descriptors(&self) -> Vec<&RuleDescriptor> {
        let mut descriptors: Vec<_> = self.rules.values().collect();
        descriptors.sort_by_key(|descriptor| descriptor.id);
        descriptors
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TracingSink;
    use std::sync::Arc;

    struct AlwaysPasses;

    impl Rule for AlwaysPasses {
        fn id(&self) -> &'static str {
            "TEST.PASS"
        }

        fn check(&self) -> Result<bool> {
            Ok(true)
        }

        fn fix(&self) -> Result<bool> {
            Ok(false)
        }
    }

    fn build_always_passes<'a>(
        _context: &'a RuleContext,
        _config: &'a RuleConfig,
    ) -> Result<Box<dyn Rule + 'a>> {
        Ok(Box::new(AlwaysPasses))
    }

    fn descriptor(id: &'static str) -> RuleDescriptor {
        RuleDescriptor {
            id,
            target_file: "README.md",
            factory: build_always_passes,
        }
    }

    fn context() -> RuleContext {
        RuleContext::new(
            "foo",
            "does/not/exist/README.md",
            vec!["RETIRED".to_string()],
            Arc::new(TracingSink),
        )
        .unwrap()
    }

    #[test]
    fn test_registry_starts_empty() {
        let registry = RuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.ids().is_empty());
    }

    #[test]
    fn test_register_and_instantiate() {
        let mut registry = RuleRegistry::new();
        registry.register(descriptor("TEST.PASS"));
        registry.register(descriptor("A.FIRST"));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.ids(), vec!["A.FIRST", "TEST.PASS"]);
        assert_eq!(registry.lookup("TEST.PASS").unwrap().target_file, "README.md");

        let context = context();
        let config = RuleConfig::default();
        let rule = registry.instantiate("TEST.PASS", &context, &config).unwrap();
        assert_eq!(rule.id(), "TEST.PASS");
        assert!(rule.check().unwrap());
    }

    #[test]
    fn test_unknown_rule_is_an_error() {
        let registry = RuleRegistry::new();
        let context = context();
        let config = RuleConfig::default();

        match registry.instantiate("README.NOPE", &context, &config) {
            Err(TidyError::UnknownRule(id)) => assert_eq!(id, "README.NOPE"),
            Err(other) => panic!("Unexpected error: {}", other),
            Ok(_) => panic!("Unknown rule must not instantiate"),
        };
    }

    #[test]
    fn test_ids_are_case_sensitive() {
        let mut registry = RuleRegistry::new();
        registry.register(descriptor("README.TITLE"));
        assert!(registry.contains("README.TITLE"));
        assert!(!registry.contains("readme.title"));
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_duplicate_registration_panics() {
        let mut registry = RuleRegistry::new();
        registry.register(descriptor("TEST.PASS"));
        registry.register(descriptor("TEST.PASS"));
    }

    #[test]
    #[should_panic(expected = "must not be empty")]
    fn test_empty_id_panics() {
        let mut registry = RuleRegistry::new();
        registry.register(descriptor(""));
    }
}
