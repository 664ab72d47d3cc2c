use std::sync::OnceLock;
use tidy_core::RuleRegistry;

static REGISTRY: OnceLock<RuleRegistry> = OnceLock::new();

/// Adds every built-in rule crate. New rule crates hook in here.
pub fn register_all_rules(registry: &mut RuleRegistry) {
    tidy_readme::register_rules(registry);
}

/// The process-wide registry, populated on first use and read-only afterwards.
pub fn global_registry() -> &'static RuleRegistry {
    REGISTRY.get_or_init(|| {
        let mut registry = RuleRegistry::new();
        register_all_rules(&mut registry);
        tracing::debug!("Registered {} rules", registry.len());
        registry
    })
}
