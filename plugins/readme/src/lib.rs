//! `README.*` rules.
//!
//! Every rule here inspects `README.md` at the library root. Call
//! [`register_rules`] once at startup to make them available to a driver.

mod badges;
mod implements;
mod library_status;
mod title;

pub use badges::BadgesRule;
pub use implements::ImplementsRule;
pub use library_status::LibraryStatusRule;
pub use title::TitleRule;

use tidy_core::{RuleDescriptor, RuleRegistry};

pub const README_FILE: &str = "README.md";

/// Where the Standard documents each rule.
pub(crate) const STANDARD_DOCS: &str =
    "https://github.com/bemanproject/beman/blob/main/docs/BEMAN_STANDARD.md";

pub fn register_rules(registry: &mut RuleRegistry) {
    registry.register(RuleDescriptor {
        id: title::ID,
        target_file: README_FILE,
        factory: title::build,
    });
    registry.register(RuleDescriptor {
        id: badges::ID,
        target_file: README_FILE,
        factory: badges::build,
    });
    registry.register(RuleDescriptor {
        id: implements::ID,
        target_file: README_FILE,
        factory: implements::build,
    });
    registry.register(RuleDescriptor {
        id: library_status::ID,
        target_file: README_FILE,
        factory: library_status::build,
    });
}
