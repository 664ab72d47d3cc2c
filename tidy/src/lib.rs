pub mod cli;
pub mod registry;
pub mod report;
pub mod runner;

pub use cli::TidyCli;
pub use registry::{global_registry, register_all_rules};
pub use runner::{check_library, CheckOptions, LibraryReport, Outcome, RuleReport};

/// Default name of a library's own Standard definition.
pub const STANDARD_FILE: &str = ".tidy-standard.yaml";

#[derive(Debug, thiserror::Error)]
pub enum TidyCliError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("Rule '{0}' is not part of the Standard")]
    NotInStandard(String),

    #[error("{0} required rule(s) failed")]
    RequiredRulesFailed(usize),

    #[error("{0} rule(s) could not run")]
    RulesCouldNotRun(usize),
}
