//! Core of the standard-tidy checker.
//!
//! A rule is one unit of the Standard, identified by a stable ID such as
//! `README.TITLE`. Rule crates describe their rules with a [`RuleDescriptor`]
//! and hand them to a [`RuleRegistry`]; a driver then instantiates a rule per
//! library with a [`RuleContext`] and a [`RuleConfig`] and runs
//! [`Rule::check`] and, optionally, [`Rule::fix`].

mod context;
mod error;
mod file;
mod registry;
mod rule;
mod standard;
mod value_set;

pub use context::{CollectingSink, DiagnosticSink, RuleContext, TracingSink};
pub use error::{Result, TidyError};
pub use file::FileAccessor;
pub use registry::{RuleDescriptor, RuleFactory, RuleRegistry};
pub use rule::{Rule, RuleBase, RuleConfig};
pub use standard::{RuleEntry, RuleKind, Standard};
pub use value_set::ConfiguredValueSet;
