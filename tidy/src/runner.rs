use crate::TidyCliError;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tidy_core::{CollectingSink, Rule, RuleContext, RuleRegistry, Standard};

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Run `fix()` on failing rules and check again.
    pub fix_inplace: bool,
    /// Treat recommendations as requirements.
    pub require_all: bool,
    /// Only run these rule IDs.
    pub checks: Option<Vec<String>>,
    /// Overrides the name derived from the repository directory.
    pub library_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    /// Failed the first check, passed after `fix()`.
    Fixed,
    /// The rule could not run, e.g. the target file is missing.
    Error(String),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Passed | Outcome::Fixed)
    }
}

#[derive(Debug, Clone)]
pub struct RuleReport {
    pub id: String,
    pub required: bool,
    pub outcome: Outcome,
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LibraryReport {
    pub library_name: String,
    pub repo_path: PathBuf,
    pub rules: Vec<RuleReport>,
}

impl LibraryReport {
    pub fn passed(&self) -> usize {
        self.rules.iter().filter(|rule| rule.outcome.is_success()).count()
    }

    /// Required rules the library still violates after any fixing.
    ///
    /// Rules that could not run are counted by [`LibraryReport::errors`] instead.
    pub fn failed_required(&self) -> usize {
        self.rules
            .iter()
            .filter(|rule| rule.required && rule.outcome == Outcome::Failed)
            .count()
    }

    /// Rules that could not run at all.
    pub fn errors(&self) -> usize {
        self.rules
            .iter()
            .filter(|rule| matches!(rule.outcome, Outcome::Error(_)))
            .count()
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    /// Passed rules as a percentage of the rules that ran.
    pub fn coverage(&self) -> f64 {
        if self.rules.is_empty() {
            return 100.0;
        }
        self.passed() as f64 * 100.0 / self.rules.len() as f64
    }
}

/// Runs the Standard's rules against one library, one rule at a time.
///
/// Configuration problems abort the whole run. A missing or unreadable file
/// is recorded against the rule and the remaining rules still run.
pub fn check_library(
    registry: &RuleRegistry,
    standard: &Standard,
    repo_path: &Path,
    options: &CheckOptions,
) -> Result<LibraryReport> {
    if !repo_path.is_dir() {
        return Err(TidyCliError::RepoNotFound(repo_path.display().to_string()).into());
    }

    let library_name = match &options.library_name {
        Some(name) => name.clone(),
        None => library_name_from_path(repo_path)?,
    };

    let ids = selected_rules(standard, options)?;
    let mut rules = Vec::with_capacity(ids.len());

    for id in ids {
        let descriptor = registry.lookup(&id)?;
        let sink = Arc::new(CollectingSink::new());
        let context = RuleContext::new(
            library_name.as_str(),
            repo_path.join(descriptor.target_file),
            standard.maturity_model.clone(),
            sink.clone(),
        )?;
        let config = standard.rule_config(&id, options.require_all)?;
        let rule = registry.instantiate(&id, &context, &config)?;

        let outcome = match evaluate(&*rule, options.fix_inplace) {
            Ok(outcome) => outcome,
            Err(err) if err.is_config() => return Err(err.into()),
            Err(err) => {
                tracing::error!(rule = %id, "{}", err);
                Outcome::Error(err.to_string())
            }
        };
        tracing::debug!(rule = %id, library = %library_name, ?outcome, "Rule finished");

        rules.push(RuleReport {
            id,
            required: config.required,
            outcome,
            diagnostics: sink.take(),
        });
    }

    Ok(LibraryReport {
        library_name,
        repo_path: repo_path.to_path_buf(),
        rules,
    })
}

fn evaluate(rule: &dyn Rule, fix_inplace: bool) -> tidy_core::Result<Outcome> {
    if rule.check()? {
        return Ok(Outcome::Passed);
    }
    if !fix_inplace {
        return Ok(Outcome::Failed);
    }

    if rule.fix()? && rule.check()? {
        Ok(Outcome::Fixed)
    } else {
        Ok(Outcome::Failed)
    }
}

fn selected_rules(standard: &Standard, options: &CheckOptions) -> Result<Vec<String>> {
    match &options.checks {
        None => Ok(standard.rule_ids().into_iter().map(str::to_string).collect()),
        Some(checks) => {
            for id in checks {
                if !standard.rules.contains_key(id) {
                    return Err(TidyCliError::NotInStandard(id.clone()).into());
                }
            }
            Ok(checks.clone())
        }
    }
}

fn library_name_from_path(repo_path: &Path) -> Result<String> {
    let canonical = repo_path.canonicalize()?;
    canonical
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .ok_or_else(|| anyhow::anyhow!("Cannot derive a library name from '{}'", repo_path.display()))
}
