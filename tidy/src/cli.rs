use crate::registry::global_registry;
use crate::report::{print_library_report, print_rule_list};
use crate::runner::{check_library, CheckOptions};
use crate::{TidyCliError, STANDARD_FILE};
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use colored::*;
use std::path::{Path, PathBuf};
use tidy_core::{RuleRegistry, Standard};

pub struct TidyCli {
    registry: &'static RuleRegistry,
}

impl TidyCli {
    pub fn new() -> Self {
        Self {
            registry: global_registry(),
        }
    }

    pub fn build_app(&self) -> Command {
        Command::new("tidy")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Check library documentation against the Standard")
            .author("Standard Tidy Contributors")
            .arg(
                Arg::new("verbose")
                    .long("verbose")
                    .short('v')
                    .action(ArgAction::SetTrue)
                    .help("Enable verbose output")
                    .global(true),
            )
            .arg(
                Arg::new("quiet")
                    .long("quiet")
                    .short('q')
                    .action(ArgAction::SetTrue)
                    .help("Only log errors")
                    .global(true)
                    .conflicts_with("verbose"),
            )
            .subcommand(
                Command::new("check")
                    .about("Check a library repository against the Standard")
                    .arg(
                        Arg::new("repo")
                            .value_name("REPO")
                            .help("Path to the library repository")
                            .default_value("."),
                    )
                    .arg(
                        Arg::new("fix-inplace")
                            .long("fix-inplace")
                            .action(ArgAction::SetTrue)
                            .help("Try to fix failing rules in place"),
                    )
                    .arg(
                        Arg::new("standard")
                            .long("standard")
                            .short('s')
                            .value_name("FILE")
                            .help("Standard definition (default: REPO/.tidy-standard.yaml, then built-in)"),
                    )
                    .arg(
                        Arg::new("checks")
                            .long("checks")
                            .value_name("IDS")
                            .value_delimiter(',')
                            .help("Comma-separated rule IDs to run (default: all)"),
                    )
                    .arg(
                        Arg::new("require-all")
                            .long("require-all")
                            .action(ArgAction::SetTrue)
                            .help("Treat recommendations as requirements"),
                    )
                    .arg(
                        Arg::new("library-name")
                            .long("library-name")
                            .value_name("NAME")
                            .help("Library name used by the title rule (default: directory name)"),
                    ),
            )
            .subcommand(
                Command::new("rules")
                    .about("List registered rules")
                    .arg(
                        Arg::new("standard")
                            .long("standard")
                            .short('s')
                            .value_name("FILE")
                            .help("Standard definition to annotate the list with"),
                    ),
            )
            .subcommand(
                Command::new("init")
                    .about("Write the built-in Standard definition to a file")
                    .arg(
                        Arg::new("output")
                            .long("output")
                            .short('o')
                            .value_name("FILE")
                            .help("Output file path (default: .tidy-standard.yaml)")
                            .default_value(STANDARD_FILE),
                    ),
            )
    }

    pub fn run(&self, args: Vec<String>) -> Result<()> {
        let app = self.build_app();
        let matches = app.try_get_matches_from(args)?;

        self.init_logging(matches.get_flag("verbose"), matches.get_flag("quiet"));

        match matches.subcommand() {
            Some(("check", sub_matches)) => self.handle_check(sub_matches),
            Some(("rules", sub_matches)) => self.handle_rules(sub_matches),
            Some(("init", sub_matches)) => self.handle_init(sub_matches),
            _ => {
                let mut app = self.build_app();
                app.print_help()?;
                println!();
                Ok(())
            }
        }
    }

    fn handle_check(&self, matches: &ArgMatches) -> Result<()> {
        let repo = matches
            .get_one::<String>("repo")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        let standard =
            self.load_standard(matches.get_one::<String>("standard"), Some(repo.as_path()))?;

        // Fail on a bad Standard before any file is read.
        standard.validate(self.registry)?;

        let options = CheckOptions {
            fix_inplace: matches.get_flag("fix-inplace"),
            require_all: matches.get_flag("require-all"),
            checks: matches
                .get_many::<String>("checks")
                .map(|ids| ids.cloned().collect()),
            library_name: matches.get_one::<String>("library-name").cloned(),
        };

        let report = check_library(self.registry, &standard, &repo, &options)?;
        print_library_report(&report, options.fix_inplace);

        // A broken environment outranks non-conformance.
        if report.has_errors() {
            return Err(TidyCliError::RulesCouldNotRun(report.errors()).into());
        }
        let failed = report.failed_required();
        if failed > 0 {
            return Err(TidyCliError::RequiredRulesFailed(failed).into());
        }
        Ok(())
    }

    fn handle_rules(&self, matches: &ArgMatches) -> Result<()> {
        let standard = self.load_standard(matches.get_one::<String>("standard"), None)?;
        print_rule_list(self.registry, &standard);
        Ok(())
    }

    fn handle_init(&self, matches: &ArgMatches) -> Result<()> {
        let output = matches
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or(STANDARD_FILE);
        let output_path = Path::new(output);

        if output_path.exists() {
            println!(
                "{} Standard definition already exists at: {}",
                "Warning:".yellow(),
                output_path.display()
            );
            return Ok(());
        }

        Standard::builtin().save(output_path)?;
        println!("✅ Created Standard definition at: {}", output_path.display());
        Ok(())
    }

    fn load_standard(&self, explicit: Option<&String>, repo: Option<&Path>) -> Result<Standard> {
        if let Some(path) = explicit {
            tracing::debug!("Loading standard from {}", path);
            return Ok(Standard::load(path)?);
        }

        if let Some(candidate) = repo.map(|repo| repo.join(STANDARD_FILE)) {
            if candidate.exists() {
                tracing::debug!("Loading standard from {}", candidate.display());
                return Ok(Standard::load(&candidate)?);
            }
        }

        Ok(Standard::builtin())
    }

    fn init_logging(&self, verbose: bool, quiet: bool) {
        use tracing_subscriber::{fmt, EnvFilter};

        let default_filter = if verbose {
            "tidy=debug,tidy_core=debug,tidy_readme=debug"
        } else if quiet {
            "error"
        } else {
            "tidy=info,tidy_readme=info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        // A second initialisation (tests run the CLI repeatedly) is harmless.
        let _ = fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .try_init();
    }
}

impl Default for TidyCli {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cli_creation() {
        let cli = TidyCli::new();
        let app = cli.build_app();

        assert_eq!(app.get_name(), "tidy");
        assert!(app.get_version().is_some());
    }

    #[test]
    fn test_help_command() {
        let cli = TidyCli::new();
        let result = cli.run(args(&["tidy", "--help"]));

        match result {
            Ok(_) => {}
            Err(e) => {
                if let Some(clap_err) = e.downcast_ref::<clap::Error>() {
                    assert_eq!(clap_err.kind(), clap::error::ErrorKind::DisplayHelp);
                } else {
                    panic!("Unexpected error type: {}", e);
                }
            }
        }
    }

    #[test]
    fn test_check_arguments() {
        let matches = TidyCli::new()
            .build_app()
            .try_get_matches_from(args(&[
                "tidy",
                "check",
                "libs/scan_view",
                "--fix-inplace",
                "--checks",
                "README.TITLE,README.BADGES",
            ]))
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "check");
        assert_eq!(sub.get_one::<String>("repo").unwrap(), "libs/scan_view");
        assert!(sub.get_flag("fix-inplace"));
        let checks: Vec<_> = sub.get_many::<String>("checks").unwrap().collect();
        assert_eq!(checks, vec!["README.TITLE", "README.BADGES"]);
    }

    #[test]
    fn test_init_then_check_with_written_standard() {
        let temp = tempdir().unwrap();
        let standard_path = temp.path().join(STANDARD_FILE);
        let cli = TidyCli::new();

        cli.run(args(&["tidy", "init", "-o", standard_path.to_str().unwrap()]))
            .unwrap();
        assert!(standard_path.exists());
        assert_eq!(Standard::load(&standard_path).unwrap(), Standard::builtin());

        // Title is a recommendation, so its failure alone does not fail the run.
        fs::write(temp.path().join("README.md"), "Untitled\n").unwrap();
        let repo = temp.path().to_str().unwrap();
        cli.run(args(&["tidy", "check", repo, "--checks", "README.TITLE"]))
            .unwrap();

        let err = cli
            .run(args(&["tidy", "check", repo, "--checks", "README.TITLE", "--require-all"]))
            .unwrap_err();
        assert!(err.to_string().contains("required rule(s) failed"));

        cli.run(args(&[
            "tidy",
            "check",
            repo,
            "--checks",
            "README.TITLE",
            "--require-all",
            "--fix-inplace",
            "--library-name",
            "beman.example",
        ]))
        .unwrap();
        let content = fs::read_to_string(temp.path().join("README.md")).unwrap();
        assert_eq!(content, "# beman.example: TODO Short Description\n");
    }

    #[test]
    fn test_invalid_standard_fails_fast() {
        let temp = tempdir().unwrap();
        let mut standard = Standard::builtin();
        standard.rules.get_mut("README.LIBRARY_STATUS").unwrap().values.truncate(2);
        standard.save(temp.path().join(STANDARD_FILE)).unwrap();
        fs::write(temp.path().join("README.md"), "# x: y\n").unwrap();

        let err = TidyCli::new()
            .run(args(&["tidy", "check", temp.path().to_str().unwrap()]))
            .unwrap_err();
        assert!(err.to_string().contains("README.LIBRARY_STATUS"));
    }

    #[test]
    fn test_missing_readme_is_not_reported_as_non_conformance() {
        let temp = tempdir().unwrap();

        let err = TidyCli::new()
            .run(args(&["tidy", "check", temp.path().to_str().unwrap()]))
            .unwrap_err();

        assert!(!err.to_string().contains("required rule(s) failed"));
        match err.downcast_ref::<TidyCliError>() {
            Some(TidyCliError::RulesCouldNotRun(count)) => assert_eq!(*count, 4),
            other => panic!("Unexpected error: {:?}", other),
        };
    }

    #[test]
    fn test_rules_command() {
        TidyCli::new().run(args(&["tidy", "rules"])).unwrap();
    }
}
