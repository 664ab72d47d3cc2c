use crate::runner::{LibraryReport, Outcome, RuleReport};
use colored::*;
use tidy_core::{RuleRegistry, Standard};

fn status_label(outcome: &Outcome) -> ColoredString {
    match outcome {
        Outcome::Passed => "[ PASSED ]".green().bold(),
        Outcome::Fixed => "[ FIXED  ]".cyan().bold(),
        Outcome::Failed => "[ FAILED ]".red().bold(),
        Outcome::Error(_) => "[ ERROR  ]".red().bold(),
    }
}

fn kind_label(rule: &RuleReport) -> ColoredString {
    if rule.required {
        "requirement".normal()
    } else {
        "recommendation".dimmed()
    }
}

pub fn print_library_report(report: &LibraryReport, fix_inplace: bool) {
    println!(
        "\n{} {} ({})",
        "Checking library:".bold(),
        report.library_name.cyan(),
        report.repo_path.display()
    );
    println!("{}", "=".repeat(50));

    for rule in &report.rules {
        println!("{} {} ({})", status_label(&rule.outcome), rule.id, kind_label(rule));
        for diagnostic in &rule.diagnostics {
            println!("   {} {}", "→".yellow(), diagnostic);
        }
        if let Outcome::Error(message) = &rule.outcome {
            println!("   {} {}", "→".red(), message);
        }
    }

    println!(
        "\n{} {}/{} rules passed ({:.0}%)",
        "Coverage:".bold(),
        report.passed(),
        report.rules.len(),
        report.coverage()
    );

    let errors = report.errors();
    let failed = report.failed_required();
    if errors > 0 {
        println!("⚠️  {} rule(s) could not run", errors.to_string().red().bold());
    }
    if failed > 0 {
        println!("❌ {} required rule(s) failed", failed.to_string().red().bold());
    } else if errors == 0 {
        println!("✅ {}", "All required rules passed!".green());
    }

    let any_failed = report.rules.iter().any(|rule| rule.outcome == Outcome::Failed);
    if any_failed && !fix_inplace {
        println!("💡 Run with --fix-inplace to apply automatic fixes where possible");
    }
}

pub fn print_rule_list(registry: &RuleRegistry, standard: &Standard) {
    println!("{}", "Registered Rules:".bold().underline());
    println!();

    for descriptor in registry.descriptors() {
        let kind = match standard.rule_config(descriptor.id, false) {
            Ok(config) if config.required => "requirement".normal(),
            Ok(_) => "recommendation".dimmed(),
            Err(_) => "not in standard".yellow(),
        };
        println!(
            "   • {} ({}) → {}",
            descriptor.id.cyan(),
            kind,
            descriptor.target_file
        );
    }
}
