//! `gno-deploy cycles` command implementation.

use std::path::Path;

use colored::Colorize;
use gno_deploy::Analyzer;

/// Run the cycles command.
pub fn run(path: &Path, config: Option<&Path>) -> Result<(), gno_deploy::Error> {
    let config = super::load_config(path, config)?;
    let analysis = Analyzer::new(config).analyze_path(path)?;

    let groups: Vec<&[String]> = analysis.order.cyclic_groups().collect();
    if groups.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} cyclic group{}:",
        groups.len().to_string().red().bold(),
        if groups.len() == 1 { "" } else { "s" }
    );
    println!();

    for (i, group) in groups.iter().enumerate() {
        println!("  {} {}:", "Group".yellow().bold(), i + 1);

        // Display group as: a -> b -> a
        let mut path_str = group.join(" → ");
        if let Some(first) = group.first() {
            path_str.push_str(" → ");
            path_str.push_str(first);
        }
        println!("    {}", path_str.dimmed());
    }

    Ok(())
}
