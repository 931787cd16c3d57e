// src/cli/handlers/list.rs

use crate::cli::handlers::commons::AppContext;
use anyhow::Result;
use clap::Parser;
use colored::*;

#[derive(Parser, Debug, Default)]
#[command(no_binary_name = true, about = "Lists the tasks declared in the catalog.")]
struct ListArgs {}

/// The main handler for the `list` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let _list_args = ListArgs::try_parse_from(&args)?;
    let catalog = context.load_catalog()?;

    if catalog.is_empty() {
        println!("{}", "No tasks declared.".yellow());
        return Ok(());
    }

    for name in catalog.names() {
        let Some(entry) = catalog.get(name) else {
            continue;
        };
        let parent = entry
            .task_type
            .parent()
            .map(|p| format!(" (extends {})", p.name()).dimmed().to_string())
            .unwrap_or_default();
        println!(
            "  {:<20} {}{}",
            name.cyan(),
            entry.program.program_names().join(" | "),
            parent
        );
    }
    Ok(())
}
