// src/cli/handlers/info.rs

use crate::{
    cli::handlers::commons::{self, AppContext},
    core::{non_option::Placement, task_type::TaskType},
};
use anyhow::Result;
use clap::Parser;
use colored::*;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Displays the declarations of a task, including inherited ones."
)]
struct InfoArgs {
    /// The catalog task to describe.
    task: String,
}

/// The main handler for the `info` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let info_args = InfoArgs::try_parse_from(&args)?;
    let catalog = context.load_catalog()?;
    let entry = commons::find_entry(&catalog, &info_args.task)?;

    println!("\n--- Task '{}' ---", info_args.task.yellow());
    println!(
        "  {:<15} {}",
        "Program".blue(),
        entry.program.program_names().join(" | ")
    );
    if let Some(path) = &entry.program.path {
        println!("  {:<15} {}", "Default path".blue(), path.display());
    }
    let hierarchy: Vec<&str> = entry.task_type.ancestors().map(TaskType::name).collect();
    println!("  {:<15} {}", "Hierarchy".blue(), hierarchy.join(" -> "));

    for task_type in entry.task_type.ancestors() {
        print_declarations(task_type);
    }

    println!("\n---------------------------------");
    Ok(())
}

/// Prints the declarations made directly on `task_type`.
fn print_declarations(task_type: &TaskType) {
    println!("\n  {} '{}':", "Declared by".green(), task_type.name());

    for option in task_type.own_options() {
        let mut traits = Vec::new();
        if option.is_equals() {
            traits.push("equals".to_string());
        }
        if option.is_multiple() {
            traits.push("multiple".to_string());
        }
        if let Some(separator) = option.separator() {
            traits.push(format!("separator {:?}", separator));
        }
        if option.has_sub_options() {
            traits.push("sub-options".to_string());
        }
        println!(
            "    {:<22} {:<28} {}",
            option.name().cyan(),
            option.flag(),
            traits.join(", ").dimmed()
        );
    }

    for non_option in task_type.own_non_options() {
        let placement = match non_option.placement() {
            Placement::Leading => "leading",
            Placement::Tailing => "tailing",
        };
        let multiple = if non_option.is_multiple() { ", multiple" } else { "" };
        println!(
            "    {:<22} {:<28} {}",
            non_option.name().cyan(),
            format!("<{}>", non_option.name()),
            format!("{}{}", placement, multiple).dimmed()
        );
    }

    for (name, subtask_type) in task_type.own_subtasks() {
        println!(
            "    {:<22} {:<28} {}",
            name.magenta(),
            format!("[{}]", subtask_type.name()),
            "subtask".dimmed()
        );
    }
}
