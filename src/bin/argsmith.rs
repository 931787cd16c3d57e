// src/bin/argsmith.rs

//! The `argsmith` command-line entry point.

use anyhow::{Context, Result};
use argsmith::{
    cli::{
        Cli,
        handlers::{self, commons::AppContext},
    },
    core::settings::Settings,
};
use clap::{CommandFactory, Parser};
use colored::*;

// --- Command Definition and Registry ---

/// A CLI command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &AppContext) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "compose",
        aliases: &["c"],
        handler: handlers::compose::handle,
    },
    CommandDefinition {
        name: "info",
        aliases: &[],
        handler: handlers::info::handle,
    },
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

fn main() {
    env_logger::init();

    if let Err(e) = run_cli(Cli::parse()) {
        eprintln!("\n{}: {:#}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    log::debug!("CLI args parsed: {:?}", cli);

    let mut settings = Settings::load().context("Failed to load settings")?;
    if cli.debug {
        settings.debug = true;
    }

    let Some(command_name) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let command = find_command(&command_name).with_context(|| {
        let known: Vec<&str> = COMMAND_REGISTRY.iter().map(|cmd| cmd.name).collect();
        format!(
            "Unknown command '{}'. Available commands: {}",
            command_name,
            known.join(", ")
        )
    })?;

    let context = AppContext::new(settings, cli.catalog);
    (command.handler)(cli.args, &context)
}
