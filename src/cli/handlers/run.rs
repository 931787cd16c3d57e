use crate::{
    cli::handlers::commons::{self, AppContext},
    system::executor::{ExecOptions, SystemExecutor},
};
use anyhow::{Result, anyhow};
use clap::Parser;
use colored::*;
use std::{collections::HashMap, path::PathBuf};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Composes a task and runs its program with the result."
)]
struct RunArgs {
    /// The catalog task to run.
    task: String,

    /// Assign a parameter: NAME, NAME=VALUE, NAME.KEY[=VALUE] or SUBTASK/NAME=VALUE.
    #[arg(long = "set", short = 's', value_name = "ASSIGNMENT")]
    assignments: Vec<String>,

    /// Run the program through the privilege-elevation program.
    #[arg(long)]
    sudo: bool,

    /// Working directory for the program.
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Extra environment variables (KEY=VALUE).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    env: Vec<String>,
}

/// The main handler for the `run` command. Fails when the program exits unsuccessfully.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let run_args = RunArgs::try_parse_from(&args)?;
    let catalog = context.load_catalog()?;
    let entry = commons::find_entry(&catalog, &run_args.task)?;

    let mut task = commons::build_task(entry, &run_args.assignments)?;
    task.set_sudo(run_args.sudo);

    let program = entry.program.find(&context.settings)?;
    let options = ExecOptions {
        cwd: run_args.cwd.clone(),
        env: parse_env(&run_args.env)?,
        ..ExecOptions::default()
    };

    let executor = SystemExecutor::new(&context.settings);
    let succeeded = program.run_task(&executor, &context.settings, &task, &options)?;
    if !succeeded {
        return Err(anyhow!(
            "Task '{}' failed: '{}' exited unsuccessfully.",
            run_args.task.cyan(),
            program.name().yellow()
        ));
    }
    Ok(())
}

fn parse_env(pairs: &[String]) -> Result<HashMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            pair.split_once('=')
                .filter(|(key, _)| !key.is_empty())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .ok_or_else(|| anyhow!("Invalid environment variable '{}'. Expected KEY=VALUE.", pair))
        })
        .collect()
}
