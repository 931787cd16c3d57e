// src/cli/handlers/compose.rs

use crate::cli::handlers::commons::{self, AppContext};
use anyhow::{Context, Result};
use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Prints the argument vector composed for a task."
)]
struct ComposeArgs {
    /// The catalog task to compose.
    task: String,

    /// Assign a parameter: NAME, NAME=VALUE, NAME.KEY[=VALUE] or SUBTASK/NAME=VALUE.
    #[arg(long = "set", short = 's', value_name = "ASSIGNMENT")]
    assignments: Vec<String>,

    /// Print the arguments as a JSON array.
    #[arg(long)]
    json: bool,
}

/// The main handler for the `compose` command.
pub fn handle(args: Vec<String>, context: &AppContext) -> Result<()> {
    let compose_args = ComposeArgs::try_parse_from(&args)?;
    let catalog = context.load_catalog()?;
    let entry = commons::find_entry(&catalog, &compose_args.task)?;

    let task = commons::build_task(entry, &compose_args.assignments)?;
    let argv = task
        .compose()
        .with_context(|| format!("Failed to compose task '{}'", compose_args.task))?;

    println!("{}", render(&argv, compose_args.json)?);
    Ok(())
}

/// Renders `argv` as a shell-quoted line or as a JSON array.
fn render(argv: &[String], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string(argv)?);
    }
    Ok(shlex::try_join(argv.iter().map(String::as_str))?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quotes_for_the_shell() {
        let argv = vec!["-a".to_string(), "my file.txt".to_string()];
        assert_eq!(render(&argv, false).unwrap(), "-a 'my file.txt'");
    }

    #[test]
    fn test_render_json() {
        let argv = vec!["-a".to_string(), "my file.txt".to_string()];
        assert_eq!(render(&argv, true).unwrap(), r#"["-a","my file.txt"]"#);
    }

    #[test]
    fn test_parses_repeated_assignments() {
        let args =
            ComposeArgs::try_parse_from(["ls", "--set", "all", "-s", "files=a", "--json"]).unwrap();
        assert_eq!(args.task, "ls");
        assert_eq!(args.assignments, vec!["all", "files=a"]);
        assert!(args.json);
    }
}
