use clap::Parser;
use std::path::PathBuf;

/// Command handlers, dispatched by name.
pub mod handlers;

/// argsmith: compose and run command lines from declared task types.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
    after_help = "Commands:\n  compose <TASK> [--set NAME[=VALUE]]... [--json]\n  run <TASK> [--set NAME[=VALUE]]... [--sudo] [--cwd DIR] [--env KEY=VALUE]...\n  list\n  info <TASK>"
)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// The task catalog to load. Defaults to `<config_dir>/argsmith/tasks.toml`.
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Echo executed command lines to stderr.
    #[arg(short, long)]
    pub debug: bool,

    /// The command to run.
    pub command: Option<String>,

    /// Arguments for the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_global_flags_and_command_args() {
        let cli = Cli::try_parse_from([
            "argsmith",
            "--debug",
            "--catalog",
            "tasks.toml",
            "compose",
            "ls",
            "--set",
            "all",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.catalog, Some(PathBuf::from("tasks.toml")));
        assert_eq!(cli.command.as_deref(), Some("compose"));
        assert_eq!(cli.args, vec!["ls", "--set", "all"]);
    }

    #[test]
    fn test_command_is_optional() {
        let cli = Cli::try_parse_from(["argsmith"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.args.is_empty());
    }
}
