// src/system/sudo.rs

use crate::core::{
    non_option::NonOptionSpec,
    option::OptionSpec,
    task_type::{DeclarationError, TaskType},
};
use std::sync::Arc;

/// `(name, flag)` pairs of the classic `sudo` short options.
const SUDO_FLAGS: &[(&str, &str)] = &[
    ("ask_password", "-A"),
    ("background", "-b"),
    ("close_from", "-C"),
    ("preserve_env", "-E"),
    ("edit", "-e"),
    ("group", "-g"),
    ("home", "-H"),
    ("help", "-h"),
    ("simulate_initial_login", "-i"),
    ("kill", "-k"),
    ("sure_kill", "-K"),
    ("list_defaults", "-L"),
    ("list", "-l"),
    ("non_interactive", "-n"),
    ("preserve_group", "-P"),
    ("prompt", "-p"),
    ("role", "-r"),
    ("stdin", "-S"),
    ("shell", "-s"),
    ("type", "-t"),
    ("other_user", "-U"),
    ("user", "-u"),
    ("version", "-V"),
    ("validate", "-v"),
];

/// The task type describing `sudo` itself: its short options and the tailing
/// `command` to run.
pub fn sudo_task_type() -> Result<Arc<TaskType>, DeclarationError> {
    let mut builder = TaskType::builder("sudo");
    for (name, flag) in SUDO_FLAGS {
        builder = builder.short_option(OptionSpec::new(*flag).name(*name))?;
    }
    builder
        .non_option(NonOptionSpec::new("command").tailing().multiple())?
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::task::Task, models::ValueMap};

    #[test]
    fn test_sudo_declares_flags_and_command() {
        let sudo = sudo_task_type().unwrap();
        assert_eq!(sudo.resolve_option("user").map(|o| o.flag()), Some("-u"));
        assert_eq!(sudo.resolve_option("non_interactive").map(|o| o.flag()), Some("-n"));
        assert!(sudo.has_non_option("command"));
    }

    #[test]
    fn test_sudo_arguments_guard_the_command() {
        let sudo = sudo_task_type().unwrap();
        let mut task = Task::new(&sudo);
        task.set("user", "root").unwrap();
        task.set("command", ["/bin/ls", "-la"]).unwrap();

        assert_eq!(task.compose().unwrap(), vec!["-u", "root", "--", "/bin/ls", "-la"]);
    }

    #[test]
    fn test_sudo_arguments_without_dashed_command() {
        let sudo = sudo_task_type().unwrap();
        let args = sudo
            .arguments(ValueMap::new().with("command", ["/usr/bin/id"]))
            .unwrap();
        assert_eq!(args, vec!["/usr/bin/id"]);
    }
}
