use crate::config::RfAceConfig;
use anyhow::Result;
use std::path::Path;
use std::process::Command;
use tracing::{info, warn};

const MASK: &str = "****";

/// Runs a single external command line to completion.
pub trait CommandRunner {
    fn run(&self, command_line: &str) -> Result<()>;
}

/// Hands the command line to `<shell> -c` and blocks until it exits. Spawn
/// failures and the exit status are logged but never acted on.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: String,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::with_shell("sh")
    }
}

impl ShellRunner {
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command_line: &str) -> Result<()> {
        let status = match Command::new(&self.shell)
            .arg("-c")
            .arg(command_line)
            .status()
        {
            Ok(status) => status,
            Err(e) => {
                warn!(shell = %self.shell, error = %e, "failed to spawn submission command");
                return Ok(());
            }
        };
        if !status.success() {
            let code = status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "signal".to_string());
            warn!(status = %code, "submission command exited unsuccessfully");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub command_line: String,
    pub display_line: String,
}

pub fn golem_submission(config: &RfAceConfig, commands_file: &Path) -> Submission {
    let file = shell_quote(&commands_file.to_string_lossy());
    let render = |password: &str| {
        format!(
            "{} {} {} -p {} runlist {}",
            config.python_bin, config.golem_script, config.golem_host, password, file
        )
    };
    Submission {
        command_line: render(&shell_quote(&config.golem_password)),
        display_line: render(MASK),
    }
}

pub fn submit_commands(
    runner: &dyn CommandRunner,
    config: &RfAceConfig,
    commands_file: &Path,
) -> Result<Submission> {
    let submission = golem_submission(config, commands_file);
    info!(host = %config.golem_host, file = %commands_file.display(), "submitting run list");
    runner.run(&submission.command_line)?;
    Ok(submission)
}

fn shell_quote(s: &str) -> String {
    if s.is_empty() {
        "''".to_string()
    } else if s
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "-_./:".contains(c))
    {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', "'\"'\"'"))
    }
}
