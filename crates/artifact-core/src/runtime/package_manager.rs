//! Package manager invocation
//!
//! Every call blocks until the child process exits. Output is captured and,
//! when echo is enabled, replayed to the terminal with `npm WARN` noise
//! filtered out.

use colored::Colorize;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with code {}: {stderr}", .code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

/// Captured output of a successful command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Runs package manager commands inside a project directory
#[derive(Debug, Clone)]
pub struct PackageManager {
    program: String,
    project_dir: PathBuf,
    echo: bool,
}

impl PackageManager {
    pub fn new(program: impl Into<String>, project_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            project_dir: project_dir.into(),
            echo: false,
        }
    }

    /// Replay command output to the terminal
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// The command line as a user would type it
    pub fn command_line(&self, args: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the package manager with `args` and wait for it to exit
    pub fn run(&self, args: &[String]) -> Result<CommandOutput, CommandError> {
        let command = self.command_line(args);
        tracing::debug!(%command, dir = %self.project_dir.display(), "running package manager");

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.project_dir)
            .output()
            .map_err(|source| CommandError::Spawn {
                command: command.clone(),
                source,
            })?;

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: without_warnings(&String::from_utf8_lossy(&output.stderr)),
        };

        if self.echo {
            self.echo_output(&result);
        }

        if !output.status.success() {
            return Err(CommandError::Failed {
                command,
                code: output.status.code(),
                stderr: result.stderr.trim().to_string(),
            });
        }

        Ok(result)
    }

    /// `npm init -y`
    pub fn init(&self) -> Result<CommandOutput, CommandError> {
        self.run(&["init".to_string(), "-y".to_string()])
    }

    /// `npm install [-D] <packages...>`
    pub fn install(&self, packages: &[String], dev: bool) -> Result<CommandOutput, CommandError> {
        let mut args = vec!["install".to_string()];
        if dev {
            args.push("-D".to_string());
        }
        args.extend(packages.iter().cloned());
        self.run(&args)
    }

    /// `npm install <package>@latest`
    pub fn install_latest(&self, package: &str) -> Result<CommandOutput, CommandError> {
        self.run(&["install".to_string(), format!("{}@latest", package)])
    }

    fn echo_output(&self, output: &CommandOutput) {
        for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
            println!("  {}", line.dimmed());
        }
        for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
            eprintln!("  {}", line.yellow());
        }
    }
}

/// Drop `npm WARN` lines; they are noise for the person running the tool
fn without_warnings(stderr: &str) -> String {
    stderr
        .lines()
        .filter(|line| {
            let lower = line.trim_start().to_ascii_lowercase();
            !lower.starts_with("npm warn")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
