use std::fmt;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::DeployError;

/// A subprocess invocation. `stdin` is fed to the child and never displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs to completion with the child's output streamed to ours.
    async fn run(&self, cmd: &CommandSpec) -> Result<(), DeployError>;

    /// Runs to completion and returns captured stdout.
    async fn output(&self, cmd: &CommandSpec) -> Result<String, DeployError>;
}

pub struct SystemRunner;

impl SystemRunner {
    fn command(cmd: &CommandSpec) -> Command {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args).stdin(if cmd.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        });
        command
    }

    async fn feed_stdin(
        child: &mut tokio::process::Child,
        cmd: &CommandSpec,
    ) -> Result<(), DeployError> {
        if let (Some(input), Some(mut stdin)) = (&cmd.stdin, child.stdin.take()) {
            stdin.write_all(input.as_bytes()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, cmd: &CommandSpec) -> Result<(), DeployError> {
        debug!(command = %cmd, "spawning");
        let mut child = Self::command(cmd)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        Self::feed_stdin(&mut child, cmd).await?;

        let status = child.wait().await?;
        if !status.success() {
            return Err(DeployError::CommandFailed {
                command: cmd.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }

    async fn output(&self, cmd: &CommandSpec) -> Result<String, DeployError> {
        debug!(command = %cmd, "spawning");
        let mut child = Self::command(cmd)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;
        Self::feed_stdin(&mut child, cmd).await?;

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(DeployError::CommandFailed {
                command: cmd.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
