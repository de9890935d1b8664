//! Running external binaries.
//!
//! Every invocation returns its own [`CommandOutput`]; callers decide whether
//! a nonzero exit is fatal. The only error a runner reports itself is failing
//! to spawn the program at all.

use std::convert::Infallible;
use std::fmt;
use std::process::Stdio;

use crate::error::DinghyError;

/// A program plus its arguments, and whether to capture its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub capture: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            capture: false,
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

    /// Pipe stdout/stderr back to the caller instead of inheriting them.
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Outcome of a single invocation. Output buffers are empty unless the
/// invocation was captured.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

#[allow(async_fn_in_trait)] // trait is internal-only
pub trait Runner {
    /// Run to completion. A nonzero exit is reported in the output, not as `Err`.
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, DinghyError>;

    /// Replace the current process with `invocation`. Only returns if that
    /// could not be done.
    fn handoff(&self, invocation: &Invocation) -> Result<Infallible, DinghyError>;
}

/// Runs real subprocesses.
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandOutput, DinghyError> {
        tracing::debug!(command = %invocation, capture = invocation.capture, "running");

        let mut cmd = tokio::process::Command::new(&invocation.program);
        cmd.args(&invocation.args);

        let output = if invocation.capture {
            let output = cmd
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| spawn_error(invocation, e))?;
            CommandOutput {
                status_code: exit_code(output.status),
                stdout: output.stdout,
                stderr: output.stderr,
            }
        } else {
            let status = cmd.status().await.map_err(|e| spawn_error(invocation, e))?;
            CommandOutput {
                status_code: exit_code(status),
                ..CommandOutput::default()
            }
        };

        if !output.success() {
            tracing::debug!(command = %invocation, status = output.status_code, "command failed");
        }
        Ok(output)
    }

    #[cfg(unix)]
    fn handoff(&self, invocation: &Invocation) -> Result<Infallible, DinghyError> {
        use std::os::unix::process::CommandExt;

        tracing::debug!(command = %invocation, "handing off process");
        let err = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .exec();
        Err(spawn_error(invocation, err))
    }

    #[cfg(not(unix))]
    fn handoff(&self, invocation: &Invocation) -> Result<Infallible, DinghyError> {
        tracing::debug!(command = %invocation, "handing off process");
        let status = std::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .status()
            .map_err(|e| spawn_error(invocation, e))?;
        std::process::exit(exit_code(status));
    }
}

fn exit_code(status: std::process::ExitStatus) -> i32 {
    // Killed by a signal: no code, but still a failure.
    status
        .code()
        .unwrap_or(if status.success() { 0 } else { 1 })
}

fn spawn_error(invocation: &Invocation, source: std::io::Error) -> DinghyError {
    DinghyError::Io {
        context: format!("running `{invocation}`"),
        source,
    }
}
