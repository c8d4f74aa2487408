use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Output, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::errors::GopackError;

/// Builder for constructing and executing external processes.
///
/// Provides a fluent API for setting program, arguments, environment variables, and working directory.
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    cwd: Option<PathBuf>,
}

impl CommandBuilder {
    /// Create a new builder for the given program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: HashMap::new(),
            cwd: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child process.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Set the working directory for the child process.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Human-readable rendering of the command line, for logs and errors.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    /// Execute the command with stdio inherited from the parent and return its status.
    pub fn status(&self) -> Result<ExitStatus, GopackError> {
        self.command().status().map_err(GopackError::from)
    }

    /// Execute the command, killing it when `cancel` fires or `timeout` elapses.
    ///
    /// Must be called from synchronous code. Inside a tokio runtime (for
    /// example on a `spawn_blocking` thread) the current handle drives the
    /// child; otherwise a current-thread runtime is built for the call.
    ///
    /// Returns [`GopackError::Cancelled`] on cancellation and
    /// [`GopackError::Retrieval`] on timeout.
    pub fn exec_watched(
        &self,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<Output, GopackError> {
        if cancel.is_cancelled() {
            return Err(GopackError::Cancelled);
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.run_watched(cancel, timeout)),
            Err(_) => {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| GopackError::Generic {
                        message: format!("Failed to create async runtime: {e}"),
                    })?;
                rt.block_on(self.run_watched(cancel, timeout))
            }
        }
    }

    async fn run_watched(
        &self,
        cancel: &CancellationToken,
        timeout: Option<Duration>,
    ) -> Result<Output, GopackError> {
        let mut child = tokio::process::Command::from(self.command())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let ended = tokio::select! {
            ended = wait_with_deadline(&mut child, timeout) => ended,
            () = cancel.cancelled() => Ended::Cancelled,
        };

        match ended {
            Ended::Exited(status) => Ok(Output {
                status: status?,
                stdout: collect(stdout).await,
                stderr: collect(stderr).await,
            }),
            Ended::TimedOut => {
                kill(&mut child).await;
                Err(GopackError::Retrieval {
                    message: format!("`{}` timed out", self.display()),
                })
            }
            Ended::Cancelled => {
                kill(&mut child).await;
                Err(GopackError::Cancelled)
            }
        }
    }
}

enum Ended {
    Exited(std::io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

async fn wait_with_deadline(child: &mut Child, timeout: Option<Duration>) -> Ended {
    match timeout {
        Some(t) => match tokio::time::timeout(t, child.wait()).await {
            Ok(status) => Ended::Exited(status),
            Err(_) => Ended::TimedOut,
        },
        None => Ended::Exited(child.wait().await),
    }
}

fn drain<R>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pipe.map(|mut p| {
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let _ = p.read_to_end(&mut buf).await;
            buf
        })
    })
}

async fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    match handle {
        Some(h) => h.await.unwrap_or_default(),
        None => Vec::new(),
    }
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        tracing::warn!("Failed to kill child process {:?}: {e}", child.id());
    }
}
