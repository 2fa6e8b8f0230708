//! Supervised child process handle

use std::io;
use std::process::ExitStatus;

use serde::Serialize;
use tokio::process::{Child, Command};

/// Observed state of a supervised process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    /// No exit recorded
    Running,
    /// Process has exited
    Stopped,
    /// Exit state could not be queried
    Unknown,
}

impl ProcessStatus {
    /// Wire name used in status responses
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Running => "running",
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owned handle to one external process
///
/// Dropping the handle does not kill the process. Callers that want the
/// process gone go through [`ProcessHandle::kill`] followed by
/// [`ProcessHandle::wait`], which leaves the handle in a terminal state.
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    pid: Option<u32>,
    #[cfg(test)]
    kill_error: Option<io::ErrorKind>,
}

impl ProcessHandle {
    /// Spawn a command and take ownership of the child
    pub fn spawn(command: &mut Command) -> io::Result<Self> {
        let child = command.spawn()?;
        Ok(Self::from_child(child))
    }

    /// Wrap an already spawned child
    pub fn from_child(child: Child) -> Self {
        let pid = child.id();
        Self {
            child,
            pid,
            #[cfg(test)]
            kill_error: None,
        }
    }

    /// OS process id captured at spawn time
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Poll the exit state without blocking
    ///
    /// Reaps the process if it has exited, so later calls keep reporting
    /// [`ProcessStatus::Stopped`].
    pub fn status(&mut self) -> ProcessStatus {
        match self.child.try_wait() {
            Ok(None) => ProcessStatus::Running,
            Ok(Some(_)) => ProcessStatus::Stopped,
            Err(e) => {
                tracing::debug!(pid = ?self.pid, error = %e, "Failed to query process state");
                ProcessStatus::Unknown
            }
        }
    }

    /// Whether the process has not exited yet
    pub fn is_alive(&mut self) -> bool {
        self.status() != ProcessStatus::Stopped
    }

    /// Send a forceful kill signal without waiting for exit
    pub fn kill(&mut self) -> io::Result<()> {
        if let Some(e) = self.take_kill_error() {
            return Err(e);
        }
        self.child.start_kill()
    }

    /// Make the next kill request fail with `kind` without signalling
    #[cfg(test)]
    pub(crate) fn fail_next_kill(&mut self, kind: io::ErrorKind) {
        self.kill_error = Some(kind);
    }

    #[cfg(test)]
    fn take_kill_error(&mut self) -> Option<io::Error> {
        self.kill_error
            .take()
            .map(|kind| io::Error::new(kind, "kill refused"))
    }

    #[cfg(not(test))]
    fn take_kill_error(&mut self) -> Option<io::Error> {
        None
    }

    /// Wait for the process to exit and reap it
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        self.child.wait().await
    }

    /// Kill and reap
    pub async fn terminate(&mut self) -> io::Result<()> {
        if self.is_alive() {
            self.kill()?;
        }
        self.wait().await.map(|_| ())
    }
}
