//! Live reload through xsettingsd
//!
//! One daemon per [`XSettingsDaemon`]. It reads a private working file that
//! already holds the first snapshot when the daemon starts; a push rewrites
//! that file and sends SIGHUP. The daemon is terminated on drop.

use anyhow::{Context, Result};
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use tempfile::NamedTempFile;

use crate::ui::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    Running,
    /// Never started or already exited; pushes are ignored
    Inactive,
}

#[derive(Debug)]
pub struct XSettingsDaemon {
    child: Option<Child>,
    working_file: Option<NamedTempFile>,
}

impl XSettingsDaemon {
    /// Write `initial` to a fresh working file and start
    /// `command -c <working file>` on it.
    ///
    /// Failure is not an error: the returned handle is inert and every push is
    /// a no-op.
    pub fn start(command: &str, initial: &str) -> Self {
        match Self::spawn(command, initial) {
            Ok((child, working_file)) => {
                emit(
                    Level::Debug,
                    "xsettings.started",
                    &format!("Started {command} (pid {})", child.id()),
                    None,
                );
                Self {
                    child: Some(child),
                    working_file: Some(working_file),
                }
            }
            Err(e) => {
                emit(
                    Level::Debug,
                    "xsettings.start_failed",
                    &format!("Live reload disabled: {e:#}"),
                    None,
                );
                Self::inactive()
            }
        }
    }

    /// A handle that never had a daemon.
    pub fn inactive() -> Self {
        Self {
            child: None,
            working_file: None,
        }
    }

    fn spawn(command: &str, initial: &str) -> Result<(Child, NamedTempFile)> {
        let program = which::which(command).with_context(|| format!("{command} not found"))?;
        let working_file = NamedTempFile::new().context("creating xsettingsd working file")?;
        // The daemon's first read must see real settings, no reload needed
        overwrite(working_file.path(), initial)?;

        // Output is forwarded so daemon diagnostics reach the user
        let child = Command::new(&program)
            .arg("-c")
            .arg(working_file.path())
            .stdin(Stdio::null())
            .spawn()
            .with_context(|| format!("starting {}", program.display()))?;

        Ok((child, working_file))
    }

    pub fn state(&mut self) -> DaemonState {
        match self.child.as_mut().map(|c| c.try_wait()) {
            Some(Ok(None)) => DaemonState::Running,
            _ => DaemonState::Inactive,
        }
    }

    pub fn working_path(&self) -> Option<&Path> {
        self.working_file.as_ref().map(|f| f.path())
    }

    /// Replace the daemon's settings with `contents` and ask it to reload.
    ///
    /// Returns whether a reload signal was sent.
    pub fn push(&mut self, contents: &str) -> bool {
        if self.state() != DaemonState::Running {
            return false;
        }
        let (Some(child), Some(working_file)) = (self.child.as_ref(), self.working_file.as_ref())
        else {
            return false;
        };
        let pid = Pid::from_raw(child.id() as i32);

        if let Err(e) = overwrite(working_file.path(), contents) {
            emit(
                Level::Debug,
                "xsettings.write_failed",
                &format!("Not reloading xsettingsd: {e:#}"),
                None,
            );
            return false;
        }

        match signal::kill(pid, Signal::SIGHUP) {
            Ok(()) => true,
            Err(e) => {
                emit(
                    Level::Debug,
                    "xsettings.signal_failed",
                    &format!("Failed to signal xsettingsd: {e}"),
                    None,
                );
                false
            }
        }
    }
}

impl Drop for XSettingsDaemon {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                let _ = signal::kill(Pid::from_raw(child.id() as i32), Signal::SIGTERM);
            }
            // Best-effort reap; no waiting for a slow exit
            let _ = child.try_wait();
        }
    }
}

fn overwrite(path: &Path, contents: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("opening {}", path.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("writing {}", path.display()))?;
    file.flush()?;
    Ok(())
}
