use anyhow::Result;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// A throwaway home directory the binary runs against.
pub struct TestEnvironment {
    temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: tempfile::tempdir()?,
        })
    }

    pub fn home(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn config_home(&self) -> PathBuf {
        self.home().join(".config")
    }

    pub fn settings_dir(&self) -> PathBuf {
        self.config_home().join("gtksync")
    }

    /// Write a settings scope file (`desktop`, `session`, `appearance`).
    pub fn write_settings(&self, scope: &str, body: &str) -> Result<()> {
        fs::create_dir_all(self.settings_dir())?;
        fs::write(
            self.settings_dir().join(format!("{scope}.toml")),
            format!("[values]\n{body}"),
        )?;
        Ok(())
    }

    /// Put an executable shell script on the binary's `PATH`.
    pub fn install_bin(&self, name: &str, body: &str) -> Result<PathBuf> {
        let dir = self.home().join("no-bin");
        fs::create_dir_all(&dir)?;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n"))?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
        Ok(path)
    }

    pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        let output = Command::new(env!("CARGO_BIN_EXE_gtksync"))
            .args(args)
            .env_clear()
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("XDG_DATA_HOME", self.home().join(".local/share"))
            .env("XDG_DATA_DIRS", self.home().join("system-share"))
            // Only scripts from install_bin are reachable
            .env("PATH", self.home().join("no-bin"))
            .output()?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}
