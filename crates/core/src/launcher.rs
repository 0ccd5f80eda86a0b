//! Starts desktop applications on the host OS.

use std::{
    process::{Command, Stdio},
    thread,
};
use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
#[error("failed to launch '{target}': {source}")]
pub struct LaunchError {
    pub target: String,
    #[source]
    pub source: std::io::Error,
}

#[cfg_attr(test, mockall::automock)]
pub trait AppLauncher {
    /// Starts `target` without waiting for it to exit.
    fn launch(&self, target: &str) -> Result<(), LaunchError>;
}

/// Launches applications through the platform shell.
#[derive(Debug, Clone, Default)]
pub struct OsLauncher;

impl OsLauncher {
    fn command(target: &str) -> Command {
        if cfg!(target_os = "windows") {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", target]);
            cmd
        } else if cfg!(target_os = "macos") {
            let mut cmd = Command::new("open");
            cmd.args(["-a", target]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", target]);
            cmd
        }
    }
}

impl AppLauncher for OsLauncher {
    fn launch(&self, target: &str) -> Result<(), LaunchError> {
        debug!(app = target, "Spawning application");
        let mut child = Self::command(target)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| LaunchError {
                target: target.to_string(),
                source,
            })?;

        // Reap the shell in the background so it never lingers as a zombie.
        let app = target.to_string();
        thread::spawn(move || match child.wait() {
            Ok(status) => debug!(app = %app, %status, "Launcher shell exited"),
            Err(e) => warn!(app = %app, error = %e, "Failed to wait on launcher shell"),
        });
        Ok(())
    }
}
