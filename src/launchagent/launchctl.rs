//! `launchctl` wrapper.

use std::path::Path;
use std::process::Command;

use super::error::{LaunchAgentError, Result};

/// Runs `launchctl <subcommand> <plist>` and maps a non-zero exit to an error.
fn run_launchctl(subcommand: &str, plist_path: &Path) -> Result<()> {
    let output = Command::new("launchctl")
        .arg(subcommand)
        .arg(plist_path)
        .output()
        .map_err(LaunchAgentError::LaunchctlExecution)?;

    if !output.status.success() {
        return Err(LaunchAgentError::LaunchctlFailed {
            command: subcommand.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    tracing::debug!(subcommand, path = %plist_path.display(), "launchctl succeeded");
    Ok(())
}

/// Registers the agent with launchd.
pub fn load(plist_path: &Path) -> Result<()> {
    run_launchctl("load", plist_path)
}

/// Unregisters the agent. Fails if it was not loaded; callers cleaning up
/// before a reinstall ignore that.
pub fn unload(plist_path: &Path) -> Result<()> {
    run_launchctl("unload", plist_path)
}
