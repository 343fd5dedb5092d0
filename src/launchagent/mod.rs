//! Launch-at-login support through a per-user LaunchAgent.
//!
//! Installing writes `~/Library/LaunchAgents/com.eyesoff.agent.plist` and
//! loads it with `launchctl`; uninstalling reverses both steps.
//!
//! ```no_run
//! use eyesoff::launchagent;
//!
//! launchagent::install(&[])?;
//! assert!(launchagent::is_installed());
//! launchagent::uninstall()?;
//! # Ok::<(), launchagent::LaunchAgentError>(())
//! ```

pub mod error;
pub mod launchctl;
pub mod plist;

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub use error::{LaunchAgentError, Result};
pub use plist::EyesOffLaunchAgent;

/// Where the agent's files live for one home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentPaths {
    pub plist: PathBuf,
    pub log_dir: PathBuf,
}

impl AgentPaths {
    pub fn for_home(home: &Path) -> Self {
        Self {
            plist: home
                .join("Library/LaunchAgents")
                .join(format!("{}.plist", EyesOffLaunchAgent::LABEL)),
            log_dir: home.join(".eyesoff/logs"),
        }
    }

    /// Paths under the current user's home directory.
    pub fn current() -> Result<Self> {
        dirs::home_dir()
            .map(|home| Self::for_home(&home))
            .ok_or(LaunchAgentError::HomeDirectoryNotFound)
    }
}

/// Returns true if the plist is present.
pub fn is_installed() -> bool {
    AgentPaths::current()
        .map(|paths| paths.plist.exists())
        .unwrap_or(false)
}

/// Installs and loads the agent for the running executable.
///
/// `extra_args` are appended after `run`. Reinstalling replaces the
/// previous plist.
///
/// # Errors
///
/// Fails if the executable or home directory cannot be found, the plist
/// cannot be written, or `launchctl load` fails.
pub fn install(extra_args: &[String]) -> Result<PathBuf> {
    let binary = std::env::current_exe().map_err(LaunchAgentError::BinaryPathResolution)?;
    let paths = AgentPaths::current()?;

    let agent = EyesOffLaunchAgent::new(&binary, &paths.log_dir, extra_args);
    write_agent(&paths, &agent)?;

    // A stale registration would make load fail.
    let _ = launchctl::unload(&paths.plist);
    launchctl::load(&paths.plist)?;

    tracing::info!(path = %paths.plist.display(), "launch agent installed");
    Ok(paths.plist)
}

/// Unloads and removes the agent. Succeeds if it was never installed.
///
/// # Errors
///
/// Fails if the home directory cannot be found or the plist cannot be removed.
pub fn uninstall() -> Result<()> {
    let paths = AgentPaths::current()?;
    if !paths.plist.exists() {
        tracing::info!("launch agent not installed; nothing to remove");
        return Ok(());
    }

    if let Err(e) = launchctl::unload(&paths.plist) {
        tracing::debug!(error = %e, "unload before removal failed");
    }
    remove_agent(&paths)?;

    tracing::info!("launch agent uninstalled");
    Ok(())
}

/// Writes the plist (mode 0644) and creates the log directory.
pub fn write_agent(paths: &AgentPaths, agent: &EyesOffLaunchAgent) -> Result<()> {
    create_dir(&paths.log_dir)?;
    if let Some(parent) = paths.plist.parent() {
        create_dir(parent)?;
    }

    let xml = agent.to_xml()?;
    let write_err = |source| LaunchAgentError::PlistWrite {
        path: paths.plist.clone(),
        source,
    };
    fs::write(&paths.plist, xml).map_err(write_err)?;
    fs::set_permissions(&paths.plist, fs::Permissions::from_mode(0o644)).map_err(write_err)?;
    Ok(())
}

fn remove_agent(paths: &AgentPaths) -> Result<()> {
    fs::remove_file(&paths.plist).map_err(|source| LaunchAgentError::PlistRemove {
        path: paths.plist.clone(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| LaunchAgentError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}
