//! Error types for login-item registration.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// LaunchAgent management error type.
#[derive(Debug, Error)]
pub enum LaunchAgentError {
    /// The running executable could not be located.
    #[error("failed to resolve the eyesoff executable: {0}")]
    BinaryPathResolution(#[source] io::Error),

    /// Home directory not found.
    #[error("failed to get home directory")]
    HomeDirectoryNotFound,

    /// A directory could not be created.
    #[error("failed to create {path}: {source}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The plist could not be written or its permissions set.
    #[error("failed to write {path}: {source}")]
    PlistWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The plist could not be removed.
    #[error("failed to remove {path}: {source}")]
    PlistRemove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Plist serialization failed.
    #[error("failed to serialize plist: {0}")]
    PlistSerialize(#[from] plist::Error),

    /// `launchctl` could not be spawned.
    #[error("failed to execute launchctl: {0}")]
    LaunchctlExecution(#[source] io::Error),

    /// `launchctl` ran but reported a failure.
    #[error("launchctl {command} failed: {stderr}")]
    LaunchctlFailed { command: String, stderr: String },
}

/// Result type for LaunchAgent operations.
pub type Result<T> = std::result::Result<T, LaunchAgentError>;
