//! LaunchAgent plist definition.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::Result;

/// Plist that starts the menu bar app at login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct EyesOffLaunchAgent {
    pub label: String,
    pub program_arguments: Vec<String>,
    pub run_at_load: bool,
    /// Quitting from the menu must stick, so launchd never restarts it.
    pub keep_alive: bool,
    /// Menu bar apps only work inside a GUI login session.
    pub limit_load_to_session_type: String,
    pub standard_out_path: String,
    pub standard_error_path: String,
}

impl EyesOffLaunchAgent {
    /// Service label.
    pub const LABEL: &'static str = "com.eyesoff.agent";

    /// Builds the agent for `binary_path run <extra_args...>`.
    pub fn new(binary_path: &Path, log_dir: &Path, extra_args: &[String]) -> Self {
        let mut program_arguments = vec![
            binary_path.to_string_lossy().into_owned(),
            "run".to_string(),
        ];
        program_arguments.extend(extra_args.iter().cloned());

        Self {
            label: Self::LABEL.to_string(),
            program_arguments,
            run_at_load: true,
            keep_alive: false,
            limit_load_to_session_type: "Aqua".to_string(),
            standard_out_path: log_dir.join("stdout.log").to_string_lossy().into_owned(),
            standard_error_path: log_dir.join("stderr.log").to_string_lossy().into_owned(),
        }
    }

    /// Serializes to plist XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut buf = Vec::new();
        plist::to_writer_xml(&mut buf, self)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
