//! Sound lookup.
//!
//! Sounds are referred to by name (`"Submarine"`, `"Glass"`). A name resolves
//! to a file in the macOS system sound directories when one exists, and to
//! the built-in chime otherwise.

use std::path::{Path, PathBuf};

use super::error::SoundError;

/// Where a named sound comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoundSource {
    /// A sound file from `/System/Library/Sounds` or `/Library/Sounds`.
    System {
        /// Sound name (file stem).
        name: String,
        /// Full path to the file.
        path: PathBuf,
    },
    /// The synthesized fallback chime, labelled with the requested name.
    Embedded {
        /// Name the caller asked for.
        name: String,
    },
}

impl SoundSource {
    /// Creates a system sound source without checking the path.
    #[must_use]
    pub fn system(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::System {
            name: name.into(),
            path: path.into(),
        }
    }

    /// Creates a system sound source, rejecting paths outside the sound
    /// directories.
    ///
    /// # Errors
    ///
    /// Returns `SoundError::InvalidPath` for any other location.
    pub fn system_validated(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self, SoundError> {
        let path = path.into();
        ensure_in_sound_dirs(&path)?;
        Ok(Self::System {
            name: name.into(),
            path,
        })
    }

    /// Creates a fallback chime source.
    #[must_use]
    pub fn embedded(name: impl Into<String>) -> Self {
        Self::Embedded { name: name.into() }
    }

    /// Returns the sound name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System { name, .. } | Self::Embedded { name } => name,
        }
    }

    /// Returns true for file-backed sounds.
    #[must_use]
    pub fn is_system(&self) -> bool {
        matches!(self, Self::System { .. })
    }

    /// Returns true for the fallback chime.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        matches!(self, Self::Embedded { .. })
    }

    /// Returns the file path of a system sound.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::System { path, .. } => Some(path),
            Self::Embedded { .. } => None,
        }
    }
}

/// Sound directories, highest priority first.
const SOUND_DIRS: &[&str] = &["/System/Library/Sounds", "/Library/Sounds"];

/// File extensions rodio can decode.
const SUPPORTED_EXTENSIONS: &[&str] = &["aiff", "aif", "wav", "mp3", "m4a", "flac", "caf"];

/// The sounds that ship with macOS, offered when discovery finds nothing.
pub const BUILTIN_SOUND_NAMES: &[&str] = &[
    "Basso",
    "Blow",
    "Bottle",
    "Frog",
    "Funk",
    "Glass",
    "Hero",
    "Morse",
    "Ping",
    "Pop",
    "Purr",
    "Sosumi",
    "Submarine",
    "Tink",
];

fn ensure_in_sound_dirs(path: &Path) -> Result<(), SoundError> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

    let allowed = SOUND_DIRS.iter().any(|dir| {
        let dir = Path::new(dir);
        let canonical_dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
        canonical.starts_with(&canonical_dir)
            && !canonical
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
    });

    if allowed {
        Ok(())
    } else {
        Err(SoundError::InvalidPath(path.display().to_string()))
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Scans the sound directories.
///
/// The result is sorted by name; when both directories hold the same name
/// the system copy wins. Missing directories yield an empty list.
#[must_use]
pub fn discover_system_sounds() -> Vec<SoundSource> {
    let mut sounds: Vec<SoundSource> = Vec::new();

    for dir in SOUND_DIRS {
        let Ok(entries) = std::fs::read_dir(dir) else {
            continue;
        };

        for path in entries.flatten().map(|entry| entry.path()) {
            if !is_supported(&path) {
                continue;
            }
            let Some(stem) = path.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
                continue;
            };
            if sounds.iter().any(|s| s.name() == stem) {
                continue;
            }
            sounds.push(SoundSource::system(stem, path));
        }
    }

    sounds.sort_by(|a, b| a.name().cmp(b.name()));
    tracing::trace!(count = sounds.len(), "system sounds discovered");
    sounds
}

/// Finds a system sound by name, ignoring case.
///
/// # Errors
///
/// Returns `SoundError::FileNotFound` if no such sound is installed.
pub fn find_system_sound(name: &str) -> Result<SoundSource, SoundError> {
    discover_system_sounds()
        .into_iter()
        .find(|s| s.name().eq_ignore_ascii_case(name))
        .ok_or_else(|| SoundError::FileNotFound(format!("system sound '{name}'")))
}

/// Resolves a sound name to something playable.
///
/// Falls back to the built-in chime when the name is not installed.
#[must_use]
pub fn resolve_sound(name: &str) -> SoundSource {
    match find_system_sound(name) {
        Ok(source) => source,
        Err(e) => {
            tracing::debug!(sound = name, error = %e, "using built-in chime");
            SoundSource::embedded(name)
        }
    }
}

/// Returns the names to offer in the sound menu.
#[must_use]
pub fn available_sound_names() -> Vec<String> {
    let discovered: Vec<String> = discover_system_sounds()
        .iter()
        .map(|s| s.name().to_string())
        .collect();

    if discovered.is_empty() {
        BUILTIN_SOUND_NAMES.iter().map(|s| (*s).to_string()).collect()
    } else {
        discovered
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod sound_source_tests {
        use super::*;

        #[test]
        fn test_system() {
            let source = SoundSource::system("Glass", "/System/Library/Sounds/Glass.aiff");
            assert!(source.is_system());
            assert!(!source.is_embedded());
            assert_eq!(source.name(), "Glass");
            assert_eq!(
                source.path(),
                Some(Path::new("/System/Library/Sounds/Glass.aiff"))
            );
        }

        #[test]
        fn test_embedded() {
            let source = SoundSource::embedded("Submarine");
            assert!(source.is_embedded());
            assert_eq!(source.name(), "Submarine");
            assert!(source.path().is_none());
        }

        #[test]
        fn test_system_validated_accepts_sound_dirs() {
            assert!(
                SoundSource::system_validated("Glass", "/System/Library/Sounds/Glass.aiff").is_ok()
            );
            assert!(SoundSource::system_validated("Custom", "/Library/Sounds/Custom.wav").is_ok());
        }

        #[test]
        fn test_system_validated_rejects_other_paths() {
            let result = SoundSource::system_validated("evil", "/tmp/evil.wav");
            assert!(matches!(result, Err(SoundError::InvalidPath(p)) if p.contains("/tmp/evil.wav")));

            assert!(SoundSource::system_validated("etc", "/etc/passwd").is_err());
            assert!(SoundSource::system_validated(
                "traversal",
                "/System/Library/Sounds/../../../etc/passwd"
            )
            .is_err());
        }
    }

    mod lookup_tests {
        use super::*;

        #[test]
        fn test_is_supported() {
            assert!(is_supported(Path::new("/x/Glass.aiff")));
            assert!(is_supported(Path::new("/x/Chime.WAV")));
            assert!(!is_supported(Path::new("/x/readme.txt")));
            assert!(!is_supported(Path::new("/x/noext")));
        }

        #[test]
        fn test_discover_is_sorted() {
            let sounds = discover_system_sounds();
            let names: Vec<&str> = sounds.iter().map(SoundSource::name).collect();
            let mut sorted = names.clone();
            sorted.sort_unstable();
            assert_eq!(names, sorted);
        }

        #[test]
        fn test_find_missing_sound() {
            let result = find_system_sound("NonExistentSound12345");
            assert!(matches!(result, Err(SoundError::FileNotFound(m)) if m.contains("NonExistentSound12345")));
        }

        #[test]
        fn test_resolve_missing_sound_falls_back() {
            let source = resolve_sound("NonExistentSound12345");
            assert!(source.is_embedded());
            assert_eq!(source.name(), "NonExistentSound12345");
        }

        #[test]
        fn test_available_sound_names_never_empty() {
            let names = available_sound_names();
            assert!(!names.is_empty());
        }

        #[test]
        fn test_builtin_names_include_default() {
            assert!(BUILTIN_SOUND_NAMES.contains(&"Submarine"));
        }
    }
}
