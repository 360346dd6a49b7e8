use std::path::PathBuf;

/// Platform-specific path handling that follows XDG Base Directory spec on
/// Unix-like systems and Windows conventions on Windows.
///
/// On macOS and Linux:
/// - Data: $XDG_DATA_HOME/{name} (default: ~/.local/share/{name})
/// - Cache: $XDG_CACHE_HOME/{name} (default: ~/.cache/{name})
///
/// On Windows:
/// - Data: %APPDATA%\{name}
/// - Cache: %LOCALAPPDATA%\{name}
pub struct ProjectPaths {
    name: String,
}

impl ProjectPaths {
    /// Create a new ProjectPaths instance for the given application name.
    pub fn new(name: &str) -> Option<Self> {
        // Verify we can get home directory before creating
        get_home_dir()?;
        Some(ProjectPaths {
            name: name.to_string(),
        })
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            get_windows_appdata()
                .map(|p| p.join(&self.name))
                .unwrap_or_else(|| PathBuf::from(format!(".{}", self.name)))
        }

        #[cfg(not(target_os = "windows"))]
        {
            get_xdg_data_dir(&self.name)
        }
    }

    /// Get the cache directory path.
    pub fn cache_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            get_windows_localappdata()
                .map(|p| p.join(&self.name))
                .unwrap_or_else(|| PathBuf::from(format!(".{}", self.name)))
        }

        #[cfg(not(target_os = "windows"))]
        {
            get_xdg_cache_dir(&self.name)
        }
    }
}

/// Get the home directory, respecting HOME and USERPROFILE environment variables.
fn get_home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| std::env::var("USERPROFILE").ok().map(PathBuf::from))
}

/// Get XDG data directory (respects $XDG_DATA_HOME, defaults to ~/.local/share).
#[cfg(not(target_os = "windows"))]
fn get_xdg_data_dir(name: &str) -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| get_home_dir().map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from(".local/share"))
        .join(name)
}

/// Get XDG cache directory (respects $XDG_CACHE_HOME, defaults to ~/.cache).
#[cfg(not(target_os = "windows"))]
fn get_xdg_cache_dir(name: &str) -> PathBuf {
    std::env::var("XDG_CACHE_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| get_home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(name)
}

/// Get Windows APPDATA directory.
#[cfg(target_os = "windows")]
fn get_windows_appdata() -> Option<PathBuf> {
    std::env::var("APPDATA").ok().map(PathBuf::from)
}

/// Get Windows LOCALAPPDATA directory.
#[cfg(target_os = "windows")]
fn get_windows_localappdata() -> Option<PathBuf> {
    std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
}
