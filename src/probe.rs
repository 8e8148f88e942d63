//! Locating the executables behind declared scripts.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolves the base command of a template to an executable on this host.
pub trait ExecProbe: Send + Sync {
    /// Full path of `command` if it is executable here, `None` otherwise.
    fn resolve(&self, command: &str) -> Option<PathBuf>;
}

/// Base command of a template: the first whitespace token, with any `(`
/// stripped (templates may start with a shell grouping).
pub fn base_command(template_text: &str) -> String {
    template_text
        .split_whitespace()
        .next()
        .unwrap_or("")
        .replace('(', "")
}

/* ===================== PATH probe ===================== */

/// Probe backed by a directory search path, `PATH` by default.
#[derive(Debug, Clone)]
pub struct PathProbe {
    search_path: Vec<PathBuf>,
}

impl PathProbe {
    /// Probe over the current `PATH`.
    pub fn from_env() -> Self {
        let search_path = env::var_os("PATH")
            .map(|path| env::split_paths(&path).collect())
            .unwrap_or_default();
        Self { search_path }
    }

    /// Probe over an explicit directory list.
    pub fn with_search_path(dirs: Vec<PathBuf>) -> Self {
        Self { search_path: dirs }
    }
}

impl ExecProbe for PathProbe {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        if command.is_empty() {
            return None;
        }
        // A command with a separator is a path already, like which(1).
        if command.contains('/') || command.contains('\\') {
            let path = Path::new(command);
            return is_executable(path).then(|| path.to_path_buf());
        }
        for dir in &self.search_path {
            let candidate = dir.join(command);
            if is_executable(&candidate) {
                return Some(candidate);
            }
        }
        None
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    if !fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false) {
        return false;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => matches!(
            ext.to_ascii_lowercase().as_str(),
            "exe" | "bat" | "cmd" | "com"
        ),
        None => false,
    }
}

#[cfg(not(any(unix, windows)))]
fn is_executable(path: &Path) -> bool {
    fs::metadata(path).map(|meta| meta.is_file()).unwrap_or(false)
}

/* ===================== Accept-all probe ===================== */

/// Probe that accepts every command without touching the filesystem.
///
/// For offline template inspection and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllProbe;

impl ExecProbe for AcceptAllProbe {
    fn resolve(&self, command: &str) -> Option<PathBuf> {
        Some(PathBuf::from(command))
    }
}
