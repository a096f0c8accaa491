//! Script loading and library search paths

use std::path::{Path, PathBuf};

use encoding_rs::WINDOWS_1252;

use crate::error::MacalError;

/// Read a script as a string, trying UTF-8 first, then Windows-1252 as fallback
pub fn read_script(path: &Path) -> Result<String, MacalError> {
    let bytes = std::fs::read(path).map_err(|e| MacalError::ScriptReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    // Try UTF-8 first (handles BOM automatically if present)
    match String::from_utf8(bytes.clone()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // Fall back to Windows-1252 (common for scripts created on Windows)
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(MacalError::ScriptEncodingError {
                    path: path.to_path_buf(),
                })
            } else {
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Build the library search path for a script: the script's own directory,
/// any `MACAL_PATH` entries, and `./lib`.
pub fn default_search_paths(script_path: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(dir) = script_path.parent() {
        paths.push(dir.to_path_buf());
    }
    if let Ok(env_path) = std::env::var("MACAL_PATH") {
        for entry in env_path.split(':').filter(|e| !e.is_empty()) {
            paths.push(PathBuf::from(entry));
        }
    }
    paths.push(PathBuf::from("./lib"));
    paths
}

/// Resolve a library name to `<name>.mcl` on the search path
pub fn find_library(name: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    for path in search_paths {
        let lib_path = path.join(format!("{}.mcl", name));
        if lib_path.exists() {
            return Some(lib_path);
        }
    }
    None
}
