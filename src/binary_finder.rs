//! Shared utility for finding MUMmer tool binaries.
//!
//! This module provides a unified way to find the `nucmer`, `delta-filter`,
//! `show-coords` and `show-snps` binaries that works with an explicit
//! install directory, an environment override, and system installs.

use crate::error::{AlignError, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the directory that holds the MUMmer tools.
pub const MUMMER_BIN_ENV: &str = "MUMMER_BIN";

/// Find a MUMmer tool binary by name.
///
/// Search order:
/// 1. Explicit tool directory, if one was configured
/// 2. `$MUMMER_BIN`
/// 3. Same directory as the current executable
/// 4. System PATH (via `which`)
pub fn find_tool(name: &str, tool_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = tool_dir {
        let binary = dir.join(name);
        if binary.exists() {
            return Ok(binary);
        }
        // An explicit directory that lacks the tool is a configuration
        // problem, not something PATH should silently paper over.
        return Err(AlignError::ToolNotFound(format!(
            "{} (not present in {})",
            name,
            dir.display()
        )));
    }

    if let Ok(dir) = std::env::var(MUMMER_BIN_ENV) {
        let binary = PathBuf::from(dir).join(name);
        if binary.exists() {
            return Ok(binary);
        }
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let binary = exe_dir.join(name);
            if binary.exists() {
                return Ok(binary);
            }
        }
    }

    which::which(name).map_err(|_| AlignError::ToolNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_dir_wins() {
        let dir = tempdir().unwrap();
        let tool = dir.path().join("nucmer");
        fs::write(&tool, "#!/bin/sh\n").unwrap();

        let found = find_tool("nucmer", Some(dir.path())).unwrap();
        assert_eq!(found, tool);
    }

    #[test]
    fn explicit_dir_missing_tool_is_an_error() {
        let dir = tempdir().unwrap();
        let err = find_tool("show-coords", Some(dir.path())).unwrap_err();
        assert!(matches!(err, AlignError::ToolNotFound(_)));
    }
}
