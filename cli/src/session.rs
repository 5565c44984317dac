//! Session id persisted between invocations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use maconomy_core::Session;

pub const MISSING_SESSION: &str = "Session ID is missing. You must login first.";

/// Plain text file holding the id returned by `login`.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Session> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => anyhow::bail!(MISSING_SESSION),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read session file {}", self.path.display()))
            }
        };
        let id = contents.trim_end_matches(['\r', '\n']);
        Session::new(id).map_err(|_| anyhow::anyhow!(MISSING_SESSION))
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(&self.path, session.as_str())
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!("Saved session to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_asks_for_login() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        let err = store.load().unwrap_err();
        assert_eq!(err.to_string(), MISSING_SESSION);
    }

    #[test]
    fn empty_file_asks_for_login() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "\n").unwrap();
        let err = SessionStore::new(path).load().unwrap_err();
        assert_eq!(err.to_string(), MISSING_SESSION);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session"));
        store.save(&Session::new("abc-123").unwrap()).unwrap();
        assert_eq!(store.load().unwrap().as_str(), "abc-123");
    }

    #[test]
    fn trailing_newline_is_stripped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session");
        std::fs::write(&path, "abc-123\r\n").unwrap();
        assert_eq!(SessionStore::new(path).load().unwrap().as_str(), "abc-123");
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(dir.path().join("session"));
        store.save(&Session::new("abc").unwrap()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
