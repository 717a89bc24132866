use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// The logged-in identity, mirrored to one JSON file so a restart lands on
/// the dashboard without re-entering credentials.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    user: Option<User>,
}

impl Session {
    /// Restore from disk. A missing file means logged out; an unreadable or
    /// unparsable file is removed and likewise treated as logged out. The
    /// stored identity is trusted as-is, with no backend re-validation.
    pub fn load(path: PathBuf) -> Self {
        let user = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<User>(&content) {
                Ok(user) => {
                    info!(username = %user.username, "Restored session");
                    Some(user)
                }
                Err(e) => {
                    warn!("Discarding corrupt session file: {}", e);
                    let _ = std::fs::remove_file(&path);
                    None
                }
            },
            Err(_) => None,
        };

        Self { path, user }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn store(&mut self, user: User) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string(&user)?;
        std::fs::write(&self.path, content)?;
        self.user = Some(user);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.user = None;
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                warn!("Failed to remove session file: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(dir.path().join("session.json"));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(path.clone());
        session
            .store(User {
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
            })
            .unwrap();

        let restored = Session::load(path);
        assert_eq!(restored.user().unwrap().username, "ana");
        assert_eq!(restored.user().unwrap().email, "ana@example.com");
    }

    #[test]
    fn corrupt_file_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        let session = Session::load(path.clone());
        assert!(!session.is_logged_in());
        assert!(!path.exists());
    }

    #[test]
    fn clear_removes_file_and_identity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(path.clone());
        session
            .store(User {
                username: "ana".to_string(),
                email: String::new(),
            })
            .unwrap();
        assert!(path.exists());

        session.clear();
        assert!(!session.is_logged_in());
        assert!(!path.exists());
    }
}
