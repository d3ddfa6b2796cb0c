//! On-disk persistence for the signed-in user and the persona roster.
//!
//! Both records are stored as human-readable JSON files inside a data
//! directory. The persona roster is treated as recoverable state: a corrupt
//! roster file is logged and replaced with an empty roster rather than
//! blocking the app. The user record is authoritative for the login flow, so
//! a corrupt user file propagates as an error.

use crate::persona::{Persona, User};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

/// File name for the signed-in user record.
const USER_FILE: &str = "faces_of_ai_user.json";

/// File name for the persona roster.
const PERSONAS_FILE: &str = "faces_of_ai_personas.json";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON-file-backed store for user and persona state.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    /// Create a store rooted at the given data directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path to the user record file.
    pub fn user_path(&self) -> PathBuf {
        self.dir.join(USER_FILE)
    }

    /// Path to the persona roster file.
    pub fn personas_path(&self) -> PathBuf {
        self.dir.join(PERSONAS_FILE)
    }

    /// Load the signed-in user, if any.
    ///
    /// A missing file means no one is signed in and yields `None`. A file
    /// that exists but does not parse is an error: the login flow must not
    /// silently sign the user out over a corrupt record.
    pub async fn load_user(&self) -> Result<Option<User>, StoreError> {
        let path = self.user_path();
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the signed-in user.
    pub async fn save_user(&self, user: &User) -> Result<(), StoreError> {
        self.write_json(&self.user_path(), user).await
    }

    /// Remove the user record, signing the user out.
    pub async fn clear_user(&self) -> Result<(), StoreError> {
        match fs::remove_file(self.user_path()).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Load the persona roster.
    ///
    /// A missing file yields an empty roster. A corrupt file is logged and
    /// also yields an empty roster so the dashboard always renders.
    pub async fn load_personas(&self) -> Result<Vec<Persona>, StoreError> {
        let path = self.personas_path();
        match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(personas) => Ok(personas),
                Err(e) => {
                    log::warn!("discarding unreadable persona roster at {path:?}: {e}");
                    Ok(Vec::new())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the full persona roster.
    pub async fn save_personas(&self, personas: &[Persona]) -> Result<(), StoreError> {
        self.write_json(&self.personas_path(), &personas).await
    }

    async fn write_json<T: serde::Serialize>(
        &self,
        path: &Path,
        value: &T,
    ) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).await?;
        let content = serde_json::to_string_pretty(value)?;
        fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::PersonaBuilder;

    fn store_in(dir: &tempfile::TempDir) -> ProfileStore {
        ProfileStore::new(dir.path())
    }

    #[tokio::test]
    async fn test_missing_files_yield_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load_user().await.unwrap().is_none());
        assert!(store.load_personas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_user_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let user = User {
            name: "Neural Architect".to_string(),
            email: "architect@faces.ai".to_string(),
        };
        store.save_user(&user).await.unwrap();

        let loaded = store.load_user().await.unwrap().unwrap();
        assert_eq!(loaded.name, "Neural Architect");
        assert_eq!(loaded.email, "architect@faces.ai");
    }

    #[tokio::test]
    async fn test_clear_user_signs_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let user = User {
            name: "A".to_string(),
            email: "a@b.c".to_string(),
        };
        store.save_user(&user).await.unwrap();
        store.clear_user().await.unwrap();

        assert!(store.load_user().await.unwrap().is_none());
        // Clearing twice is fine.
        store.clear_user().await.unwrap();
    }

    #[tokio::test]
    async fn test_personas_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        let mut persona = PersonaBuilder::new()
            .name("ARCHIVE-ALPHA")
            .role("Legal Expert")
            .build()
            .unwrap();
        persona.teach("The statute of limitations is seven years.".to_string());

        store.save_personas(&[persona.clone()]).await.unwrap();

        let loaded = store.load_personas().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, persona.id);
        assert_eq!(loaded[0].knowledge_base, persona.knowledge_base);
        assert_eq!(loaded[0].api_key, persona.api_key);
    }

    #[tokio::test]
    async fn test_corrupt_roster_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.personas_path(), "{not json")
            .await
            .unwrap();

        assert!(store.load_personas().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_user_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        fs::write(store.user_path(), "{not json").await.unwrap();

        assert!(matches!(
            store.load_user().await,
            Err(StoreError::Json(_))
        ));
    }
}
