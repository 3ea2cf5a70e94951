//! Page persistence
//!
//! [`PageStore`] is the seam between the editor and wherever pages live.
//! Two implementations ship with the crate: an in-memory store shared
//! between clones, and a directory of JSON files (one draft and one
//! published snapshot per page).

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::Block;

/// A published snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedPage {
    pub version: u64,
    pub blocks: Vec<Block>,
}

#[async_trait]
pub trait PageStore: Send + Sync {
    /// Draft blocks of a page; a page that was never saved is empty.
    async fn load_blocks(&self, page_id: &str) -> Result<Vec<Block>, StoreError>;

    async fn save_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), StoreError>;

    /// Publish `blocks` as the live version. Returns the new version number.
    async fn publish(&self, page_id: &str, blocks: &[Block]) -> Result<u64, StoreError>;

    async fn load_published(&self, page_id: &str) -> Result<PublishedPage, StoreError>;
}

// ── In-memory store ─────────────────────────────────────────────────────────

#[derive(Default)]
struct MemoryState {
    drafts: HashMap<String, Vec<Block>>,
    published: HashMap<String, PublishedPage>,
    offline: bool,
}

#[derive(Clone, Default)]
pub struct MemoryPageStore {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a draft
    pub fn with_page(self, page_id: &str, blocks: Vec<Block>) -> Self {
        self.state.write().drafts.insert(page_id.to_string(), blocks);
        self
    }

    /// While offline every call fails with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.state.write().offline = offline;
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.state.read().offline {
            return Err(StoreError::Unavailable("memory store is offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn load_blocks(&self, page_id: &str) -> Result<Vec<Block>, StoreError> {
        self.check_online()?;
        Ok(self
            .state
            .read()
            .drafts
            .get(page_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn save_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), StoreError> {
        self.check_online()?;
        self.state
            .write()
            .drafts
            .insert(page_id.to_string(), blocks.to_vec());
        Ok(())
    }

    async fn publish(&self, page_id: &str, blocks: &[Block]) -> Result<u64, StoreError> {
        self.check_online()?;
        let mut state = self.state.write();
        let version = state.published.get(page_id).map(|p| p.version).unwrap_or(0) + 1;
        state.published.insert(
            page_id.to_string(),
            PublishedPage {
                version,
                blocks: blocks.to_vec(),
            },
        );
        Ok(version)
    }

    async fn load_published(&self, page_id: &str) -> Result<PublishedPage, StoreError> {
        self.check_online()?;
        self.state
            .read()
            .published
            .get(page_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(page_id.to_string()))
    }
}

// ── JSON file store ─────────────────────────────────────────────────────────

/// Stores `<page>.draft.json` and `<page>.published.json` under one directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct JsonFilePageStore {
    root: PathBuf,
}

#[cfg(not(target_arch = "wasm32"))]
impl JsonFilePageStore {
    /// Use `root`, creating it if needed.
    pub async fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    fn path(&self, page_id: &str, kind: &str) -> Result<PathBuf, StoreError> {
        let valid = !page_id.is_empty()
            && page_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidPageId(page_id.to_string()));
        }
        Ok(self.root.join(format!("{}.{}.json", page_id, kind)))
    }

    async fn write_atomic(path: &Path, contents: &str) -> Result<(), StoreError> {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }

    /// File contents, or `None` when the file does not exist.
    async fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait]
impl PageStore for JsonFilePageStore {
    async fn load_blocks(&self, page_id: &str) -> Result<Vec<Block>, StoreError> {
        let path = self.path(page_id, "draft")?;
        match Self::read_optional(&path).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn save_blocks(&self, page_id: &str, blocks: &[Block]) -> Result<(), StoreError> {
        let path = self.path(page_id, "draft")?;
        let json = serde_json::to_string_pretty(blocks)?;
        Self::write_atomic(&path, &json).await
    }

    async fn publish(&self, page_id: &str, blocks: &[Block]) -> Result<u64, StoreError> {
        let version = match self.load_published(page_id).await {
            Ok(page) => page.version + 1,
            Err(StoreError::NotFound(_)) => 1,
            Err(e) => return Err(e),
        };
        let page = PublishedPage {
            version,
            blocks: blocks.to_vec(),
        };
        let path = self.path(page_id, "published")?;
        Self::write_atomic(&path, &serde_json::to_string_pretty(&page)?).await?;
        tracing::debug!(page = page_id, version, "published page snapshot");
        Ok(version)
    }

    async fn load_published(&self, page_id: &str) -> Result<PublishedPage, StoreError> {
        let path = self.path(page_id, "published")?;
        let raw = Self::read_optional(&path)
            .await?
            .ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page id: {0}")]
    InvalidPageId(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks() -> Vec<Block> {
        vec![
            Block::new("a", "section"),
            Block::new("b", "heading").with_parent("a", 0),
        ]
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryPageStore::new();
        assert!(store.load_blocks("home").await.unwrap().is_empty());

        store.save_blocks("home", &blocks()).await.unwrap();
        assert_eq!(store.clone().load_blocks("home").await.unwrap(), blocks());

        assert_eq!(store.publish("home", &blocks()).await.unwrap(), 1);
        assert_eq!(store.publish("home", &blocks()).await.unwrap(), 2);
        assert_eq!(store.load_published("home").await.unwrap().version, 2);
    }

    #[tokio::test]
    async fn test_memory_store_offline() {
        let store = MemoryPageStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.save_blocks("home", &[]).await,
            Err(StoreError::Unavailable(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePageStore::open(dir.path().join("pages")).await.unwrap();

        store.save_blocks("home", &blocks()).await.unwrap();
        assert_eq!(store.load_blocks("home").await.unwrap(), blocks());
        assert!(matches!(
            store.load_published("home").await,
            Err(StoreError::NotFound(_))
        ));

        assert_eq!(store.publish("home", &blocks()).await.unwrap(), 1);
        let reopened = JsonFilePageStore::open(dir.path().join("pages")).await.unwrap();
        let published = reopened.load_published("home").await.unwrap();
        assert_eq!(published.version, 1);
        assert_eq!(published.blocks, blocks());
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePageStore::open(dir.path()).await.unwrap();
        assert!(matches!(
            store.load_blocks("../etc").await,
            Err(StoreError::InvalidPageId(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[tokio::test]
    async fn test_file_store_corrupt_draft_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePageStore::open(dir.path()).await.unwrap();
        tokio::fs::write(dir.path().join("home.draft.json"), "{not json").await.unwrap();

        assert!(matches!(
            store.load_blocks("home").await,
            Err(StoreError::Serialization(_))
        ));
        assert!(store.load_blocks("other").await.unwrap().is_empty());
        // no temp files left behind after a save
        store.save_blocks("other", &blocks()).await.unwrap();
        assert!(!dir.path().join("other.draft.json.tmp").exists());
    }
}
