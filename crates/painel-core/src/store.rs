//! Record store for published indicator posts.
//!
//! Two backends implement [`PostStore`]: [`MemoryStore`] and
//! [`JsonFileStore`], which keeps the whole collection in one JSON document
//! and rewrites it atomically (temp file + rename) on every mutation.
//! [`open_with_fallback`] prefers the file and degrades to memory when the
//! file cannot be used, so the dashboard always comes up.
//!
//! Listings are newest first (`createdAt` descending).

use crate::config::StoreConfig;
use crate::types::{ChartConfig, ChartType, Post, PostUpdate, TopicId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store document is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("post `{0}` not found")]
    NotFound(String),

    #[error("post `{0}` already exists")]
    Duplicate(String),

    #[error("store lock poisoned")]
    Poisoned,
}

pub trait PostStore: Send + Sync {
    /// Short backend name for logs (`memory`, `json-file`).
    fn backend(&self) -> &'static str;

    /// Every post, newest first.
    fn list(&self) -> Result<Vec<Post>, StoreError>;

    fn get(&self, id: &str) -> Result<Post, StoreError>;

    fn insert(&self, post: Post) -> Result<(), StoreError>;

    /// Replace topic, description and chart of `id`; returns the new record.
    fn update(&self, id: &str, update: PostUpdate) -> Result<Post, StoreError>;

    /// Remove `id`; returns the removed record.
    fn delete(&self, id: &str) -> Result<Post, StoreError>;

    /// Posts of one topic, newest first.
    fn list_topic(&self, topic: TopicId) -> Result<Vec<Post>, StoreError> {
        let mut posts = self.list()?;
        posts.retain(|p| p.topic_id == topic);
        Ok(posts)
    }

    /// An id derived from `now_ms` that no stored post uses yet.
    fn fresh_id(&self, now_ms: i64) -> Result<String, StoreError> {
        let mut candidate = now_ms;
        loop {
            match self.get(&candidate.to_string()) {
                Err(StoreError::NotFound(id)) => return Ok(id),
                Ok(_) => candidate += 1,
                Err(err) => return Err(err),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Collection operations shared by both backends
// ---------------------------------------------------------------------------

fn newest_first(posts: &[Post]) -> Vec<Post> {
    let mut sorted = posts.to_vec();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

fn find(posts: &[Post], id: &str) -> Result<Post, StoreError> {
    posts
        .iter()
        .find(|p| p.id == id)
        .cloned()
        .ok_or_else(|| StoreError::NotFound(id.to_string()))
}

fn insert_into(posts: &mut Vec<Post>, post: Post) -> Result<(), StoreError> {
    if posts.iter().any(|p| p.id == post.id) {
        return Err(StoreError::Duplicate(post.id));
    }
    posts.push(post);
    Ok(())
}

fn update_in(posts: &mut [Post], id: &str, update: PostUpdate) -> Result<Post, StoreError> {
    let post = posts
        .iter_mut()
        .find(|p| p.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    post.topic_id = update.topic_id;
    post.description = update.description;
    post.chart_config = update.chart_config;
    Ok(post.clone())
}

fn remove_from(posts: &mut Vec<Post>, id: &str) -> Result<Post, StoreError> {
    let index = posts
        .iter()
        .position(|p| p.id == id)
        .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
    Ok(posts.remove(index))
}

// ---------------------------------------------------------------------------
// MemoryStore
// ---------------------------------------------------------------------------

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    posts: RwLock<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }
}

impl PostStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn list(&self) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(newest_first(&posts))
    }

    fn get(&self, id: &str) -> Result<Post, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        find(&posts, id)
    }

    fn insert(&self, post: Post) -> Result<(), StoreError> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        insert_into(&mut posts, post)
    }

    fn update(&self, id: &str, update: PostUpdate) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        update_in(&mut posts, id, update)
    }

    fn delete(&self, id: &str) -> Result<Post, StoreError> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        remove_from(&mut posts, id)
    }
}

// ---------------------------------------------------------------------------
// JsonFileStore
// ---------------------------------------------------------------------------

/// Store backed by a single JSON array on disk.
///
/// Mutations are applied to a copy, persisted, and only then published to
/// readers; a failed write leaves both the file and the in-memory view
/// unchanged.
///
/// Records are read one by one. A record that no longer parses as a
/// [`Post`] is logged, hidden from listings and written back verbatim on the
/// next mutation, so one bad entry never costs the rest of the document.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    posts: RwLock<Vec<Post>>,
    unreadable: Vec<Value>,
}

impl JsonFileStore {
    /// Open `path`, creating an empty document (and parent directories) when
    /// it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let (posts, unreadable) = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                (Vec::new(), Vec::new())
            } else {
                split_records(serde_json::from_str(&raw)?)
            }
        } else {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            write_atomic(&path, &[], &[])?;
            (Vec::new(), Vec::new())
        };
        debug!(
            path = %path.display(),
            posts = posts.len(),
            unreadable = unreadable.len(),
            "opened json store"
        );
        Ok(Self {
            path,
            posts: RwLock::new(posts),
            unreadable,
        })
    }

    /// Records kept on disk that could not be read as posts.
    pub fn unreadable(&self) -> &[Value] {
        &self.unreadable
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate<T>(&self, op: impl FnOnce(&mut Vec<Post>) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut posts = self.posts.write().map_err(|_| StoreError::Poisoned)?;
        let mut next = posts.clone();
        let out = op(&mut next)?;
        write_atomic(&self.path, &next, &self.unreadable)?;
        *posts = next;
        Ok(out)
    }
}

fn split_records(records: Vec<Value>) -> (Vec<Post>, Vec<Value>) {
    let mut posts = Vec::with_capacity(records.len());
    let mut unreadable = Vec::new();
    for (index, record) in records.into_iter().enumerate() {
        match Post::deserialize(&record) {
            Ok(post) => posts.push(post),
            Err(err) => {
                warn!(index, id = %record["id"], error = %err, "skipping unreadable stored post");
                unreadable.push(record);
            }
        }
    }
    (posts, unreadable)
}

fn write_atomic(path: &Path, posts: &[Post], unreadable: &[Value]) -> Result<(), StoreError> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut records = posts
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    records.extend_from_slice(unreadable);
    let bytes = serde_json::to_vec_pretty(&records)?;
    let mut file = fs::File::create(&tmp)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

impl PostStore for JsonFileStore {
    fn backend(&self) -> &'static str {
        "json-file"
    }

    fn list(&self) -> Result<Vec<Post>, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        Ok(newest_first(&posts))
    }

    fn get(&self, id: &str) -> Result<Post, StoreError> {
        let posts = self.posts.read().map_err(|_| StoreError::Poisoned)?;
        find(&posts, id)
    }

    fn insert(&self, post: Post) -> Result<(), StoreError> {
        self.mutate(|posts| insert_into(posts, post))
    }

    fn update(&self, id: &str, update: PostUpdate) -> Result<Post, StoreError> {
        self.mutate(|posts| update_in(posts, id, update))
    }

    fn delete(&self, id: &str) -> Result<Post, StoreError> {
        self.mutate(|posts| remove_from(posts, id))
    }
}

// ---------------------------------------------------------------------------
// Opening with fallback and seeding
// ---------------------------------------------------------------------------

/// Open the configured file store, or an in-memory store if the file cannot
/// be read at all (I/O failure or a document that is not a JSON array).
/// Seeds the example posts into an empty store when `seed_examples` is set.
pub fn open_with_fallback(config: &StoreConfig) -> Arc<dyn PostStore> {
    let store: Arc<dyn PostStore> = match JsonFileStore::open(&config.path) {
        Ok(store) => Arc::new(store),
        Err(err) => {
            warn!(
                path = %config.path.display(),
                error = %err,
                "json store unavailable; falling back to in-memory store"
            );
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_examples {
        if let Err(err) = seed_if_empty(store.as_ref(), chrono::Utc::now().timestamp_millis()) {
            warn!(error = %err, "could not seed example posts");
        }
    }
    info!(backend = store.backend(), "post store ready");
    store
}

/// Insert [`example_posts`] when the store holds nothing. Returns how many
/// posts were added.
pub fn seed_if_empty(store: &dyn PostStore, now_ms: i64) -> Result<usize, StoreError> {
    if !store.list()?.is_empty() {
        return Ok(0);
    }
    let posts = example_posts(now_ms);
    let count = posts.len();
    for post in posts {
        store.insert(post)?;
    }
    debug!(count, "seeded example posts");
    Ok(count)
}

/// The two indicators a fresh dashboard starts with.
pub fn example_posts(now_ms: i64) -> Vec<Post> {
    fn monthly(pairs: &[(&str, u32)]) -> serde_json::Value {
        serde_json::Value::Array(
            pairs
                .iter()
                .map(|(label, value)| json!({"label": label, "value": value}))
                .collect(),
        )
    }

    vec![
        Post {
            id: "1".to_string(),
            topic_id: TopicId::Saude,
            description: "Acompanhamento mensal dos casos notificados de Dengue no município."
                .to_string(),
            chart_config: ChartConfig::new(
                ChartType::Bar,
                "Casos de Dengue em São Gonçalo dos Campos (Jan-Nov 2025)",
            )
            .with_data(monthly(&[
                ("Jan", 6),
                ("Fev", 1),
                ("Mar", 2),
                ("Abr", 1),
                ("Mai", 2),
                ("Jun", 4),
                ("Jul", 1),
                ("Ago", 1),
                ("Set", 2),
                ("Out", 1),
                ("Nov", 2),
            ]))
            .with_color("#10b981"),
            created_at: now_ms,
        },
        Post {
            id: "2".to_string(),
            topic_id: TopicId::Financas,
            description: "Comparativo de arrecadação de impostos no primeiro trimestre."
                .to_string(),
            chart_config: ChartConfig::new(ChartType::Bar, "Arrecadação de IPTU (em Milhares de R$)")
                .with_data(monthly(&[("Jan", 450), ("Fev", 320), ("Mar", 280)]))
                .with_color("#059669"),
            created_at: now_ms - 100_000,
        },
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
