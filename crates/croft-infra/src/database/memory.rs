//! In-memory aggregate store - used as fallback when no database is
//! configured.
//!
//! Honors the same version-checked update contract as the Postgres store,
//! so the service's conflict-retry path behaves identically against it.
//! Note: data is lost on process restart.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use croft_core::domain::Post;
use croft_core::error::RepoError;
use croft_core::ports::{BaseRepository, PostRepository};

/// In-memory post repository using a HashMap behind an async RwLock.
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        let store = self.store.read().await;
        Ok(store.get(&id).cloned())
    }

    async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        if store.contains_key(&post.id) {
            return Err(RepoError::Constraint("Post already exists".to_string()));
        }
        post.version = 1;
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;
        let stored = store.get(&post.id).ok_or(RepoError::Conflict)?;
        if stored.version != post.version {
            return Err(RepoError::Conflict);
        }
        post.version += 1;
        store.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        match store.remove(&id) {
            Some(_) => Ok(()),
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut all: Vec<Post> = store.values().cloned().collect();
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(all)
    }

    async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut mine: Vec<Post> = store
            .values()
            .filter(|p| p.author == author)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(mine)
    }
}
