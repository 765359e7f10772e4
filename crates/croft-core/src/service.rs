//! Post service - the business rules over the post aggregate.
//!
//! Every mutation is a load / validate / mutate / version-checked write
//! cycle. A write that loses the version race is retried from a fresh read,
//! so concurrent increments on the same post are never lost.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::Post;
use crate::error::{RepoError, ServiceError};
use crate::ports::PostRepository;

/// Upper bound on version-conflict retries per operation.
const MAX_WRITE_RETRIES: u32 = 5;

/// Caller-supplied fields for creating or editing a post.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
}

/// Post service - enforces authorship-based authorization and keeps the
/// post-and-embedded-comments aggregate consistent.
///
/// Identity is an already-extracted opaque string; the service never learns
/// how it was obtained.
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    legacy_not_found: bool,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>) -> Self {
        Self {
            repo,
            legacy_not_found: false,
        }
    }

    /// Compatibility mode: report [`ServiceError::Forbidden`] as
    /// [`ServiceError::NotFound`], so callers cannot distinguish a foreign
    /// post from a missing one.
    pub fn with_legacy_not_found(mut self, enabled: bool) -> Self {
        self.legacy_not_found = enabled;
        self
    }

    /// All posts, newest first. An empty store yields an empty vec.
    pub async fn list_all(&self) -> Result<Vec<Post>, ServiceError> {
        Ok(self.repo.find_all_newest_first().await?)
    }

    /// All posts by one author, newest first.
    pub async fn list_by_author(&self, author: &str) -> Result<Vec<Post>, ServiceError> {
        Ok(self.repo.find_by_author(author).await?)
    }

    /// Fetch a single post. Read access is unrestricted.
    pub async fn get_by_id(&self, id: Uuid) -> Result<Post, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    /// Create a post. Any title/content is accepted, including empty.
    pub async fn create(
        &self,
        draft: PostDraft,
        author: String,
        author_image: Option<String>,
    ) -> Result<Post, ServiceError> {
        let post = Post::new(draft.title, draft.content, draft.images, author, author_image);
        Ok(self.repo.insert(post).await?)
    }

    /// Replace title/content/images. Author-gated.
    pub async fn update(
        &self,
        id: Uuid,
        draft: PostDraft,
        caller: &str,
    ) -> Result<Post, ServiceError> {
        let result = self
            .read_modify_write(id, |post| {
                if !post.is_author(caller) {
                    return Err(ServiceError::Forbidden);
                }
                post.apply_edit(
                    draft.title.clone(),
                    draft.content.clone(),
                    draft.images.clone(),
                );
                Ok(())
            })
            .await;
        self.demote(result)
    }

    /// Delete a post and its embedded comments. Author-gated.
    pub async fn delete(&self, id: Uuid, caller: &str) -> Result<(), ServiceError> {
        let result = async {
            let post = self.get_by_id(id).await?;
            if !post.is_author(caller) {
                return Err(ServiceError::Forbidden);
            }
            self.repo.delete(id).await?;
            Ok(())
        }
        .await;
        self.demote(result)
    }

    /// Increment the like counter by one. No identity, no idempotence.
    pub async fn like(&self, id: Uuid) -> Result<Post, ServiceError> {
        self.read_modify_write(id, |post| {
            post.likes += 1;
            Ok(())
        })
        .await
    }

    /// Increment the dislike counter by one. No identity, no idempotence.
    pub async fn dislike(&self, id: Uuid) -> Result<Post, ServiceError> {
        self.read_modify_write(id, |post| {
            post.dislikes += 1;
            Ok(())
        })
        .await
    }

    /// Append a comment to a post. Anyone with an identity may comment.
    pub async fn add_comment(
        &self,
        post_id: Uuid,
        text: String,
        author: String,
    ) -> Result<Post, ServiceError> {
        self.read_modify_write(post_id, |post| {
            post.add_comment(text.clone(), author.clone());
            Ok(())
        })
        .await
    }

    /// Edit one comment's text. Gated on the comment's author, not the
    /// post's.
    pub async fn edit_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
        caller: &str,
    ) -> Result<Post, ServiceError> {
        let result = self
            .read_modify_write(post_id, |post| {
                let comment = post
                    .comment_mut(comment_id)
                    .ok_or(ServiceError::NotFound)?;
                if comment.author != caller {
                    return Err(ServiceError::Forbidden);
                }
                comment.apply_edit(text.clone());
                Ok(())
            })
            .await;
        self.demote(result)
    }

    /// Remove every comment matching both id and caller identity. The write
    /// happens whenever the post exists, even when nothing matched - the
    /// filtered aggregate is persisted unconditionally.
    pub async fn delete_comment(
        &self,
        post_id: Uuid,
        comment_id: Uuid,
        caller: &str,
    ) -> Result<Post, ServiceError> {
        self.read_modify_write(post_id, |post| {
            post.remove_comments(comment_id, caller);
            Ok(())
        })
        .await
    }

    /// Load the post, apply the mutation and write the full aggregate back,
    /// retrying from a fresh read when a concurrent writer won the version
    /// race. `apply` must be idempotent over a fresh copy.
    async fn read_modify_write<F>(&self, id: Uuid, mut apply: F) -> Result<Post, ServiceError>
    where
        F: FnMut(&mut Post) -> Result<(), ServiceError>,
    {
        let mut attempts = 0;
        loop {
            let mut post = self.get_by_id(id).await?;
            apply(&mut post)?;
            match self.repo.update(post).await {
                Ok(saved) => return Ok(saved),
                Err(RepoError::Conflict) if attempts < MAX_WRITE_RETRIES => {
                    attempts += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// Collapse Forbidden into NotFound when compatibility mode is on.
    fn demote<T>(&self, result: Result<T, ServiceError>) -> Result<T, ServiceError> {
        match result {
            Err(ServiceError::Forbidden) if self.legacy_not_found => Err(ServiceError::NotFound),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::ports::BaseRepository;

    /// Test double keeping posts in a map, honoring the version check.
    #[derive(Default)]
    struct MemRepo {
        posts: Mutex<HashMap<Uuid, Post>>,
        forced_conflicts: AtomicU32,
    }

    #[async_trait]
    impl BaseRepository<Post, Uuid> for MemRepo {
        async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
            Ok(self.posts.lock().unwrap().get(&id).cloned())
        }

        async fn insert(&self, mut post: Post) -> Result<Post, RepoError> {
            let mut posts = self.posts.lock().unwrap();
            if posts.contains_key(&post.id) {
                return Err(RepoError::Constraint("duplicate id".into()));
            }
            post.version = 1;
            posts.insert(post.id, post.clone());
            Ok(post)
        }

        async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
            if self.forced_conflicts.load(Ordering::SeqCst) > 0 {
                self.forced_conflicts.fetch_sub(1, Ordering::SeqCst);
                return Err(RepoError::Conflict);
            }
            let mut posts = self.posts.lock().unwrap();
            let stored = posts.get(&post.id).ok_or(RepoError::NotFound)?;
            if stored.version != post.version {
                return Err(RepoError::Conflict);
            }
            post.version += 1;
            posts.insert(post.id, post.clone());
            Ok(post)
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
            match self.posts.lock().unwrap().remove(&id) {
                Some(_) => Ok(()),
                None => Err(RepoError::NotFound),
            }
        }
    }

    #[async_trait]
    impl PostRepository for MemRepo {
        async fn find_all_newest_first(&self) -> Result<Vec<Post>, RepoError> {
            let mut all: Vec<_> = self.posts.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(all)
        }

        async fn find_by_author(&self, author: &str) -> Result<Vec<Post>, RepoError> {
            let mut mine: Vec<_> = self
                .posts
                .lock()
                .unwrap()
                .values()
                .filter(|p| p.author == author)
                .cloned()
                .collect();
            mine.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            Ok(mine)
        }
    }

    fn service() -> (Arc<MemRepo>, PostService) {
        let repo = Arc::new(MemRepo::default());
        (repo.clone(), PostService::new(repo))
    }

    fn draft(title: &str, content: &str) -> PostDraft {
        PostDraft {
            title: title.into(),
            content: content.into(),
            images: vec![],
        }
    }

    #[tokio::test]
    async fn liking_n_times_accumulates() {
        let (_, svc) = service();
        let post = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();

        for _ in 0..4 {
            svc.like(post.id).await.unwrap();
        }
        let liked = svc.get_by_id(post.id).await.unwrap();
        assert_eq!(liked.likes, 4);
        assert_eq!(liked.dislikes, 0);
    }

    #[tokio::test]
    async fn like_retries_through_write_conflicts() {
        let (repo, svc) = service();
        let post = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();

        repo.forced_conflicts.store(3, Ordering::SeqCst);
        let liked = svc.like(post.id).await.unwrap();
        assert_eq!(liked.likes, 1);
    }

    #[tokio::test]
    async fn stale_write_is_rejected_by_the_store() {
        let (repo, svc) = service();
        let stale = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();
        svc.like(stale.id).await.unwrap();

        // `stale` still carries the pre-like version.
        let err = repo.update(stale).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }

    #[tokio::test]
    async fn update_by_non_author_is_forbidden_and_leaves_post_unchanged() {
        let (_, svc) = service();
        let post = svc
            .create(draft("A", "B"), "alice".into(), None)
            .await
            .unwrap();

        let err = svc.update(post.id, draft("X", "Y"), "bob").await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let stored = svc.get_by_id(post.id).await.unwrap();
        assert_eq!(stored.title, "A");
        assert!(!stored.edited);
    }

    #[tokio::test]
    async fn legacy_mode_conflates_forbidden_into_not_found() {
        let (_, svc) = service();
        let svc = svc.with_legacy_not_found(true);
        let post = svc
            .create(draft("A", "B"), "alice".into(), None)
            .await
            .unwrap();

        let err = svc.update(post.id, draft("X", "Y"), "bob").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));

        let err = svc.delete(post.id, "bob").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[tokio::test]
    async fn delete_removes_post_from_store_and_listing() {
        let (_, svc) = service();
        let post = svc
            .create(draft("A", "B"), "alice".into(), None)
            .await
            .unwrap();

        svc.delete(post.id, "alice").await.unwrap();
        assert!(matches!(
            svc.get_by_id(post.id).await.unwrap_err(),
            ServiceError::NotFound
        ));
        assert!(svc.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn edit_comment_touches_only_the_target() {
        let (_, svc) = service();
        let post = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();
        let post = svc
            .add_comment(post.id, "one".into(), "bob".into())
            .await
            .unwrap();
        let post = svc
            .add_comment(post.id, "two".into(), "carol".into())
            .await
            .unwrap();

        let target = post.comments[0].id;
        let updated = svc
            .edit_comment(post.id, target, "one, edited".into(), "bob")
            .await
            .unwrap();

        assert_eq!(updated.comments[0].text, "one, edited");
        assert!(updated.comments[0].edited);
        assert!(updated.comments[0].edited_at.is_some());
        assert_eq!(updated.comments[1].text, "two");
        assert!(!updated.comments[1].edited);
        assert!(!updated.edited, "comment edits never mark the post edited");
    }

    #[tokio::test]
    async fn edit_comment_by_wrong_author_is_forbidden() {
        let (_, svc) = service();
        let post = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();
        let post = svc
            .add_comment(post.id, "hi".into(), "bob".into())
            .await
            .unwrap();
        let comment_id = post.comments[0].id;

        let err = svc
            .edit_comment(post.id, comment_id, "hacked".into(), "carol")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden));

        let err = svc
            .edit_comment(post.id, Uuid::new_v4(), "x".into(), "bob")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound));
    }

    #[tokio::test]
    async fn delete_comment_writes_even_when_nothing_matched() {
        let (_, svc) = service();
        let post = svc
            .create(draft("t", "c"), "alice".into(), None)
            .await
            .unwrap();
        let post = svc
            .add_comment(post.id, "hi".into(), "bob".into())
            .await
            .unwrap();
        let version_before = post.version;

        // No comment matches a random id, but the aggregate is still
        // rewritten - faithful to the filter-then-save semantics.
        let updated = svc
            .delete_comment(post.id, Uuid::new_v4(), "bob")
            .await
            .unwrap();
        assert_eq!(updated.comments.len(), 1);
        assert!(updated.version > version_before);
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filterable_by_author() {
        let (repo, svc) = service();
        let mut older = Post::new("old".into(), "c".into(), vec![], "alice".into(), None);
        older.timestamp = chrono::Utc::now() - chrono::TimeDelta::seconds(60);
        repo.insert(older).await.unwrap();
        svc.create(draft("new", "c"), "bob".into(), None)
            .await
            .unwrap();

        let all = svc.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].title, "new");
        assert_eq!(all[1].title, "old");

        let alices = svc.list_by_author("alice").await.unwrap();
        assert_eq!(alices.len(), 1);
        assert_eq!(alices[0].title, "old");
    }

    /// End-to-end walk through the post lifecycle: create, foreign update
    /// rejected, own update applied, comment added by a third user, comment
    /// deletion gated on the comment author.
    #[tokio::test]
    async fn full_post_lifecycle() {
        let (_, svc) = service();

        let post = svc
            .create(draft("A", "B"), "alice".into(), None)
            .await
            .unwrap();
        assert_eq!(post.author, "alice");
        assert_eq!(post.likes, 0);
        assert_eq!(post.author_image, crate::domain::DEFAULT_AUTHOR_IMAGE);

        assert!(matches!(
            svc.update(post.id, draft("A2", "B"), "bob").await,
            Err(ServiceError::Forbidden)
        ));
        let unchanged = svc.get_by_id(post.id).await.unwrap();
        assert_eq!(unchanged.title, "A");

        let updated = svc.update(post.id, draft("A2", "B"), "alice").await.unwrap();
        assert!(updated.edited);
        assert_eq!(updated.title, "A2");

        let commented = svc
            .add_comment(post.id, "hi".into(), "carol".into())
            .await
            .unwrap();
        assert_eq!(commented.comments.len(), 1);
        assert_eq!(commented.comments[0].author, "carol");
        let comment_id = commented.comments[0].id;

        // Author mismatch: the filter removes nothing.
        let untouched = svc
            .delete_comment(post.id, comment_id, "alice")
            .await
            .unwrap();
        assert_eq!(untouched.comments.len(), 1);

        let cleared = svc
            .delete_comment(post.id, comment_id, "carol")
            .await
            .unwrap();
        assert!(cleared.comments.is_empty());
    }
}
