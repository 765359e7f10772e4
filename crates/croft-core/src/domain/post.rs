use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Comment;

/// Avatar used when the author supplied none.
pub const DEFAULT_AUTHOR_IMAGE: &str = "/default-profile.png";

/// Post aggregate - a feed entry together with its embedded comments.
///
/// The whole aggregate is persisted and rewritten as a single unit; comments
/// have no life of their own outside their parent post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub images: Vec<String>,
    pub author: String,
    pub author_image: String,
    pub timestamp: DateTime<Utc>,
    pub likes: i32,
    pub dislikes: i32,
    pub comments: Vec<Comment>,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    /// Optimistic-lock counter, bumped by the store on every successful write.
    #[serde(default)]
    pub version: i64,
}

impl Post {
    /// Create a new post with zeroed counters and no comments.
    pub fn new(
        title: String,
        content: String,
        images: Vec<String>,
        author: String,
        author_image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            images,
            author,
            author_image: author_image
                .filter(|img| !img.is_empty())
                .unwrap_or_else(|| DEFAULT_AUTHOR_IMAGE.to_string()),
            timestamp: Utc::now(),
            likes: 0,
            dislikes: 0,
            comments: Vec::new(),
            edited: false,
            edited_at: None,
            version: 0,
        }
    }

    /// Whether `caller` is the recorded author. Case-sensitive.
    pub fn is_author(&self, caller: &str) -> bool {
        self.author == caller
    }

    /// Replace title/content/images and mark the post as edited.
    /// Counters, comments, author and creation timestamp are untouched.
    pub fn apply_edit(&mut self, title: String, content: String, images: Vec<String>) {
        self.title = title;
        self.content = content;
        self.images = images;
        self.edited = true;
        self.edited_at = Some(Utc::now());
    }

    /// Append a comment, preserving the order of existing ones.
    /// Does not mark the post itself as edited.
    pub fn add_comment(&mut self, text: String, author: String) -> Uuid {
        let comment = Comment::new(text, author);
        let id = comment.id;
        self.comments.push(comment);
        id
    }

    /// Find a comment by id.
    pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }

    pub fn comment_mut(&mut self, comment_id: Uuid) -> Option<&mut Comment> {
        self.comments.iter_mut().find(|c| c.id == comment_id)
    }

    /// Remove every comment matching both the id and the caller identity,
    /// keeping the survivors in their original relative order. Returns the
    /// number of comments removed.
    pub fn remove_comments(&mut self, comment_id: Uuid, caller: &str) -> usize {
        let before = self.comments.len();
        self.comments
            .retain(|c| !(c.id == comment_id && c.author == caller));
        before - self.comments.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_post_starts_with_zeroed_counters() {
        let post = Post::new(
            "title".into(),
            "content".into(),
            vec![],
            "alice".into(),
            None,
        );
        assert_eq!(post.likes, 0);
        assert_eq!(post.dislikes, 0);
        assert!(!post.edited);
        assert!(post.edited_at.is_none());
        assert!(post.comments.is_empty());
    }

    #[test]
    fn missing_or_empty_avatar_falls_back_to_default() {
        let none = Post::new("t".into(), "c".into(), vec![], "a".into(), None);
        assert_eq!(none.author_image, DEFAULT_AUTHOR_IMAGE);

        let empty = Post::new("t".into(), "c".into(), vec![], "a".into(), Some(String::new()));
        assert_eq!(empty.author_image, DEFAULT_AUTHOR_IMAGE);

        let custom = Post::new(
            "t".into(),
            "c".into(),
            vec![],
            "a".into(),
            Some("/me.png".into()),
        );
        assert_eq!(custom.author_image, "/me.png");
    }

    #[test]
    fn apply_edit_marks_edited_and_keeps_counters() {
        let mut post = Post::new("t".into(), "c".into(), vec![], "a".into(), None);
        post.likes = 3;
        post.apply_edit("t2".into(), "c2".into(), vec!["/img.png".into()]);
        assert_eq!(post.title, "t2");
        assert_eq!(post.images, vec!["/img.png".to_string()]);
        assert!(post.edited);
        assert!(post.edited_at.is_some());
        assert_eq!(post.likes, 3);
    }

    #[test]
    fn comments_append_in_order_with_unique_ids() {
        let mut post = Post::new("t".into(), "c".into(), vec![], "a".into(), None);
        let first = post.add_comment("one".into(), "bob".into());
        let second = post.add_comment("two".into(), "carol".into());
        assert_ne!(first, second);
        assert_eq!(post.comments[0].text, "one");
        assert_eq!(post.comments[1].text, "two");
        assert!(!post.edited, "comment mutations never mark the post edited");
    }

    #[test]
    fn remove_comments_requires_matching_author() {
        let mut post = Post::new("t".into(), "c".into(), vec![], "a".into(), None);
        let id = post.add_comment("hi".into(), "carol".into());

        assert_eq!(post.remove_comments(id, "alice"), 0);
        assert_eq!(post.comments.len(), 1);

        assert_eq!(post.remove_comments(id, "carol"), 1);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn remove_comments_keeps_survivor_order() {
        let mut post = Post::new("t".into(), "c".into(), vec![], "a".into(), None);
        post.add_comment("one".into(), "bob".into());
        let target = post.add_comment("two".into(), "bob".into());
        post.add_comment("three".into(), "bob".into());

        post.remove_comments(target, "bob");
        let texts: Vec<_> = post.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, ["one", "three"]);
    }
}
