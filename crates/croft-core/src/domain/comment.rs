use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - embedded in its parent [`Post`](super::Post), never
/// addressable in the store on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
}

impl Comment {
    /// Create a new comment with a generated ID.
    pub fn new(text: String, author: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author,
            timestamp: Utc::now(),
            edited: false,
            edited_at: None,
        }
    }

    /// Replace the text and mark the comment as edited.
    pub fn apply_edit(&mut self, text: String) {
        self.text = text;
        self.edited = true;
        self.edited_at = Some(Utc::now());
    }
}
