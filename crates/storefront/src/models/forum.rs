//! Forum domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use teknokalakal_core::{CommentId, PostId, UserId, VoteKind};

/// A discussion post with its vote tally.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub id: PostId,
    pub user_id: UserId,
    /// Author display name, joined in for listings.
    pub author_name: String,
    pub author_email: String,
    pub title: String,
    pub content: String,
    pub upvotes: i32,
    pub downvotes: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One user's vote on a post. At most one per (post, user).
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Vote {
    pub user_id: UserId,
    pub kind: VoteKind,
}

/// A reply in a post's comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub author_name: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// A post together with its votes and comment thread.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub votes: Vec<Vote>,
    pub comments: Vec<Comment>,
}
