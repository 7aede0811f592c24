//! Forum repository.
//!
//! The vote table's primary key (post, user) is what enforces "at most one
//! vote per user per post"; the counters on the post row are bookkeeping
//! kept in step inside the voting transaction.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use teknokalakal_core::{CommentId, PostId, UserId, VoteKind};

use super::RepositoryError;
use crate::models::forum::{Comment, Post, PostDetail, Vote};

const POST_COLUMNS: &str = "p.id, p.user_id, u.name AS author_name, u.email AS author_email, \
     p.title, p.content, p.upvotes, p.downvotes, p.created_at, p.updated_at";

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i32,
    user_id: i32,
    author_name: String,
    author_email: String,
    title: String,
    content: String,
    upvotes: i32,
    downvotes: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            user_id: UserId::new(row.user_id),
            author_name: row.author_name,
            author_email: row.author_email,
            title: row.title,
            content: row.content,
            upvotes: row.upvotes,
            downvotes: row.downvotes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct VoteRow {
    user_id: i32,
    kind: VoteKind,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: i32,
    post_id: i32,
    user_id: i32,
    author_name: String,
    body: String,
    created_at: DateTime<Utc>,
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: CommentId::new(row.id),
            post_id: PostId::new(row.post_id),
            user_id: UserId::new(row.user_id),
            author_name: row.author_name,
            body: row.body,
            created_at: row.created_at,
        }
    }
}

/// Repository for forum database operations.
pub struct ForumRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ForumRepository<'a> {
    /// Create a new forum repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All posts with their authors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_posts(&self) -> Result<Vec<Post>, RepositoryError> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS}
             FROM shop.forum_post p
             JOIN shop.user u ON u.id = p.user_id
             ORDER BY p.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// One post with its votes and comment thread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_post_detail(
        &self,
        id: PostId,
    ) -> Result<Option<PostDetail>, RepositoryError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS}
             FROM shop.forum_post p
             JOIN shop.user u ON u.id = p.user_id
             WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let post = Post::from(row);

        let votes = sqlx::query_as::<_, VoteRow>(
            "SELECT user_id, kind FROM shop.forum_vote WHERE post_id = $1",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(|v| Vote {
            user_id: UserId::new(v.user_id),
            kind: v.kind,
        })
        .collect();

        let comments = sqlx::query_as::<_, CommentRow>(
            "SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.body, c.created_at
             FROM shop.forum_comment c
             JOIN shop.user u ON u.id = c.user_id
             WHERE c.post_id = $1
             ORDER BY c.created_at ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Comment::from)
        .collect();

        Ok(Some(PostDetail {
            post,
            votes,
            comments,
        }))
    }

    /// Create a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create_post(
        &self,
        user_id: UserId,
        title: &str,
        content: &str,
    ) -> Result<Post, RepositoryError> {
        let post_id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.forum_post (user_id, title, content)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(user_id)
        .bind(title)
        .bind(content)
        .fetch_one(self.pool)
        .await?;

        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS}
             FROM shop.forum_post p
             JOIN shop.user u ON u.id = p.user_id
             WHERE p.id = $1"
        ))
        .bind(post_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Record a vote, replacing the user's previous vote on the post.
    ///
    /// An existing vote is removed (its counter decremented) before the new
    /// one is applied, so a user flips rather than stacks votes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    pub async fn vote(
        &self,
        post_id: PostId,
        user_id: UserId,
        kind: VoteKind,
    ) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM shop.forum_post WHERE id = $1)")
                .bind(post_id)
                .fetch_one(&mut *tx)
                .await?;
        if !exists {
            return Err(RepositoryError::NotFound);
        }

        let previous: Option<VoteKind> = sqlx::query_scalar(
            "DELETE FROM shop.forum_vote WHERE post_id = $1 AND user_id = $2 RETURNING kind",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        match previous {
            Some(VoteKind::Upvote) => {
                sqlx::query(
                    "UPDATE shop.forum_post SET upvotes = GREATEST(upvotes - 1, 0) WHERE id = $1",
                )
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            }
            Some(VoteKind::Downvote) => {
                sqlx::query(
                    "UPDATE shop.forum_post SET downvotes = GREATEST(downvotes - 1, 0) WHERE id = $1",
                )
                .bind(post_id)
                .execute(&mut *tx)
                .await?;
            }
            None => {}
        }

        sqlx::query(
            "INSERT INTO shop.forum_vote (post_id, user_id, kind) VALUES ($1, $2, $3)",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(kind)
        .execute(&mut *tx)
        .await?;

        let counter_sql = match kind {
            VoteKind::Upvote => "UPDATE shop.forum_post SET upvotes = upvotes + 1 WHERE id = $1",
            VoteKind::Downvote => {
                "UPDATE shop.forum_post SET downvotes = downvotes + 1 WHERE id = $1"
            }
        };
        sqlx::query(counter_sql).bind(post_id).execute(&mut *tx).await?;

        tx.commit().await?;
        Ok(())
    }

    /// Delete a post and everything hanging off it (votes, comments cascade).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist.
    pub async fn delete_post(&self, id: PostId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.forum_post WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Append a comment to a post's thread.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including a
    /// foreign-key violation for an unknown post).
    pub async fn add_comment(
        &self,
        post_id: PostId,
        user_id: UserId,
        body: &str,
    ) -> Result<Comment, RepositoryError> {
        let comment_id: i32 = sqlx::query_scalar(
            "INSERT INTO shop.forum_comment (post_id, user_id, body)
             VALUES ($1, $2, $3)
             RETURNING id",
        )
        .bind(post_id)
        .bind(user_id)
        .bind(body)
        .fetch_one(self.pool)
        .await?;

        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.body, c.created_at
             FROM shop.forum_comment c
             JOIN shop.user u ON u.id = c.user_id
             WHERE c.id = $1",
        )
        .bind(comment_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get one comment of a post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_comment(
        &self,
        post_id: PostId,
        comment_id: CommentId,
    ) -> Result<Option<Comment>, RepositoryError> {
        let row = sqlx::query_as::<_, CommentRow>(
            "SELECT c.id, c.post_id, c.user_id, u.name AS author_name, c.body, c.created_at
             FROM shop.forum_comment c
             JOIN shop.user u ON u.id = c.user_id
             WHERE c.id = $1 AND c.post_id = $2",
        )
        .bind(comment_id)
        .bind(post_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Comment::from))
    }

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the comment doesn't exist.
    pub async fn delete_comment(&self, comment_id: CommentId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.forum_comment WHERE id = $1")
            .bind(comment_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// The author of a post, for ownership checks.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn post_author(&self, id: PostId) -> Result<Option<UserId>, RepositoryError> {
        let author: Option<i32> =
            sqlx::query_scalar("SELECT user_id FROM shop.forum_post WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(author.map(UserId::new))
    }
}
