//! Post, comment, and moderation operations.

use std::sync::Arc;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::models::{
    Acknowledgement, Comment, CommentPayload, CommentSort, ListEnvelope, ModerationPayload,
    Pagination, Post, PostFilters, PostPayload, ReportPayload,
};

/// Façade over the `/posts`, `/comments` and `/admin/posts` endpoints.
#[derive(Debug, Clone)]
pub struct PostService {
    client: Arc<ApiClient>,
}

impl PostService {
    #[must_use]
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    /// List published posts with the given filters and paging.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn list(
        &self,
        filters: &PostFilters,
    ) -> Result<(Vec<Post>, Option<Pagination>), ApiError> {
        let envelope: ListEnvelope<Post> = self
            .client
            .get_query("/posts/all", &filters.to_query())
            .await?;
        Ok(envelope.into_parts())
    }

    /// Fetch a single post with its embedded relations.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn get(&self, id: i64) -> Result<Post, ApiError> {
        self.client.get(&format!("/posts/{id}")).await
    }

    /// Create a post.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn create(&self, payload: &PostPayload) -> Result<Post, ApiError> {
        self.client.post("/posts", payload).await
    }

    /// Update a post.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update(&self, id: i64, payload: &PostPayload) -> Result<Post, ApiError> {
        self.client.put(&format!("/posts/{id}"), payload).await
    }

    /// Delete a post.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/posts/{id}")).await
    }

    /// Report a post for moderation.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn report(&self, id: i64, reason: &str) -> Result<Acknowledgement, ApiError> {
        self.client
            .post(
                &format!("/posts/{id}/report"),
                &ReportPayload {
                    reason: reason.to_string(),
                },
            )
            .await
    }

    /// List the comments of a post in the given order.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn comments(&self, post_id: i64, sort: CommentSort) -> Result<Vec<Comment>, ApiError> {
        let envelope: ListEnvelope<Comment> = self
            .client
            .get_query(
                &format!("/posts/{post_id}/comments"),
                &[("sort", sort.as_str().to_string())],
            )
            .await?;
        Ok(envelope.into_parts().0)
    }

    /// Add a top-level comment to a post.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.client
            .post(
                &format!("/posts/{post_id}/comments"),
                &CommentPayload {
                    content: content.to_string(),
                },
            )
            .await
    }

    /// Add a reply to an existing comment.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn add_reply(&self, parent_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.client
            .post(
                &format!("/comments/{parent_id}/replies"),
                &CommentPayload {
                    content: content.to_string(),
                },
            )
            .await
    }

    /// Update a comment's content.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn update_comment(&self, comment_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.client
            .put(
                &format!("/comments/{comment_id}"),
                &CommentPayload {
                    content: content.to_string(),
                },
            )
            .await
    }

    /// Delete a comment.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn delete_comment(&self, comment_id: i64) -> Result<(), ApiError> {
        self.client.delete(&format!("/comments/{comment_id}")).await
    }

    /// Report a comment for moderation.
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn report_comment(
        &self,
        comment_id: i64,
        reason: &str,
    ) -> Result<Acknowledgement, ApiError> {
        self.client
            .post(
                &format!("/comments/{comment_id}/report"),
                &ReportPayload {
                    reason: reason.to_string(),
                },
            )
            .await
    }

    /// Apply a moderation action to a post (admin only).
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn moderate(&self, id: i64, payload: &ModerationPayload) -> Result<Post, ApiError> {
        self.client
            .patch(&format!("/admin/posts/{id}/moderate"), payload)
            .await
    }

    /// List every post including hidden ones (admin only).
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn list_admin(
        &self,
        filters: &PostFilters,
    ) -> Result<(Vec<Post>, Option<Pagination>), ApiError> {
        let envelope: ListEnvelope<Post> = self
            .client
            .get_query("/admin/posts", &filters.to_query())
            .await?;
        Ok(envelope.into_parts())
    }

    /// List posts that have open reports (admin only).
    ///
    /// # Errors
    ///
    /// Returns the normalized error for any failure.
    pub async fn reported(&self) -> Result<Vec<Post>, ApiError> {
        let envelope: ListEnvelope<Post> = self.client.get("/admin/posts/reported").await?;
        Ok(envelope.into_parts().0)
    }
}
