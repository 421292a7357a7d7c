//! Posts domain container: the post list, the currently viewed post, and
//! per-post comment lists.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::ApiError;
use crate::models::{
    Comment, CommentSort, ModerationPayload, Pagination, Post, PostFilters, PostPayload,
};
use crate::services::PostService;

/// Snapshot of the posts domain.
#[derive(Debug, Clone, Default)]
pub struct PostsState {
    /// Published posts, newest first; a direct reflection of the last list
    /// response.
    pub posts: Vec<Post>,
    /// The currently viewed post, kept in sync with mutations by id.
    pub current_post: Option<Post>,
    /// Comment lists keyed by post id, established by an explicit fetch.
    pub comments: HashMap<i64, Vec<Comment>>,
    pub pagination: Pagination,
    pub filters: PostFilters,
    pub loading: bool,
    pub error: Option<String>,
}

/// Reducer event for the posts container.
#[derive(Debug, Clone)]
pub enum PostsEvent {
    Requested,
    Failed(String),
    /// A completed operation with no cached payload (e.g. report).
    Settled,
    ListLoaded {
        posts: Vec<Post>,
        pagination: Option<Pagination>,
    },
    PostLoaded(Post),
    Created(Post),
    Updated(Post),
    Deleted(i64),
    CommentsLoaded {
        post_id: i64,
        comments: Vec<Comment>,
    },
    CommentAdded(Comment),
    CommentUpdated(Comment),
    CommentDeleted {
        post_id: i64,
        comment_id: i64,
    },
    FiltersChanged(PostFilters),
    ErrorCleared,
    CurrentPostCleared,
    /// Drop one post's comment list, or all of them.
    CommentsCleared(Option<i64>),
}

impl PostsState {
    /// Apply one deterministic reducer transition.
    pub fn apply(&mut self, event: PostsEvent) {
        match event {
            PostsEvent::Requested => {
                self.loading = true;
                self.error = None;
            }
            PostsEvent::Failed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            PostsEvent::Settled => {
                self.loading = false;
                self.error = None;
            }
            PostsEvent::ListLoaded { posts, pagination } => {
                self.loading = false;
                self.error = None;
                self.posts = posts;
                if let Some(pagination) = pagination {
                    self.pagination = pagination;
                }
            }
            PostsEvent::PostLoaded(post) => {
                self.loading = false;
                self.error = None;
                self.current_post = Some(post);
            }
            PostsEvent::Created(post) => {
                self.loading = false;
                self.error = None;
                // Posts prepend; an id already present is replaced in place.
                if let Some(existing) = self.posts.iter_mut().find(|p| p.id == post.id) {
                    *existing = post;
                } else {
                    self.posts.insert(0, post);
                }
            }
            PostsEvent::Updated(post) => {
                self.loading = false;
                self.error = None;
                if let Some(existing) = self.posts.iter_mut().find(|p| p.id == post.id) {
                    *existing = post.clone();
                }
                if self.current_post.as_ref().is_some_and(|c| c.id == post.id) {
                    self.current_post = Some(post);
                }
            }
            PostsEvent::Deleted(id) => {
                self.loading = false;
                self.error = None;
                self.posts.retain(|p| p.id != id);
                if self.current_post.as_ref().is_some_and(|c| c.id == id) {
                    self.current_post = None;
                }
            }
            PostsEvent::CommentsLoaded { post_id, comments } => {
                self.loading = false;
                self.error = None;
                self.comments.insert(post_id, comments);
            }
            PostsEvent::CommentAdded(comment) => {
                self.loading = false;
                self.error = None;
                match comment.parent_id {
                    // Replies attach to their parent when it is cached;
                    // otherwise the next comment fetch reconciles.
                    Some(parent_id) => {
                        if let Some(list) = self.comments.get_mut(&comment.post_id) {
                            if let Some(parent) = list.iter_mut().find(|c| c.id == parent_id) {
                                parent.replies.push(comment);
                            }
                        }
                    }
                    // Top-level comments create the list when absent so a
                    // fresh comment is visible without a refetch.
                    None => {
                        self.comments.entry(comment.post_id).or_default().push(comment);
                    }
                }
            }
            PostsEvent::CommentUpdated(comment) => {
                self.loading = false;
                self.error = None;
                if let Some(list) = self.comments.get_mut(&comment.post_id) {
                    if let Some(existing) = list.iter_mut().find(|c| c.id == comment.id) {
                        *existing = comment;
                    } else if let Some(existing) = list
                        .iter_mut()
                        .flat_map(|c| c.replies.iter_mut())
                        .find(|r| r.id == comment.id)
                    {
                        *existing = comment;
                    }
                }
            }
            PostsEvent::CommentDeleted {
                post_id,
                comment_id,
            } => {
                self.loading = false;
                self.error = None;
                if let Some(list) = self.comments.get_mut(&post_id) {
                    list.retain(|c| c.id != comment_id);
                    for comment in list.iter_mut() {
                        comment.replies.retain(|r| r.id != comment_id);
                    }
                }
            }
            PostsEvent::FiltersChanged(filters) => {
                self.filters = filters;
            }
            PostsEvent::ErrorCleared => {
                self.error = None;
            }
            PostsEvent::CurrentPostCleared => {
                self.current_post = None;
            }
            PostsEvent::CommentsCleared(Some(post_id)) => {
                self.comments.remove(&post_id);
            }
            PostsEvent::CommentsCleared(None) => {
                self.comments.clear();
            }
        }
    }
}

/// State container for the posts domain.
#[derive(Debug)]
pub struct PostsStore {
    service: PostService,
    state: Mutex<PostsState>,
}

impl PostsStore {
    #[must_use]
    pub fn new(service: PostService) -> Self {
        Self {
            service,
            state: Mutex::new(PostsState::default()),
        }
    }

    /// A cloned snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> PostsState {
        self.lock().clone()
    }

    /// Replace the active filter set; the next [`fetch_posts`] uses it.
    ///
    /// [`fetch_posts`]: PostsStore::fetch_posts
    pub fn set_filters(&self, filters: PostFilters) {
        self.lock().apply(PostsEvent::FiltersChanged(filters));
    }

    pub fn clear_error(&self) {
        self.lock().apply(PostsEvent::ErrorCleared);
    }

    pub fn clear_current_post(&self) {
        self.lock().apply(PostsEvent::CurrentPostCleared);
    }

    /// Drop one post's comment list, or all of them.
    pub fn clear_comments(&self, post_id: Option<i64>) {
        self.lock().apply(PostsEvent::CommentsCleared(post_id));
    }

    /// Fetch the post list using the active filters.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_posts(&self) -> Result<Vec<Post>, ApiError> {
        let filters = self.lock().filters.clone();
        self.dispatch(PostsEvent::Requested);
        match self.service.list(&filters).await {
            Ok((posts, pagination)) => {
                self.dispatch(PostsEvent::ListLoaded {
                    posts: posts.clone(),
                    pagination,
                });
                Ok(posts)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch a single post into the current-post slot.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_post(&self, id: i64) -> Result<Post, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.get(id).await {
            Ok(post) => {
                self.dispatch(PostsEvent::PostLoaded(post.clone()));
                Ok(post)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Create a post; the result is prepended to the list.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn create_post(&self, payload: &PostPayload) -> Result<Post, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.create(payload).await {
            Ok(post) => {
                self.dispatch(PostsEvent::Created(post.clone()));
                Ok(post)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a post; the list entry and a matching current post follow.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_post(&self, id: i64, payload: &PostPayload) -> Result<Post, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.update(id, payload).await {
            Ok(post) => {
                self.dispatch(PostsEvent::Updated(post.clone()));
                Ok(post)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a post; a matching current post is cleared.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.delete(id).await {
            Ok(()) => {
                self.dispatch(PostsEvent::Deleted(id));
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Report a post for moderation. No cached state changes.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn report_post(&self, id: i64, reason: &str) -> Result<(), ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.report(id, reason).await {
            Ok(_) => {
                self.dispatch(PostsEvent::Settled);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Apply a moderation action (admin only); the updated post replaces its
    /// list entry.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn moderate_post(
        &self,
        id: i64,
        payload: &ModerationPayload,
    ) -> Result<Post, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.moderate(id, payload).await {
            Ok(post) => {
                self.dispatch(PostsEvent::Updated(post.clone()));
                Ok(post)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Fetch a post's comments, replacing its cached list wholesale.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn fetch_comments(
        &self,
        post_id: i64,
        sort: CommentSort,
    ) -> Result<Vec<Comment>, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.comments(post_id, sort).await {
            Ok(comments) => {
                self.dispatch(PostsEvent::CommentsLoaded {
                    post_id,
                    comments: comments.clone(),
                });
                Ok(comments)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Add a top-level comment to a post.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn add_comment(&self, post_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.add_comment(post_id, content).await {
            Ok(comment) => {
                self.dispatch(PostsEvent::CommentAdded(comment.clone()));
                Ok(comment)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Reply to an existing comment.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn add_reply(&self, parent_id: i64, content: &str) -> Result<Comment, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.add_reply(parent_id, content).await {
            Ok(reply) => {
                self.dispatch(PostsEvent::CommentAdded(reply.clone()));
                Ok(reply)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Update a comment's content.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn update_comment(
        &self,
        comment_id: i64,
        content: &str,
    ) -> Result<Comment, ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.update_comment(comment_id, content).await {
            Ok(comment) => {
                self.dispatch(PostsEvent::CommentUpdated(comment.clone()));
                Ok(comment)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Delete a comment from a post's cached list.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn delete_comment(&self, post_id: i64, comment_id: i64) -> Result<(), ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.delete_comment(comment_id).await {
            Ok(()) => {
                self.dispatch(PostsEvent::CommentDeleted {
                    post_id,
                    comment_id,
                });
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Report a comment for moderation. No cached state changes.
    ///
    /// # Errors
    ///
    /// The normalized error, also recorded in the container.
    pub async fn report_comment(&self, comment_id: i64, reason: &str) -> Result<(), ApiError> {
        self.dispatch(PostsEvent::Requested);
        match self.service.report_comment(comment_id, reason).await {
            Ok(_) => {
                self.dispatch(PostsEvent::Settled);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    fn dispatch(&self, event: PostsEvent) {
        self.lock().apply(event);
    }

    fn fail(&self, error: ApiError) -> ApiError {
        self.dispatch(PostsEvent::Failed(error.to_string()));
        error
    }

    fn lock(&self) -> MutexGuard<'_, PostsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
