//! Typed entities and request payloads for the forum backend.
//!
//! The client never originates identifiers; every entity here is a cache of
//! the last known server state. Optional relations are explicit `Option`s so
//! the absence of a relation is a typed case, not a guard at each use site.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Access level of a user account; gates write access to admin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Moderator,
    Admin,
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Moderator => "moderator",
            Self::Admin => "admin",
        }
    }
}

/// A registered forum user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Profile view of a user: bio/location plus activity counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub posts_count: i64,
    #[serde(default)]
    pub comments_count: i64,
}

/// A discussion category. Categories form a tree via `parent_id`; the server
/// embeds a `subcategories` list on listing endpoints for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub subcategories: Vec<Category>,
}

/// A vehicle brand, scoped under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    #[serde(rename = "brand_name")]
    pub name: String,
    pub category_id: i64,
}

/// A vehicle model of a brand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub id: i64,
    #[serde(rename = "model_name")]
    pub name: String,
    pub car_brand_id: i64,
}

/// A model generation with its production year range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub id: i64,
    pub name: String,
    pub car_model_id: i64,
    pub start_year: i32,
    /// `None` means the generation is still in production.
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl Generation {
    #[must_use]
    pub fn is_in_production(&self) -> bool {
        self.end_year.is_none()
    }
}

/// Publication status of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Draft,
    Published,
    /// Hidden by moderation.
    Hidden,
}

impl PostStatus {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Hidden => "hidden",
        }
    }
}

/// A forum post. Taxonomy references are independently nullable; detail
/// endpoints additionally embed the referenced entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    /// Short lead shown in list views.
    pub head: String,
    pub body: String,
    pub status: PostStatus,
    pub user_id: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub car_brand_id: Option<i64>,
    #[serde(default)]
    pub car_model_id: Option<i64>,
    #[serde(default)]
    pub model_generation_id: Option<i64>,
    #[serde(default)]
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub car_brand: Option<Brand>,
    #[serde(default)]
    pub car_model: Option<Model>,
    #[serde(default)]
    pub model_generation: Option<Generation>,
}

/// A comment on a post, optionally replying to another comment (one level of
/// threading; the server embeds `replies` on the parent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub author: User,
    pub content: String,
    #[serde(default)]
    pub replies: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Edited state is inferred by comparing timestamps.
    #[must_use]
    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

// ── Request payloads ────────────────────────────────────────────────────────

/// Login credentials.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Registration data.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Successful login/register response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: User,
}

/// Fields of a user account that can be changed by its owner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Profile fields editable by the user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Post create/update payload; unset taxonomy references are omitted from
/// the request body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostPayload {
    pub title: String,
    pub head: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PostStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_brand_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_model_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_generation_id: Option<i64>,
}

/// Category create/update payload.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

/// Brand create/update payload.
#[derive(Debug, Clone, Serialize)]
pub struct BrandPayload {
    #[serde(rename = "brand_name")]
    pub name: String,
    pub category_id: i64,
}

/// Model create/update payload.
#[derive(Debug, Clone, Serialize)]
pub struct ModelPayload {
    #[serde(rename = "model_name")]
    pub name: String,
    pub car_brand_id: i64,
}

/// Generation create/update payload.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPayload {
    pub name: String,
    pub car_model_id: i64,
    pub start_year: i32,
    pub end_year: Option<i32>,
}

impl GenerationPayload {
    /// Check the production year range before any network call.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidInput`] when `end_year` precedes
    /// `start_year`.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(end_year) = self.end_year {
            if end_year < self.start_year {
                return Err(ApiError::InvalidInput(
                    "end year cannot precede start year".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Moderation verb applied to a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationAction {
    Hide,
    Publish,
}

/// Moderation request for `/admin/posts/{id}/moderate`.
#[derive(Debug, Clone, Serialize)]
pub struct ModerationPayload {
    pub action: ModerationAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Report request for posts and comments.
#[derive(Debug, Clone, Serialize)]
pub struct ReportPayload {
    pub reason: String,
}

/// Comment body for add/update/reply.
#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub content: String,
}

/// Sort order accepted by the comment listing endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentSort {
    #[default]
    Newest,
    Oldest,
    Popular,
}

impl CommentSort {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Popular => "popular",
        }
    }
}

/// Filter and paging parameters of the post listing endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilters {
    pub category_id: Option<i64>,
    pub car_brand_id: Option<i64>,
    pub car_model_id: Option<i64>,
    pub model_generation_id: Option<i64>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PostFilters {
    /// Render the set filters as query parameters.
    #[must_use]
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.category_id {
            query.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.car_brand_id {
            query.push(("car_brand_id", id.to_string()));
        }
        if let Some(id) = self.car_model_id {
            query.push(("car_model_id", id.to_string()));
        }
        if let Some(id) = self.model_generation_id {
            query.push(("model_generation_id", id.to_string()));
        }
        if let Some(search) = &self.search {
            if !search.is_empty() {
                query.push(("search", search.clone()));
            }
        }
        if let Some(page) = self.page {
            query.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

/// Paging snapshot returned alongside paginated lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

/// List responses arrive either as a bare array or wrapped in a `data`
/// envelope with an optional pagination block.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Plain(Vec<T>),
    Paginated {
        data: Vec<T>,
        #[serde(default)]
        pagination: Option<Pagination>,
    },
}

impl<T> ListEnvelope<T> {
    /// Unwrap into the item list and the pagination block, if any.
    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, Option<Pagination>) {
        match self {
            Self::Plain(items) => (items, None),
            Self::Paginated { data, pagination } => (data, pagination),
        }
    }
}

/// Aggregate counters of the admin dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SystemStats {
    #[serde(default)]
    pub users: i64,
    #[serde(default)]
    pub posts: i64,
    #[serde(default)]
    pub comments: i64,
    #[serde(default)]
    pub reported_posts: i64,
}

/// Generic acknowledgement body returned by delete/report endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Acknowledgement {
    #[serde(default)]
    pub message: Option<String>,
}
