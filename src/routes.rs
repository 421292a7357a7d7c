//! Path-based navigation table and access guard.
//!
//! The view layer owns actual navigation; this module only decides what a
//! path means and whether the current session may enter it.

use crate::store::AuthState;

/// Named routes of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Profile,
    Post(i64),
    CreatePost,
    EditPost(i64),
    Category(i64),
    Brand(i64),
    Model(i64),
    Generation(i64),
    /// Admin dashboard; unrecognized `/admin/...` paths fall back here.
    Admin,
    AdminCategories,
    AdminBrands,
    AdminModels,
    AdminGenerations,
}

/// Who may enter a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Access {
    Public,
    Authenticated,
    AdminOnly,
}

impl Route {
    /// Render the route as a path.
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Profile => "/profile".to_string(),
            Self::Post(id) => format!("/post/{id}"),
            Self::CreatePost => "/create-post".to_string(),
            Self::EditPost(id) => format!("/edit-post/{id}"),
            Self::Category(id) => format!("/category/{id}"),
            Self::Brand(id) => format!("/brand/{id}"),
            Self::Model(id) => format!("/model/{id}"),
            Self::Generation(id) => format!("/generation/{id}"),
            Self::Admin => "/admin".to_string(),
            Self::AdminCategories => "/admin/categories".to_string(),
            Self::AdminBrands => "/admin/brands".to_string(),
            Self::AdminModels => "/admin/models".to_string(),
            Self::AdminGenerations => "/admin/generations".to_string(),
        }
    }

    /// Resolve a path to a route, if it names one.
    #[must_use]
    pub fn parse(path: &str) -> Option<Self> {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match segments.as_slice() {
            [""] => Some(Self::Home),
            ["login"] => Some(Self::Login),
            ["register"] => Some(Self::Register),
            ["profile"] => Some(Self::Profile),
            ["create-post"] => Some(Self::CreatePost),
            ["post", id] => id.parse().ok().map(Self::Post),
            ["edit-post", id] => id.parse().ok().map(Self::EditPost),
            ["category", id] => id.parse().ok().map(Self::Category),
            ["brand", id] => id.parse().ok().map(Self::Brand),
            ["model", id] => id.parse().ok().map(Self::Model),
            ["generation", id] => id.parse().ok().map(Self::Generation),
            ["admin"] => Some(Self::Admin),
            ["admin", "categories"] => Some(Self::AdminCategories),
            ["admin", "brands"] => Some(Self::AdminBrands),
            ["admin", "models"] => Some(Self::AdminModels),
            ["admin", "generations"] => Some(Self::AdminGenerations),
            // Catch-all: any other admin path lands on the dashboard.
            ["admin", ..] => Some(Self::Admin),
            _ => None,
        }
    }

    fn access(&self) -> Access {
        match self {
            Self::Profile | Self::CreatePost | Self::EditPost(_) => Access::Authenticated,
            Self::Admin
            | Self::AdminCategories
            | Self::AdminBrands
            | Self::AdminModels
            | Self::AdminGenerations => Access::AdminOnly,
            _ => Access::Public,
        }
    }
}

/// Outcome of guarding a navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    /// Unauthenticated visitor on a protected route; `from` preserves the
    /// intended destination for the post-login return.
    RedirectToLogin { from: String },
    /// Authenticated non-admin on an admin-only route.
    RedirectToHome,
}

/// Decide whether the current session may enter a route.
#[must_use]
pub fn guard(route: &Route, auth: &AuthState) -> RouteDecision {
    match route.access() {
        Access::Public => RouteDecision::Allow,
        Access::Authenticated => {
            if auth.is_authenticated() {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToLogin { from: route.path() }
            }
        }
        Access::AdminOnly => {
            if !auth.is_authenticated() {
                RouteDecision::RedirectToLogin { from: route.path() }
            } else if auth.is_admin() {
                RouteDecision::Allow
            } else {
                RouteDecision::RedirectToHome
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::store::AuthStatus;
    use chrono::Utc;

    fn user(role: Role) -> User {
        User {
            id: 1,
            username: "jan".to_string(),
            email: "jan@example.com".to_string(),
            role,
            is_active: true,
            bio: None,
            location: None,
            created_at: Utc::now(),
        }
    }

    fn auth_state(user: Option<User>, status: AuthStatus) -> AuthState {
        AuthState {
            token: user.as_ref().map(|_| "token".to_string()),
            user,
            status,
            loading: false,
            error: None,
        }
    }

    #[test]
    fn test_path_parse_roundtrip() {
        let routes = [
            Route::Home,
            Route::Login,
            Route::Register,
            Route::Profile,
            Route::Post(42),
            Route::CreatePost,
            Route::EditPost(7),
            Route::Category(3),
            Route::Brand(5),
            Route::Model(9),
            Route::Generation(11),
            Route::Admin,
            Route::AdminCategories,
            Route::AdminBrands,
            Route::AdminModels,
            Route::AdminGenerations,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/nonsense"), None);
        assert_eq!(Route::parse("/post/not-a-number"), None);
    }

    #[test]
    fn test_unknown_admin_path_lands_on_dashboard() {
        assert_eq!(Route::parse("/admin/whatever"), Some(Route::Admin));
    }

    #[test]
    fn test_guard_redirects_anonymous_to_login_with_origin() {
        let auth = auth_state(None, AuthStatus::Anonymous);
        assert_eq!(
            guard(&Route::CreatePost, &auth),
            RouteDecision::RedirectToLogin {
                from: "/create-post".to_string()
            }
        );
        assert_eq!(
            guard(&Route::AdminBrands, &auth),
            RouteDecision::RedirectToLogin {
                from: "/admin/brands".to_string()
            }
        );
    }

    #[test]
    fn test_guard_redirects_non_admin_home() {
        let auth = auth_state(Some(user(Role::User)), AuthStatus::Authenticated);
        assert_eq!(guard(&Route::Admin, &auth), RouteDecision::RedirectToHome);
        // Moderators are not admins either.
        let auth = auth_state(Some(user(Role::Moderator)), AuthStatus::Authenticated);
        assert_eq!(guard(&Route::Admin, &auth), RouteDecision::RedirectToHome);
    }

    #[test]
    fn test_guard_allows_admin_and_public() {
        let admin = auth_state(Some(user(Role::Admin)), AuthStatus::Authenticated);
        assert_eq!(guard(&Route::AdminModels, &admin), RouteDecision::Allow);

        let anonymous = auth_state(None, AuthStatus::Anonymous);
        assert_eq!(guard(&Route::Post(1), &anonymous), RouteDecision::Allow);
        assert_eq!(guard(&Route::Home, &anonymous), RouteDecision::Allow);
    }

    #[test]
    fn test_guard_allows_authenticated_user_on_protected_routes() {
        let auth = auth_state(Some(user(Role::User)), AuthStatus::Authenticated);
        assert_eq!(guard(&Route::Profile, &auth), RouteDecision::Allow);
        assert_eq!(guard(&Route::EditPost(3), &auth), RouteDecision::Allow);
    }
}
