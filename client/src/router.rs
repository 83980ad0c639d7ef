//! Route table and the global navigation guard.

use std::sync::Arc;

use crate::{
    navigator::{Navigator, HOME_PATH, LOGIN_PATH},
    notify::{Notifier, Severity},
    stores::AuthStore,
};

/// Suffix of every page title.
pub const SITE_TITLE: &str = "Newsdesk";

// Upper bound on guard re-runs when a redirect target redirects again.
const MAX_REDIRECTS: usize = 3;

/// Page the client can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/article/:id`
    Article {
        /// Article document id.
        id: String,
    },
    /// `/login`
    Login,
    /// `/register`
    Register,
    /// `/editor`
    EditorCreate,
    /// `/editor/:id`
    EditorEdit {
        /// Document id of the article being edited.
        id: String,
    },
    /// `/profile`
    Profile,
    /// `/categories`
    Categories,
    /// `/search`
    Search,
    /// `/about`
    About,
    /// `/contact`
    Contact,
    /// Anything else.
    NotFound {
        /// Location as requested.
        path: String,
    },
}

/// Access rules and title of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    /// Page title without the site suffix.
    pub title: &'static str,
    /// Only signed-in users may enter.
    pub requires_auth: bool,
    /// Only editors may enter.
    pub requires_editor: bool,
    /// Signed-in users are sent home.
    pub guest_only: bool,
}

impl RouteMeta {
    const fn public(title: &'static str) -> Self {
        Self {
            title,
            requires_auth: false,
            requires_editor: false,
            guest_only: false,
        }
    }

    const fn guest(title: &'static str) -> Self {
        Self {
            guest_only: true,
            ..Self::public(title)
        }
    }

    const fn member(title: &'static str) -> Self {
        Self {
            requires_auth: true,
            ..Self::public(title)
        }
    }

    const fn editor(title: &'static str) -> Self {
        Self {
            requires_auth: true,
            requires_editor: true,
            ..Self::public(title)
        }
    }
}

impl Route {
    /// Match a location (query string and fragment ignored) against the table.
    pub fn recognize(location: &str) -> Self {
        let path = location.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["article", id] => Self::Article {
                id: (*id).to_string(),
            },
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["editor"] => Self::EditorCreate,
            ["editor", id] => Self::EditorEdit {
                id: (*id).to_string(),
            },
            ["profile"] => Self::Profile,
            ["categories"] => Self::Categories,
            ["search"] => Self::Search,
            ["about"] => Self::About,
            ["contact"] => Self::Contact,
            _ => Self::NotFound {
                path: path.to_string(),
            },
        }
    }

    /// Stable route name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Article {
                ..
            } => "article",
            Self::Login => "login",
            Self::Register => "register",
            Self::EditorCreate => "editor-create",
            Self::EditorEdit {
                ..
            } => "editor-edit",
            Self::Profile => "profile",
            Self::Categories => "categories",
            Self::Search => "search",
            Self::About => "about",
            Self::Contact => "contact",
            Self::NotFound {
                ..
            } => "not-found",
        }
    }

    /// Canonical path.
    pub fn path(&self) -> String {
        match self {
            Self::Home => HOME_PATH.to_string(),
            Self::Article {
                id,
            } => format!("/article/{id}"),
            Self::Login => LOGIN_PATH.to_string(),
            Self::Register => "/register".to_string(),
            Self::EditorCreate => "/editor".to_string(),
            Self::EditorEdit {
                id,
            } => format!("/editor/{id}"),
            Self::Profile => "/profile".to_string(),
            Self::Categories => "/categories".to_string(),
            Self::Search => "/search".to_string(),
            Self::About => "/about".to_string(),
            Self::Contact => "/contact".to_string(),
            Self::NotFound {
                path,
            } => path.clone(),
        }
    }

    /// Access rules and title.
    pub fn meta(&self) -> RouteMeta {
        match self {
            Self::Home => RouteMeta::public("Home"),
            Self::Article {
                ..
            } => RouteMeta::public("Article"),
            Self::Login => RouteMeta::guest("Sign in"),
            Self::Register => RouteMeta::guest("Sign up"),
            Self::EditorCreate => RouteMeta::editor("New article"),
            Self::EditorEdit {
                ..
            } => RouteMeta::editor("Edit article"),
            Self::Profile => RouteMeta::member("Profile"),
            Self::Categories => RouteMeta::editor("Categories"),
            Self::Search => RouteMeta::public("Search"),
            Self::About => RouteMeta::public("About"),
            Self::Contact => RouteMeta::public("Contact"),
            Self::NotFound {
                ..
            } => RouteMeta::public("Page not found"),
        }
    }

    /// Full page title, e.g. `Home | Newsdesk`.
    pub fn page_title(&self) -> String {
        format!("{} | {SITE_TITLE}", self.meta().title)
    }
}

/// Decision of [`before_each`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Let the navigation through.
    Proceed,
    /// Go to this path instead.
    Redirect(String),
}

/// Global before-navigation guard.
///
/// A persisted token without a loaded profile triggers a profile lookup; a
/// failed lookup clears the session without navigating, and the guard
/// continues signed out. Then
/// the gates run in order, stopping at the first violation: auth-required
/// routes send visitors to `/login`, editor routes send non-editors home
/// (with an error notification), guest-only routes send signed-in users home.
pub async fn before_each(
    auth: &mut AuthStore,
    notifier: Option<&dyn Notifier>,
    to: &Route,
) -> GuardOutcome {
    if auth.user().is_none() && auth.session().stored_token().is_some() {
        // A failed lookup has already cleared the session.
        let _ = auth.restore_profile().await;
    }

    let meta = to.meta();
    if meta.requires_auth && !auth.is_authenticated() {
        return GuardOutcome::Redirect(LOGIN_PATH.to_string());
    }
    if meta.requires_editor && !auth.is_editor() {
        if let Some(notifier) = notifier {
            notifier.notify(Severity::Error, "Access denied", "Editor rights are required");
        }
        return GuardOutcome::Redirect(HOME_PATH.to_string());
    }
    if meta.guest_only && auth.is_authenticated() {
        return GuardOutcome::Redirect(HOME_PATH.to_string());
    }
    GuardOutcome::Proceed
}

/// Where a navigation ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Route finally entered.
    pub route: Route,
    /// Page title of that route.
    pub title: String,
    /// Whether the guard changed the destination.
    pub redirected: bool,
}

/// Resolves locations, runs the guard and drives the [`Navigator`].
pub struct Router {
    navigator: Arc<dyn Navigator>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Router {
    /// Router over `navigator`; access denials go to `notifier` when present.
    pub fn new(navigator: Arc<dyn Navigator>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            navigator,
            notifier,
        }
    }

    /// Resolve `location`, run the guard (following redirects) and navigate.
    pub async fn push(&self, auth: &mut AuthStore, location: &str) -> Navigation {
        let mut route = Route::recognize(location);
        let mut redirected = false;

        for _ in 0..MAX_REDIRECTS {
            match before_each(auth, self.notifier.as_deref(), &route).await {
                GuardOutcome::Proceed => break,
                GuardOutcome::Redirect(target) => {
                    tracing::debug!("guard redirected {} -> {target}", route.path());
                    route = Route::recognize(&target);
                    redirected = true;
                },
            }
        }

        self.navigator.navigate(&route.path());
        Navigation {
            title: route.page_title(),
            route,
            redirected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Route;

    #[test]
    fn recognizes_the_route_table() {
        assert_eq!(Route::recognize("/"), Route::Home);
        assert_eq!(Route::recognize(""), Route::Home);
        assert_eq!(
            Route::recognize("/article/abc?ref=home"),
            Route::Article {
                id: "abc".to_string()
            }
        );
        assert_eq!(Route::recognize("/editor/"), Route::EditorCreate);
        assert_eq!(
            Route::recognize("/editor/42#top"),
            Route::EditorEdit {
                id: "42".to_string()
            }
        );
        assert_eq!(Route::recognize("/login"), Route::Login);
        assert!(matches!(Route::recognize("/nope/deeper"), Route::NotFound { .. }));
    }

    #[test]
    fn route_meta_matches_access_rules() {
        assert!(Route::Login.meta().guest_only);
        assert!(Route::Register.meta().guest_only);
        assert!(Route::Profile.meta().requires_auth);
        assert!(!Route::Profile.meta().requires_editor);
        assert!(Route::Categories.meta().requires_editor);
        assert!(Route::EditorCreate.meta().requires_auth);
        assert!(!Route::Search.meta().requires_auth);
    }

    #[test]
    fn paths_round_trip_and_titles_carry_site_name() {
        let route = Route::EditorEdit {
            id: "doc-1".to_string(),
        };
        assert_eq!(Route::recognize(&route.path()), route);
        assert_eq!(Route::About.page_title(), "About | Newsdesk");
        assert_eq!(Route::About.name(), "about");
    }
}
