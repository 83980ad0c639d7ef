//! View-facing adapters over the stores.
//!
//! Presentation code borrows a handle, reads the state it renders, and calls
//! the bound actions; the handles add nothing beyond delegation and the role
//! shortcut in [`AuthHandle::check_role`].

use newsdesk_shared::{Article, ArticleDraft, AuthPayload, Category, Pagination, User};

use crate::{
    error::ApiError,
    stores::{ArticleFilters, ArticleStore, AuthStore, FilterPatch, QueryParams},
    utils::validation::RegisterForm,
};

/// Borrowed view over an [`ArticleStore`].
pub struct ArticlesHandle<'a> {
    store: &'a mut ArticleStore,
}

/// Borrow `store` for the duration of a view.
pub fn use_articles(store: &mut ArticleStore) -> ArticlesHandle<'_> {
    ArticlesHandle {
        store,
    }
}

impl ArticlesHandle<'_> {
    /// Loaded page of articles.
    pub fn articles(&self) -> &[Article] {
        &self.store.state().articles
    }

    /// Featured strip.
    pub fn featured_articles(&self) -> &[Article] {
        &self.store.state().featured_articles
    }

    /// Known categories.
    pub fn categories(&self) -> &[Category] {
        &self.store.state().categories
    }

    /// Article opened by `fetch_article`.
    pub fn current_article(&self) -> Option<&Article> {
        self.store.state().current_article.as_ref()
    }

    /// Current page cursor.
    pub fn pagination(&self) -> Pagination {
        self.store.state().pagination
    }

    /// Active filters.
    pub fn filters(&self) -> &ArticleFilters {
        &self.store.state().filters
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.store.state().is_loading
    }

    /// Last error message.
    pub fn error(&self) -> Option<&str> {
        self.store.state().error.as_deref()
    }

    /// Whether another page can be requested.
    pub fn has_more_pages(&self) -> bool {
        self.store.has_more_pages()
    }

    /// See [`ArticleStore::fetch_articles`].
    pub async fn fetch_articles(&mut self, params: &QueryParams) -> Result<&[Article], ApiError> {
        self.store.fetch_articles(params).await
    }

    /// See [`ArticleStore::fetch_article`].
    pub async fn fetch_article(&mut self, id: &str) -> Result<&Article, ApiError> {
        self.store.fetch_article(id).await
    }

    /// See [`ArticleStore::create_article`].
    pub async fn create_article(&mut self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        self.store.create_article(draft).await
    }

    /// See [`ArticleStore::update_article`].
    pub async fn update_article(&mut self, id: &str, draft: &ArticleDraft) -> Result<Article, ApiError> {
        self.store.update_article(id, draft).await
    }

    /// See [`ArticleStore::delete_article`].
    pub async fn delete_article(&mut self, id: &str) -> Result<(), ApiError> {
        self.store.delete_article(id).await
    }

    /// See [`ArticleStore::publish_article`].
    pub async fn publish_article(&mut self, id: &str) -> Result<(), ApiError> {
        self.store.publish_article(id).await
    }

    /// See [`ArticleStore::set_filters`].
    pub async fn set_filters(&mut self, patch: FilterPatch) -> Result<&[Article], ApiError> {
        self.store.set_filters(patch).await
    }

    /// See [`ArticleStore::clear_filters`].
    pub async fn clear_filters(&mut self) -> Result<&[Article], ApiError> {
        self.store.clear_filters().await
    }

    /// See [`ArticleStore::set_page`].
    pub async fn set_page(&mut self, page: u32) -> Result<&[Article], ApiError> {
        self.store.set_page(page).await
    }

    /// See [`ArticleStore::fetch_categories`].
    pub async fn fetch_categories(&mut self) -> &[Category] {
        self.store.fetch_categories().await
    }

    /// See [`ArticleStore::fetch_featured_articles`].
    pub async fn fetch_featured_articles(&mut self) -> &[Article] {
        self.store.fetch_featured_articles().await
    }

    /// Drop the last error message.
    pub fn clear_error(&mut self) {
        self.store.clear_error();
    }
}

/// Borrowed view over an [`AuthStore`].
pub struct AuthHandle<'a> {
    store: &'a mut AuthStore,
}

/// Borrow `store` for the duration of a view.
pub fn use_auth(store: &mut AuthStore) -> AuthHandle<'_> {
    AuthHandle {
        store,
    }
}

impl AuthHandle<'_> {
    /// Cached profile of the signed-in user.
    pub fn user(&self) -> Option<User> {
        self.store.user()
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Last error message.
    pub fn error(&self) -> Option<&str> {
        self.store.error()
    }

    /// A token is held.
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Signed in with an editor role.
    pub fn is_editor(&self) -> bool {
        self.store.is_editor()
    }

    /// Signed in with an admin role.
    pub fn is_admin(&self) -> bool {
        self.store.is_admin()
    }

    /// See [`AuthStore::login`].
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.store.login(identifier, password).await
    }

    /// See [`AuthStore::register`].
    pub async fn register(&mut self, form: &RegisterForm) -> Result<AuthPayload, ApiError> {
        self.store.register(form).await
    }

    /// See [`AuthStore::logout`].
    pub fn logout(&mut self) {
        self.store.logout();
    }

    /// Same as [`Self::is_authenticated`].
    pub fn check_auth(&self) -> bool {
        self.store.is_authenticated()
    }

    /// `editor` and `admin` map to the store predicates; anything else is false.
    pub fn check_role(&self, role: &str) -> bool {
        match role {
            "editor" => self.store.is_editor(),
            "admin" => self.store.is_admin(),
            _ => false,
        }
    }

    /// See [`AuthStore::fetch_user`].
    pub async fn fetch_user(&mut self) -> Result<(), ApiError> {
        self.store.fetch_user().await
    }

    /// Drop the last error message.
    pub fn clear_error(&mut self) {
        self.store.clear_error();
    }
}
