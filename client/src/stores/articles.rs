//! Article state container.
//!
//! Holds the client-side copy of fetched articles, categories and the page
//! cursor, plus the active filter set that is re-sent on every list fetch.
//! Each action calls the API, folds the normalized response into local state
//! and, for user-initiated mutations, emits a notification.

use std::{collections::BTreeMap, sync::Arc};

use chrono::Utc;
use newsdesk_shared::{
    normalize::{decode_envelope, decode_list},
    Article, ArticleDraft, Category, Pagination, DEFAULT_SORT,
};
use serde::Serialize;

use crate::{
    api::ApiClient,
    error::ApiError,
    notify::{Notifier, Severity},
};

/// Page size of article listings.
pub const DEFAULT_PAGE_SIZE: u32 = 12;
/// Maximum size of the featured strip.
pub const FEATURED_LIMIT: usize = 5;
const FEATURED_FALLBACK_PAGE_SIZE: u32 = 20;

/// Query string parameters, keyed by their bracketed API names.
pub type QueryParams = BTreeMap<String, String>;

/// Filter set re-sent with every list fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleFilters {
    /// Category slug.
    pub category: Option<String>,
    /// Only featured articles.
    pub is_featured: bool,
    /// Sort expression, e.g. `publishedAt:desc`.
    pub sort: String,
    /// Case-insensitive text matched against title, content and excerpt.
    pub search: String,
    /// Tag name.
    pub tag: String,
}

impl Default for ArticleFilters {
    fn default() -> Self {
        Self {
            category: None,
            is_featured: false,
            sort: DEFAULT_SORT.to_string(),
            search: String::new(),
            tag: String::new(),
        }
    }
}

impl ArticleFilters {
    /// Translate the filter set into API filter predicates.
    pub fn to_query(&self) -> QueryParams {
        let mut query = QueryParams::new();
        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            query.insert("filters[category][slug][$eq]".to_string(), category.to_string());
        }
        if self.is_featured {
            query.insert("filters[isFeatured][$eq]".to_string(), "true".to_string());
        }
        if !self.search.is_empty() {
            for (index, field) in ["title", "content", "excerpt"].iter().enumerate() {
                query.insert(format!("filters[$or][{index}][{field}][$containsi]"), self.search.clone());
            }
        }
        if !self.tag.is_empty() {
            query.insert("filters[tags][$containsi]".to_string(), self.tag.clone());
        }
        query
    }

    /// Number of filters that differ from their defaults.
    pub fn active_count(&self) -> usize {
        [
            self.category.as_deref().is_some_and(|c| !c.is_empty()),
            self.is_featured,
            !self.search.is_empty(),
            !self.tag.is_empty(),
            self.sort != DEFAULT_SORT,
        ]
        .into_iter()
        .filter(|active| *active)
        .count()
    }

    fn apply(&mut self, patch: FilterPatch) {
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(is_featured) = patch.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(sort) = patch.sort {
            self.sort = sort;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(tag) = patch.tag {
            self.tag = tag;
        }
    }
}

/// Partial filter update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    /// `Some(None)` clears the category.
    pub category: Option<Option<String>>,
    /// New featured flag.
    pub is_featured: Option<bool>,
    /// New sort expression.
    pub sort: Option<String>,
    /// New search text.
    pub search: Option<String>,
    /// New tag.
    pub tag: Option<String>,
}

/// Everything the article views render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArticlesState {
    /// Current page of the listing.
    pub articles: Vec<Article>,
    /// Featured strip.
    pub featured_articles: Vec<Article>,
    /// Known categories.
    pub categories: Vec<Category>,
    /// Article opened by [`ArticleStore::fetch_article`].
    pub current_article: Option<Article>,
    /// Page cursor.
    pub pagination: Pagination,
    /// Active filters.
    pub filters: ArticleFilters,
    /// True while a request is in flight.
    pub is_loading: bool,
    /// Last error message.
    pub error: Option<String>,
}

impl Default for ArticlesState {
    fn default() -> Self {
        Self {
            articles: Vec::new(),
            featured_articles: Vec::new(),
            categories: Vec::new(),
            current_article: None,
            pagination: Pagination {
                page: 1,
                page_size: DEFAULT_PAGE_SIZE,
                page_count: 0,
                total: 0,
            },
            filters: ArticleFilters::default(),
            is_loading: false,
            error: None,
        }
    }
}

/// Client-side copy of articles and categories, kept in step with the API.
pub struct ArticleStore {
    api: ApiClient,
    notifier: Option<Arc<dyn Notifier>>,
    state: ArticlesState,
}

impl ArticleStore {
    /// Empty store over `api`; mutations report to `notifier` when present.
    pub fn new(api: ApiClient, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self {
            api,
            notifier,
            state: ArticlesState::default(),
        }
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &ArticlesState {
        &self.state
    }

    /// Whether the cursor is before the last page.
    pub fn has_more_pages(&self) -> bool {
        self.state.pagination.page < self.state.pagination.page_count
    }

    /// See [`ArticleFilters::active_count`].
    pub fn active_filters_count(&self) -> usize {
        self.state.filters.active_count()
    }

    /// Effective list query: defaults, then active filters, then `overrides`.
    pub fn build_query(&self, overrides: &QueryParams) -> QueryParams {
        let mut query = QueryParams::from([
            ("pagination[page]".to_string(), self.state.pagination.page.to_string()),
            ("pagination[pageSize]".to_string(), self.state.pagination.page_size.to_string()),
            ("sort".to_string(), self.state.filters.sort.clone()),
            ("populate".to_string(), "*".to_string()),
        ]);
        query.extend(self.state.filters.to_query());
        query.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        query
    }

    /// Fetch the current page with the active filters.
    ///
    /// On failure the previous list is kept and `error` is set.
    pub async fn fetch_articles(&mut self, overrides: &QueryParams) -> Result<&[Article], ApiError> {
        self.begin();
        let query = self.build_query(overrides);
        let result = self.load_list(&query).await;
        self.state.is_loading = false;

        match result {
            Ok((articles, pagination)) => {
                let page_size = self.state.pagination.page_size;
                self.state.pagination =
                    pagination.unwrap_or_else(|| Pagination::local(page_size, articles.len()));
                self.state.articles = articles;
                Ok(self.state.articles.as_slice())
            },
            Err(err) => {
                tracing::error!("fetch articles failed: {err}");
                self.state.error = Some(err.user_message());
                Err(err)
            },
        }
    }

    /// Fill the featured list, degrading to a client-side filter when the
    /// dedicated listing is unavailable. Never fails; a double failure
    /// leaves the list empty.
    pub async fn fetch_featured_articles(&mut self) -> &[Article] {
        let featured = match self.load_featured().await {
            Ok(articles) => articles,
            Err(err) => {
                tracing::warn!("featured articles unavailable, using fallback: {err}");
                match self.load_featured_fallback().await {
                    Ok(articles) => articles,
                    Err(err) => {
                        tracing::error!("featured fallback also failed: {err}");
                        Vec::new()
                    },
                }
            },
        };
        self.state.featured_articles = featured;
        self.state.featured_articles.as_slice()
    }

    /// Load categories; failures are recorded in `error`, never returned.
    pub async fn fetch_categories(&mut self) -> &[Category] {
        let result = match self.api.categories().list().await {
            Ok(response) => decode_list::<Category>(response.body).map_err(ApiError::from),
            Err(err) => Err(err),
        };
        match result {
            Ok((categories, _)) => self.state.categories = categories,
            Err(err) => {
                tracing::error!("failed to fetch categories: {err}");
                self.state.error = Some(if err.status() == Some(404) {
                    "Categories collection not found".to_string()
                } else {
                    "Failed to load categories".to_string()
                });
                self.state.categories = Vec::new();
            },
        }
        self.state.categories.as_slice()
    }

    /// Load one article as the current article, then count a view.
    pub async fn fetch_article(&mut self, document_id: &str) -> Result<&Article, ApiError> {
        self.begin();
        let result = self.load_article(document_id).await;

        match result {
            Ok(article) => {
                self.api.articles().increment_views(document_id).await;
                self.state.is_loading = false;
                let current: &Article = self.state.current_article.insert(article);
                Ok(current)
            },
            Err(err) => {
                self.state.is_loading = false;
                tracing::error!("fetch article {document_id} failed: {err}");
                self.state.error = Some(err.user_message());
                Err(err)
            },
        }
    }

    /// Create an article and put it at the head of the list.
    pub async fn create_article(&mut self, draft: &ArticleDraft) -> Result<Article, ApiError> {
        self.begin();
        let result = match self.api.articles().create(draft).await {
            Ok(response) => decode_envelope::<Article>(response.body)
                .map(|envelope| envelope.data)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        self.state.is_loading = false;

        match result {
            Ok(article) => {
                self.state.articles.retain(|a| a.document_id != article.document_id);
                self.state.articles.insert(0, article.clone());
                self.notify(Severity::Success, "Article created", "The article was created successfully");
                Ok(article)
            },
            Err(err) => Err(self.fail("create article", err, "Could not create the article")),
        }
    }

    /// Save changes and refresh both the listed and the current copy.
    pub async fn update_article(
        &mut self,
        document_id: &str,
        draft: &ArticleDraft,
    ) -> Result<Article, ApiError> {
        self.begin();
        let result = match self.api.articles().update(document_id, draft).await {
            Ok(response) => decode_envelope::<Article>(response.body)
                .map(|envelope| envelope.data)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        self.state.is_loading = false;

        match result {
            Ok(article) => {
                if let Some(slot) =
                    self.state.articles.iter_mut().find(|a| a.document_id == document_id)
                {
                    *slot = article.clone();
                }
                if let Some(current) = self
                    .state
                    .current_article
                    .as_mut()
                    .filter(|current| current.document_id == document_id)
                {
                    *current = article.clone();
                }
                self.notify(Severity::Success, "Saved", "Changes saved successfully");
                Ok(article)
            },
            Err(err) => Err(self.fail("update article", err, "Could not save changes")),
        }
    }

    /// Delete an article from the API and from local state.
    pub async fn delete_article(&mut self, document_id: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.articles().delete(document_id).await;
        self.state.is_loading = false;

        match result {
            Ok(_) => {
                self.state.articles.retain(|a| a.document_id != document_id);
                if self
                    .state
                    .current_article
                    .as_ref()
                    .is_some_and(|current| current.document_id == document_id)
                {
                    self.state.current_article = None;
                }
                self.notify(Severity::Success, "Deleted", "Article deleted successfully");
                Ok(())
            },
            Err(err) => Err(self.fail("delete article", err, "Could not delete the article")),
        }
    }

    /// Publish remotely and stamp the listed copy with the local time.
    pub async fn publish_article(&mut self, document_id: &str) -> Result<(), ApiError> {
        self.begin();
        let result = self.api.articles().publish(document_id).await;
        self.state.is_loading = false;

        match result {
            Ok(_) => {
                if let Some(article) =
                    self.state.articles.iter_mut().find(|a| a.document_id == document_id)
                {
                    article.published_at = Some(Utc::now());
                }
                self.notify(Severity::Success, "Published", "Article published successfully");
                Ok(())
            },
            Err(err) => Err(self.fail("publish article", err, "Could not publish the article")),
        }
    }

    /// Move the cursor to `page` (at least 1) and refetch.
    pub async fn set_page(&mut self, page: u32) -> Result<&[Article], ApiError> {
        self.state.pagination.page = page.max(1);
        self.fetch_articles(&QueryParams::new()).await
    }

    /// Apply `patch`, return to page 1 and refetch.
    pub async fn set_filters(&mut self, patch: FilterPatch) -> Result<&[Article], ApiError> {
        self.state.filters.apply(patch);
        self.state.pagination.page = 1;
        self.fetch_articles(&QueryParams::new()).await
    }

    /// Reset every filter and the page cursor, then refetch.
    pub async fn clear_filters(&mut self) -> Result<&[Article], ApiError> {
        self.state.filters = ArticleFilters::default();
        self.state.pagination.page = 1;
        self.notify(Severity::Info, "Filters reset", "All filters have been cleared");
        self.fetch_articles(&QueryParams::new()).await
    }

    /// Drop the last error message.
    pub fn clear_error(&mut self) {
        self.state.error = None;
    }

    fn begin(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
    }

    fn fail(&mut self, action: &str, err: ApiError, toast: &str) -> ApiError {
        tracing::error!("{action} failed: {err}");
        self.state.error = Some(err.user_message());
        self.notify(Severity::Error, "Error", toast);
        err
    }

    fn notify(&self, severity: Severity, title: &str, message: &str) {
        if let Some(notifier) = &self.notifier {
            notifier.notify(severity, title, message);
        }
    }

    async fn load_list(
        &self,
        query: &QueryParams,
    ) -> Result<(Vec<Article>, Option<Pagination>), ApiError> {
        let response = self.api.articles().list(query).await?;
        Ok(decode_list::<Article>(response.body)?)
    }

    async fn load_article(&self, document_id: &str) -> Result<Article, ApiError> {
        let response = self.api.articles().get(document_id).await?;
        Ok(decode_envelope::<Article>(response.body)?.data)
    }

    async fn load_featured(&self) -> Result<Vec<Article>, ApiError> {
        let response = self.api.articles().featured().await?;
        Ok(decode_list::<Article>(response.body)?.0)
    }

    async fn load_featured_fallback(&self) -> Result<Vec<Article>, ApiError> {
        let query = QueryParams::from([
            ("pagination[pageSize]".to_string(), FEATURED_FALLBACK_PAGE_SIZE.to_string()),
            ("sort".to_string(), DEFAULT_SORT.to_string()),
        ]);
        let articles = self.load_list(&query).await?.0;
        Ok(articles.into_iter().filter(|a| a.is_featured).take(FEATURED_LIMIT).collect())
    }
}
