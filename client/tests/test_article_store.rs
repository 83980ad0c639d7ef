//! Integration tests.

mod common;

#[cfg(test)]
mod tests {
    use newsdesk_client::{
        models::ArticleDraft,
        notify::Severity,
        stores::{ArticleStore, FilterPatch, QueryParams},
    };
    use serde_json::json;
    use wiremock::{
        matchers::{body_json, method, path, query_param},
        Mock, ResponseTemplate,
    };

    use crate::common::{article, harness, wrapped_article, Harness};

    fn store(h: &Harness) -> ArticleStore {
        ArticleStore::new(h.api.clone(), h.notifier())
    }

    fn list_body(items: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "data": items,
            "meta": { "pagination": { "page": 2, "pageSize": 3, "pageCount": 4, "total": 11 } }
        })
    }

    #[tokio::test]
    async fn list_query_merges_defaults_filters_and_overrides() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("pagination[page]", "2"))
            .and(query_param("pagination[pageSize]", "3"))
            .and(query_param("sort", "views:desc"))
            .and(query_param("populate", "*"))
            .and(query_param("filters[$or][0][title][$containsi]", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(list_body(vec![
                article("a", "First"),
                wrapped_article(7, "Second", false),
            ])))
            .expect(1)
            .mount(&h.server)
            .await;
        let mut store = store(&h);
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("pagination[page]", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&h.server)
            .await;
        store
            .set_filters(FilterPatch {
                search: Some("rust".to_string()),
                ..FilterPatch::default()
            })
            .await
            .expect("filtered fetch");

        let overrides = QueryParams::from([
            ("pagination[page]".to_string(), "2".to_string()),
            ("pagination[pageSize]".to_string(), "3".to_string()),
            ("sort".to_string(), "views:desc".to_string()),
        ]);
        let articles = store.fetch_articles(&overrides).await.expect("fetch");
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[1].document_id, "7");
        assert_eq!(articles[1].category.as_ref().map(|c| c.slug.as_str()), Some("news"));

        let pagination = store.state().pagination;
        assert_eq!((pagination.page, pagination.page_count, pagination.total), (2, 4, 11));
        assert!(store.has_more_pages());
        assert!(!store.state().is_loading);
    }

    #[tokio::test]
    async fn missing_meta_yields_single_local_page() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [article("a", "One"), article("b", "Two")]
            })))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("fetch");
        let pagination = store.state().pagination;
        assert_eq!(pagination.page, 1);
        assert_eq!(pagination.page_size, 12);
        assert_eq!(pagination.page_count, 1);
        assert_eq!(pagination.total, 2);
        assert!(!store.has_more_pages());
    }

    #[tokio::test]
    async fn failed_list_keeps_previous_articles_and_records_error() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [article("a", "One")] })))
            .up_to_n_times(1)
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("first fetch");
        let err = store.fetch_articles(&QueryParams::new()).await.expect_err("second fetch");
        assert_eq!(err.status(), Some(500));
        assert_eq!(store.state().articles.len(), 1);
        assert_eq!(store.state().error.as_deref(), Some("Server error. Please try again later."));
        assert!(!store.state().is_loading);
    }

    #[tokio::test]
    async fn created_article_appears_once_at_the_head() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [article("old", "Old"), article("new", "Stale copy")]
            })))
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .and(body_json(json!({ "data": { "title": "Fresh" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("new", "Fresh") })))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("fetch");
        let draft = ArticleDraft {
            title: Some("Fresh".to_string()),
            ..ArticleDraft::default()
        };
        let created = store.create_article(&draft).await.expect("create");
        assert_eq!(created.title, "Fresh");

        let ids: Vec<&str> = store.state().articles.iter().map(|a| a.document_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "old"]);
        let notes = h.notifier.notifications();
        assert_eq!(notes.last().map(|n| n.severity), Some(Severity::Success));
        assert_eq!(notes.last().map(|n| n.title.as_str()), Some("Article created"));
    }

    #[tokio::test]
    async fn failed_create_notifies_and_leaves_list_untouched() {
        let h = harness().await;
        Mock::given(method("POST"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "title must be unique" }
            })))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.create_article(&ArticleDraft::default()).await.expect_err("create");
        assert!(store.state().articles.is_empty());
        assert_eq!(store.state().error.as_deref(), Some("title must be unique"));
        let notes = h.notifier.take();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].severity, Severity::Error);
        assert_eq!(notes[0].message, "Could not create the article");
    }

    #[tokio::test]
    async fn fetch_article_sets_current_and_counts_a_view() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/doc-9"))
            .and(query_param("populate", "coverImage,category,author,tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("doc-9", "Nine") })))
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles/doc-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "views": 2 } })))
            .mount(&h.server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/doc-9"))
            .and(body_json(json!({ "data": { "views": 3 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        let current = store.fetch_article("doc-9").await.expect("fetch article");
        assert_eq!(current.title, "Nine");
        assert_eq!(store.state().current_article.as_ref().map(|a| a.document_id.as_str()), Some("doc-9"));
    }

    #[tokio::test]
    async fn view_counter_failure_does_not_fail_the_fetch() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles/doc-1"))
            .and(query_param("populate", "coverImage,category,author,tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("doc-1", "One") })))
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles/doc-1"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_article("doc-1").await.expect("fetch succeeds anyway");
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn update_replaces_listed_and_current_copies() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [article("a", "Before")] })))
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("a", "Before") })))
            .mount(&h.server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/a"))
            .and(body_json(json!({ "data": { "title": "After" } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("a", "After") })))
            .expect(1)
            .mount(&h.server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/a"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("fetch");
        store.fetch_article("a").await.expect("fetch one");
        let draft = ArticleDraft {
            title: Some("After".to_string()),
            ..ArticleDraft::default()
        };
        store.update_article("a", &draft).await.expect("update");

        assert_eq!(store.state().articles[0].title, "After");
        assert_eq!(store.state().current_article.as_ref().map(|a| a.title.as_str()), Some("After"));
        assert_eq!(h.notifier.notifications().last().map(|n| n.title.as_str()), Some("Saved"));
    }

    #[tokio::test]
    async fn delete_drops_article_from_list_and_current() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [article("a", "Keep"), article("b", "Drop")]
            })))
            .mount(&h.server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/articles/b"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": article("b", "Drop") })))
            .mount(&h.server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/articles/b"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&h.server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/articles/b"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("fetch");
        store.fetch_article("b").await.expect("fetch one");
        store.delete_article("b").await.expect("delete");

        let ids: Vec<&str> = store.state().articles.iter().map(|a| a.document_id.as_str()).collect();
        assert_eq!(ids, vec!["a"]);
        assert!(store.state().current_article.is_none());
        assert_eq!(h.notifier.notifications().last().map(|n| n.title.as_str()), Some("Deleted"));
    }

    #[tokio::test]
    async fn publish_stamps_the_listed_copy() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [article("a", "Draft")] })))
            .mount(&h.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/articles/a/publish"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store.fetch_articles(&QueryParams::new()).await.expect("fetch");
        assert!(store.state().articles[0].is_draft());
        store.publish_article("a").await.expect("publish");
        assert!(!store.state().articles[0].is_draft());
    }

    #[tokio::test]
    async fn featured_falls_back_to_client_side_filter() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("filters[isFeatured][$eq]", "true"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&h.server)
            .await;
        let items: Vec<_> = (1..=8).map(|id| wrapped_article(id, &format!("Story {id}"), id != 4)).collect();
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .and(query_param("pagination[pageSize]", "20"))
            .and(query_param("sort", "publishedAt:desc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": items })))
            .expect(1)
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        let featured = store.fetch_featured_articles().await;
        let ids: Vec<&str> = featured.iter().map(|a| a.document_id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "5", "6"]);
    }

    #[tokio::test]
    async fn featured_is_empty_when_both_sources_fail() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        assert!(store.fetch_featured_articles().await.is_empty());
        assert!(store.state().error.is_none());
    }

    #[tokio::test]
    async fn clear_filters_resets_state_and_refetches() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/articles"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        store
            .set_filters(FilterPatch {
                category: Some(Some("tech".to_string())),
                tag: Some("wasm".to_string()),
                ..FilterPatch::default()
            })
            .await
            .expect("filter");
        store.set_page(3).await.expect("page");
        assert_eq!(store.active_filters_count(), 2);

        store.clear_filters().await.expect("clear");
        assert_eq!(store.active_filters_count(), 0);
        assert_eq!(store.state().pagination.page, 1);
        let notes = h.notifier.notifications();
        assert_eq!(notes.last().map(|n| (n.severity, n.title.as_str())), Some((Severity::Info, "Filters reset")));

        let requests = h.server.received_requests().await.expect("recording enabled");
        let last = requests.last().expect("refetch issued");
        assert!(!last.url.query_pairs().any(|(k, _)| k.starts_with("filters")));
    }

    #[tokio::test]
    async fn missing_categories_collection_has_specific_message() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        assert!(store.fetch_categories().await.is_empty());
        assert_eq!(store.state().error.as_deref(), Some("Categories collection not found"));
    }

    #[tokio::test]
    async fn categories_decode_both_schema_shapes() {
        let h = harness().await;
        Mock::given(method("GET"))
            .and(path("/api/categories"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [
                    { "id": 1, "documentId": "c1", "name": "Tech", "slug": "tech" },
                    { "id": 2, "attributes": { "name": "World", "slug": "world" } }
                ]
            })))
            .mount(&h.server)
            .await;

        let mut store = store(&h);
        let categories = store.fetch_categories().await;
        let slugs: Vec<&str> = categories.iter().map(|c| c.slug.as_str()).collect();
        assert_eq!(slugs, vec!["tech", "world"]);
        assert_eq!(categories[1].document_id, "2");
    }
}
