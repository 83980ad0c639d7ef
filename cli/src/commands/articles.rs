//! Article listing, lookup and editing.

use anyhow::Result;
use newsdesk_client::{
    stores::{ArticleFilters, ArticleStore},
    utils::{
        helpers::generate_slug,
        validation::{validate_article_form, ArticleForm},
    },
};
use newsdesk_shared::{Article, ArticleDraft, Pagination, DEFAULT_SORT};
use serde::Serialize;
use serde_json::json;

use super::{api_failure, auth::ensure_valid, print_json, Context};
use crate::{cli::ArticleCommands, utils};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ArticleListOutput<'a> {
    articles: &'a [Article],
    pagination: Pagination,
    has_more_pages: bool,
}

/// Dispatch an `articles` subcommand.
pub async fn run(ctx: &Context, command: ArticleCommands) -> Result<()> {
    let mut store = ArticleStore::new(ctx.api.clone(), Some(ctx.notifier.clone()));

    match command {
        ArticleCommands::List {
            page,
            page_size,
            category,
            featured,
            search,
            tag,
            sort,
        } => {
            let filters = ArticleFilters {
                category,
                is_featured: featured,
                sort: sort.unwrap_or_else(|| DEFAULT_SORT.to_string()),
                search: search.unwrap_or_default(),
                tag: tag.unwrap_or_default(),
            };
            let mut overrides = filters.to_query();
            overrides.insert("pagination[page]".to_string(), page.max(1).to_string());
            overrides.insert("pagination[pageSize]".to_string(), page_size.to_string());
            overrides.insert("sort".to_string(), filters.sort.clone());

            store.fetch_articles(&overrides).await.map_err(api_failure)?;
            print_json(&ArticleListOutput {
                articles: &store.state().articles,
                pagination: store.state().pagination,
                has_more_pages: store.has_more_pages(),
            })
        },
        ArticleCommands::Get {
            id,
        } => {
            let article = store.fetch_article(&id).await.map_err(api_failure)?;
            print_json(article)
        },
        ArticleCommands::Featured => {
            let featured = store.fetch_featured_articles().await;
            print_json(&featured)
        },
        ArticleCommands::Create {
            title,
            slug,
            excerpt,
            content,
            content_file,
            category,
            tags,
            featured,
            cover_image,
        } => {
            let form = ArticleForm {
                slug: slug.unwrap_or_else(|| generate_slug(&title)),
                title,
                excerpt,
                content: utils::text_or_file(content, content_file.as_ref())?.unwrap_or_default(),
                category: Some(category),
            };
            ensure_valid(&validate_article_form(&form))?;

            let draft = ArticleDraft {
                title: Some(form.title),
                slug: Some(form.slug),
                excerpt: Some(form.excerpt),
                content: Some(form.content),
                is_featured: Some(featured),
                category: form.category,
                tags: tags.as_deref().map(utils::parse_tags),
                cover_image,
            };
            let article = store.create_article(&draft).await.map_err(api_failure)?;
            print_json(&article)
        },
        ArticleCommands::Update {
            id,
            title,
            slug,
            excerpt,
            content,
            content_file,
            category,
            tags,
            featured,
            cover_image,
        } => {
            let draft = ArticleDraft {
                title,
                slug,
                excerpt,
                content: utils::text_or_file(content, content_file.as_ref())?,
                is_featured: featured,
                category,
                tags: tags.as_deref().map(utils::parse_tags),
                cover_image,
            };
            let article = store.update_article(&id, &draft).await.map_err(api_failure)?;
            print_json(&article)
        },
        ArticleCommands::Delete {
            id,
        } => {
            store.delete_article(&id).await.map_err(api_failure)?;
            print_json(&json!({ "deleted": id }))
        },
        ArticleCommands::Publish {
            id,
        } => {
            store.publish_article(&id).await.map_err(api_failure)?;
            print_json(&json!({ "published": id }))
        },
    }
}
