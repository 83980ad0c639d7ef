//! Category listing and maintenance.

use anyhow::{anyhow, Result};
use newsdesk_client::{stores::ArticleStore, utils::helpers::generate_slug};
use newsdesk_shared::{normalize::decode_envelope, Category, CategoryDraft};
use serde_json::json;

use super::{api_failure, print_json, Context};
use crate::cli::CategoryCommands;

/// Dispatch a `categories` subcommand.
pub async fn run(ctx: &Context, command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::List => {
            let mut store = ArticleStore::new(ctx.api.clone(), None);
            store.fetch_categories().await;
            if let Some(error) = store.state().error.as_deref() {
                return Err(anyhow!("{error}"));
            }
            print_json(&store.state().categories)
        },
        CategoryCommands::Create {
            name,
            slug,
        } => {
            let draft = CategoryDraft {
                slug: Some(slug.unwrap_or_else(|| generate_slug(&name))),
                name,
            };
            let response = ctx.api.categories().create(&draft).await.map_err(api_failure)?;
            let category = decode_envelope::<Category>(response.body)?.data;
            print_json(&category)
        },
        CategoryCommands::Delete {
            id,
        } => {
            ctx.api.categories().delete(&id).await.map_err(api_failure)?;
            print_json(&json!({ "deleted": id }))
        },
    }
}
