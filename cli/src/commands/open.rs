//! Route resolution through the navigation guard.

use anyhow::Result;
use newsdesk_client::{navigator::Navigator, router::Router, stores::AuthStore};
use serde::Serialize;

use super::{print_json, Context};

#[derive(Serialize)]
struct OpenOutput {
    requested: String,
    route: &'static str,
    path: String,
    title: String,
    redirected: bool,
    history: Vec<String>,
}

/// Run `path` through the navigation guard the way a page visit would.
pub async fn run(ctx: &Context, path: &str) -> Result<()> {
    let mut auth = AuthStore::new(ctx.api.clone());
    let router = Router::new(ctx.navigator.clone(), Some(ctx.notifier.clone()));
    let navigation = router.push(&mut auth, path).await;

    print_json(&OpenOutput {
        requested: path.to_string(),
        route: navigation.route.name(),
        path: ctx.navigator.current_path(),
        title: navigation.title,
        redirected: navigation.redirected,
        history: ctx.navigator.history(),
    })
}
