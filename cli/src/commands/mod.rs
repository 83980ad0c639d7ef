//! Command handlers and the context they share.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod open;
pub mod upload;
pub mod users;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use newsdesk_client::{
    navigator::HistoryNavigator,
    notify::{Notifier, TracingNotifier},
    storage::FileStorage,
    ApiClient, ApiError, ClientConfig, Session,
};
use serde::Serialize;

use crate::cli::{Cli, Commands};

/// Everything a command needs, wired from the global flags.
pub struct Context {
    /// Client over the persisted session.
    pub api: ApiClient,
    /// Records where 401s and the guard send the user.
    pub navigator: Arc<HistoryNavigator>,
    /// Sink for store notifications.
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    /// Open the session file and build the API client.
    pub fn connect(cli: &Cli) -> Result<Self> {
        let storage = FileStorage::open(cli.session_file.clone())
            .with_context(|| format!("failed to open session file {}", cli.session_file.display()))?;
        let session = Session::restore(Arc::new(storage));

        let config = match cli.api_url.as_deref() {
            Some(url) => ClientConfig::default().with_base_url(url),
            None => ClientConfig::from_env(),
        };
        tracing::debug!(base_url = %config.base_url, "using content API");

        let navigator = Arc::new(HistoryNavigator::default());
        let api = ApiClient::new(config, session, navigator.clone())?;
        Ok(Self {
            api,
            navigator,
            notifier: Arc::new(TracingNotifier),
        })
    }
}

/// Execute the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let ctx = Context::connect(&cli)?;
    match cli.command {
        Commands::Login {
            identifier,
            password,
        } => auth::login(&ctx, &identifier, &password).await,
        Commands::Register {
            username,
            email,
            password,
            accept_terms,
        } => auth::register(&ctx, username, email, password, accept_terms).await,
        Commands::Logout => auth::logout(&ctx),
        Commands::Whoami => auth::whoami(&ctx).await,
        Commands::Articles {
            command,
        } => articles::run(&ctx, command).await,
        Commands::Categories {
            command,
        } => categories::run(&ctx, command).await,
        Commands::Upload {
            files,
        } => upload::run(&ctx, &files).await,
        Commands::Users {
            command,
        } => users::run(&ctx, command).await,
        Commands::Open {
            path,
        } => open::run(&ctx, &path).await,
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Keep the typed error as the source and lead with the user-facing text.
pub(crate) fn api_failure(err: ApiError) -> anyhow::Error {
    let message = err.user_message();
    anyhow::Error::new(err).context(message)
}
