//! Command-line surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use newsdesk_client::config::API_URL_ENV;

/// Session file used when `--session-file` is not given.
pub const DEFAULT_SESSION_FILE: &str = "./.newsdesk/session.json";

/// Newsdesk content API CLI.
#[derive(Parser)]
#[command(name = "nd-cli", version)]
pub struct Cli {
    /// Base URL of the content API (defaults to the build-time value).
    #[arg(long, env = API_URL_ENV, global = true)]
    pub api_url: Option<String>,
    /// JSON file holding the persisted token and profile.
    #[arg(long, default_value = DEFAULT_SESSION_FILE, global = true)]
    pub session_file: PathBuf,
    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and persist the session.
    Login {
        /// Username or email.
        #[arg(long)]
        identifier: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Create an account and sign in.
    Register {
        /// Login name (3 to 20 letters, digits or underscores).
        #[arg(long)]
        username: String,
        /// Contact email.
        #[arg(long)]
        email: String,
        /// At least 6 characters.
        #[arg(long)]
        password: String,
        /// Accept the terms of use.
        #[arg(long)]
        accept_terms: bool,
    },
    /// Forget the persisted session.
    Logout,
    /// Show the signed-in profile, refreshed from the server.
    Whoami,
    /// Article operations.
    Articles {
        /// Article command.
        #[command(subcommand)]
        command: ArticleCommands,
    },
    /// Category operations.
    Categories {
        /// Category command.
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Upload one or more files to the media library.
    Upload {
        /// Files to upload.
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// User directory.
    Users {
        /// User command.
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Resolve a location through the navigation guard.
    Open {
        /// Location such as `/editor` or `/article/abc`.
        path: String,
    },
}

/// `articles` subcommands.
#[derive(Subcommand)]
pub enum ArticleCommands {
    /// GET /api/articles with pagination and filters.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Items per page.
        #[arg(long, default_value_t = 12)]
        page_size: u32,
        /// Category slug.
        #[arg(long)]
        category: Option<String>,
        /// Only featured articles.
        #[arg(long)]
        featured: bool,
        /// Case-insensitive match on title, content or excerpt.
        #[arg(long)]
        search: Option<String>,
        /// Tag name.
        #[arg(long)]
        tag: Option<String>,
        /// Sort expression, e.g. `views:desc`.
        #[arg(long)]
        sort: Option<String>,
    },
    /// Fetch one article (counts a view).
    Get {
        /// Document id.
        id: String,
    },
    /// Newest featured articles.
    Featured,
    /// Create an article after local validation.
    Create {
        /// Headline (3 to 200 characters).
        #[arg(long)]
        title: String,
        /// Defaults to a slug generated from the title.
        #[arg(long)]
        slug: Option<String>,
        /// Summary (10 to 300 characters).
        #[arg(long)]
        excerpt: String,
        /// Article body (at least 50 characters).
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the article body from a file.
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// Category document id.
        #[arg(long)]
        category: String,
        /// Comma-separated tags list.
        #[arg(long)]
        tags: Option<String>,
        /// Pin to the featured strip.
        #[arg(long)]
        featured: bool,
        /// Uploaded media id used as cover.
        #[arg(long)]
        cover_image: Option<i64>,
    },
    /// Update fields of an existing article; omitted fields are untouched.
    Update {
        /// Document id.
        id: String,
        /// New headline.
        #[arg(long)]
        title: Option<String>,
        /// New slug.
        #[arg(long)]
        slug: Option<String>,
        /// New summary.
        #[arg(long)]
        excerpt: Option<String>,
        /// New body.
        #[arg(long, conflicts_with = "content_file")]
        content: Option<String>,
        /// Read the new body from a file.
        #[arg(long)]
        content_file: Option<PathBuf>,
        /// New category document id.
        #[arg(long)]
        category: Option<String>,
        /// New comma-separated tags list.
        #[arg(long)]
        tags: Option<String>,
        /// Featured flag.
        #[arg(long)]
        featured: Option<bool>,
        /// New cover media id.
        #[arg(long)]
        cover_image: Option<i64>,
    },
    /// Delete an article.
    Delete {
        /// Document id.
        id: String,
    },
    /// Publish a draft now.
    Publish {
        /// Document id.
        id: String,
    },
}

/// `categories` subcommands.
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List every category.
    List,
    /// Create a category.
    Create {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Defaults to a slug generated from the name.
        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete a category.
    Delete {
        /// Category document id.
        id: String,
    },
}

/// `users` subcommands.
#[derive(Subcommand)]
pub enum UserCommands {
    /// List accounts.
    List,
    /// Show one account with its role.
    Get {
        /// Numeric user id.
        id: String,
    },
}
