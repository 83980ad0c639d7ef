//! Sign-in, sign-up and session inspection.

use anyhow::{bail, Result};
use newsdesk_client::{
    stores::AuthStore,
    utils::validation::{validate_login_form, validate_register_form, FormValidation, LoginForm, RegisterForm},
};
use newsdesk_shared::User;
use serde::Serialize;

use super::{api_failure, print_json, Context};

#[derive(Serialize)]
struct SessionSummary {
    authenticated: bool,
    editor: bool,
    admin: bool,
    user: Option<User>,
}

impl SessionSummary {
    fn of(auth: &AuthStore) -> Self {
        Self {
            authenticated: auth.is_authenticated(),
            editor: auth.is_editor(),
            admin: auth.is_admin(),
            user: auth.user(),
        }
    }
}

pub(crate) fn ensure_valid(validation: &FormValidation) -> Result<()> {
    if validation.is_valid() {
        return Ok(());
    }
    let details = validation
        .errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ");
    bail!("invalid input: {details}")
}

/// Validate the credentials locally, sign in and print the session.
pub async fn login(ctx: &Context, identifier: &str, password: &str) -> Result<()> {
    ensure_valid(&validate_login_form(&LoginForm {
        identifier: identifier.to_string(),
        password: password.to_string(),
    }))?;

    let mut auth = AuthStore::new(ctx.api.clone());
    if let Err(err) = auth.login(identifier, password).await {
        let message = auth.error().unwrap_or("Login failed").to_string();
        return Err(anyhow::Error::new(err).context(message));
    }
    tracing::info!("signed in as {}", auth.user_name().unwrap_or_default());
    print_json(&SessionSummary::of(&auth))
}

/// Validate the form locally, register and print the session.
pub async fn register(
    ctx: &Context,
    username: String,
    email: String,
    password: String,
    accept_terms: bool,
) -> Result<()> {
    let form = RegisterForm {
        username,
        email,
        confirm_password: password.clone(),
        password,
        accept_terms,
    };
    ensure_valid(&validate_register_form(&form))?;

    let mut auth = AuthStore::new(ctx.api.clone());
    if let Err(err) = auth.register(&form).await {
        let message = auth.error().unwrap_or("Registration failed").to_string();
        return Err(anyhow::Error::new(err).context(message));
    }
    print_json(&SessionSummary::of(&auth))
}

/// Forget the persisted session without calling the API.
pub fn logout(ctx: &Context) -> Result<()> {
    let mut auth = AuthStore::new(ctx.api.clone());
    auth.logout();
    print_json(&SessionSummary::of(&auth))
}

/// Print the session, refreshing the profile first when a token is stored.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let mut auth = AuthStore::new(ctx.api.clone());
    if auth.session().stored_token().is_some() {
        auth.fetch_user().await.map_err(api_failure)?;
    }
    print_json(&SessionSummary::of(&auth))
}
