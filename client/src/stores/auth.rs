//! Authentication state container.
//!
//! Token and profile live in the shared [`Session`]; this store adds the
//! loading/error bookkeeping and the login, registration and logout flows.

use std::sync::Arc;

use newsdesk_shared::{normalize::decode_envelope, AuthPayload, User};

use crate::{
    api::ApiClient,
    error::ApiError,
    navigator::{Navigator, HOME_PATH, LOGIN_PATH},
    session::Session,
    utils::validation::RegisterForm,
};

const LOGIN_FAILED: &str = "Login failed. Check your credentials.";
const REGISTER_FAILED: &str = "Registration failed. The email may already be taken.";

/// Sign-in flows over the shared [`Session`].
pub struct AuthStore {
    api: ApiClient,
    session: Session,
    navigator: Arc<dyn Navigator>,
    is_loading: bool,
    error: Option<String>,
}

impl AuthStore {
    /// Store sharing the client's session and navigator.
    pub fn new(api: ApiClient) -> Self {
        let session = api.session().clone();
        let navigator = api.navigator().clone();
        Self {
            api,
            session,
            navigator,
            is_loading: false,
            error: None,
        }
    }

    /// Underlying session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cached profile, if signed in.
    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    /// Current bearer token.
    pub fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// True while a login or registration is in flight.
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Message from the last failed sign-in.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A token is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Signed in with an editor role.
    pub fn is_editor(&self) -> bool {
        self.is_authenticated() && self.session.user().is_some_and(|user| user.is_editor())
    }

    /// Signed in with an admin role.
    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.session.user().is_some_and(|user| user.is_admin())
    }

    /// Display name of the signed-in user.
    pub fn user_name(&self) -> Option<String> {
        self.session.user().and_then(|user| user.display_name().map(str::to_string))
    }

    /// Sign in, persist the session and go home.
    pub async fn login(&mut self, identifier: &str, password: &str) -> Result<AuthPayload, ApiError> {
        self.is_loading = true;
        self.error = None;
        let result = match self.api.auth().login(identifier, password).await {
            Ok(response) => decode_envelope::<AuthPayload>(response.body)
                .map(|envelope| envelope.data)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        self.is_loading = false;
        self.complete_sign_in(result, LOGIN_FAILED)
    }

    /// Create an account, persist the session and go home.
    pub async fn register(&mut self, form: &RegisterForm) -> Result<AuthPayload, ApiError> {
        self.is_loading = true;
        self.error = None;
        let result = match self
            .api
            .auth()
            .register(&form.username, &form.email, &form.password)
            .await
        {
            Ok(response) => decode_envelope::<AuthPayload>(response.body)
                .map(|envelope| envelope.data)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        self.is_loading = false;
        self.complete_sign_in(result, REGISTER_FAILED)
    }

    /// Refresh the cached profile. No token, or a failed lookup, logs out.
    pub async fn fetch_user(&mut self) -> Result<(), ApiError> {
        if self.session.token().is_none() {
            self.logout();
            return Ok(());
        }
        match self.load_profile().await {
            Ok(user) => {
                self.session.set_user(user);
                Ok(())
            },
            Err(err) => {
                tracing::error!("failed to fetch user: {err}");
                self.logout();
                Err(err)
            },
        }
    }

    /// Profile lookup for a persisted token, without navigating.
    ///
    /// A failed lookup treats the token as invalid and clears the session.
    pub async fn restore_profile(&mut self) -> Result<(), ApiError> {
        let result = match self.api.auth().me_in_place().await {
            Ok(response) => decode_envelope::<User>(response.body)
                .map(|envelope| envelope.data)
                .map_err(ApiError::from),
            Err(err) => Err(err),
        };
        match result {
            Ok(user) => {
                self.session.set_user(user);
                Ok(())
            },
            Err(err) => {
                tracing::warn!("stored token rejected, continuing signed out: {err}");
                self.session.clear();
                Err(err)
            },
        }
    }

    /// Forget the session and go to the login view. Never touches the network.
    pub fn logout(&mut self) {
        self.session.clear();
        if self.navigator.current_path() != LOGIN_PATH {
            self.navigator.navigate(LOGIN_PATH);
        }
    }

    /// Dismiss the last sign-in error.
    pub fn clear_error(&mut self) {
        self.error = None;
    }

    async fn load_profile(&self) -> Result<User, ApiError> {
        let response = self.api.auth().me().await?;
        Ok(decode_envelope::<User>(response.body)?.data)
    }

    fn complete_sign_in(
        &mut self,
        result: Result<AuthPayload, ApiError>,
        fallback: &str,
    ) -> Result<AuthPayload, ApiError> {
        match result {
            Ok(payload) => {
                self.session.sign_in(&payload.jwt, payload.user.clone());
                self.navigator.navigate(HOME_PATH);
                Ok(payload)
            },
            Err(err) => {
                tracing::error!("authentication failed: {err}");
                self.error = Some(err.server_message().unwrap_or_else(|| fallback.to_string()));
                Err(err)
            },
        }
    }
}
