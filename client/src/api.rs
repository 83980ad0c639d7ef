//! HTTP client for the remote content API.
//!
//! One method per remote operation, grouped by resource. Calls return the raw
//! status and JSON body; shaping responses into model types is left to
//! [`newsdesk_shared::normalize`] at the store boundary.
//!
//! Every request carries `Authorization: Bearer <jwt>` when a token is
//! persisted. Any 401 clears the whole session (token and cached profile)
//! and sends the navigator to `/login` unless it is already there. The one
//! exception is [`AuthApi::me_in_place`], which clears without navigating.

use std::sync::Arc;

use newsdesk_shared::normalize::{flatten, split_envelope};
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder, StatusCode,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    config::ClientConfig,
    error::ApiError,
    navigator::{Navigator, LOGIN_PATH},
    session::Session,
};

/// Query used by the article detail endpoint.
pub const ARTICLE_DETAIL_POPULATE: &str = "coverImage,category,author,tags";

/// Status and JSON body of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Parsed JSON body; `Null` when empty, a string when not JSON.
    pub body: Value,
}

impl RawResponse {
    /// Successful result with no body; returned by best-effort operations.
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK.as_u16(),
            body: Value::Null,
        }
    }

    /// True when the body carried nothing.
    pub fn is_empty(&self) -> bool {
        self.body.is_null()
    }
}

/// In-memory file for multipart uploads.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Name reported in the multipart `filename` parameter.
    pub file_name: String,
    /// File contents.
    pub bytes: Vec<u8>,
    /// Explicit content type; the server sniffs it when `None`.
    pub mime_type: Option<String>,
}

impl UploadFile {
    /// Upload without an explicit content type.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            mime_type: None,
        }
    }

    fn into_part(self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        Ok(match self.mime_type {
            Some(mime) => part.mime_str(&mime)?,
            None => part,
        })
    }
}

#[derive(Serialize)]
struct DataBody<'a, T: ?Sized> {
    data: &'a T,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    Redirect,
    Stay,
}

/// Entry point to the remote API; cheap to clone.
///
/// Resource operations hang off the facades returned by [`ApiClient::auth`],
/// [`ApiClient::articles`] and friends.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    session: Session,
    navigator: Arc<dyn Navigator>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("session", &self.session)
            .finish()
    }
}

impl ApiClient {
    /// Build the HTTP client with the configured timeout.
    pub fn new(
        config: ClientConfig,
        session: Session,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            session,
            navigator,
        })
    }

    /// Configuration the client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Session whose token is attached to requests.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Navigator used for the 401 redirect.
    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Authentication endpoints.
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi {
            client: self,
        }
    }

    /// Article endpoints.
    pub fn articles(&self) -> ArticlesApi<'_> {
        ArticlesApi {
            client: self,
        }
    }

    /// Category endpoints.
    pub fn categories(&self) -> CategoriesApi<'_> {
        CategoriesApi {
            client: self,
        }
    }

    /// Media library uploads.
    pub fn uploads(&self) -> UploadsApi<'_> {
        UploadsApi {
            client: self,
        }
    }

    /// User directory endpoints.
    pub fn users(&self) -> UsersApi<'_> {
        UsersApi {
            client: self,
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http.get(self.config.endpoint(path))
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http.post(self.config.endpoint(path))
    }

    fn put(&self, path: &str) -> RequestBuilder {
        self.http.put(self.config.endpoint(path))
    }

    fn delete(&self, path: &str) -> RequestBuilder {
        self.http.delete(self.config.endpoint(path))
    }

    async fn send(&self, request: RequestBuilder) -> Result<RawResponse, ApiError> {
        self.send_with(request, OnUnauthorized::Redirect).await
    }

    async fn send_with(
        &self,
        request: RequestBuilder,
        on_unauthorized: OnUnauthorized,
    ) -> Result<RawResponse, ApiError> {
        let request = match self.session.stored_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(status = status.as_u16(), url = %response.url(), "api response");
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        if status == StatusCode::UNAUTHORIZED {
            self.handle_unauthorized(on_unauthorized);
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }

    fn handle_unauthorized(&self, on_unauthorized: OnUnauthorized) {
        tracing::warn!("request rejected with 401, clearing session");
        self.session.clear();
        if on_unauthorized == OnUnauthorized::Redirect && self.navigator.current_path() != LOGIN_PATH {
            self.navigator.navigate(LOGIN_PATH);
        }
    }
}

fn segment(id: &str) -> std::borrow::Cow<'_, str> {
    urlencoding::encode(id)
}

/// `/api/auth/*` and the current-user profile.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl AuthApi<'_> {
    /// Local strategy sign-in; `identifier` is a username or an email.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.post("/api/auth/local").json(&json!({
            "identifier": identifier,
            "password": password,
        }));
        self.client.send(request).await
    }

    /// Create an account; the response carries a token like login does.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<RawResponse, ApiError> {
        let request = self.client.post("/api/auth/local/register").json(&json!({
            "username": username,
            "email": email,
            "password": password,
        }));
        self.client.send(request).await
    }

    /// Profile of the token's owner, with its role populated.
    pub async fn me(&self) -> Result<RawResponse, ApiError> {
        self.client.send(self.me_request()).await
    }

    /// Like [`AuthApi::me`], but a 401 clears the session without navigating.
    ///
    /// For lookups made while a navigation is already being resolved.
    pub async fn me_in_place(&self) -> Result<RawResponse, ApiError> {
        self.client.send_with(self.me_request(), OnUnauthorized::Stay).await
    }

    fn me_request(&self) -> RequestBuilder {
        self.client.get("/api/users/me").query(&[("populate", "role")])
    }

    /// Ask the server to email a password reset code.
    pub async fn forgot_password(&self, email: &str) -> Result<RawResponse, ApiError> {
        let request = self
            .client
            .post("/api/auth/forgot-password")
            .json(&json!({ "email": email }));
        self.client.send(request).await
    }

    /// Set a new password using the emailed reset code.
    pub async fn reset_password(
        &self,
        code: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<RawResponse, ApiError> {
        let request = self.client.post("/api/auth/reset-password").json(&json!({
            "code": code,
            "password": password,
            "passwordConfirmation": password_confirmation,
        }));
        self.client.send(request).await
    }
}

/// `/api/articles` collection.
pub struct ArticlesApi<'a> {
    client: &'a ApiClient,
}

impl ArticlesApi<'_> {
    /// List with arbitrary bracketed query parameters.
    pub async fn list<Q>(&self, params: &Q) -> Result<RawResponse, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let request = self.client.get("/api/articles").query(params);
        self.client.send(request).await
    }

    /// One article with cover, category, author and tags populated.
    pub async fn get(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self
            .client
            .get(&format!("/api/articles/{}", segment(id)))
            .query(&[("populate", ARTICLE_DETAIL_POPULATE)]);
        self.client.send(request).await
    }

    /// Create from `data`, sent as `{ "data": ... }`.
    pub async fn create<T>(&self, data: &T) -> Result<RawResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request = self.client.post("/api/articles").json(&DataBody {
            data,
        });
        self.client.send(request).await
    }

    /// Partial update, sent as `{ "data": ... }`.
    pub async fn update<T>(&self, id: &str, data: &T) -> Result<RawResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request = self
            .client
            .put(&format!("/api/articles/{}", segment(id)))
            .json(&DataBody {
                data,
            });
        self.client.send(request).await
    }

    /// Delete by document id.
    pub async fn delete(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.delete(&format!("/api/articles/{}", segment(id)));
        self.client.send(request).await
    }

    /// Dedicated featured listing: newest five flagged articles.
    pub async fn featured(&self) -> Result<RawResponse, ApiError> {
        let request = self.client.get("/api/articles").query(&[
            ("filters[isFeatured][$eq]", "true"),
            ("populate", "*"),
            ("sort", "publishedAt:desc"),
            ("pagination[pageSize]", "5"),
        ]);
        self.client.send(request).await
    }

    /// Publish a draft.
    pub async fn publish(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.post(&format!("/api/articles/{}/publish", segment(id)));
        self.client.send(request).await
    }

    /// Read the view counter and write it back incremented.
    ///
    /// Best effort: any failure is logged and an empty successful response is
    /// returned so callers never break on it. The read-then-write pair is not
    /// atomic; concurrent readers can lose increments.
    pub async fn increment_views(&self, id: &str) -> RawResponse {
        match self.try_increment_views(id).await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!("could not increment views for {id}: {err}");
                RawResponse::empty()
            },
        }
    }

    async fn try_increment_views(&self, id: &str) -> Result<RawResponse, ApiError> {
        let path = format!("/api/articles/{}", segment(id));
        let current = self.client.send(self.client.get(&path)).await?;
        let (data, _) = split_envelope(current.body);
        let views = flatten(data).get("views").and_then(Value::as_u64).unwrap_or(0);
        let request = self.client.put(&path).json(&json!({ "data": { "views": views + 1 } }));
        self.client.send(request).await
    }

    /// Articles whose category has `category_slug`.
    pub async fn by_category(&self, category_slug: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.get("/api/articles").query(&[
            ("filters[category][slug][$eq]", category_slug),
            ("populate", "*"),
        ]);
        self.client.send(request).await
    }

    /// Case-insensitive title search.
    pub async fn search(&self, query: &str) -> Result<RawResponse, ApiError> {
        let request = self
            .client
            .get("/api/articles")
            .query(&[("filters[title][$containsi]", query), ("populate", "*")]);
        self.client.send(request).await
    }
}

/// `/api/categories` collection.
pub struct CategoriesApi<'a> {
    client: &'a ApiClient,
}

impl CategoriesApi<'_> {
    /// Every category, relations populated.
    pub async fn list(&self) -> Result<RawResponse, ApiError> {
        let request = self.client.get("/api/categories").query(&[("populate", "*")]);
        self.client.send(request).await
    }

    /// One category by document id.
    pub async fn get(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self
            .client
            .get(&format!("/api/categories/{}", segment(id)))
            .query(&[("populate", "*")]);
        self.client.send(request).await
    }

    /// Create from `data`, sent as `{ "data": ... }`.
    pub async fn create<T>(&self, data: &T) -> Result<RawResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request = self.client.post("/api/categories").json(&DataBody {
            data,
        });
        self.client.send(request).await
    }

    /// Partial update, sent as `{ "data": ... }`.
    pub async fn update<T>(&self, id: &str, data: &T) -> Result<RawResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request = self
            .client
            .put(&format!("/api/categories/{}", segment(id)))
            .json(&DataBody {
                data,
            });
        self.client.send(request).await
    }

    /// Delete by document id.
    pub async fn delete(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.delete(&format!("/api/categories/{}", segment(id)));
        self.client.send(request).await
    }
}

/// `/api/upload` media library.
pub struct UploadsApi<'a> {
    client: &'a ApiClient,
}

impl UploadsApi<'_> {
    /// Upload a single file.
    pub async fn upload_image(&self, file: UploadFile) -> Result<RawResponse, ApiError> {
        self.upload_multiple(vec![file]).await
    }

    /// Every file goes under the same `files` multipart field.
    pub async fn upload_multiple(&self, files: Vec<UploadFile>) -> Result<RawResponse, ApiError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("files", file.into_part()?);
        }
        let request = self.client.post("/api/upload").multipart(form);
        self.client.send(request).await
    }
}

/// `/api/users` directory.
pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl UsersApi<'_> {
    /// Every user, roles populated.
    pub async fn list(&self) -> Result<RawResponse, ApiError> {
        let request = self.client.get("/api/users").query(&[("populate", "role")]);
        self.client.send(request).await
    }

    /// One user with its role.
    pub async fn get(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self
            .client
            .get(&format!("/api/users/{}", segment(id)))
            .query(&[("populate", "role")]);
        self.client.send(request).await
    }

    /// Partial update, sent as `{ "data": ... }`.
    pub async fn update<T>(&self, id: &str, data: &T) -> Result<RawResponse, ApiError>
    where
        T: Serialize + ?Sized,
    {
        let request = self
            .client
            .put(&format!("/api/users/{}", segment(id)))
            .json(&DataBody {
                data,
            });
        self.client.send(request).await
    }

    /// Delete a user.
    pub async fn delete(&self, id: &str) -> Result<RawResponse, ApiError> {
        let request = self.client.delete(&format!("/api/users/{}", segment(id)));
        self.client.send(request).await
    }
}
