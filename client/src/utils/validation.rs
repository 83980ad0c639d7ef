//! Form field validation used by presentation code.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("valid username regex"));
static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"));

/// `local@domain.tld` with no whitespace.
pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 6 characters.
pub fn validate_password(password: &str) -> bool {
    password.chars().count() >= 6
}

/// 3 to 20 characters, ASCII letters, digits and underscores only.
pub fn validate_username(username: &str) -> bool {
    (3..=20).contains(&username.chars().count()) && USERNAME_RE.is_match(username)
}

/// Lowercase ASCII letters, digits and hyphens.
pub fn validate_slug(slug: &str) -> bool {
    SLUG_RE.is_match(slug)
}

/// 3 to 200 characters.
pub fn validate_title(title: &str) -> bool {
    (3..=200).contains(&title.chars().count())
}

/// 10 to 300 characters.
pub fn validate_excerpt(excerpt: &str) -> bool {
    (10..=300).contains(&excerpt.chars().count())
}

/// At least 50 characters.
pub fn validate_content(content: &str) -> bool {
    content.chars().count() >= 50
}

/// Field name → message for every failed check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    /// Messages keyed by field name.
    pub errors: BTreeMap<&'static str, String>,
}

impl FormValidation {
    /// No check failed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if its check failed.
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    fn check(&mut self, ok: bool, field: &'static str, message: &str) {
        if !ok {
            self.errors.insert(field, message.to_string());
        }
    }
}

/// Article editor fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleForm {
    /// Headline.
    pub title: String,
    /// URL slug; left empty, it is not checked.
    #[serde(default)]
    pub slug: String,
    /// Summary.
    pub excerpt: String,
    /// Body text.
    pub content: String,
    /// Category document id.
    #[serde(default)]
    pub category: Option<String>,
}

/// Sign-up fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterForm {
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Password.
    pub password: String,
    /// Password typed a second time.
    pub confirm_password: String,
    /// Terms of use accepted.
    pub accept_terms: bool,
}

/// Sign-in fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    /// Email or username.
    pub identifier: String,
    /// Password.
    pub password: String,
}

/// Check every article editor field.
pub fn validate_article_form(form: &ArticleForm) -> FormValidation {
    let mut result = FormValidation::default();
    result.check(validate_title(&form.title), "title", "Title must be between 3 and 200 characters");
    result.check(
        form.slug.is_empty() || validate_slug(&form.slug),
        "slug",
        "Slug may contain only lowercase latin letters, digits and hyphens",
    );
    result.check(
        validate_excerpt(&form.excerpt),
        "excerpt",
        "Excerpt must be between 10 and 300 characters",
    );
    result.check(
        validate_content(&form.content),
        "content",
        "Article text must be at least 50 characters",
    );
    result.check(
        form.category.as_deref().is_some_and(|c| !c.is_empty()),
        "category",
        "Choose a category",
    );
    result
}

/// Check every sign-up field.
pub fn validate_register_form(form: &RegisterForm) -> FormValidation {
    let mut result = FormValidation::default();
    result.check(
        validate_username(&form.username),
        "username",
        "Username must be 3 to 20 characters (letters, digits and underscores only)",
    );
    result.check(validate_email(&form.email), "email", "Enter a valid email");
    result.check(
        validate_password(&form.password),
        "password",
        "Password must be at least 6 characters",
    );
    result.check(
        form.password == form.confirm_password,
        "confirmPassword",
        "Passwords do not match",
    );
    result.check(form.accept_terms, "acceptTerms", "You must accept the terms of use");
    result
}

/// Both sign-in fields must be filled.
pub fn validate_login_form(form: &LoginForm) -> FormValidation {
    let mut result = FormValidation::default();
    result.check(
        !form.identifier.trim().is_empty(),
        "identifier",
        "Enter your email or username",
    );
    result.check(!form.password.is_empty(), "password", "Enter your password");
    result
}
