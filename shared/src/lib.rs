//! Canonical data model shared by the Newsdesk client and CLI.
//!
//! Every type here describes the single internal shape of a content API
//! entity. Responses arrive in two schema generations (flat entities, or
//! `{ id, attributes }` wrappers with `{ data }` relations); [`normalize`]
//! folds both into these types before any store sees them.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

pub mod normalize;

pub use normalize::NormalizeError;

/// Role names granting editor rights.
pub const EDITOR_ROLES: &[&str] = &["editor", "Editor", "authenticated"];
/// Role names granting admin rights.
pub const ADMIN_ROLES: &[&str] = &["admin", "Admin", "administrator"];

/// Default sort order for article listings.
pub const DEFAULT_SORT: &str = "publishedAt:desc";

/// Article as returned by list and detail endpoints, after normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// Numeric row id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Stable document id used in URLs.
    #[serde(default, deserialize_with = "nullable")]
    pub document_id: String,
    /// Headline.
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    /// URL slug.
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
    /// Short summary shown in listings.
    #[serde(default, deserialize_with = "nullable")]
    pub excerpt: String,
    /// Body text.
    #[serde(default, deserialize_with = "lenient_text")]
    pub content: String,
    /// `None` means the article is still a draft.
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Whether the article is pinned to the featured strip.
    #[serde(default, deserialize_with = "nullable")]
    pub is_featured: bool,
    /// View counter.
    #[serde(default, deserialize_with = "nullable")]
    pub views: u64,
    /// Owning category, if any.
    #[serde(default)]
    pub category: Option<Category>,
    /// Byline.
    #[serde(default)]
    pub author: Option<Author>,
    /// Cover image.
    #[serde(default)]
    pub cover_image: Option<Media>,
    /// Tag names.
    #[serde(default, deserialize_with = "tag_names")]
    pub tags: Vec<String>,
}

impl Article {
    /// True while the article has no publication date.
    pub fn is_draft(&self) -> bool {
        self.published_at.is_none()
    }
}

/// Article category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Numeric row id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Stable document id.
    #[serde(default, deserialize_with = "nullable")]
    pub document_id: String,
    /// Display name.
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    /// URL slug.
    #[serde(default, deserialize_with = "nullable")]
    pub slug: String,
}

/// Article author as embedded in article responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    /// Numeric row id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Full name.
    #[serde(default)]
    pub name: Option<String>,
    /// Login name.
    #[serde(default)]
    pub username: Option<String>,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
}

impl Author {
    /// Name shown in bylines: `name`, then `username`, then the email local part.
    pub fn display_name(&self) -> Option<&str> {
        self.name
            .as_deref()
            .filter(|name| !name.is_empty())
            .or_else(|| self.username.as_deref().filter(|name| !name.is_empty()))
            .or_else(|| self.email.as_deref().and_then(|email| email.split('@').next()))
    }
}

/// Uploaded file reference (cover images, upload results).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    /// Numeric row id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Public URL, possibly relative to the API origin.
    #[serde(default, deserialize_with = "nullable")]
    pub url: String,
    /// Original file name.
    #[serde(default)]
    pub name: Option<String>,
    /// Alt text.
    #[serde(default)]
    pub alternative_text: Option<String>,
}

/// Signed-in account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Numeric row id.
    #[serde(default)]
    pub id: Option<i64>,
    /// Login name.
    #[serde(default, deserialize_with = "nullable")]
    pub username: String,
    /// Contact email.
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    /// Resolved role, when the endpoint populated it.
    #[serde(default)]
    pub role: Option<Role>,
}

impl User {
    /// Whether the role grants editor rights.
    pub fn is_editor(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_editor)
    }

    /// Whether the role grants admin rights.
    pub fn is_admin(&self) -> bool {
        self.role.as_ref().is_some_and(Role::is_admin)
    }

    /// Username, falling back to the local part of the email.
    pub fn display_name(&self) -> Option<&str> {
        if !self.username.is_empty() {
            return Some(&self.username);
        }
        self.email.split('@').next().filter(|local| !local.is_empty())
    }
}

/// Role identity, resolved from `{ name }`, `{ type }` or a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Role {
    /// Role name as resolved from the response.
    pub name: String,
}

impl Role {
    /// Role with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
        }
    }

    /// Name is one of [`EDITOR_ROLES`].
    pub fn is_editor(&self) -> bool {
        EDITOR_ROLES.contains(&self.name.as_str())
    }

    /// Name is one of [`ADMIN_ROLES`].
    pub fn is_admin(&self) -> bool {
        ADMIN_ROLES.contains(&self.name.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RoleRepr {
    Bare(String),
    Object {
        #[serde(default)]
        name: Option<String>,
        #[serde(default, rename = "type")]
        kind: Option<String>,
    },
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = match RoleRepr::deserialize(deserializer)? {
            RoleRepr::Bare(name) => name,
            RoleRepr::Object {
                name,
                kind,
            } => name
                .filter(|name| !name.is_empty())
                .or(kind.filter(|kind| !kind.is_empty()))
                .unwrap_or_default(),
        };
        Ok(Role {
            name,
        })
    }
}

/// Page cursor reported by the API (or synthesized locally).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Items per page.
    pub page_size: u32,
    /// Number of pages.
    pub page_count: u32,
    /// Total items across all pages.
    pub total: u64,
}

impl Pagination {
    /// Fallback cursor when a list response carries no pagination metadata.
    pub fn local(page_size: u32, total: usize) -> Self {
        Self {
            page: 1,
            page_size,
            page_count: 1,
            total: total as u64,
        }
    }
}

/// Response metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Page cursor, for paginated lists.
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// `{ data, meta }` response wrapper after normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope<T> {
    /// Normalized payload.
    pub data: T,
    /// Metadata, when the response carried any.
    pub meta: Option<Meta>,
}

impl<T> Envelope<T> {
    /// Page cursor from the metadata, if present.
    pub fn pagination(&self) -> Option<Pagination> {
        self.meta.as_ref().and_then(|meta| meta.pagination)
    }
}

/// Body of a successful login or registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthPayload {
    /// Bearer token.
    pub jwt: String,
    /// Account the token belongs to.
    pub user: User,
}

/// Article fields sent on create/update. Unset fields are omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDraft {
    /// Headline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// URL slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Featured flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    /// Category document id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tag names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    /// Uploaded media id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<i64>,
}

/// Category fields sent on create/update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
    /// URL slug; omitted from the body when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Rich-text bodies come back as block arrays on newer schemas; keep them as JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

fn tag_names<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let raw = Value::deserialize(deserializer)?;
    let names = match raw {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name),
                Value::Object(mut fields) => match fields.remove("name") {
                    Some(Value::String(name)) => Some(name),
                    _ => None,
                },
                _ => None,
            })
            .collect(),
        Value::String(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };
    Ok(names)
}
