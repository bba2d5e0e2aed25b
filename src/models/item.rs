//! Media item (catalog entry) model and related request types.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One catalog entry. `name` is the identity, compared case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaItem {
    pub name: String,
    pub author: String,
    /// Free-form publication date, matched and sorted as a plain string
    pub date_published: String,
    pub category: String,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl MediaItem {
    /// Case-insensitive identity comparison
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Seed file layout: `{"media": [...]}`
#[derive(Debug, Deserialize)]
pub struct CatalogSeed {
    pub media: Vec<MediaItem>,
}

/// Add request body. Fields are optional on the wire so that a missing
/// field is reported as a validation failure rather than a decode error.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct NewMediaItem {
    pub name: Option<String>,
    pub author: Option<String>,
    pub date_published: Option<String>,
    pub category: Option<String>,
}

/// Rent/return request body
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct BookNameRequest {
    pub book_name: Option<String>,
}

/// Sort parameter (`by`), from the query string or a JSON body
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SortParams {
    /// `year` or `category`; anything else keeps storage order
    pub by: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Storage,
    Year,
    Category,
}

impl SortKey {
    /// Unknown keys fall back to storage order
    pub fn parse(by: Option<&str>) -> Self {
        match by {
            Some("year") => SortKey::Year,
            Some("category") => SortKey::Category,
            _ => SortKey::Storage,
        }
    }

    /// Stable sort of `items` by this key
    pub fn apply(self, items: &mut [MediaItem]) {
        match self {
            SortKey::Storage => {}
            SortKey::Year => items.sort_by(|a, b| a.date_published.cmp(&b.date_published)),
            SortKey::Category => items.sort_by(|a, b| a.category.cmp(&b.category)),
        }
    }
}

/// Search parameters as received from the client
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring of name or author
    pub query: Option<String>,
    /// Case-sensitive substring of the publication date
    pub year: Option<String>,
    /// Case-insensitive substring of the category
    pub category: Option<String>,
}

/// Normalized search filter. Blank inputs are dropped; the case-insensitive
/// needles are stored lowercased.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    query: Option<String>,
    year: Option<String>,
    category: Option<String>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl From<&SearchQuery> for SearchFilter {
    fn from(q: &SearchQuery) -> Self {
        Self {
            query: non_blank(q.query.as_deref()).map(str::to_lowercase),
            year: non_blank(q.year.as_deref()).map(str::to_string),
            category: non_blank(q.category.as_deref()).map(str::to_lowercase),
        }
    }
}

impl SearchFilter {
    pub fn is_empty(&self) -> bool {
        self.query.is_none() && self.year.is_none() && self.category.is_none()
    }

    /// All supplied filters must match
    pub fn matches(&self, item: &MediaItem) -> bool {
        if let Some(q) = &self.query {
            if !item.name.to_lowercase().contains(q) && !item.author.to_lowercase().contains(q) {
                return false;
            }
        }
        if let Some(year) = &self.year {
            if !item.date_published.contains(year.as_str()) {
                return false;
            }
        }
        if let Some(category) = &self.category {
            if !item.category.to_lowercase().contains(category) {
                return false;
            }
        }
        true
    }
}
