//! Catalog management service

use crate::{
    error::{AppError, AppResult},
    models::{MediaItem, NewMediaItem, SearchFilter, SearchQuery, SortKey},
    repository::{items::MISSING_FIELDS, Repository},
};

pub const NAME_REQUIRED: &str = "Book name required.";

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

/// Trimmed value, or `None` when missing or blank
fn required(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every item, ordered by the `by` key
    pub fn list_items(&self, by: Option<&str>) -> AppResult<Vec<MediaItem>> {
        let key = SortKey::parse(by);
        let items = self.repository.items.list(key)?;
        tracing::debug!("Catalog list: sort={:?}, {} items", key, items.len());
        Ok(items)
    }

    /// Search items; blank filters are ignored
    pub fn search_items(&self, query: &SearchQuery) -> AppResult<Vec<MediaItem>> {
        let filter = SearchFilter::from(query);
        let items = if filter.is_empty() {
            self.repository.items.list(SortKey::Storage)?
        } else {
            self.repository.items.search(&filter)?
        };
        tracing::debug!("Catalog search: {:?} -> {} items", filter, items.len());
        Ok(items)
    }

    /// Add a new, available item
    pub fn add_item(&self, new_item: NewMediaItem) -> AppResult<MediaItem> {
        let (Some(name), Some(author), Some(date_published), Some(category)) = (
            required(new_item.name.as_deref()),
            required(new_item.author.as_deref()),
            required(new_item.date_published.as_deref()),
            required(new_item.category.as_deref()),
        ) else {
            tracing::warn!("Catalog add rejected: missing field");
            return Err(AppError::Validation(MISSING_FIELDS.to_string()));
        };

        let item = MediaItem {
            name,
            author,
            date_published,
            category,
            available: true,
        };

        if let Err(e) = self.repository.items.insert(item.clone()) {
            tracing::warn!("Catalog add rejected for '{}': {}", item.name, e);
            return Err(e);
        }

        tracing::info!("Catalog add: '{}' by {}", item.name, item.author);
        Ok(item)
    }

    /// Permanently remove an item
    pub fn delete_item(&self, name: &str) -> AppResult<MediaItem> {
        let removed = self.repository.items.delete(name).inspect_err(|e| {
            tracing::warn!("Catalog delete rejected for '{}': {}", name, e);
        })?;
        tracing::info!("Catalog delete: '{}'", removed.name);
        Ok(removed)
    }

    pub fn count(&self) -> AppResult<usize> {
        self.repository.items.count()
    }

    /// Rent an available item; returns its stored name
    pub fn rent_item(&self, book_name: Option<&str>) -> AppResult<String> {
        let name = required(book_name)
            .ok_or_else(|| AppError::Validation(NAME_REQUIRED.to_string()))?;
        let stored = self.repository.items.rent(&name).inspect_err(|e| {
            tracing::warn!("Catalog rent rejected for '{}': {}", name, e);
        })?;
        tracing::info!("Catalog rent: '{}'", stored);
        Ok(stored)
    }

    /// Return a rented item; returns its stored name
    pub fn return_item(&self, book_name: Option<&str>) -> AppResult<String> {
        let name = required(book_name)
            .ok_or_else(|| AppError::Validation(NAME_REQUIRED.to_string()))?;
        let stored = self.repository.items.return_item(&name).inspect_err(|e| {
            tracing::warn!("Catalog return rejected for '{}': {}", name, e);
        })?;
        tracing::info!("Catalog return: '{}'", stored);
        Ok(stored)
    }
}
