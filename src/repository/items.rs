//! In-memory items store.
//!
//! Every read and every write takes the same mutex, so check-then-insert
//! (name uniqueness) and check-then-flip (rent/return) run as one step.
//! Record counts and request rates are small; a single coarse lock is
//! enough and nothing inside the critical section does I/O.

use std::{
    path::Path,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    error::{AppError, AppResult},
    models::{
        item::{CatalogSeed, MediaItem},
        SearchFilter, SortKey,
    },
};

pub const MISSING_FIELDS: &str = "All fields are required.";

#[derive(Clone, Default)]
pub struct ItemsRepository {
    items: Arc<Mutex<Vec<MediaItem>>>,
}

impl ItemsRepository {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with `items`. Fields are trimmed as on add, then
    /// must satisfy the same rules as [`ItemsRepository::insert`]
    pub fn with_items(items: Vec<MediaItem>) -> AppResult<Self> {
        let repository = Self::new();
        {
            let mut guard = repository.lock()?;
            for item in items.into_iter().map(trimmed) {
                if has_blank_field(&item) {
                    return Err(AppError::Validation(MISSING_FIELDS.to_string()));
                }
                if guard.iter().any(|existing| existing.is_named(&item.name)) {
                    return Err(AppError::Duplicate);
                }
                guard.push(item);
            }
        }
        Ok(repository)
    }

    /// Parse a `{"media": [...]}` seed document
    pub fn from_seed_str(json: &str) -> AppResult<Self> {
        let seed: CatalogSeed = serde_json::from_str(json)?;
        Self::with_items(seed.media)
    }

    pub fn from_seed_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_seed_str(&json)
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, Vec<MediaItem>>> {
        self.items
            .lock()
            .map_err(|_| AppError::Internal("catalog lock poisoned".to_string()))
    }

    /// Snapshot of every record, ordered by `key`
    pub fn list(&self, key: SortKey) -> AppResult<Vec<MediaItem>> {
        let mut snapshot = self.lock()?.clone();
        key.apply(&mut snapshot);
        Ok(snapshot)
    }

    /// Snapshot of the records matching `filter`, in storage order
    pub fn search(&self, filter: &SearchFilter) -> AppResult<Vec<MediaItem>> {
        let guard = self.lock()?;
        Ok(guard.iter().filter(|item| filter.matches(item)).cloned().collect())
    }

    /// Append `item` unless its name is already taken
    pub fn insert(&self, item: MediaItem) -> AppResult<()> {
        let mut guard = self.lock()?;
        if guard.iter().any(|existing| existing.is_named(&item.name)) {
            return Err(AppError::Duplicate);
        }
        guard.push(item);
        Ok(())
    }

    /// Remove the first record named `name`
    pub fn delete(&self, name: &str) -> AppResult<MediaItem> {
        let mut guard = self.lock()?;
        let index = guard
            .iter()
            .position(|item| item.is_named(name))
            .ok_or(AppError::NotFound)?;
        Ok(guard.remove(index))
    }

    /// Mark an available record as rented, returning its stored name
    pub fn rent(&self, name: &str) -> AppResult<String> {
        self.set_available(name, false)
    }

    /// Mark a rented record as available, returning its stored name
    pub fn return_item(&self, name: &str) -> AppResult<String> {
        self.set_available(name, true)
    }

    fn set_available(&self, name: &str, available: bool) -> AppResult<String> {
        let mut guard = self.lock()?;
        let item = guard
            .iter_mut()
            .find(|item| item.is_named(name))
            .ok_or(AppError::NotFound)?;

        if item.available == available {
            return Err(if available {
                AppError::AlreadyAvailable
            } else {
                AppError::AlreadyRented
            });
        }

        item.available = available;
        Ok(item.name.clone())
    }

    pub fn count(&self) -> AppResult<usize> {
        Ok(self.lock()?.len())
    }
}

fn trimmed(mut item: MediaItem) -> MediaItem {
    for field in [
        &mut item.name,
        &mut item.author,
        &mut item.date_published,
        &mut item.category,
    ] {
        *field = field.trim().to_string();
    }
    item
}

fn has_blank_field(item: &MediaItem) -> bool {
    [&item.name, &item.author, &item.date_published, &item.category]
        .iter()
        .any(|field| field.is_empty())
}
