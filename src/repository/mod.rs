//! Repository layer: the process-wide catalog store

pub mod items;

/// Main repository struct holding the stores
#[derive(Clone, Default)]
pub struct Repository {
    pub items: items::ItemsRepository,
}

impl Repository {
    pub fn new(items: items::ItemsRepository) -> Self {
        Self { items }
    }
}
