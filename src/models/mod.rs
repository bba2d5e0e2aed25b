//! Data models for the media catalog

pub mod item;
pub mod response;

// Re-export commonly used types
pub use item::{MediaItem, NewMediaItem, SearchFilter, SearchQuery, SortKey};
pub use response::ActionResponse;
