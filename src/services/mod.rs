//! Services Layer
//!
//! Business rules of a communication book, free of any HTTP concern.
//! Every function takes the store connection it works on; nothing here keeps
//! state between calls.

pub mod asset_service;
pub mod book_service;
pub mod navigation_service;
pub mod page_service;
pub mod placement_service;

// Re-export for convenience
pub use asset_service::normalize_url;
pub use book_service::DeletionReport;
pub use navigation_service::RuntimeView;
