pub mod decode;
pub mod manager;
pub mod models;

pub use manager::BookmarkManager;
pub use models::{BookmarkEntry, LoadState};
