pub mod catalog;
pub mod manager;
pub mod models;

pub use catalog::WordCatalog;
pub use manager::{WordStateManager, SAVE_DEBOUNCE, WORD_BATCH_SIZE};
pub use models::{WordId, WordRecord, WordView};
