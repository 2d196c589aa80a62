pub mod models;
pub mod observers;
pub mod tracker;

pub use models::DailyStat;
pub use observers::{ObserverRegistry, SubscriberId};
pub use tracker::StatsTracker;
