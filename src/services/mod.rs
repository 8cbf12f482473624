pub mod admin;
pub mod export;
pub mod stats;

pub use admin::AdminGate;
pub use export::ExportService;
pub use stats::{StatKey, StatsStore, UsageStats};
