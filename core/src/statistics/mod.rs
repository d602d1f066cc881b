pub mod summary;

pub use summary::{summarize, summary_map, StatisticsSummary, SummaryOptions};
