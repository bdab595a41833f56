//! 拦截/挑战判定与页面概况
pub mod analyzer;
pub mod page_metrics;
pub mod patterns;

pub use self::analyzer::{BlockingAnalyzer, BLOCKED_THRESHOLD};
pub use self::page_metrics::PageMetrics;
