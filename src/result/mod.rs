//! 输出结构：技术结果、拦截评估、页面概况与聚合
pub mod aggregator;
pub mod analysis;
pub mod blocking;
pub mod page;
pub mod technology;

pub use self::aggregator::ResultAggregator;
pub use self::analysis::{AnalysisResult, ConfidenceBreakdown, PageStats, RawData};
pub use self::blocking::{BlockingAssessment, BlockingIndicators, ChallengeType};
pub use self::page::{human_size, DomComplexity, PageAnalysis};
pub use self::technology::{round_confidence, DetectedTechnology, DetectionType};
