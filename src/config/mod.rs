//! 检测配置
pub mod detection;

pub use self::detection::{DetectionConfig, DetectionConfigBuilder};
