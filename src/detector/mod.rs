//! 检测模块：技术检测核心逻辑
pub mod detector;
pub mod engine;

// 导出核心接口
pub use self::detector::{Evaluation, TechnologyDetector};
pub use self::engine::DetectionEngine;
