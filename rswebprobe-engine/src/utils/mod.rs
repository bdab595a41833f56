//! 工具模块：日志预览 + 版本提取
pub mod preview;
pub mod version_extractor;

pub use preview::preview_compact;
pub use version_extractor::VersionExtractor;
