//! 工具模块：证据提取、Header 转换、结果更新
pub mod detection_updater;
pub mod extractor;
pub mod header_converter;

pub use self::detection_updater::DetectionUpdater;
pub use self::extractor::{ExtractResult, HtmlExtractor, HtmlInputGuard};
pub use self::header_converter::HeaderConverter;
