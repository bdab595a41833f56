//! 提取模块：从原始响应体中提取检测所需信息
pub mod html_extractor;
pub mod html_input_guard;

pub use self::html_extractor::{ExtractResult, HtmlExtractor};
pub use self::html_input_guard::HtmlInputGuard;
