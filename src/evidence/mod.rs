//! 页面证据：一次抓取的只读输入
pub mod builder;
pub mod dom;

pub use self::builder::PageEvidenceBuilder;
pub use self::dom::{DomElement, DomQuery, HtmlDocument};
pub use crate::utils::extractor::html_extractor::PageCounts;

use http::HeaderMap;
use indexmap::IndexMap;
use std::sync::Arc;

use crate::utils::HeaderConverter;

/// 单个 URL 的检测输入
/// 由抓取/解析层产出，检测核心只读
#[derive(Debug, Clone, Default)]
pub struct PageEvidence {
    /// 原始请求 URL
    pub url: String,
    /// 跟随重定向后的最终 URL
    pub final_url: String,
    pub status_code: u16,
    /// 响应耗时（毫秒）
    pub latency_ms: u64,
    pub html: String,
    /// DOM 查询句柄，None 时 dom 通道与选择器类指标全部视为未命中
    pub dom: Option<Arc<dyn DomQuery>>,
    pub headers: HeaderMap,
    /// Cookie 名（保留大小写）→ 值
    pub cookies: IndexMap<String, String>,
    pub inline_scripts: Vec<String>,
    pub script_srcs: Vec<String>,
    /// script/link/img/iframe/source/video/audio 引用的资源 URL
    pub asset_urls: Vec<String>,
    /// meta 名（小写）→ content
    pub meta: IndexMap<String, String>,
    pub title: String,
    pub description: String,
    pub content_type: String,
    pub counts: PageCounts,
    pub text_content_length: usize,
    pub redirect_count: u32,
    /// 抓取失败原因；Some 时分析退化为全零结果
    pub fetch_error: Option<String>,
}

impl PageEvidence {
    pub fn builder(url: impl Into<String>) -> PageEvidenceBuilder {
        PageEvidenceBuilder::new(url)
    }

    /// 抓取失败的哨兵证据
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            final_url: url.clone(),
            url,
            fetch_error: Some(reason.into()),
            ..Self::default()
        }
    }

    #[inline(always)]
    pub fn is_failed(&self) -> bool {
        self.fetch_error.is_some()
    }

    /// 大小写不敏感查找 header，多值以 ", " 拼接
    pub fn header(&self, name: &str) -> Option<String> {
        HeaderConverter::joined(&self.headers, name)
    }
}
