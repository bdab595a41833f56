//! 基于 lol_html 选择器的 DOM 查询
use lol_html::{element, HtmlRewriter, Selector, Settings};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::sync::Arc;

use crate::error::{ProbeResult, WebProbeError};

/// 查询命中的元素摘要
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomElement {
    pub tag: String,
    pub id: String,
    pub class: String,
}

/// DOM 查询句柄
/// 非法选择器返回错误而非 panic，调用方按"无匹配"处理
pub trait DomQuery: std::fmt::Debug + Send + Sync {
    fn query_all(&self, selector: &str) -> ProbeResult<Vec<DomElement>>;

    /// 选择器是否至少命中一个元素；非法选择器视为未命中
    fn exists(&self, selector: &str) -> bool {
        self.query_all(selector).map(|found| !found.is_empty()).unwrap_or(false)
    }
}

/// 持有原始 HTML，每次查询做一次流式遍历
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    html: Arc<str>,
}

impl HtmlDocument {
    pub fn new(html: impl Into<Arc<str>>) -> Self {
        Self { html: html.into() }
    }

    pub fn html(&self) -> &str {
        &self.html
    }
}

impl DomQuery for HtmlDocument {
    fn query_all(&self, selector: &str) -> ProbeResult<Vec<DomElement>> {
        let selector = selector.trim();
        // 先行校验，保证下方宏内的解析必定成功
        selector
            .parse::<Selector>()
            .map_err(|e| WebProbeError::InvalidSelector(format!("{}: {}", selector, e)))?;

        let found = RefCell::new(Vec::new());
        let settings = Settings {
            strict: false,
            element_content_handlers: vec![element!(selector, |el| {
                found.borrow_mut().push(DomElement {
                    tag: el.tag_name().to_ascii_lowercase(),
                    id: el.get_attribute("id").unwrap_or_default(),
                    class: el.get_attribute("class").unwrap_or_default(),
                });
                Ok(())
            })],
            ..Settings::default()
        };

        let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
        if let Err(e) = rewriter.write(self.html.as_bytes()) {
            log::debug!("DOM query aborted: selector={} error={}", selector, e);
        }
        if let Err(e) = rewriter.end() {
            log::debug!("DOM query end failed: selector={} error={}", selector, e);
        }

        Ok(found.into_inner())
    }
}
