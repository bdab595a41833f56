//! 由原始响应构建 PageEvidence
use http::header::{HeaderMap, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use super::{DomQuery, HtmlDocument, PageEvidence};
use crate::error::ProbeResult;
use crate::utils::extractor::{HtmlExtractor, HtmlInputGuard};
use crate::utils::HeaderConverter;

/// 链式构建器：状态码、最终 URL、headers、响应体、耗时、重定向次数
#[derive(Debug, Clone)]
pub struct PageEvidenceBuilder {
    url: String,
    final_url: Option<String>,
    status_code: u16,
    headers: HeaderMap,
    raw_headers: Vec<(String, String)>,
    body: Vec<u8>,
    latency_ms: u64,
    redirect_count: u32,
}

impl PageEvidenceBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            final_url: None,
            status_code: 200,
            headers: HeaderMap::new(),
            raw_headers: Vec::new(),
            body: Vec::new(),
            latency_ms: 0,
            redirect_count: 0,
        }
    }

    pub fn status(mut self, status_code: u16) -> Self {
        self.status_code = status_code;
        self
    }

    pub fn final_url(mut self, final_url: impl Into<String>) -> Self {
        self.final_url = Some(final_url.into());
        self
    }

    /// 合并一份已解析的 HeaderMap
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        for (name, value) in headers.iter() {
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    /// 追加单个 header，名称/值在 build 时校验
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn redirect_count(mut self, redirect_count: u32) -> Self {
        self.redirect_count = redirect_count;
        self
    }

    /// 校验 URL 与 headers，解析 cookie，提取 HTML 证据
    pub fn build(self) -> ProbeResult<PageEvidence> {
        let url = Url::parse(self.url.trim())?;
        let final_url = match &self.final_url {
            Some(f) => Url::parse(f.trim())?,
            None => url.clone(),
        };

        let mut headers = self.headers;
        let extra = HeaderConverter::from_pairs(self.raw_headers)?;
        for (name, value) in extra.iter() {
            headers.append(name.clone(), value.clone());
        }

        let html = HtmlInputGuard::guard(String::from_utf8_lossy(&self.body)).into_owned();
        let extracted = HtmlExtractor::extract(&html);
        let cookies = HeaderConverter::parse_cookies(&headers);
        let content_type = HeaderConverter::joined(&headers, CONTENT_TYPE.as_str()).unwrap_or_default();

        log::debug!(
            "Evidence built | url: {} | status: {} | html: {} bytes | scripts: {} | assets: {} | cookies: {}",
            final_url,
            self.status_code,
            html.len(),
            extracted.inline_scripts.len(),
            extracted.asset_urls.len(),
            cookies.len()
        );

        let dom: Arc<dyn DomQuery> = Arc::new(HtmlDocument::new(html.as_str()));

        Ok(PageEvidence {
            url: url.to_string(),
            final_url: final_url.to_string(),
            status_code: self.status_code,
            latency_ms: self.latency_ms,
            dom: Some(dom),
            headers,
            cookies,
            inline_scripts: extracted.inline_scripts,
            script_srcs: extracted.script_srcs,
            asset_urls: extracted.asset_urls,
            meta: extracted.meta,
            title: extracted.title,
            description: extracted.description,
            content_type,
            counts: extracted.counts,
            text_content_length: extracted.text_content_length,
            redirect_count: self.redirect_count,
            fetch_error: None,
            html,
        })
    }
}
