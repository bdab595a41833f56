//! HTML 证据提取器
//! 单次流式遍历，提取脚本、资源 URL、meta、标题与元素计数
use indexmap::IndexMap;
use lol_html::{doc_text, element, text, HtmlRewriter, Settings};
use std::cell::RefCell;

/// 单个 URL 属性允许的最大长度
const MAX_URL_LEN: usize = 2048;
/// 通过 src 属性引用外部资源的媒体类标签（script 单独处理）
const MEDIA_TAGS: [&str; 5] = ["img", "iframe", "source", "video", "audio"];
/// 单个 meta content 允许的最大长度
const MAX_META_LEN: usize = 4096;

/// 元素计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCounts {
    pub elements: usize,
    pub body_elements: usize,
    pub scripts: usize,
    pub images: usize,
    pub links: usize,
    pub forms: usize,
}

/// 提取结果结构体
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExtractResult {
    pub title: String,
    pub description: String,
    pub meta: IndexMap<String, String>,
    pub inline_scripts: Vec<String>,
    pub script_srcs: Vec<String>,
    pub asset_urls: Vec<String>,
    pub counts: PageCounts,
    /// body 文本 trim 后的字符数（无 body 时取整个文档）
    pub text_content_length: usize,
}

#[derive(Default)]
struct ExtractState {
    result: ExtractResult,
    title_buf: String,
    title_done: bool,
    script_buf: String,
    body_text: String,
    doc_text: String,
    body_seen: bool,
}

impl ExtractState {
    fn push_url(target: &mut Vec<String>, url: &str) {
        let url = url.trim();
        if url.is_empty()
            || url.len() > MAX_URL_LEN
            || url.contains('<')
            || url.contains('>')
            || url.contains('\n')
            || url.contains('\r')
        {
            return;
        }
        target.push(url.to_owned());
    }

    fn push_meta(&mut self, name: &str, content: String) {
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() || content.len() > MAX_META_LEN {
            return;
        }
        self.result.meta.entry(name).or_insert(content);
    }

    fn finish(mut self) -> ExtractResult {
        if !self.body_seen {
            self.result.counts.body_elements = self.result.counts.elements;
            self.body_text = std::mem::take(&mut self.doc_text);
        }
        self.result.title = self.title_buf.trim().to_string();
        self.result.description = self.result.meta.get("description").cloned().unwrap_or_default();
        self.result.text_content_length = self.body_text.trim().chars().count();
        self.result
    }
}

/// 对外暴露的HTML提取器
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn extract(html: &str) -> ExtractResult {
        let state = RefCell::new(ExtractState::default());

        let settings = Settings {
            strict: false, // 兼容畸形HTML/大小写标签/残缺标签
            element_content_handlers: vec![
                element!("*", |el| {
                    let mut st = state.borrow_mut();
                    let counts = &mut st.result.counts;
                    counts.elements += 1;
                    match el.tag_name().to_ascii_lowercase().as_str() {
                        "script" => counts.scripts += 1,
                        "img" => counts.images += 1,
                        "link" => counts.links += 1,
                        "form" => counts.forms += 1,
                        _ => {}
                    }
                    Ok(())
                }),
                element!("body", |_el| {
                    state.borrow_mut().body_seen = true;
                    Ok(())
                }),
                element!("body *", |_el| {
                    state.borrow_mut().result.counts.body_elements += 1;
                    Ok(())
                }),
                element!("script[src]", |el| {
                    if let Some(src) = el.get_attribute("src") {
                        let mut st = state.borrow_mut();
                        ExtractState::push_url(&mut st.result.script_srcs, &src);
                        ExtractState::push_url(&mut st.result.asset_urls, &src);
                    }
                    Ok(())
                }),
                element!("link[href]", |el| {
                    if let Some(href) = el.get_attribute("href") {
                        ExtractState::push_url(&mut state.borrow_mut().result.asset_urls, &href);
                    }
                    Ok(())
                }),
                element!("[src]", |el| {
                    let tag = el.tag_name().to_ascii_lowercase();
                    if MEDIA_TAGS.contains(&tag.as_str()) {
                        if let Some(src) = el.get_attribute("src") {
                            ExtractState::push_url(&mut state.borrow_mut().result.asset_urls, &src);
                        }
                    }
                    Ok(())
                }),
                element!("meta", |el| {
                    let mut st = state.borrow_mut();
                    if let Some(charset) = el.get_attribute("charset") {
                        st.push_meta("charset", charset);
                    }
                    let name = el.get_attribute("name").or_else(|| el.get_attribute("property"));
                    if let (Some(n), Some(c)) = (name, el.get_attribute("content")) {
                        st.push_meta(&n, c);
                    }
                    Ok(())
                }),
                text!("title", |t| {
                    let mut st = state.borrow_mut();
                    if !st.title_done {
                        st.title_buf.push_str(t.as_str());
                        if t.last_in_text_node() {
                            st.title_done = true;
                        }
                    }
                    Ok(())
                }),
                text!("script", |t| {
                    let mut st = state.borrow_mut();
                    st.script_buf.push_str(t.as_str());
                    if t.last_in_text_node() {
                        let script = std::mem::take(&mut st.script_buf);
                        let script = script.trim();
                        if !script.is_empty() {
                            st.result.inline_scripts.push(script.to_string());
                        }
                    }
                    Ok(())
                }),
                text!("body", |t| {
                    state.borrow_mut().body_text.push_str(t.as_str());
                    Ok(())
                }),
            ],
            document_content_handlers: vec![doc_text!(|t| {
                state.borrow_mut().doc_text.push_str(t.as_str());
                Ok(())
            })],
            ..Settings::default()
        };

        // 只提取不修改，空输出接收器
        let mut rewriter = HtmlRewriter::new(settings, |_: &[u8]| {});
        if let Err(e) = rewriter.write(html.as_bytes()) {
            log::debug!("HTML extraction stopped early: {}", e);
        }
        if let Err(e) = rewriter.end() {
            log::debug!("HTML extraction end failed: {}", e);
        }

        state.into_inner().finish()
    }
}
