//! 页面概况统计
use url::Url;

use super::patterns::{CAPTCHA_SELECTORS, CAPTCHA_SOURCE, CHALLENGE_SELECTORS, CHALLENGE_SOURCE, SUSPICIOUS_SELECTORS};
use crate::evidence::{DomElement, PageEvidence};
use crate::result::{human_size, DomComplexity, PageAnalysis};

pub struct PageMetrics;

impl PageMetrics {
    pub fn analyze(evidence: &PageEvidence) -> PageAnalysis {
        let meta = |name: &str| evidence.meta.get(name).filter(|v| !v.trim().is_empty()).cloned();

        PageAnalysis {
            page_size_bytes: evidence.html.len(),
            page_size_human: human_size(evidence.html.len()),
            body_dom_element_count: evidence.counts.body_elements,
            dom_complexity: DomComplexity::from_element_count(evidence.counts.body_elements),
            content_type: evidence.content_type.clone(),
            title: evidence.title.clone(),
            description: evidence.description.clone(),
            language: meta("language").or_else(|| meta("lang")).unwrap_or_else(|| "unknown".to_string()),
            viewport: meta("viewport").unwrap_or_else(|| "not set".to_string()),
            charset: meta("charset").unwrap_or_else(|| "unknown".to_string()),
            has_forms: evidence.counts.forms > 0,
            has_javascript: evidence.counts.scripts > 0,
            external_resources: Self::count_external(&evidence.final_url, &evidence.asset_urls),
            has_captcha_elements: Self::has_captcha_elements(evidence),
            has_challenge_elements: Self::has_challenge_elements(evidence),
            suspicious_elements: Self::suspicious_elements(evidence),
        }
    }

    /// 验证码标记存在，或源码含验证码佐证
    pub fn has_captcha_elements(evidence: &PageEvidence) -> bool {
        Self::any_selector(evidence, &CAPTCHA_SELECTORS) || CAPTCHA_SOURCE.is_match(&evidence.html)
    }

    /// 挑战页标记存在，或源码含挑战页佐证
    pub fn has_challenge_elements(evidence: &PageEvidence) -> bool {
        Self::any_selector(evidence, &CHALLENGE_SELECTORS) || CHALLENGE_SOURCE.is_match(&evidence.html)
    }

    /// 命中可疑选择器的元素，同一元素只记一次
    pub fn suspicious_elements(evidence: &PageEvidence) -> Vec<DomElement> {
        let Some(dom) = evidence.dom.as_ref() else {
            return Vec::new();
        };

        let mut elements: Vec<DomElement> = Vec::new();
        for selector in SUSPICIOUS_SELECTORS {
            for element in dom.query_all(selector).unwrap_or_default() {
                if !elements.contains(&element) {
                    elements.push(element);
                }
            }
        }
        elements
    }

    fn any_selector(evidence: &PageEvidence, selectors: &[&str]) -> bool {
        evidence
            .dom
            .as_ref()
            .map(|dom| selectors.iter().any(|s| dom.exists(s)))
            .unwrap_or(false)
    }

    /// 相对最终 URL 解析后主机不同的资源数；无主机（data: 等）不计
    pub fn count_external(final_url: &str, asset_urls: &[String]) -> usize {
        let base = Url::parse(final_url).ok();
        let base_host = base
            .as_ref()
            .and_then(|u| u.host_str())
            .map(str::to_ascii_lowercase);

        asset_urls
            .iter()
            .filter(|asset| {
                let resolved = match &base {
                    Some(b) => b.join(asset).ok(),
                    None => Url::parse(asset).ok(),
                };
                match resolved.as_ref().and_then(|u| u.host_str()) {
                    Some(host) => Some(host.to_ascii_lowercase()) != base_host,
                    None => false,
                }
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(body: &str) -> PageEvidence {
        PageEvidence::builder("https://shop.example/")
            .final_url("https://www.shop.example/home")
            .header("Content-Type", "text/html")
            .body(body.to_string())
            .build()
            .unwrap()
    }

    #[test]
    fn test_page_analysis_fields() {
        let ev = build(
            r#"<html><head><title>Shop</title><meta charset="utf-8"><meta name="lang" content="en">
            <script src="/app.js"></script><script src="https://cdn.other.example/lib.js"></script>
            <link rel="icon" href="data:image/png;base64,AAAA"></head>
            <body><form><input></form><div id="captcha-box" class="captcha protection"></div></body></html>"#,
        );
        let page = PageMetrics::analyze(&ev);

        assert_eq!(page.page_size_bytes, ev.html.len());
        assert_eq!(page.title, "Shop");
        assert_eq!(page.content_type, "text/html");
        assert_eq!(page.language, "en");
        assert_eq!(page.viewport, "not set");
        assert_eq!(page.charset, "utf-8");
        assert!(page.has_forms);
        assert!(page.has_javascript);
        assert_eq!(page.external_resources, 1);
        assert_eq!(page.dom_complexity, DomComplexity::Low);
        assert!(!page.has_captcha_elements);
        assert_eq!(
            page.suspicious_elements,
            vec![DomElement { tag: "div".into(), id: "captcha-box".into(), class: "captcha protection".into() }]
        );
    }

    #[test]
    fn test_captcha_and_challenge_markup() {
        let ev = build(r#"<html><body><div class="cf-turnstile"></div><div id="challenge-stage"></div></body></html>"#);
        assert!(PageMetrics::has_captcha_elements(&ev));
        assert!(PageMetrics::has_challenge_elements(&ev));
    }

    #[test]
    fn test_source_corroboration_without_dom() {
        let mut ev = PageEvidence::default();
        ev.html = r#"<script src="/cdn-cgi/challenge-platform/scripts/jsd/main.js"></script>"#.into();
        assert!(PageMetrics::has_challenge_elements(&ev));
        assert!(!PageMetrics::has_captcha_elements(&ev));
        assert!(PageMetrics::suspicious_elements(&ev).is_empty());
    }

    #[test]
    fn test_count_external_relative_and_absolute() {
        let assets = vec![
            "/a.js".to_string(),
            "//cdn.example.net/b.js".to_string(),
            "https://WWW.SHOP.EXAMPLE/c.css".to_string(),
            "https://fonts.example.org/d.woff".to_string(),
        ];
        assert_eq!(PageMetrics::count_external("https://www.shop.example/", &assets), 2);
        assert_eq!(PageMetrics::count_external("", &assets), 2);
    }
}
