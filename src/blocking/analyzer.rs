//! 拦截/挑战评估
use log::debug;

use super::page_metrics::PageMetrics;
use super::patterns::{
    PhraseKind, ACCESS_DENIED_TITLE, CAPTCHA_VENDOR_KEYWORDS, CHALLENGE_VENDOR_KEYWORDS, SUSPICIOUS_PHRASES,
    SUSPICIOUS_STATUS_CODES, SUSPICIOUS_TITLES,
};
use crate::evidence::PageEvidence;
use crate::result::{BlockingAssessment, BlockingIndicators, ChallengeType, DetectedTechnology, PageAnalysis};

/// 判定为拦截的最低分
pub const BLOCKED_THRESHOLD: u32 = 40;
const MAX_SCORE: u32 = 100;

const STATUS_POINTS: u32 = 40;
const TINY_DOM_POINTS: u32 = 45;
const SMALL_DOM_POINTS: u32 = 25;
const MINIMAL_CONTENT_POINTS: u32 = 20;
const TITLE_POINTS: u32 = 20;
const MARKUP_POINTS: u32 = 10;
const SUSPICIOUS_ELEMENT_POINTS: u32 = 10;
const PHRASE_POINTS: u32 = 10;
const REDIRECT_POINTS: u32 = 10;
const LATENCY_POINTS: u32 = 10;

const TINY_DOM_ELEMENTS: usize = 10;
const SMALL_DOM_ELEMENTS: usize = 50;
const MINIMAL_TEXT_CHARS: usize = 500;
const SUSPICIOUS_REDIRECTS: u32 = 2;
const SLOW_RESPONSE_MS: u64 = 10_000;

/// 无状态的拦截评估器
///
/// 计分（累加后截断到 0-100，≥40 视为拦截）：
/// - 可疑状态码 (403/429/503/52x/530): 40
/// - body 元素 <10: 45；<50: 25
/// - 正文 <500 字符: 20
/// - 可疑标题: 20
/// - 验证码/挑战标记: 10
/// - 可疑元素: 10
/// - 每个可疑短语: 10（仅在内容或 DOM 已判定过少时计分）
/// - 重定向 ≥2: 10
/// - 耗时 >10s: 10
pub struct BlockingAnalyzer;

impl BlockingAnalyzer {
    pub fn assess(evidence: &PageEvidence, technologies: &[DetectedTechnology]) -> BlockingAssessment {
        let page = PageMetrics::analyze(evidence);
        Self::assess_with_page(evidence, technologies, &page)
    }

    /// 复用已计算的页面概况
    pub fn assess_with_page(
        evidence: &PageEvidence,
        technologies: &[DetectedTechnology],
        page: &PageAnalysis,
    ) -> BlockingAssessment {
        if evidence.is_failed() {
            return BlockingAssessment::default();
        }

        let mut indicators = BlockingIndicators::default();
        let mut score: u32 = 0;

        if SUSPICIOUS_STATUS_CODES.contains(&evidence.status_code) {
            indicators.status_code_suspicious = true;
            score += STATUS_POINTS;
        }

        let body_elements = evidence.counts.body_elements;
        if body_elements < TINY_DOM_ELEMENTS {
            indicators.minimal_dom_elements = true;
            score += TINY_DOM_POINTS;
        } else if body_elements < SMALL_DOM_ELEMENTS {
            indicators.minimal_dom_elements = true;
            score += SMALL_DOM_POINTS;
        }

        if evidence.text_content_length < MINIMAL_TEXT_CHARS {
            indicators.minimal_content = true;
            score += MINIMAL_CONTENT_POINTS;
        }

        if SUSPICIOUS_TITLES.iter().any(|re| re.is_match(&evidence.title)) {
            indicators.suspicious_title = true;
            score += TITLE_POINTS;
        }

        if page.has_captcha_elements || page.has_challenge_elements {
            indicators.captcha_detected = page.has_captcha_elements;
            indicators.challenge_detected = page.has_challenge_elements;
            score += MARKUP_POINTS;
        }

        if !page.suspicious_elements.is_empty() {
            indicators.suspicious_elements = true;
            score += SUSPICIOUS_ELEMENT_POINTS;
        }

        // 短语始终记录，计分只在页面已显得过少时生效
        let urls = format!("{}{}", evidence.final_url, evidence.url);
        let minimal = indicators.minimal_dom_elements || indicators.minimal_content;
        let mut phrase_kinds = Vec::new();
        let mut suspicious_phrases = Vec::new();
        for phrase in SUSPICIOUS_PHRASES.iter() {
            if phrase.regex.is_match(&evidence.html) || phrase.regex.is_match(&urls) {
                suspicious_phrases.push(phrase.label.to_string());
                phrase_kinds.push(phrase.kind);
                if minimal {
                    score += PHRASE_POINTS;
                }
            }
        }

        if evidence.redirect_count >= SUSPICIOUS_REDIRECTS {
            indicators.suspicious_redirects = true;
            score += REDIRECT_POINTS;
        }

        if evidence.latency_ms > SLOW_RESPONSE_MS {
            indicators.unusual_response_time = true;
            score += LATENCY_POINTS;
        }

        indicators.access_denied_text = ACCESS_DENIED_TITLE.is_match(&evidence.title)
            || phrase_kinds.contains(&PhraseKind::AccessDenied);

        let captcha_techs = Self::matching_techs(technologies, &CAPTCHA_VENDOR_KEYWORDS);
        let challenge_techs = Self::matching_techs(technologies, &CHALLENGE_VENDOR_KEYWORDS);
        indicators.bot_detection_js = !captcha_techs.is_empty() || !challenge_techs.is_empty();

        let challenge_type = if !captcha_techs.is_empty() {
            Some(ChallengeType::Captcha)
        } else if !challenge_techs.is_empty() {
            Some(ChallengeType::Javascript)
        } else if phrase_kinds.contains(&PhraseKind::BrowserCheck) {
            Some(ChallengeType::BrowserCheck)
        } else if phrase_kinds.contains(&PhraseKind::RateLimit) {
            Some(ChallengeType::RateLimit)
        } else if indicators.suspicious_title {
            Some(ChallengeType::AccessDenied)
        } else {
            None
        };

        let mut detected_bot_protection_techs: Vec<String> = Vec::new();
        for name in captcha_techs.into_iter().chain(challenge_techs) {
            if !detected_bot_protection_techs.iter().any(|n| n == name) {
                detected_bot_protection_techs.push(name.to_string());
            }
        }

        let blocking_score = score.min(MAX_SCORE);
        let likely_blocked = blocking_score >= BLOCKED_THRESHOLD;
        debug!(
            "Blocking assessment | url: {} | score: {} | blocked: {} | challenge: {:?} | phrases: {:?}",
            evidence.final_url, blocking_score, likely_blocked, challenge_type, suspicious_phrases
        );

        BlockingAssessment {
            likely_blocked,
            blocking_score,
            indicators,
            suspicious_phrases,
            challenge_type,
            detected_bot_protection_techs,
        }
    }

    /// 技术名（小写）包含任一关键字
    fn matching_techs<'a>(technologies: &'a [DetectedTechnology], keywords: &[&str]) -> Vec<&'a str> {
        technologies
            .iter()
            .filter(|t| {
                let name = t.name.to_lowercase();
                keywords.iter().any(|k| name.contains(k))
            })
            .map(|t| t.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::DetectionType;
    use rswebprobe_engine::ConfidenceLevel;

    fn tech(name: &str) -> DetectedTechnology {
        DetectedTechnology {
            name: name.into(),
            confidence: 90.0,
            confidence_level: ConfidenceLevel::High,
            detected_using: Vec::new(),
            matches: Vec::new(),
            detection_type: DetectionType::Detection,
            version: None,
            implied_by: None,
        }
    }

    fn rich_body() -> String {
        let rows: String = (0..60).map(|i| format!("<tr><td>Row {i}</td></tr>")).collect();
        format!(
            "<html><head><title>Quarterly report</title></head><body><table>{}</table><p>{}</p></body></html>",
            rows,
            "Revenue grew steadily across all regions this quarter. ".repeat(12)
        )
    }

    #[test]
    fn test_access_denied_captcha_page() {
        let ev = PageEvidence::builder("https://shop.example/")
            .status(403)
            .body(r#"<html><head><title>Access Denied</title></head><body><div class="g-recaptcha"></div></body></html>"#)
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[tech("Cloudflare"), tech("reCAPTCHA")]);

        assert!(assessment.likely_blocked);
        // 40 + 45 + 20 + 20 + 10 + 每个短语 10，封顶 100
        assert_eq!(assessment.blocking_score, 100);
        assert_eq!(assessment.challenge_type, Some(ChallengeType::Captcha));
        assert!(assessment.indicators.access_denied_text);
        assert!(assessment.indicators.captcha_detected);
        assert!(assessment.indicators.bot_detection_js);
        assert_eq!(assessment.detected_bot_protection_techs, vec!["reCAPTCHA", "Cloudflare"]);
    }

    #[test]
    fn test_access_denied_with_redirects_sets_all_indicators() {
        let body = r#"<html><head><title>Access Denied</title></head><body><div id="main">
            <h1>Access Denied</h1>
            <p>You don't have permission to access this resource on this server.</p>
            <div class="g-recaptcha" data-sitekey="6Lc_demo"></div>
            <p>Reference 18.2f1e3b17</p>
            <ul><li>Contact the site owner</li></ul>
            <footer>shop.example</footer>
        </div></body></html>"#;
        let mut ev = PageEvidence::builder("https://shop.example/")
            .status(403)
            .body(body)
            .redirect_count(3)
            .build()
            .unwrap();
        assert_eq!(ev.counts.body_elements, 8);
        ev.text_content_length = 200;

        let assessment = BlockingAnalyzer::assess(&ev, &[tech("Cloudflare"), tech("reCAPTCHA")]);
        let ind = &assessment.indicators;

        assert!(assessment.likely_blocked);
        assert_eq!(assessment.challenge_type, Some(ChallengeType::Captcha));
        assert!(ind.status_code_suspicious);
        assert!(ind.minimal_content);
        assert!(ind.minimal_dom_elements);
        assert!(ind.suspicious_title);
        assert!(ind.suspicious_redirects);
        assert!(ind.bot_detection_js);
        assert!(ind.captcha_detected);
        assert!(ind.access_denied_text);
        assert!(!ind.unusual_response_time);
        assert_eq!(assessment.blocking_score, 100);
    }

    #[test]
    fn test_small_dom_and_gated_phrase_points() {
        let page = |extra: &str| {
            let items: String = (0..30).map(|i| format!("<li>Item {i}</li>")).collect();
            format!(
                "<html><head><title>Bakery menu</title></head><body><ul>{}</ul><p>{}{}</p></body></html>",
                items,
                extra,
                "Fresh bread baked daily in our village kitchen. ".repeat(12)
            )
        };

        let ev = PageEvidence::builder("https://bakery.example/")
            .status(200)
            .body(page(""))
            .build()
            .unwrap();
        assert_eq!(ev.counts.body_elements, 32);
        assert!(ev.text_content_length >= 500);
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        // 仅 DOM 偏小：25
        assert_eq!(assessment.blocking_score, 25);
        assert!(assessment.indicators.minimal_dom_elements);
        assert!(!assessment.indicators.minimal_content);
        assert!(assessment.suspicious_phrases.is_empty());
        assert!(!assessment.likely_blocked);

        let ev = PageEvidence::builder("https://bakery.example/")
            .status(200)
            .body(page("Please wait while the menu loads. "))
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        // DOM 偏小放开短语计分：25 + 10
        assert_eq!(assessment.suspicious_phrases, vec!["please wait"]);
        assert_eq!(assessment.blocking_score, 35);
        assert!(!assessment.likely_blocked);
        assert_eq!(assessment.challenge_type, None);
    }

    #[test]
    fn test_rich_page_not_blocked() {
        let ev = PageEvidence::builder("https://news.example/")
            .body(rich_body())
            .latency_ms(300)
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert!(!assessment.likely_blocked);
        assert_eq!(assessment.blocking_score, 0);
        assert_eq!(assessment.indicators, BlockingIndicators::default());
        assert_eq!(assessment.challenge_type, None);
    }

    #[test]
    fn test_phrases_recorded_but_not_scored_on_rich_page() {
        let mut body = rich_body();
        body = body.replace("<p>", "<p>Protected by Cloudflare. ");
        let ev = PageEvidence::builder("https://news.example/").body(body).build().unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert_eq!(assessment.suspicious_phrases, vec!["cloudflare"]);
        assert_eq!(assessment.blocking_score, 0);
    }

    #[test]
    fn test_browser_check_and_rate_limit_types() {
        let ev = PageEvidence::builder("https://a.example/")
            .status(503)
            .body("<html><body><p>Checking your browser before accessing a.example</p></body></html>")
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert_eq!(assessment.challenge_type, Some(ChallengeType::BrowserCheck));
        assert!(assessment.likely_blocked);

        let ev = PageEvidence::builder("https://a.example/")
            .status(429)
            .body("<html><body>Too many requests</body></html>")
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert_eq!(assessment.challenge_type, Some(ChallengeType::RateLimit));
        assert!(assessment.indicators.status_code_suspicious);
    }

    #[test]
    fn test_title_only_gives_access_denied() {
        let ev = PageEvidence::builder("https://a.example/")
            .body("<html><head><title>Just a moment...</title></head><body></body></html>")
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert_eq!(assessment.challenge_type, Some(ChallengeType::AccessDenied));
        assert!(!assessment.indicators.access_denied_text);
    }

    #[test]
    fn test_redirects_and_latency() {
        let ev = PageEvidence::builder("https://news.example/")
            .body(rich_body())
            .redirect_count(3)
            .latency_ms(12_000)
            .build()
            .unwrap();
        let assessment = BlockingAnalyzer::assess(&ev, &[]);
        assert!(assessment.indicators.suspicious_redirects);
        assert!(assessment.indicators.unusual_response_time);
        assert_eq!(assessment.blocking_score, 20);
        assert!(!assessment.likely_blocked);
    }

    #[test]
    fn test_idempotent_and_failed() {
        let ev = PageEvidence::builder("https://a.example/")
            .status(403)
            .body("<html><body>blocked</body></html>")
            .build()
            .unwrap();
        let techs = [tech("DataDome")];
        assert_eq!(BlockingAnalyzer::assess(&ev, &techs), BlockingAnalyzer::assess(&ev, &techs));
        assert_eq!(
            BlockingAnalyzer::assess(&ev, &techs).challenge_type,
            Some(ChallengeType::Javascript)
        );

        let failed = PageEvidence::failed("https://a.example/", "reset");
        assert_eq!(BlockingAnalyzer::assess(&failed, &techs), BlockingAssessment::default());
    }
}
