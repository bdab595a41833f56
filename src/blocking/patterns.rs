//! 拦截判定用的固定特征表
use once_cell::sync::Lazy;
use regex::Regex;

/// 可疑状态码：403/429/503 与 Cloudflare 52x/530
pub const SUSPICIOUS_STATUS_CODES: [u16; 12] = [403, 429, 503, 520, 521, 522, 523, 524, 525, 526, 527, 530];

/// 验证码标记
pub const CAPTCHA_SELECTORS: [&str; 4] = [".g-recaptcha", ".h-captcha", ".cf-turnstile", "[data-sitekey]"];

/// 挑战页标记
pub const CHALLENGE_SELECTORS: [&str; 4] = [
    r#"[id*="challenge"]"#,
    r#"[class*="challenge"]"#,
    r#"[id*="verification"]"#,
    r#"[class*="verification"]"#,
];

/// 可疑元素
pub const SUSPICIOUS_SELECTORS: [&str; 4] = [
    r#"[id*="captcha"]"#,
    r#"[class*="captcha"]"#,
    r#"[id*="protection"]"#,
    r#"[class*="protection"]"#,
];

/// 验证码厂商关键字（按技术名小写包含匹配）
pub const CAPTCHA_VENDOR_KEYWORDS: [&str; 8] = [
    "captcha",
    "recaptcha",
    "hcaptcha",
    "turnstile",
    "geetest",
    "keycaptcha",
    "arkose",
    "funcaptcha",
];

/// JS 挑战厂商关键字
pub const CHALLENGE_VENDOR_KEYWORDS: [&str; 6] =
    ["cloudflare", "datadome", "imperva", "akamai", "perimeterx", "incapsula"];

/// 源码中的验证码佐证
pub static CAPTCHA_SOURCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)recaptcha|hcaptcha|turnstile").unwrap());

/// 源码中的挑战页佐证
pub static CHALLENGE_SOURCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)challenge-platform|browser-verification").unwrap());

/// 标题中的拒绝访问措辞
pub static ACCESS_DENIED_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(denied|forbidden|unauthorized)\b").unwrap());

/// 可疑短语类别，决定挑战类型推断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseKind {
    BrowserCheck,
    RateLimit,
    AccessDenied,
    Other,
}

/// 可疑短语：输出标签 + 类别 + 正则
#[derive(Debug)]
pub struct SuspiciousPhrase {
    pub label: &'static str,
    pub kind: PhraseKind,
    pub regex: Regex,
}

fn phrase(label: &'static str, kind: PhraseKind, pattern: &str) -> SuspiciousPhrase {
    SuspiciousPhrase {
        label,
        kind,
        regex: Regex::new(&format!("(?i){}", pattern)).unwrap(),
    }
}

pub static SUSPICIOUS_PHRASES: Lazy<Vec<SuspiciousPhrase>> = Lazy::new(|| {
    use PhraseKind::*;
    vec![
        phrase("rate limit", RateLimit, r"\brate ?limit(ed)?\b"),
        phrase("too many requests", RateLimit, r"\btoo many requests\b"),
        phrase("suspicious activity", Other, r"\bsuspicious (activity|traffic)\b"),
        phrase("access denied", AccessDenied, r"\baccess (denied|restricted|blocked)\b"),
        phrase("blocked", Other, r"\b(blocked|your connection has been blocked)\b"),
        phrase("automated request", Other, r"\b(request looks automated|automated request)\b"),
        phrase("unusual traffic", Other, r"\b(unusual|suspicious) traffic\b"),
        phrase("verify human", Other, r"\bverify (you are )?(human|(ro)?bot)?\b"),
        phrase("bot check", Other, r"\b((ro)?bot check|you are not a (ro)?bot)\b"),
        phrase("solve captcha", Other, r"\bsolve (the )?(captcha|puzzle|challenge)\b"),
        phrase(
            "browser verification",
            BrowserCheck,
            r"\b(security check|browser verification|checking your browser)\b",
        ),
        phrase("cloudflare", Other, r"\bcloudflare\b"),
        phrase("ddos protection", Other, r"\bddos protection\b"),
        phrase("please wait", Other, r"\bplease wait\b"),
        phrase(
            "cookies or javascript required",
            Other,
            r"\b(cookies|javascript)\b.*\b(enabled|disabled)\b|\b(enabled|disabled)\b.*\b(cookies|javascript)\b",
        ),
    ]
});

pub static SUSPICIOUS_TITLES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bjust a moment\b",
        r"\bplease wait\b",
        r"\b(access|permission) denied\b",
        r"\b(blocked|blocked access)\b",
        r"\b(error|error \d{3})\b",
        r"\bforbidden\b",
        r"\bunauthorized\b",
        r"\bsecurity (check|verification)\b",
        r"\bddos protection\b",
        r"\b(ro)?bot detection\b",
        r"\bhuman\b.*\b(ro)?bot\b|\b(ro)?bot\b.*\bhuman\b",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){}", p)).unwrap())
    .collect()
});
