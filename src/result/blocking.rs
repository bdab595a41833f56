//! 拦截/挑战评估结果
use serde::{Deserialize, Serialize};

/// 挑战类型，按优先级链判定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeType {
    Captcha,
    Javascript,
    BrowserCheck,
    RateLimit,
    AccessDenied,
}

impl ChallengeType {
    pub fn as_str(self) -> &'static str {
        match self {
            ChallengeType::Captcha => "captcha",
            ChallengeType::Javascript => "javascript",
            ChallengeType::BrowserCheck => "browser_check",
            ChallengeType::RateLimit => "rate_limit",
            ChallengeType::AccessDenied => "access_denied",
        }
    }
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 拦截指标位
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingIndicators {
    pub status_code_suspicious: bool,
    pub minimal_content: bool,
    pub minimal_dom_elements: bool,
    pub suspicious_title: bool,
    pub captcha_detected: bool,
    pub challenge_detected: bool,
    pub bot_detection_js: bool,
    pub access_denied_text: bool,
    pub suspicious_redirects: bool,
    pub unusual_response_time: bool,
    pub suspicious_elements: bool,
}

/// 拦截评估
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockingAssessment {
    /// score ≥ 40
    pub likely_blocked: bool,
    /// 0-100
    pub blocking_score: u32,
    pub indicators: BlockingIndicators,
    /// 命中的可疑短语（小写标签）
    pub suspicious_phrases: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub challenge_type: Option<ChallengeType>,
    /// 触发反爬判定的已检出技术名
    pub detected_bot_protection_techs: Vec<String>,
}
