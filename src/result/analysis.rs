//! 单个 URL 的完整分析输出
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{BlockingAssessment, DetectedTechnology, PageAnalysis};

/// 各置信度等级的技术数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceBreakdown {
    #[serde(rename = "HIGH")]
    pub high: usize,
    #[serde(rename = "MEDIUM")]
    pub medium: usize,
    #[serde(rename = "LOW")]
    pub low: usize,
}

/// 检测统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub total: usize,
    pub by_confidence: ConfidenceBreakdown,
    /// 平均置信度，保留一位小数；无结果时为 0
    pub average_confidence: f64,
    /// 置信度最高的技术（排序后的首项）
    pub top_detection: Option<DetectedTechnology>,
}

/// 原始证据快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawData {
    pub headers: IndexMap<String, String>,
    pub cookies: IndexMap<String, String>,
    pub meta_tags: IndexMap<String, String>,
}

/// 分析结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub url: String,
    /// 响应耗时（毫秒）
    pub fetch_time: u64,
    pub final_url: String,
    pub status_code: u16,
    pub technologies: Vec<DetectedTechnology>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blocking_indicators: Option<BlockingAssessment>,
    pub page_analysis: PageAnalysis,
    pub stats: PageStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_data: Option<RawData>,
    pub text_content_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl AnalysisResult {
    /// 按名称查找已检出技术
    pub fn technology(&self, name: &str) -> Option<&DetectedTechnology> {
        self.technologies.iter().find(|t| t.name == name)
    }

    pub fn is_likely_blocked(&self) -> bool {
        self.blocking_indicators
            .as_ref()
            .map(|b| b.likely_blocked)
            .unwrap_or(false)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl std::fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.technologies.iter().map(|t| t.to_string()).collect();
        write!(f, "{} [{}] 技术栈: {}", self.final_url, self.status_code, names.join(", "))
    }
}
