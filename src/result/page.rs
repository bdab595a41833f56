//! 页面概况
use serde::{Deserialize, Serialize};

use crate::evidence::DomElement;

/// DOM 复杂度：LOW <100，MEDIUM <1000，其余 HIGH
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DomComplexity {
    #[default]
    Low,
    Medium,
    High,
}

impl DomComplexity {
    pub fn from_element_count(count: usize) -> Self {
        if count < 100 {
            DomComplexity::Low
        } else if count < 1000 {
            DomComplexity::Medium
        } else {
            DomComplexity::High
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAnalysis {
    pub page_size_bytes: usize,
    pub page_size_human: String,
    pub body_dom_element_count: usize,
    pub dom_complexity: DomComplexity,
    pub content_type: String,
    pub title: String,
    pub description: String,
    pub language: String,
    pub viewport: String,
    pub charset: String,
    pub has_forms: bool,
    pub has_javascript: bool,
    /// 与最终 URL 不同主机的资源数
    pub external_resources: usize,
    pub has_captcha_elements: bool,
    pub has_challenge_elements: bool,
    pub suspicious_elements: Vec<DomElement>,
}

/// 字节数转可读格式：Bytes / KB / MB
pub fn human_size(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let size = bytes as f64;
    if size < KB {
        format!("{} Bytes", bytes)
    } else if size < MB {
        format!("{:.2} KB", size / KB)
    } else {
        format!("{:.2} MB", size / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dom_complexity_bounds() {
        assert_eq!(DomComplexity::from_element_count(0), DomComplexity::Low);
        assert_eq!(DomComplexity::from_element_count(99), DomComplexity::Low);
        assert_eq!(DomComplexity::from_element_count(100), DomComplexity::Medium);
        assert_eq!(DomComplexity::from_element_count(999), DomComplexity::Medium);
        assert_eq!(DomComplexity::from_element_count(1000), DomComplexity::High);
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0 Bytes");
        assert_eq!(human_size(1023), "1023 Bytes");
        assert_eq!(human_size(1536), "1.50 KB");
        assert_eq!(human_size(3 * 1024 * 1024), "3.00 MB");
    }
}
