//! 技术检测结果
use rswebprobe_engine::{Channel, ConfidenceLevel, PatternDescriptor};
use serde::{Deserialize, Serialize};

/// 检出方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionType {
    /// 自身证据达到阈值
    Detection,
    /// 经 implies/requires 拉入
    Transitive,
}

/// 技术结果，创建后不再修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedTechnology {
    pub name: String,
    /// 0-100，保留一位小数
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub detected_using: Vec<Channel>,
    pub matches: Vec<PatternDescriptor>,
    pub detection_type: DetectionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 拉入该技术的上游技术，序列化自动跳过空值
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_by: Option<String>,
}

impl DetectedTechnology {
    #[inline(always)]
    pub fn is_transitive(&self) -> bool {
        self.detection_type == DetectionType::Transitive
    }
}

impl std::fmt::Display for DetectedTechnology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.version {
            Some(v) if !v.is_empty() => write!(f, "{} {} ({}%)", self.name, v, self.confidence),
            _ => write!(f, "{} ({}%)", self.name, self.confidence),
        }
    }
}

/// 保留一位小数
#[inline(always)]
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_and_display() {
        assert_eq!(round_confidence(59.49), 59.5);
        assert_eq!(round_confidence(42.0), 42.0);

        let tech = DetectedTechnology {
            name: "Nginx".into(),
            confidence: 75.0,
            confidence_level: ConfidenceLevel::Medium,
            detected_using: vec![Channel::Headers],
            matches: Vec::new(),
            detection_type: DetectionType::Detection,
            version: Some("1.25.3".into()),
            implied_by: None,
        };
        assert_eq!(tech.to_string(), "Nginx 1.25.3 (75%)");

        let json = serde_json::to_value(&tech).unwrap();
        assert_eq!(json["detectionType"], "detection");
        assert_eq!(json["confidenceLevel"], "MEDIUM");
        assert_eq!(json["detectedUsing"][0], "headers");
        assert!(json.get("impliedBy").is_none());
    }
}
