//! 单次分析的检测配置

use rswebprobe_engine::DetectionMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ProbeResult, WebProbeError};

/// 检测配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionConfig {
    /// 直接检出阈值：STRICT 80 / NORMAL 60 / LOOSE 40
    pub mode: DetectionMode,
    /// 是否计算拦截评估
    pub blocking_detection_enabled: bool,
    /// 是否在结果中附带原始 headers / cookies / meta
    pub include_raw_data: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            mode: DetectionMode::Normal,
            blocking_detection_enabled: true,
            include_raw_data: false,
        }
    }
}

impl DetectionConfig {
    pub fn builder() -> DetectionConfigBuilder {
        DetectionConfigBuilder::new()
    }

    /// 从 JSON 文本解析，缺省字段取默认值
    pub fn from_json_str(content: &str) -> ProbeResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| WebProbeError::ConfigError(format!("检测配置解析失败: {}", e)))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> ProbeResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        log::debug!("Loading detection config from {}", path.display());
        Self::from_json_str(&content)
    }
}

/// 自定义构建器（链式 API）
#[derive(Debug, Clone, Default)]
pub struct DetectionConfigBuilder {
    config: DetectionConfig,
}

impl DetectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: DetectionMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn blocking_detection(mut self, enabled: bool) -> Self {
        self.config.blocking_detection_enabled = enabled;
        self
    }

    pub fn include_raw_data(mut self, include: bool) -> Self {
        self.config.include_raw_data = include;
        self
    }

    pub fn build(self) -> DetectionConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = DetectionConfig::default();
        assert_eq!(cfg.mode, DetectionMode::Normal);
        assert!(cfg.blocking_detection_enabled);
        assert!(!cfg.include_raw_data);
    }

    #[test]
    fn test_builder_chain() {
        let cfg = DetectionConfig::builder()
            .mode(DetectionMode::Strict)
            .blocking_detection(false)
            .include_raw_data(true)
            .build();
        assert_eq!(cfg.mode, DetectionMode::Strict);
        assert!(!cfg.blocking_detection_enabled);
        assert!(cfg.include_raw_data);
    }

    #[test]
    fn test_from_json_partial() {
        let cfg = DetectionConfig::from_json_str(r#"{"mode": "LOOSE", "includeRawData": true}"#).unwrap();
        assert_eq!(cfg.mode, DetectionMode::Loose);
        assert!(cfg.blocking_detection_enabled);
        assert!(cfg.include_raw_data);
    }

    #[test]
    fn test_from_json_invalid_mode() {
        let err = DetectionConfig::from_json_str(r#"{"mode": "FAST"}"#).unwrap_err();
        assert!(matches!(err, WebProbeError::ConfigError(_)));
    }
}
