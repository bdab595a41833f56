//! 检测引擎：编译后的签名库 + 检测配置，可跨线程共享
use log::debug;
use rswebprobe_engine::SignatureLibrary;
use std::sync::Arc;
use std::time::Instant;

use super::detector::TechnologyDetector;
use crate::blocking::{BlockingAnalyzer, PageMetrics};
use crate::compiler::{CompiledLibrary, SignatureCompiler};
use crate::config::DetectionConfig;
use crate::evidence::PageEvidence;
use crate::result::{AnalysisResult, DetectedTechnology, ResultAggregator};

/// 检测引擎
/// 签名库只读共享，任意数量的并发分析互不影响
#[derive(Debug, Clone)]
pub struct DetectionEngine {
    library: Arc<CompiledLibrary>,
    config: DetectionConfig,
}

impl DetectionEngine {
    /// 编译签名库并创建引擎
    pub fn new(library: &SignatureLibrary, config: DetectionConfig) -> Self {
        Self::from_compiled(Arc::new(SignatureCompiler::compile(library)), config)
    }

    /// 复用已编译的签名库
    pub fn from_compiled(library: Arc<CompiledLibrary>, config: DetectionConfig) -> Self {
        Self { library, config }
    }

    /// 使用内置签名库（进程内只编译一次）
    #[cfg(feature = "embedded-signatures")]
    pub fn with_embedded_signatures(config: DetectionConfig) -> crate::error::ProbeResult<Self> {
        let library = crate::rule::embedded_compiled_library()?;
        Ok(Self::from_compiled(library, config))
    }

    /// 替换配置，签名库共享
    pub fn with_config(&self, config: DetectionConfig) -> Self {
        Self {
            library: Arc::clone(&self.library),
            config,
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    pub fn library(&self) -> &Arc<CompiledLibrary> {
        &self.library
    }

    /// 仅做技术检测
    pub fn detect(&self, evidence: &PageEvidence) -> Vec<DetectedTechnology> {
        if evidence.is_failed() {
            return Vec::new();
        }
        TechnologyDetector::new(Arc::clone(&self.library), self.config.mode).detect(evidence)
    }

    /// 完整分析：技术检测 → 页面概况 → 拦截评估 → 结果聚合
    /// 分析本身不会失败；抓取失败的证据退化为全零结果
    pub fn analyze(&self, evidence: &PageEvidence) -> AnalysisResult {
        if let Some(reason) = &evidence.fetch_error {
            debug!("Fetch failed, returning empty result | url: {} | reason: {}", evidence.url, reason);
            return ResultAggregator::failed(evidence, &self.config);
        }

        let start = Instant::now();
        let technologies = self.detect(evidence);
        let page_analysis = PageMetrics::analyze(evidence);
        let blocking = self
            .config
            .blocking_detection_enabled
            .then(|| BlockingAnalyzer::assess_with_page(evidence, &technologies, &page_analysis));

        debug!(
            "Analysis finished | url: {} | techs: {} | blocked: {} | elapsed: {:?}",
            evidence.final_url,
            technologies.len(),
            blocking.as_ref().map(|b| b.likely_blocked).unwrap_or(false),
            start.elapsed()
        );

        ResultAggregator::aggregate(evidence, &self.config, technologies, page_analysis, blocking)
    }
}
