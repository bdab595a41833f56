//! rswebprobe - 网站技术栈指纹识别与反爬拦截判定

// 导出全局错误类型
pub use self::error::{ProbeResult, WebProbeError};

// 导出配置模块
pub use self::config::{DetectionConfig, DetectionConfigBuilder};

// 导出签名内核类型
pub use rswebprobe_engine::{
    Channel, ConfidenceLevel, DetectionMode, PatternDescriptor, PatternType, Signature, SignatureLibrary,
};

// 导出签名加载接口
pub use self::rule::SignatureLoader;

// 导出证据模块核心接口
pub use self::evidence::{DomElement, DomQuery, HtmlDocument, PageEvidence, PageEvidenceBuilder};

// 导出编译模块核心接口
pub use self::compiler::{CompiledLibrary, CompiledSignature, SignatureCompiler};

// 导出检测与拦截判定接口
pub use self::blocking::{BlockingAnalyzer, PageMetrics};
pub use self::detector::{DetectionEngine, TechnologyDetector};

// 导出结果结构
pub use self::result::{
    AnalysisResult, BlockingAssessment, BlockingIndicators, ChallengeType, DetectedTechnology, DetectionType,
    DomComplexity, PageAnalysis, PageStats,
};

// 导出工具模块核心接口
pub use self::utils::{HeaderConverter, HtmlExtractor};

// 声明所有子模块
pub mod analyzer;
pub mod blocking;
pub mod compiler;
pub mod config;
pub mod detector;
pub mod error;
pub mod evidence;
pub mod result;
pub mod rule;
pub mod utils;
