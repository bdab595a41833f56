// 核心公共结构体+枚举
pub mod core;
// 内核错误
pub mod error;
// 模式匹配（exact/regex/fuzzy/encoded）
pub mod matcher;
// 原始模式 → 描述体
pub mod normalizer;
// 签名源解析 (JSON)
pub mod source;
// 日志预览 + 版本提取
pub mod utils;

// 顶层导出常用类型
pub use self::core::{
    Channel, ConfidenceLevel, DetectionMode, DomRule, ExplicitPattern, JsRule, OneOrMany,
    PatternDescriptor, PatternItem, PatternType, Priority, RawPattern, Signature, SignatureLibrary,
};
pub use error::{CoreError, CoreResult};
pub use matcher::{CompiledPattern, MatchOutcome, PatternMatcher, PatternMatches, MAX_CONFIDENCE};
pub use normalizer::SignatureNormalizer;
pub use source::{ParsedSignatures, SignatureParser};
pub use utils::{preview_compact, VersionExtractor};
