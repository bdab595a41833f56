//! 编译模块：将原始签名编译为可执行的匹配规则
pub mod pattern;
pub mod compiler;

pub use self::pattern::{
    CompileStats, CompiledLibrary, CompiledSignature, CookieRule, HeaderRule, JsPattern, MetaRule,
    COOKIE_MATCH_CONFIDENCE, DOM_MATCH_CONFIDENCE, HEADER_MATCH_CONFIDENCE,
};
pub use self::compiler::SignatureCompiler;
