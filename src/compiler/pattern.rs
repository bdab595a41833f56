//! 编译后的签名结构
//! 全部正则在构建期编译完成，检测期只读共享
use indexmap::IndexMap;
use rswebprobe_engine::CompiledPattern;

/// header 值规则固定置信度（强制 regex / HIGH）
pub const HEADER_MATCH_CONFIDENCE: f64 = 75.0;
/// cookie 规则固定置信度（HIGH）
pub const COOKIE_MATCH_CONFIDENCE: f64 = 85.0;
/// dom 选择器命中固定置信度（HIGH）
pub const DOM_MATCH_CONFIDENCE: f64 = 45.0;

/// js 通道单条规则
/// gate 存在时，脚本需先包含该代码片段，patterns 才参与匹配
#[derive(Debug, Clone)]
pub struct JsPattern {
    pub gate: Option<CompiledPattern>,
    pub patterns: Vec<CompiledPattern>,
}

/// header 规则：规范化后的 header 名 + 值模式
#[derive(Debug, Clone)]
pub struct HeaderRule {
    /// trim、去尾部冒号、小写
    pub name: String,
    pub pattern: CompiledPattern,
}

/// cookie 规则：名称子串 + 可选值正则（大小写敏感）
#[derive(Debug, Clone)]
pub struct CookieRule {
    pub name: String,
    /// None 表示存在即命中
    pub value: Option<CompiledPattern>,
}

/// meta 规则：小写 meta 名 + 值模式
#[derive(Debug, Clone)]
pub struct MetaRule {
    pub name: String,
    pub patterns: Vec<CompiledPattern>,
}

/// 单个技术的编译结果
#[derive(Debug, Clone, Default)]
pub struct CompiledSignature {
    pub name: String,
    pub js: Vec<JsPattern>,
    pub script_src: Vec<CompiledPattern>,
    pub headers: Vec<HeaderRule>,
    pub cookies: Vec<CookieRule>,
    pub html: Vec<CompiledPattern>,
    pub dom: Vec<String>,
    pub meta: Vec<MetaRule>,
    pub implies: Vec<String>,
    pub requires: Vec<String>,
}

impl CompiledSignature {
    /// 是否没有任何可匹配的证据规则（仅靠 implies/requires 被拉入）
    pub fn has_no_evidence(&self) -> bool {
        self.js.is_empty()
            && self.script_src.is_empty()
            && self.headers.is_empty()
            && self.cookies.is_empty()
            && self.html.is_empty()
            && self.dom.is_empty()
            && self.meta.is_empty()
    }
}

/// 编译统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileStats {
    pub js: usize,
    pub script_src: usize,
    pub headers: usize,
    pub cookies: usize,
    pub html: usize,
    pub dom: usize,
    pub meta: usize,
    /// 正则编译失败、已回退为字面量的模式数
    pub degraded: usize,
}

/// 编译后的签名库，按原始插入顺序保存
#[derive(Debug, Clone, Default)]
pub struct CompiledLibrary {
    pub signatures: IndexMap<String, CompiledSignature>,
    pub stats: CompileStats,
}

impl CompiledLibrary {
    pub fn get(&self, name: &str) -> Option<&CompiledSignature> {
        self.signatures.get(name)
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledSignature> {
        self.signatures.values()
    }
}
