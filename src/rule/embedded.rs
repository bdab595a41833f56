//! 内置签名库：编译期打包，首次使用时编译并缓存
use once_cell::sync::OnceCell;
use std::sync::Arc;

use super::SignatureLoader;
use crate::compiler::{CompiledLibrary, SignatureCompiler};
use crate::error::ProbeResult;

/// 内置签名 JSON 原文
pub const EMBEDDED_SIGNATURES: &str = include_str!("../../data/signatures.json");

static EMBEDDED_COMPILED_LIB: OnceCell<Arc<CompiledLibrary>> = OnceCell::new();

/// 内置签名库的编译结果，进程内只编译一次
pub fn embedded_compiled_library() -> ProbeResult<Arc<CompiledLibrary>> {
    EMBEDDED_COMPILED_LIB
        .get_or_try_init(|| -> ProbeResult<Arc<CompiledLibrary>> {
            let library = SignatureLoader::embedded()?;
            Ok(Arc::new(SignatureCompiler::compile(&library)))
        })
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_once_and_shared() {
        let a = embedded_compiled_library().unwrap();
        let b = embedded_compiled_library().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.stats.degraded, 0);
        assert!(!a.is_empty());
    }
}
