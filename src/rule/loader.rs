//! 签名加载管理器
//! 负责从 JSON 文本或本地文件读取签名库，多份按顺序合并

use log::{debug, info, warn};
use rswebprobe_engine::{ParsedSignatures, SignatureLibrary, SignatureParser};
use std::path::Path;
use std::time::Instant;

use crate::error::{ProbeResult, WebProbeError};

/// 签名加载管理器
pub struct SignatureLoader;

impl SignatureLoader {
    /// 从 JSON 文本加载签名库
    /// 单个技术结构非法时跳过，顶层结构非法时报错
    pub fn from_json_str(content: &str) -> ProbeResult<SignatureLibrary> {
        let parsed = SignatureParser::new().parse_str(content)?;
        Ok(Self::report(parsed, "inline"))
    }

    /// 从单个文件加载
    pub fn from_file(path: impl AsRef<Path>) -> ProbeResult<SignatureLibrary> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            WebProbeError::SignatureLoadError(format!("读取签名文件 {} 失败：{}", path.display(), e))
        })?;
        let parsed = SignatureParser::new().parse_bytes(&bytes)?;
        Ok(Self::report(parsed, &path.display().to_string()))
    }

    /// 按顺序加载并合并多个文件，后者覆盖前者的同名技术
    pub fn from_files<I, P>(paths: I) -> ProbeResult<SignatureLibrary>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let start = Instant::now();
        let mut library = SignatureLibrary::new();
        let mut files = 0usize;

        for path in paths {
            let next = Self::from_file(path.as_ref())?;
            let overridden = library.merge(next);
            if overridden > 0 {
                debug!(
                    "Signature file {} overrode {} existing technologies",
                    path.as_ref().display(),
                    overridden
                );
            }
            files += 1;
        }

        if files == 0 {
            return Err(WebProbeError::SignatureLoadError("未提供任何签名文件".to_string()));
        }

        info!(
            "Signature files merged | files: {} | techs: {} | elapsed: {:?}",
            files,
            library.len(),
            start.elapsed()
        );
        Ok(library)
    }

    /// 内置签名库
    #[cfg(feature = "embedded-signatures")]
    pub fn embedded() -> ProbeResult<SignatureLibrary> {
        let parsed = SignatureParser::new().parse_str(super::embedded::EMBEDDED_SIGNATURES)?;
        Ok(Self::report(parsed, "embedded"))
    }

    fn report(parsed: ParsedSignatures, source: &str) -> SignatureLibrary {
        if !parsed.skipped.is_empty() {
            warn!(
                "Skipped {} malformed signatures from {}: {:?}",
                parsed.skipped.len(),
                source,
                parsed.skipped
            );
        }
        info!("Signatures loaded | source: {} | techs: {}", source, parsed.library.len());
        parsed.library
    }
}
