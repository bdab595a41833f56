//! rswebprobe-engine 内核错误定义
//! 仅覆盖加载期错误：签名解析、正则编译、非法输入。匹配期永不返回错误
use thiserror::Error;

use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;

/// 内核核心错误枚举
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================== 签名相关错误 =====================
    /// 签名数据解析失败（顶层 JSON 结构非法）
    #[error("Signature parse failed: {0}")]
    SignatureParseError(String),

    /// 签名 JSON 反序列化失败
    #[error("Signature JSON decode failed: {0}")]
    SignatureJsonError(#[from] SerdeJsonError),

    // ===================== 编译相关错误 =====================
    /// 正则表达式编译失败（仅在调用方显式要求严格编译时返回）
    #[error("Regex compilation failed: {0}")]
    RegexCompileError(#[from] RegexError),

    // ===================== 内核基础错误 =====================
    /// 无效输入参数
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// 内核层全局Result类型别名
pub type CoreResult<T> = Result<T, CoreError>;
