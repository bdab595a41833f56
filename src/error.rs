//! 全局错误类型定义
//! 仅加载期（签名读取、配置解析、证据构建）会返回错误，分析本身不失败
use thiserror::Error;
use rswebprobe_engine::CoreError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;
use url::ParseError as UrlParseError;

#[derive(Error, Debug)]
pub enum WebProbeError {
    // 签名相关错误
    #[error("签名加载失败：{0}")]
    SignatureLoadError(String),
    #[error("签名内核错误：{0}")]
    Core(#[from] CoreError),

    // 配置相关错误
    #[error("配置解析失败：{0}")]
    ConfigError(String),

    // 证据构建相关错误
    #[error("Header 名称非法：{0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),
    #[error("Header 值非法：{0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),
    #[error("CSS 选择器非法：{0}")]
    InvalidSelector(String),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
    #[error("URL解析失败：{0}")]
    UrlError(#[from] UrlParseError),
    #[error("无效输入：{0}")]
    InvalidInput(String),
}

// 全局Result类型
pub type ProbeResult<T> = Result<T, WebProbeError>;
