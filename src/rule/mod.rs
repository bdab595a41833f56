//! 签名模块：负责签名的加载与合并
pub mod loader;
#[cfg(feature = "embedded-signatures")]
pub mod embedded;

pub use self::loader::SignatureLoader;
#[cfg(feature = "embedded-signatures")]
pub use self::embedded::{embedded_compiled_library, EMBEDDED_SIGNATURES};
