//! 核心公共结构体 + 枚举
pub mod enums;
pub mod pattern;
pub mod signature;

pub use enums::{Channel, ConfidenceLevel, DetectionMode, PatternType, Priority};
pub use pattern::{split_tags, strip_reference, ExplicitPattern, PatternDescriptor, PatternItem, RawPattern};
pub use signature::{DomRule, JsRule, OneOrMany, Signature, SignatureLibrary};
