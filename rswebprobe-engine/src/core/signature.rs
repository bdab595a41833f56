//! 技术签名与签名库
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::pattern::{strip_reference, RawPattern};

/// 单值或列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T: Clone> OneOrMany<T> {
    pub fn to_vec(&self) -> Vec<T> {
        match self {
            OneOrMany::One(v) => vec![v.clone()],
            OneOrMany::Many(list) => list.clone(),
        }
    }
}

/// js 通道规则
/// 键控形式：JS 代码片段 → 值模式；列表形式：直接作用于每段内联脚本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsRule {
    Plain(RawPattern),
    Keyed(IndexMap<String, RawPattern>),
}

/// dom 通道规则，只关心选择器本身
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomRule {
    Selector(String),
    Selectors(Vec<String>),
    Keyed(IndexMap<String, serde_json::Value>),
}

impl DomRule {
    /// 按声明顺序返回选择器
    pub fn selectors(&self) -> Vec<String> {
        match self {
            DomRule::Selector(s) => vec![s.clone()],
            DomRule::Selectors(list) => list.clone(),
            DomRule::Keyed(map) => map.keys().cloned().collect(),
        }
    }
}

/// 一个技术的检测规则，全部字段可选
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub js: Option<JsRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_src: Option<RawPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookies: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<RawPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dom: Option<DomRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<IndexMap<String, RawPattern>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implies: Option<OneOrMany<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<OneOrMany<String>>,
}

impl Signature {
    /// implies 目标（已去标签、去空）
    pub fn implies_list(&self) -> Vec<String> {
        Self::references(&self.implies)
    }

    /// requires 目标（已去标签、去空）
    pub fn requires_list(&self) -> Vec<String> {
        Self::references(&self.requires)
    }

    fn references(field: &Option<OneOrMany<String>>) -> Vec<String> {
        field
            .as_ref()
            .map(|v| {
                v.to_vec()
                    .iter()
                    .map(|s| strip_reference(s))
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// 签名库：技术名 → 签名，保持插入顺序
/// 加载后不可变；多份签名按顺序合并，后者覆盖前者且保留原位置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureLibrary {
    technologies: IndexMap<String, Signature>,
}

impl SignatureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, signature: Signature) -> Option<Signature> {
        self.technologies.insert(name.into(), signature)
    }

    /// 合并另一份签名库，返回被覆盖的技术数
    pub fn merge(&mut self, other: SignatureLibrary) -> usize {
        let mut overridden = 0;
        for (name, sig) in other.technologies {
            if self.technologies.insert(name, sig).is_some() {
                overridden += 1;
            }
        }
        overridden
    }

    pub fn get(&self, name: &str) -> Option<&Signature> {
        self.technologies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.technologies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.technologies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Signature)> {
        self.technologies.iter()
    }
}

impl FromIterator<(String, Signature)> for SignatureLibrary {
    fn from_iter<I: IntoIterator<Item = (String, Signature)>>(iter: I) -> Self {
        Self {
            technologies: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_field_shapes() {
        let json = r##"{
            "js": {"jQuery.fn.jquery": ""},
            "scriptSrc": ["jquery[.-]([\\d.]+)\\.js\\;version:\\1"],
            "headers": {"Server": "cloudflare"},
            "cookies": {"_cfuvid": ""},
            "html": "<div id=\"wpadminbar\"",
            "dom": "#app",
            "implies": "PHP\\;confidence:50",
            "cats": [1],
            "website": "https://example.com"
        }"##;
        let sig: Signature = serde_json::from_str(json).unwrap();
        assert!(matches!(sig.js, Some(JsRule::Keyed(_))));
        assert_eq!(sig.dom.as_ref().unwrap().selectors(), vec!["#app"]);
        assert_eq!(sig.implies_list(), vec!["PHP"]);
        assert!(sig.requires_list().is_empty());
    }

    #[test]
    fn test_js_plain_list() {
        let sig: Signature = serde_json::from_str(r#"{"js": ["__NEXT_DATA__", "next/router"]}"#).unwrap();
        match sig.js {
            Some(JsRule::Plain(raw)) => assert_eq!(raw.items().len(), 2),
            other => panic!("unexpected js rule: {:?}", other),
        }
    }

    #[test]
    fn test_merge_later_overrides_keep_position() {
        let mut base: SignatureLibrary = vec![
            ("A".to_string(), Signature::default()),
            ("B".to_string(), Signature::default()),
        ]
        .into_iter()
        .collect();

        let mut b2 = Signature::default();
        b2.html = Some(RawPattern::from("override"));
        let mut a2 = Signature::default();
        a2.html = Some(RawPattern::from("new-a"));
        let overlay: SignatureLibrary = vec![
            ("A".to_string(), a2.clone()),
            ("C".to_string(), Signature::default()),
        ]
        .into_iter()
        .collect();

        assert_eq!(base.merge(overlay), 1);
        let names: Vec<_> = base.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(base.get("A"), Some(&a2));
        assert_ne!(base.get("B"), Some(&b2));
    }
}
