//! 版本提取：按 \1 / $1 模板从正则捕获中拼出版本号
use regex::Captures;

pub struct VersionExtractor;

impl VersionExtractor {
    /// 参数：
    /// - template: 版本模板，支持 \N 与 $N 两种分组引用
    /// - captures: 正则捕获结果
    /// 返回：替换后非空且不含残留占位符的版本号
    pub fn extract(template: Option<&str>, captures: &Captures) -> Option<String> {
        let template = template.map(str::trim).filter(|t| !t.is_empty())?;

        let mut version = template.to_string();
        let mut substituted = false;

        // 倒序替换，避免 \1 抢先吃掉 \10 的前缀
        for index in (1..captures.len()).rev() {
            let value = captures.get(index).map(|m| m.as_str().trim()).unwrap_or("");
            for placeholder in [format!("\\{}", index), format!("${}", index)] {
                if version.contains(&placeholder) {
                    if !value.is_empty() {
                        substituted = true;
                    }
                    version = version.replace(&placeholder, value);
                }
            }
        }

        let version = version.trim();
        if !substituted || version.is_empty() || version.contains('\\') || version.contains('$') {
            return None;
        }
        Some(version.to_string())
    }
}
