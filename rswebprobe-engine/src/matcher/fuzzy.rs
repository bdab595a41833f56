//! 模糊匹配：去噪后包含判断 + 归一化编辑距离

/// 相似度阈值（严格大于）
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// 小写后移除数字、下划线、连字符与方括号
pub fn clean_fuzzy(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(|c| !(c.is_ascii_digit() || matches!(c, '_' | '-' | '[' | ']')))
        .collect()
}

/// 参数：cleaned_value / cleaned_pattern 均已经过 clean_fuzzy
pub fn fuzzy_match(cleaned_value: &str, cleaned_pattern: &str) -> bool {
    if cleaned_pattern.is_empty() {
        return false;
    }
    if cleaned_value.contains(cleaned_pattern) {
        return true;
    }
    similarity(cleaned_value, cleaned_pattern) > SIMILARITY_THRESHOLD
}

/// (maxLen - distance) / maxLen，按字符计
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let max_len = a.len().max(b.len());
    let min_len = a.len().min(b.len());

    if max_len == 0 {
        return 1.0;
    }
    if min_len == 0 {
        return 0.0;
    }
    // 编辑距离不小于长度差，相似度上界为 min/max，达不到阈值直接跳过 O(n*m) 计算
    if (min_len as f64 / max_len as f64) <= SIMILARITY_THRESHOLD {
        return min_len as f64 / max_len as f64;
    }

    let distance = levenshtein(&a, &b);
    (max_len - distance) as f64 / max_len as f64
}

/// 两行滚动数组实现
pub fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
