//! 检测结果更新工具
//! 负责在多条命中记录中挑选最优版本

use rswebprobe_engine::PatternDescriptor;

/// 检测结果更新工具
pub struct DetectionUpdater;

impl DetectionUpdater {
    /// 从命中记录中挑选版本：更长者优先，等长取加权置信度更高者，再等取先出现者
    pub fn best_version(matches: &[PatternDescriptor]) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;

        for hit in matches {
            let Some(version) = hit.version.as_deref().map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            let confidence = hit.weighted_confidence();
            if Self::is_new_result_better(best, version, confidence) {
                best = Some((version, confidence));
            }
        }

        best.map(|(v, _)| v.to_string())
    }

    /// 新版本是否优于当前版本
    fn is_new_result_better(current: Option<(&str, f64)>, version: &str, confidence: f64) -> bool {
        let Some((cur_version, cur_confidence)) = current else {
            return true;
        };
        match version.len().cmp(&cur_version.len()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => confidence > cur_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rswebprobe_engine::{Channel, PatternType, Priority};

    fn hit(version: Option<&str>, priority: Priority) -> PatternDescriptor {
        PatternDescriptor::new("p", PatternType::Regex, 80.0, priority, Channel::ScriptSrc)
            .to_match(Vec::new(), version.map(String::from))
    }

    #[test]
    fn test_longest_version_wins() {
        let matches = vec![
            hit(Some("3.6"), Priority::High),
            hit(Some("3.6.0"), Priority::Low),
            hit(None, Priority::High),
        ];
        assert_eq!(DetectionUpdater::best_version(&matches).as_deref(), Some("3.6.0"));
    }

    #[test]
    fn test_equal_length_prefers_confidence() {
        let matches = vec![hit(Some("1.1"), Priority::Low), hit(Some("1.2"), Priority::High)];
        assert_eq!(DetectionUpdater::best_version(&matches).as_deref(), Some("1.2"));

        let tie = vec![hit(Some("1.1"), Priority::High), hit(Some("1.2"), Priority::High)];
        assert_eq!(DetectionUpdater::best_version(&tie).as_deref(), Some("1.1"));
    }

    #[test]
    fn test_no_version() {
        assert_eq!(DetectionUpdater::best_version(&[hit(Some("  "), Priority::High)]), None);
        assert_eq!(DetectionUpdater::best_version(&[]), None);
    }
}
