//! 检测器核心：逐技术汇总各通道置信度，按阈值判定并展开 implies/requires
use log::debug;
use rswebprobe_engine::{Channel, ConfidenceLevel, DetectionMode, PatternDescriptor, MAX_CONFIDENCE};
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

use crate::analyzer::check_all;
use crate::compiler::{CompiledLibrary, CompiledSignature};
use crate::evidence::PageEvidence;
use crate::result::{round_confidence, DetectedTechnology, DetectionType};
use crate::utils::DetectionUpdater;

/// 单个技术的求值结果（未取整）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub confidence: f64,
    pub detected_using: Vec<Channel>,
    pub matches: Vec<PatternDescriptor>,
    pub version: Option<String>,
}

/// 访问方式：直接求值 / 经推导边到达
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Direct,
    Transitive,
}

/// 工作栈帧
struct Frame<'a> {
    name: &'a str,
    visit: Visit,
    implied_by: Option<&'a str>,
}

/// 技术检测器
#[derive(Debug, Clone)]
pub struct TechnologyDetector {
    library: Arc<CompiledLibrary>,
    mode: DetectionMode,
}

impl TechnologyDetector {
    pub fn new(library: Arc<CompiledLibrary>, mode: DetectionMode) -> Self {
        Self { library, mode }
    }

    pub fn mode(&self) -> DetectionMode {
        self.mode
    }

    /// 对单个签名求值：各通道结果相加，总分封顶 100
    pub fn evaluate(signature: &CompiledSignature, evidence: &PageEvidence) -> Evaluation {
        let mut evaluation = Evaluation::default();
        if signature.has_no_evidence() {
            return evaluation;
        }

        for (channel, outcome) in check_all(signature, evidence) {
            if !outcome.matched() {
                continue;
            }
            evaluation.confidence += outcome.confidence;
            evaluation.detected_using.push(channel);
            evaluation.matches.extend(outcome.matches);
        }
        evaluation.confidence = evaluation.confidence.min(MAX_CONFIDENCE);
        evaluation.version = DetectionUpdater::best_version(&evaluation.matches);
        evaluation
    }

    /// 检测全部技术，结果按置信度降序（稳定排序）
    /// 显式工作栈代替递归，边按逆序入栈以保持深度优先的先序访问
    pub fn detect(&self, evidence: &PageEvidence) -> Vec<DetectedTechnology> {
        let threshold = self.mode.threshold();
        let library = self.library.as_ref();

        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut direct_seen: FxHashSet<&str> = FxHashSet::default();
        let mut transitive_seen: FxHashSet<&str> = FxHashSet::default();
        let mut recorded: FxHashSet<&str> = FxHashSet::default();
        let mut cache: FxHashMap<&str, Evaluation> = FxHashMap::default();
        let mut results: Vec<DetectedTechnology> = Vec::new();

        for root in library.iter() {
            stack.push(Frame {
                name: root.name.as_str(),
                visit: Visit::Direct,
                implied_by: None,
            });

            while let Some(frame) = stack.pop() {
                let seen = match frame.visit {
                    Visit::Direct => &mut direct_seen,
                    Visit::Transitive => &mut transitive_seen,
                };
                if !seen.insert(frame.name) {
                    continue;
                }

                // 悬空引用静默跳过
                let Some(signature) = library.get(frame.name) else {
                    debug!(
                        "Dangling reference skipped: {} (from {})",
                        frame.name,
                        frame.implied_by.unwrap_or("-")
                    );
                    continue;
                };

                let evaluation = cache
                    .entry(signature.name.as_str())
                    .or_insert_with(|| Self::evaluate(signature, evidence));
                let detected = evaluation.confidence >= threshold;

                if frame.visit == Visit::Direct {
                    if evaluation.confidence > 0.0 {
                        debug!(
                            "{}: {:.1}% confidence (threshold {} / {})",
                            signature.name, evaluation.confidence, threshold, self.mode
                        );
                    }
                    if !detected {
                        continue;
                    }
                }

                // 先记录者为准，推导边只在首次记录时展开
                if !recorded.insert(signature.name.as_str()) {
                    continue;
                }

                let (detection_type, implied_by) = if detected {
                    (DetectionType::Detection, None)
                } else {
                    (DetectionType::Transitive, frame.implied_by.map(str::to_string))
                };
                match detection_type {
                    DetectionType::Detection => debug!(
                        "[DETECTED] {} - {:.1}% confidence",
                        signature.name, evaluation.confidence
                    ),
                    DetectionType::Transitive => debug!(
                        "[TRANSITIVE] {} - pulled in by {}",
                        signature.name,
                        frame.implied_by.unwrap_or("-")
                    ),
                }
                results.push(Self::to_technology(&signature.name, evaluation, detection_type, implied_by));

                let edges = signature.implies.iter().chain(signature.requires.iter());
                for target in edges.rev() {
                    stack.push(Frame {
                        name: target.as_str(),
                        visit: Visit::Transitive,
                        implied_by: Some(signature.name.as_str()),
                    });
                }
            }
        }

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results
    }

    fn to_technology(
        name: &str,
        evaluation: &Evaluation,
        detection_type: DetectionType,
        implied_by: Option<String>,
    ) -> DetectedTechnology {
        let confidence = round_confidence(evaluation.confidence);
        DetectedTechnology {
            name: name.to_string(),
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            detected_using: evaluation.detected_using.clone(),
            matches: evaluation.matches.clone(),
            detection_type,
            version: evaluation.version.clone(),
            implied_by,
        }
    }
}
