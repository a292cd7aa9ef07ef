//! 탐지 규칙 엔진 -- 선언 순서를 유지하는 탐지 목록

use logsync_core::config::DetectionConfig;
use logsync_core::types::Event;
use tracing::debug;

use crate::detection::Detection;
use crate::error::DetectionError;

/// 컴파일된 탐지 목록
///
/// 매칭 결과는 항상 설정에 선언된 순서로 반환됩니다.
#[derive(Debug, Clone, Default)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    /// 설정을 검증하고 컴파일합니다.
    ///
    /// 검증에 실패한 탐지가 하나라도 있으면 에러입니다.
    pub fn from_configs(configs: &[DetectionConfig]) -> Result<Self, DetectionError> {
        let mut detections = Vec::with_capacity(configs.len());
        for (idx, config) in configs.iter().enumerate() {
            config
                .validate(idx)
                .map_err(|e| DetectionError::InvalidRule {
                    class_id: config.class_id.clone(),
                    reason: e.to_string(),
                })?;
            detections.push(Detection::compile(config));
        }
        debug!(count = detections.len(), "detections compiled");
        Ok(Self { detections })
    }

    /// 이벤트에 매칭되는 탐지를 선언 순서대로 반환합니다.
    pub fn matching<'a>(&'a self, event: &'a Event) -> impl Iterator<Item = &'a Detection> + 'a {
        self.detections.iter().filter(move |d| d.matches(event))
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
