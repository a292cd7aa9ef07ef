//! 탐지 엔진 에러 타입
//!
//! 규칙 평가와 레코드 인코딩은 실패하지 않으므로, 에러는 규칙 컴파일 단계에서만 발생합니다.

use logsync_core::error::LogsyncError;

/// 탐지 엔진 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    /// 탐지 규칙 검증 실패
    #[error("invalid detection '{class_id}': {reason}")]
    InvalidRule {
        /// 문제가 된 탐지 class ID
        class_id: String,
        /// 실패 사유
        reason: String,
    },
}

impl From<DetectionError> for LogsyncError {
    fn from(err: DetectionError) -> Self {
        LogsyncError::Detection(err.to_string())
    }
}
