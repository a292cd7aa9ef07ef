//! 리포터 -- 이벤트에 대한 단일 조건
//!
//! 설정의 `type` 판별자로부터 한 번 컴파일되며, 평가는 실패하지 않습니다.

use std::fmt;

use logsync_core::config::ReporterConfig;
use logsync_core::types::Event;
use tracing::warn;

/// 상세 속성 목록 구분자
const DETAILS_SEPARATOR: &str = ",";

/// 컴파일된 리포터
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reporter {
    /// 이벤트 유형이 정확히 일치
    TypeMatch(String),
    /// 주어진 상세 속성 중 하나 이상이 존재
    DetailExists(Vec<String>),
    /// 주어진 상세 속성 중 하나 이상이 부재
    DetailNotExists(Vec<String>),
    /// 알 수 없는 판별자. 항상 거짓
    Unsupported(String),
}

impl Reporter {
    /// 설정에서 리포터를 만듭니다.
    ///
    /// 알 수 없는 판별자는 에러가 아니라 [`Reporter::Unsupported`]가 되며 경고를 남깁니다.
    pub fn compile(config: &ReporterConfig) -> Self {
        match config.kind.as_str() {
            ReporterConfig::TYPE => {
                // 키가 없으면 빈 문자열과 비교
                Self::TypeMatch(config.get("type").unwrap_or_default().to_owned())
            }
            ReporterConfig::DETAIL_EXISTS => {
                Self::DetailExists(config.get_list("details", DETAILS_SEPARATOR))
            }
            ReporterConfig::DETAIL_NOT_EXISTS => {
                Self::DetailNotExists(config.get_list("details", DETAILS_SEPARATOR))
            }
            other => {
                warn!(
                    reporter_type = other,
                    "unsupported reporter type, detection will never match"
                );
                Self::Unsupported(other.to_owned())
            }
        }
    }

    /// 이벤트가 조건을 만족하는지 평가합니다.
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            Self::TypeMatch(expected) => event.kind.as_deref() == Some(expected.as_str()),
            Self::DetailExists(keys) => keys.iter().any(|k| event.has_detail(k)),
            Self::DetailNotExists(keys) => keys.iter().any(|k| !event.has_detail(k)),
            Self::Unsupported(_) => false,
        }
    }

    /// 설정 판별자 이름
    pub fn kind(&self) -> &str {
        match self {
            Self::TypeMatch(_) => ReporterConfig::TYPE,
            Self::DetailExists(_) => ReporterConfig::DETAIL_EXISTS,
            Self::DetailNotExists(_) => ReporterConfig::DETAIL_NOT_EXISTS,
            Self::Unsupported(kind) => kind.as_str(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported(_))
    }
}

impl fmt::Display for Reporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMatch(expected) => write!(f, "type == {expected:?}"),
            Self::DetailExists(keys) => write!(f, "any detail of [{}]", keys.join(", ")),
            Self::DetailNotExists(keys) => write!(f, "missing any of [{}]", keys.join(", ")),
            Self::Unsupported(kind) => write!(f, "unsupported({kind})"),
        }
    }
}
