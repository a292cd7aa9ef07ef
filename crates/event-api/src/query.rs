//! 이벤트 조회 조건

use chrono::{Days, NaiveDate};
use logsync_core::config::FilterConfig;

/// 조회 시작일 파라미터
pub const QUERY_PARAM_FROM: &str = "dateFrom";
/// 조회 종료일 파라미터
pub const QUERY_PARAM_TO: &str = "dateTo";
/// 최대 개수 파라미터
pub const QUERY_PARAM_MAX: &str = "max";
/// 이벤트 유형 파라미터 (반복 가능)
pub const QUERY_PARAM_TYPE: &str = "type";

/// 최대 개수 기본값
pub const DEFAULT_MAX: u32 = 999_999;

/// 날짜 파라미터 형식
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 이벤트 조회 조건
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    /// 없거나 0이면 기본값 999999
    pub max: Option<u32>,
    /// 비어 있으면 전체 유형
    pub types: Vec<String>,
}

impl EventQuery {
    /// `[today - days, today]` 구간의 조회 조건을 만듭니다.
    pub fn last_days(days: u32, max: Option<u32>, types: Vec<String>, today: NaiveDate) -> Self {
        let date_from = today
            .checked_sub_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MIN);
        Self {
            date_from,
            date_to: today,
            max,
            types,
        }
    }

    /// 필터 설정으로 조회 조건을 만듭니다.
    pub fn from_filter(filter: &FilterConfig, today: NaiveDate) -> Self {
        Self::last_days(filter.days, Some(filter.max), filter.types.clone(), today)
    }

    /// 실제 적용되는 최대 개수
    pub fn effective_max(&self) -> u32 {
        match self.max {
            Some(max) if max > 0 => max,
            _ => DEFAULT_MAX,
        }
    }

    /// 쿼리 파라미터 목록. `type`은 유형마다 반복됩니다.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            (
                QUERY_PARAM_FROM,
                self.date_from.format(DATE_FORMAT).to_string(),
            ),
            (QUERY_PARAM_TO, self.date_to.format(DATE_FORMAT).to_string()),
            (QUERY_PARAM_MAX, self.effective_max().to_string()),
        ];
        params.extend(self.types.iter().map(|t| (QUERY_PARAM_TYPE, t.clone())));
        params
    }
}
