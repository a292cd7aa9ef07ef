//! 도메인 타입 -- 시스템 전역에서 사용되는 공통 타입
//!
//! 이벤트 API에서 수신한 활동 이벤트를 표현합니다.
//! 탐지 엔진과 CEF 인코더는 이 타입을 읽기 전용으로 사용합니다.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// 활동 이벤트
///
/// 이벤트 API의 JSON 표현(camelCase)을 그대로 역직렬화합니다.
/// 선택 필드가 없는 경우(`None`)와 빈 문자열(`Some("")`)은 서로 다른 값입니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// 발생 시각 (epoch 밀리초)
    #[serde(default, deserialize_with = "null_as_default")]
    pub time: i64,
    /// 이벤트 유형 (예: LOGIN, LOGIN_ERROR)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// 렐름 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_id: Option<String>,
    /// 클라이언트 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// 사용자 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// 세션 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// 요청 IP 주소
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    /// 상세 속성 (key-value). `null` 맵과 `null` 값은 비어 있는 것으로 취급
    #[serde(
        default,
        deserialize_with = "nullable_details",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub details: HashMap<String, String>,
}

impl Event {
    /// 상세 속성에 주어진 키가 있는지 확인합니다.
    pub fn has_detail(&self, key: &str) -> bool {
        self.details.contains_key(key)
    }

    /// 상세 속성 값을 반환합니다. 키가 없으면 `default`를 반환합니다.
    pub fn detail_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.details.get(key).map_or(default, String::as_str)
    }

    /// 발생 시각을 UTC 타임스탬프로 변환합니다.
    ///
    /// 표현 범위를 벗어난 값이면 경고를 남기고 현재 시각을 사용합니다.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.time).unwrap_or_else(|| {
            warn!(time = self.time, "event time out of range, using current time");
            Utc::now()
        })
    }
}

/// `null`을 기본값으로 역직렬화합니다.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn nullable_details<'de, D>(deserializer: D) -> Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<HashMap<String, Option<String>>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|(k, v)| (k, v.unwrap_or_default()))
        .collect())
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] type={} user={} ip={}",
            self.time,
            self.kind.as_deref().unwrap_or("-"),
            self.user_id.as_deref().unwrap_or("-"),
            self.ip_address.as_deref().unwrap_or("-"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_full_event() {
        let json = r#"{
            "time": 1700000000000,
            "type": "LOGIN",
            "realmId": "master",
            "clientId": "lms",
            "userId": "u-1",
            "sessionId": "s-1",
            "ipAddress": "10.0.0.1",
            "details": {"username": "alice", "auth_method": "openid-connect"}
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.time, 1_700_000_000_000);
        assert_eq!(event.kind.as_deref(), Some("LOGIN"));
        assert_eq!(event.realm_id.as_deref(), Some("master"));
        assert_eq!(event.ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(event.details.len(), 2);
    }

    #[test]
    fn missing_fields_are_none_not_empty() {
        let event: Event = serde_json::from_str(r#"{"time": 1}"#).unwrap();
        assert!(event.kind.is_none());
        assert!(event.user_id.is_none());
        assert!(event.details.is_empty());

        let event: Event = serde_json::from_str(r#"{"type": ""}"#).unwrap();
        assert_eq!(event.kind.as_deref(), Some(""));
    }

    #[test]
    fn null_fields_degrade_to_defaults() {
        let event: Event =
            serde_json::from_str(r#"{"time":1,"type":"LOGIN","details":null}"#).unwrap();
        assert_eq!(event.kind.as_deref(), Some("LOGIN"));
        assert!(event.details.is_empty());

        let event: Event = serde_json::from_str(
            r#"{"time":null,"type":null,"userId":null,"details":{"username":null,"a":"1"}}"#,
        )
        .unwrap();
        assert_eq!(event.time, 0);
        assert!(event.kind.is_none());
        assert!(event.user_id.is_none());
        // null 값의 키는 존재하는 것으로 남음
        assert!(event.has_detail("username"));
        assert_eq!(event.detail_or("username", "unknown"), "");
        assert_eq!(event.detail_or("a", "-"), "1");
    }

    #[test]
    fn batch_with_null_details_decodes() {
        let events: Vec<Event> = serde_json::from_str(
            r#"[{"time":1,"type":"LOGIN","details":null},{"time":2,"type":"LOGOUT"}]"#,
        )
        .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind.as_deref(), Some("LOGOUT"));
    }

    #[test]
    fn detail_helpers() {
        let mut event = Event::default();
        event.details.insert("username".to_owned(), "alice".to_owned());
        assert!(event.has_detail("username"));
        assert!(!event.has_detail("email"));
        assert_eq!(event.detail_or("username", "unknown"), "alice");
        assert_eq!(event.detail_or("email", "unknown"), "unknown");
    }

    #[test]
    fn occurred_at_converts_millis() {
        let event = Event {
            time: 1_700_000_000_000,
            ..Default::default()
        };
        assert_eq!(event.occurred_at().timestamp(), 1_700_000_000);
    }

    #[test]
    fn occurred_at_out_of_range_falls_back_to_now() {
        let before = Utc::now();
        let event = Event {
            time: i64::MAX,
            ..Default::default()
        };
        let stamp = event.occurred_at();
        assert!(stamp >= before);
        assert!(stamp <= Utc::now());
    }

    #[test]
    fn display_uses_placeholders() {
        let event = Event {
            time: 5,
            kind: Some("LOGOUT".to_owned()),
            ..Default::default()
        };
        assert_eq!(event.to_string(), "[5] type=LOGOUT user=- ip=-");
    }
}
