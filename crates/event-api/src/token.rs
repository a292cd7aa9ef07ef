//! OAuth2 client credentials 토큰 소스
//!
//! 토큰은 만료 10초 전까지 재사용되며, 동시에 여러 요청이 들어와도
//! 잠금 안에서 한 번만 갱신합니다.

use std::time::{Duration, Instant};

use logsync_core::metrics as m;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;
use url::Url;

use crate::error::EventApiError;

/// 만료 전 갱신 여유 시간
pub const EXPIRY_DELTA: Duration = Duration::from_secs(10);

/// client credentials grant 식별자
const GRANT_TYPE: &str = "client_credentials";

/// 토큰 엔드포인트 응답
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// 발급받은 액세스 토큰
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    /// 항상 `Bearer` 형태로 정규화
    pub token_type: String,
    /// 없으면 만료되지 않는 토큰
    pub expires_at: Option<Instant>,
}

impl AccessToken {
    /// `now` 기준으로 아직 사용할 수 있는지 확인합니다.
    pub fn is_valid_at(&self, now: Instant) -> bool {
        if self.value.is_empty() {
            return false;
        }
        match self.expires_at {
            None => true,
            Some(expires_at) => now + EXPIRY_DELTA < expires_at,
        }
    }

    /// `Authorization` 헤더 값
    pub fn header_value(&self) -> String {
        format!("{} {}", self.token_type, self.value)
    }
}

/// 토큰 유형을 정규화합니다. 비어 있거나 대소문자만 다른 bearer는 `Bearer`가 됩니다.
fn normalize_token_type(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => "Bearer".to_owned(),
        Some(t) if t.eq_ignore_ascii_case("bearer") => "Bearer".to_owned(),
        Some(t) => t.to_owned(),
    }
}

/// 캐시를 가진 토큰 소스
pub struct TokenSource {
    http: reqwest::Client,
    token_url: Url,
    client_id: String,
    secret: String,
    cached: Mutex<Option<AccessToken>>,
}

impl TokenSource {
    pub fn new(
        http: reqwest::Client,
        token_url: Url,
        client_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            token_url,
            client_id: client_id.into(),
            secret: secret.into(),
            cached: Mutex::new(None),
        }
    }

    pub fn token_url(&self) -> &Url {
        &self.token_url
    }

    /// 유효한 토큰을 돌려줍니다. 없거나 곧 만료되면 새로 발급받습니다.
    pub async fn token(&self) -> Result<AccessToken, EventApiError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && token.is_valid_at(Instant::now())
        {
            return Ok(token.clone());
        }

        let token = self.fetch().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// 캐시를 비웁니다. 다음 호출에서 새 토큰을 발급받습니다.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn fetch(&self) -> Result<AccessToken, EventApiError> {
        debug!(token_url = %self.token_url, "requesting access token");

        let response = self
            .http
            .post(self.token_url.clone())
            .basic_auth(&self.client_id, Some(&self.secret))
            .form(&[("grant_type", GRANT_TYPE)])
            .send()
            .await
            .map_err(|e| EventApiError::Token(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EventApiError::Token(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let parsed: TokenResponse = response
            .json()
            .await
            .map_err(|e| EventApiError::Token(format!("invalid token response: {e}")))?;
        if parsed.access_token.is_empty() {
            return Err(EventApiError::Token(
                "server response missing access_token".to_owned(),
            ));
        }

        metrics::counter!(m::TOKEN_REFRESHES_TOTAL).increment(1);

        let expires_at = parsed
            .expires_in
            .filter(|secs| *secs > 0)
            .map(|secs| Instant::now() + Duration::from_secs(secs));
        debug!(expires_in = ?parsed.expires_in, "access token acquired");

        Ok(AccessToken {
            value: parsed.access_token,
            token_type: normalize_token_type(parsed.token_type.as_deref()),
            expires_at,
        })
    }
}

impl std::fmt::Debug for TokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSource")
            .field("token_url", &self.token_url.as_str())
            .field("client_id", &self.client_id)
            .field("secret", &"***")
            .finish()
    }
}
