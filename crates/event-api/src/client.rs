//! 이벤트 API 클라이언트
//!
//! ```text
//! TokenSource.token() ──▶ GET <context_url>/client?dateFrom=..&dateTo=..&max=..&type=..
//!                                  │
//!                         200 ─────┴──── 그 외: UnexpectedStatus
//!                          │
//!                     Vec<Event> 디코딩
//! ```

use std::time::Duration;

use logsync_core::config::OAuth2Config;
use logsync_core::error::LogsyncError;
use logsync_core::metrics as m;
use logsync_core::pipeline::EventSource;
use logsync_core::types::Event;
use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use tracing::{debug, info};
use url::Url;

use crate::error::EventApiError;
use crate::query::EventQuery;
use crate::token::TokenSource;

/// HTTP 요청 타임아웃
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 클라이언트 이벤트 조회 경로
pub const CLIENT_EVENTS_PATH: &str = "client";

/// 이벤트 API 클라이언트
#[derive(Debug)]
pub struct HubApi {
    http: reqwest::Client,
    tokens: TokenSource,
    events_url: Url,
}

impl HubApi {
    /// 자격 증명과 엔드포인트로 클라이언트를 만듭니다.
    ///
    /// 네트워크 요청은 하지 않습니다. 토큰은 첫 조회 때 발급받습니다.
    pub fn new(
        client_id: impl Into<String>,
        secret: impl Into<String>,
        token_url: &str,
        context_url: &str,
    ) -> Result<Self, EventApiError> {
        let token_url = parse_url(token_url)?;
        let events_url = parse_url(&format!(
            "{}/{CLIENT_EVENTS_PATH}",
            context_url.trim_end_matches('/')
        ))?;

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EventApiError::Client(e.to_string()))?;

        Ok(Self {
            tokens: TokenSource::new(http.clone(), token_url, client_id, secret),
            http,
            events_url,
        })
    }

    pub fn from_config(config: &OAuth2Config) -> Result<Self, EventApiError> {
        Self::new(
            config.client_id.clone(),
            config.secret.clone(),
            &config.token_url,
            &config.context_url,
        )
    }

    pub fn events_url(&self) -> &Url {
        &self.events_url
    }

    pub fn tokens(&self) -> &TokenSource {
        &self.tokens
    }

    /// 조회 조건에 맞는 클라이언트 이벤트를 가져옵니다.
    pub async fn query_client_events(&self, query: &EventQuery) -> Result<Vec<Event>, EventApiError> {
        let token = self.tokens.token().await?;

        debug!(
            url = %self.events_url,
            date_from = %query.date_from,
            date_to = %query.date_to,
            max = query.effective_max(),
            types = ?query.types,
            "querying client events"
        );

        let response = self
            .http
            .get(self.events_url.clone())
            .header(AUTHORIZATION, token.header_value())
            .query(&query.params())
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(EventApiError::UnexpectedStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        // `null` 본문은 빈 배치
        let events: Vec<Event> = serde_json::from_slice::<Option<Vec<Event>>>(&body)
            .map_err(|e| EventApiError::Decode(e.to_string()))?
            .unwrap_or_default();

        metrics::counter!(m::EVENTS_RETRIEVED_TOTAL).increment(events.len() as u64);
        info!(count = events.len(), "retrieved events from api");
        Ok(events)
    }
}

impl EventSource for HubApi {
    type Query = EventQuery;

    fn name(&self) -> &str {
        "event-api"
    }

    async fn fetch(&self, query: &EventQuery) -> Result<Vec<Event>, LogsyncError> {
        Ok(self.query_client_events(query).await?)
    }
}

fn parse_url(raw: &str) -> Result<Url, EventApiError> {
    Url::parse(raw).map_err(|e| EventApiError::InvalidUrl {
        url: raw.to_owned(),
        reason: e.to_string(),
    })
}
