//! 에러 타입 -- 도메인별 에러 정의

/// logsync 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum LogsyncError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 이벤트 소스(토큰 발급, 이벤트 조회) 에러
    #[error("source error: {0}")]
    Source(#[from] SourceError),

    /// 레코드 전송 에러
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// 탐지 규칙 에러
    #[error("detection error: {0}")]
    Detection(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 이벤트 소스 에러
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// 액세스 토큰 발급 실패
    #[error("token request failed: {0}")]
    Token(String),

    /// 이벤트 조회 요청 실패
    #[error("event request failed: {0}")]
    Request(String),

    /// 예상하지 못한 HTTP 상태 코드
    #[error("unexpected status code from api - expected code 200; got code {0}")]
    UnexpectedStatus(u16),

    /// 응답 본문 디코딩 실패
    #[error("failed to decode response: {0}")]
    Decode(String),
}

/// 레코드 전송 에러
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// 원격 수집기 연결 실패
    #[error("dial {network} {addr} failed: {reason}")]
    Dial {
        network: String,
        addr: String,
        reason: String,
    },

    /// 재연결 후에도 쓰기 실패
    #[error("write failed: {0}")]
    Write(String),

    /// 세션 설정 오류 (priority 범위, 네트워크 종류 등)
    #[error("invalid session: {0}")]
    InvalidSession(String),
}
