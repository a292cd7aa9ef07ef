//! 설정 관리 -- logsync.json / logsync.toml 파싱 및 런타임 설정
//!
//! [`LogsyncConfig`]는 syslog 수집기, OAuth2 자격 증명, 이벤트 필터,
//! 탐지 규칙을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (`-c FILE`)
//! 2. 환경변수 (`LOGSYNC_SYSLOG_ADDRESS=collector:514` 형식)
//! 3. 설정 파일 (`logsync.json`, 확장자가 `.toml`이면 TOML)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), logsync_core::error::LogsyncError> {
//! use logsync_core::config::LogsyncConfig;
//!
//! // 후보 경로 중 처음 존재하는 파일을 로드 + 환경변수 오버라이드
//! let (path, config) = LogsyncConfig::load_first(["logsync.json", "/etc/logsync.json"]).await?;
//!
//! // JSON 문자열에서 직접 파싱
//! let config = LogsyncConfig::parse_json(r#"{"filter": {"days": 2}}"#)?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, LogsyncError};

/// 기본 설정 파일 이름
pub const DEFAULT_CONFIG_FILE: &str = "logsync.json";

/// 이벤트 조회 최대 개수 상한
pub const MAX_EVENTS_LIMIT: u32 = 999_999;

/// 조회 기간 상한 (일)
pub const MAX_FILTER_DAYS: u32 = 7;

/// syslog 태그 최대 길이
pub const MAX_TAG_LEN: usize = 32;

/// CEF severity 상한
pub const MAX_CEF_SEVERITY: u8 = 10;

/// syslog severity 상한
pub const MAX_LOGLEVEL: u8 = 7;

/// 설정 문서 형식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON (기본)
    Json,
    /// TOML
    Toml,
}

impl ConfigFormat {
    /// 파일 확장자로 형식을 결정합니다. `.toml`이 아니면 JSON입니다.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// logsync 통합 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LogsyncConfig {
    /// syslog 수집기 설정
    #[serde(default)]
    pub syslog: SyslogConfig,
    /// OAuth2 클라이언트 자격 증명 및 이벤트 API 주소
    #[serde(default)]
    pub oauth2: OAuth2Config,
    /// 이벤트 조회 필터
    #[serde(default)]
    pub filter: FilterConfig,
    /// 탐지 규칙 (선언 순서 유지)
    #[serde(default)]
    pub detections: Vec<DetectionConfig>,
    /// 애플리케이션 로그 파일 경로 (없으면 stdout만 사용)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logfile: Option<String>,
    /// 로깅 설정
    #[serde(default)]
    pub log: LogConfig,
}

impl LogsyncConfig {
    /// 후보 경로를 순서대로 확인하여 처음 존재하는 설정 파일을 로드합니다.
    ///
    /// 빈 경로와 존재하지 않는 파일은 건너뜁니다. 찾은 파일의 파싱 또는
    /// 검증 실패는 즉시 에러입니다. 반환값은 (사용된 경로, 설정)입니다.
    pub async fn load_first<I, P>(paths: I) -> Result<(PathBuf, Self), LogsyncError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut tried = Vec::new();
        for candidate in paths {
            let candidate = candidate.as_ref();
            if candidate.as_os_str().is_empty() {
                continue;
            }
            match tokio::fs::metadata(candidate).await {
                Ok(meta) if meta.is_file() => {
                    debug!(path = %candidate.display(), "using config file");
                    let config = Self::load(candidate).await?;
                    return Ok((candidate.to_path_buf(), config));
                }
                _ => tried.push(candidate.display().to_string()),
            }
        }

        Err(ConfigError::FileNotFound {
            path: tried.join(", "),
        }
        .into())
    }

    /// 파일에서 설정을 로드하고 환경변수 오버라이드를 적용한 뒤 검증합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, LogsyncError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// 파일에서 설정을 파싱합니다 (환경변수 오버라이드, 검증 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, LogsyncError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LogsyncError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                LogsyncError::Io(e)
            }
        })?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    /// 문자열에서 설정을 파싱합니다.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self, LogsyncError> {
        match format {
            ConfigFormat::Json => Self::parse_json(content),
            ConfigFormat::Toml => Self::parse_toml(content),
        }
    }

    /// JSON 문자열에서 설정을 파싱합니다.
    pub fn parse_json(json_str: &str) -> Result<Self, LogsyncError> {
        serde_json::from_str(json_str).map_err(|e| {
            LogsyncError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse_toml(toml_str: &str) -> Result<Self, LogsyncError> {
        toml::from_str(toml_str).map_err(|e| {
            LogsyncError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `LOGSYNC_{SECTION}_{FIELD}`
    /// 예: `LOGSYNC_SYSLOG_ADDRESS=collector:514`
    pub fn apply_env_overrides(&mut self) {
        // Syslog
        override_string(&mut self.syslog.address, "LOGSYNC_SYSLOG_ADDRESS");
        override_string(&mut self.syslog.proto, "LOGSYNC_SYSLOG_PROTO");
        override_string(&mut self.syslog.tag, "LOGSYNC_SYSLOG_TAG");
        override_opt_string(&mut self.syslog.hostname, "LOGSYNC_SYSLOG_HOSTNAME");

        // OAuth2
        override_string(&mut self.oauth2.client_id, "LOGSYNC_OAUTH2_CLIENT_ID");
        override_string(&mut self.oauth2.secret, "LOGSYNC_OAUTH2_SECRET");
        override_string(&mut self.oauth2.token_url, "LOGSYNC_OAUTH2_TOKEN_URL");
        override_string(&mut self.oauth2.context_url, "LOGSYNC_OAUTH2_CONTEXT_URL");

        // Filter
        override_u32(&mut self.filter.days, "LOGSYNC_FILTER_DAYS");
        override_u32(&mut self.filter.max, "LOGSYNC_FILTER_MAX");

        // Logging
        override_opt_string(&mut self.logfile, "LOGSYNC_LOGFILE");
        override_string(&mut self.log.level, "LOGSYNC_LOG_LEVEL");
        override_string(&mut self.log.format, "LOGSYNC_LOG_FORMAT");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogsyncError> {
        self.syslog.validate()?;
        self.oauth2.validate()?;
        self.filter.validate()?;

        if self.detections.is_empty() {
            return Err(invalid("detections", "at least one detection is required"));
        }
        for (idx, detection) in self.detections.iter().enumerate() {
            detection.validate(idx)?;
        }

        if let Some(logfile) = &self.logfile
            && logfile.trim().is_empty()
        {
            return Err(invalid("logfile", "must not be empty when set"));
        }

        self.log.validate()
    }
}

/// syslog 수집기 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyslogConfig {
    /// 수집기 주소 (host:port)
    pub address: String,
    /// 전송 프로토콜 (tcp, udp)
    pub proto: String,
    /// syslog 태그 (1-32자)
    pub tag: String,
    /// syslog facility (0, 8, ..., 88)
    pub facility: u8,
    /// envelope에 기록할 호스트 이름 (없으면 로컬 호스트 이름)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
}

impl Default for SyslogConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            proto: "tcp".to_owned(),
            tag: "logsync".to_owned(),
            facility: 0,
            hostname: None,
        }
    }
}

impl SyslogConfig {
    fn validate(&self) -> Result<(), LogsyncError> {
        if !is_host_port(&self.address) {
            return Err(invalid("syslog.address", "must be in host:port form"));
        }

        let valid_protos = ["tcp", "udp"];
        if !valid_protos.contains(&self.proto.as_str()) {
            return Err(invalid(
                "syslog.proto",
                &format!("must be one of: {}", valid_protos.join(", ")),
            ));
        }

        let tag_len = self.tag.chars().count();
        if tag_len == 0 || tag_len > MAX_TAG_LEN {
            return Err(invalid(
                "syslog.tag",
                &format!("length must be between 1 and {MAX_TAG_LEN}"),
            ));
        }

        if self.facility > 88 || self.facility % 8 != 0 {
            return Err(invalid(
                "syslog.facility",
                "must be one of: 0, 8, 16, 24, 32, 40, 48, 56, 64, 72, 80, 88",
            ));
        }

        Ok(())
    }
}

/// OAuth2 클라이언트 자격 증명 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuth2Config {
    /// 클라이언트 ID
    pub client_id: String,
    /// 클라이언트 시크릿
    pub secret: String,
    /// 토큰 발급 엔드포인트
    pub token_url: String,
    /// 이벤트 API 기본 주소
    pub context_url: String,
}

impl OAuth2Config {
    fn validate(&self) -> Result<(), LogsyncError> {
        if self.client_id.is_empty() {
            return Err(invalid("oauth2.client_id", "must not be empty"));
        }
        if self.secret.is_empty() {
            return Err(invalid("oauth2.secret", "must not be empty"));
        }
        for (field, value) in [
            ("oauth2.token_url", &self.token_url),
            ("oauth2.context_url", &self.context_url),
        ] {
            if let Err(e) = url::Url::parse(value) {
                return Err(invalid(field, &format!("invalid url: {e}")));
            }
        }
        Ok(())
    }
}

/// 이벤트 조회 필터
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// 조회할 이벤트 유형 (비어 있으면 전체)
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// 조회 기간 (일, 1-7)
    pub days: u32,
    /// 최대 이벤트 수 (1-999999)
    pub max: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            types: Vec::new(),
            days: 1,
            max: MAX_EVENTS_LIMIT,
        }
    }
}

impl FilterConfig {
    fn validate(&self) -> Result<(), LogsyncError> {
        if self.days == 0 || self.days > MAX_FILTER_DAYS {
            return Err(invalid(
                "filter.days",
                &format!("must be between 1 and {MAX_FILTER_DAYS}"),
            ));
        }
        if self.max == 0 || self.max > MAX_EVENTS_LIMIT {
            return Err(invalid(
                "filter.max",
                &format!("must be between 1 and {MAX_EVENTS_LIMIT}"),
            ));
        }
        Ok(())
    }
}

/// 탐지 규칙 설정
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// CEF signature ID
    pub class_id: String,
    /// 탐지 이름
    pub name: String,
    /// CEF severity (0-10)
    pub severity: u8,
    /// syslog severity (0-7)
    pub loglevel: u8,
    /// 리포터 목록 (모두 매칭되어야 탐지)
    #[serde(default)]
    pub reporters: Vec<ReporterConfig>,
}

impl DetectionConfig {
    /// 탐지 규칙 하나를 검증합니다. `idx`는 에러 메시지의 필드 경로에 사용됩니다.
    pub fn validate(&self, idx: usize) -> Result<(), LogsyncError> {
        let field = |name: &str| format!("detections[{idx}].{name}");

        if self.class_id.is_empty() {
            return Err(invalid(&field("class_id"), "must not be empty"));
        }
        if self.name.is_empty() {
            return Err(invalid(&field("name"), "must not be empty"));
        }
        if self.severity > MAX_CEF_SEVERITY {
            return Err(invalid(
                &field("severity"),
                &format!("must be between 0 and {MAX_CEF_SEVERITY}"),
            ));
        }
        if self.loglevel > MAX_LOGLEVEL {
            return Err(invalid(
                &field("loglevel"),
                &format!("must be between 0 and {MAX_LOGLEVEL}"),
            ));
        }
        if self.reporters.is_empty() {
            return Err(invalid(
                &field("reporters"),
                "at least one reporter is required",
            ));
        }

        for (ridx, reporter) in self.reporters.iter().enumerate() {
            if let Some(key) = reporter.required_key()
                && !reporter.has(key)
            {
                return Err(invalid(
                    &field(&format!("reporters[{ridx}].config.{key}")),
                    &format!("required for reporter type '{}'", reporter.kind),
                ));
            }
        }

        Ok(())
    }
}

/// 리포터 설정
///
/// `type` 판별자와 문자열 설정 맵으로 구성됩니다.
/// 알 수 없는 판별자도 파싱은 성공합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    /// 리포터 종류 (type, detail_exists, detail_not_exists)
    #[serde(rename = "type")]
    pub kind: String,
    /// 리포터별 설정 값
    #[serde(default)]
    pub config: HashMap<String, String>,
}

impl ReporterConfig {
    /// 이벤트 유형 리포터 판별자
    pub const TYPE: &'static str = "type";
    /// 상세 속성 존재 리포터 판별자
    pub const DETAIL_EXISTS: &'static str = "detail_exists";
    /// 상세 속성 부재 리포터 판별자
    pub const DETAIL_NOT_EXISTS: &'static str = "detail_not_exists";

    /// 설정 키가 있는지 확인합니다.
    pub fn has(&self, key: &str) -> bool {
        self.config.contains_key(key)
    }

    /// 설정 값을 반환합니다.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    /// 설정 값을 구분자로 나눈 목록을 반환합니다.
    ///
    /// 구분자가 없으면 값 전체가 단일 항목이고, 키가 없으면 빈 목록입니다.
    pub fn get_list(&self, key: &str, sep: &str) -> Vec<String> {
        match self.get(key) {
            None => Vec::new(),
            Some(value) if !sep.is_empty() && value.contains(sep) => {
                value.split(sep).map(str::to_owned).collect()
            }
            Some(value) => vec![value.to_owned()],
        }
    }

    /// 알려진 리포터 종류가 요구하는 설정 키
    fn required_key(&self) -> Option<&'static str> {
        match self.kind.as_str() {
            Self::TYPE => Some("type"),
            Self::DETAIL_EXISTS | Self::DETAIL_NOT_EXISTS => Some("details"),
            _ => None,
        }
    }
}

/// 로깅 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub level: String,
    /// 로그 형식 (json, pretty)
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            format: "pretty".to_owned(),
        }
    }
}

impl LogConfig {
    fn validate(&self) -> Result<(), LogsyncError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(invalid(
                "log.level",
                &format!("must be one of: {}", valid_levels.join(", ")),
            ));
        }

        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(invalid(
                "log.format",
                &format!("must be one of: {}", valid_formats.join(", ")),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> LogsyncError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        reason: reason.to_owned(),
    }
    .into()
}

/// `host:port` 형식인지 확인합니다. IPv6는 `[::1]:514` 형식이어야 합니다.
fn is_host_port(addr: &str) -> bool {
    let Some((host, port)) = addr.rsplit_once(':') else {
        return false;
    };
    if host.is_empty() || port.parse::<u16>().is_err() {
        return false;
    }
    if host.contains(':') {
        return host.starts_with('[') && host.ends_with(']');
    }
    true
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_opt_string(target: &mut Option<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = if val.is_empty() { None } else { Some(val) };
    }
}

fn override_u32(target: &mut u32, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<u32>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse u32 from env var, ignoring"
            ),
        }
    }
}
